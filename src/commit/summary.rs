//! Content-blind default commit summary.

/// Default summary for a commit, used as the fallback message and as the seed
/// text for AI refinement.
///
/// Only the first-commit state and the number of staged files matter; file
/// names and diff content are ignored.
pub fn default_summary(is_initial_commit: bool, staged_count: usize) -> String {
    if is_initial_commit {
        "Initial commit".to_string()
    } else if staged_count == 1 {
        "Update project configuration".to_string()
    } else {
        format!("Update {} project files", staged_count)
    }
}
