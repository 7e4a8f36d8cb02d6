//! Refinement prompt construction.

/// Appended when the diff is cut to fit the budget.
pub const TRUNCATION_MARKER: &str = "\n...\n[diff truncated]";

/// Cut `diff` to at most `budget` characters, marking the cut.
pub fn truncate_diff(diff: &str, budget: usize) -> String {
    match diff.char_indices().nth(budget) {
        Some((byte_idx, _)) => format!("{}{}", &diff[..byte_idx], TRUNCATION_MARKER),
        None => diff.to_string(),
    }
}

/// Build the prompt asking the model to improve `draft` given the staged diff.
pub fn build_refine_prompt(draft: &str, diff: &str, limit: usize, budget: usize) -> String {
    format!(
        "Improve this Git commit message.\n\
         \n\
         Rules:\n\
         - FIRST line must be {limit} characters or fewer.\n\
         - Do NOT invent details that are not in the diff.\n\
         - Never mention file names.\n\
         - Reply with the commit message only.\n\
         \n\
         Current message:\n\
         {draft}\n\
         \n\
         Diff:\n\
         {diff}\n",
        limit = limit,
        draft = draft.trim(),
        diff = truncate_diff(diff, budget),
    )
}
