//! Live "seconds remaining" line while awaiting a deadline-bound future.

use std::future::Future;
use std::time::Duration;

use console::{Term, style};

/// Await `future` while redrawing a countdown from `total` on stderr.
///
/// The line is only drawn when stderr is a terminal and is cleared once the
/// future resolves. The future's own deadline is not enforced here.
pub async fn with_countdown<F: Future>(label: &str, total: Duration, future: F) -> F::Output {
    let term = Term::stderr();
    if !term.is_term() {
        return future.await;
    }

    tokio::pin!(future);
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    let mut remaining = total.as_secs();

    let output = loop {
        tokio::select! {
            out = &mut future => break out,
            _ = ticker.tick() => {
                let line = format!("{} {}s remaining", label, remaining);
                let _ = term.clear_line();
                let _ = term.write_str(&style(line).cyan().to_string());
                remaining = remaining.saturating_sub(1);
            }
        }
    };

    let _ = term.clear_line();
    output
}
