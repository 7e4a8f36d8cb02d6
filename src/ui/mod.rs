//! Terminal output: colored status lines, section layout and prompts.

pub mod countdown;
pub mod prompt;

use console::style;

pub use countdown::with_countdown;
pub use prompt::{DialoguerPrompter, Prompter};

const RULE_WIDTH: usize = 48;

/// Print a boxed screen title.
pub fn header(title: &str) {
    let rule = "━".repeat(RULE_WIDTH);
    println!();
    println!("{}", style(&rule).cyan().dim());
    println!("{}", style(format!("▣ {}", title)).cyan().bright().bold());
    println!("{}", style(&rule).cyan().dim());
}

/// Print a section heading.
pub fn section(title: &str) {
    println!();
    println!("{}", style(title).cyan().bright().bold());
}

/// Print an aligned key/value row.
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", style(format!("{:<8}", key)).blue(), value);
}

/// Print an indented plain row.
pub fn row(text: &str) {
    println!("  {}", text);
}

pub fn info(msg: &str) {
    println!("{}", style(msg).cyan());
}

pub fn warn(msg: &str) {
    println!("{}", style(msg).yellow());
}

pub fn success(msg: &str) {
    println!("{}", style(msg).green());
}

/// Print a fatal diagnostic to stderr.
pub fn error(msg: &str) {
    eprintln!("{}", style(msg).red());
}
