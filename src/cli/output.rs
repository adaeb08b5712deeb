//! CLI output formatting utilities

use crate::agent::AgentResponse;

/// Warnings can carry whole HTTP error bodies; cap what reaches the terminal
const MAX_WARNING_CHARS: usize = 200;

/// Truncate to a character budget, marking elision with `...`
///
/// Counts characters rather than bytes so multi-byte UTF-8 content never
/// splits mid-character.
#[must_use]
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let head: String = s.chars().take(max_chars).collect();
    format!("{head}...")
}

pub fn print_info(message: &str) {
    println!("{message}");
}

pub fn print_warning(message: &str) {
    eprintln!("⚠️  {message}");
}

pub fn print_error(message: &str) {
    eprintln!("❌ {message}");
}

/// Print an agent response, optionally with routing details
pub fn print_response(response: &AgentResponse, show_sources: bool) {
    println!("\n{}", response.answer.trim());

    for warning in &response.warnings {
        print_warning(&truncate_str(warning, MAX_WARNING_CHARS));
    }

    if show_sources {
        println!(
            "\n[used_rag: {} | {:?} | {:.0?}]",
            response.used_rag, response.classification, response.elapsed
        );
        if response.sources.is_empty() {
            println!("[sources: none]");
        } else {
            println!("[sources: {}]", response.sources.join(", "));
        }
    }
}
