//! Human-readable run summary.

use crate::core::ResultsMap;

/// Opening line of every summary, including runs where every task failed.
pub const SUCCESS_BANNER: &str = "✅ Task completed successfully!\n";

const ERROR_MARK: &str = "❌";

/// Render one bullet per agent in results order, under the success banner.
pub fn render_summary(results: &ResultsMap) -> String {
    let mut parts = vec![SUCCESS_BANNER.to_string()];
    for (agent, result) in results.iter() {
        if result.is_success() {
            parts.push(format!("• {}: {}", title_case(agent), result.message));
        } else {
            parts.push(format!(
                "• {}: {} {}",
                title_case(agent),
                ERROR_MARK,
                result.message
            ));
        }
    }
    parts.join("\n")
}

/// Uppercase the first letter of each alphabetic run, lowercase the rest.
fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_word = false;
    for ch in name.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}
