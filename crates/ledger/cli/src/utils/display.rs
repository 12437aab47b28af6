//! Terminal formatting

use std::fmt::Write;

use colored::Colorize;
use fantom_ledger::Policy;

/// Underlined heading preceded by a blank line
pub fn section_title(title: &str) -> String {
    format!("\n{}", title.bold().underline())
}

/// Green, with a check mark
pub fn success(message: &str) -> String {
    format!("✅ {}", message.green().bold())
}

/// Yellow, with a warning sign
pub fn warning(message: &str) -> String {
    format!("⚠️  {}", message.yellow().bold())
}

/// Heading followed by one indented `key: value` line per item
pub fn key_value_box(title: &str, items: &[(&str, String)]) -> String {
    let mut out = title.bold().underline().to_string();
    for (key, value) in items {
        let _ = write!(out, "\n  {}: {value}", key.bold());
    }
    out
}

/// Policy verdict coloured by severity
pub fn policy_verdict(policy: Policy) -> String {
    let text = policy.to_string();
    match policy {
        Policy::Prompt => text.green().to_string(),
        Policy::Warn(_) => text.yellow().to_string(),
        Policy::Deny(_) => text.red().bold().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_rendering() {
        colored::control::set_override(false);

        let rendered = key_value_box(
            "Address",
            &[("Path", "44'/60'/0'/0/0".to_string()), ("Address", "0x01".to_string())],
        );
        assert_eq!(rendered, "Address\n  Path: 44'/60'/0'/0/0\n  Address: 0x01");
        assert_eq!(policy_verdict(Policy::Deny("no prefix")), "deny (no prefix)");
        assert_eq!(section_title("Version"), "\nVersion");
    }
}
