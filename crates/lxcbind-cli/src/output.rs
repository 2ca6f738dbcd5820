//! Formatted output helpers for CLI commands.
//!
//! Commands render into strings so the formatting can be tested without a
//! terminal; `execute` functions print the result.

use std::fmt::Write;

/// Placeholder shown for unset values.
pub const UNSET: &str = "-";

/// Formats container names one per line.
#[must_use]
pub fn format_names(names: &[String]) -> String {
    if names.is_empty() {
        return "No containers found.".to_string();
    }
    names.join("\n")
}

/// Formats `key value` rows with the keys padded to a common width.
#[must_use]
pub fn format_rows(rows: &[(&str, String)]) -> String {
    let width = rows.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut out = String::new();
    for (i, (key, value)) in rows.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = write!(out, "{key:<width$}  {value}");
    }
    out
}

/// Renders a boolean as `yes` / `no`.
#[must_use]
pub const fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

/// Renders an optional value, using [`UNSET`] for `None`.
#[must_use]
pub fn or_unset(value: Option<String>) -> String {
    value.unwrap_or_else(|| UNSET.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_names_one_per_line() {
        assert_eq!(format_names(&["db".into(), "web".into()]), "db\nweb");
    }

    #[test]
    fn format_names_empty_message() {
        assert_eq!(format_names(&[]), "No containers found.");
    }

    #[test]
    fn format_rows_aligns_keys() {
        let rows = [("liblxc", "4.0.12".to_string()), ("devel", "no".to_string())];
        assert_eq!(format_rows(&rows), "liblxc  4.0.12\ndevel   no");
    }

    #[test]
    fn yes_no_and_unset() {
        assert_eq!(yes_no(true), "yes");
        assert_eq!(yes_no(false), "no");
        assert_eq!(or_unset(None), "-");
        assert_eq!(or_unset(Some("lxc".into())), "lxc");
    }
}
