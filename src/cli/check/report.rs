//! Check report types and formatting.

use std::collections::BTreeMap;
use std::fmt;

use owo_colors::OwoColorize;

use crate::markdown::ErrorPresentation;
use crate::utils::plural_s;

/// Block failures grouped by source file.
#[derive(Debug, Default)]
pub struct CheckReport {
    files: BTreeMap<String, Vec<ErrorPresentation>>,
    /// Files that could not be read or parsed at all.
    unreadable: BTreeMap<String, String>,
}

impl CheckReport {
    pub fn add_blocks(&mut self, source: String, errors: Vec<ErrorPresentation>) {
        if !errors.is_empty() {
            self.files.entry(source).or_default().extend(errors);
        }
    }

    pub fn add_unreadable(&mut self, source: String, reason: String) {
        self.unreadable.insert(source, reason);
    }

    /// Count of files with at least one failure.
    pub fn file_count(&self) -> usize {
        self.files.len() + self.unreadable.len()
    }

    /// Total failure count.
    pub fn error_count(&self) -> usize {
        self.files.values().map(Vec::len).sum::<usize>() + self.unreadable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.error_count() == 0
    }

    /// Print the full report to stderr.
    pub fn print(&self) {
        if self.is_empty() {
            return;
        }
        eprintln!();

        let file_count = self.file_count();
        let error_count = self.error_count();
        eprintln!(
            "{} {}",
            "blocks".red().bold(),
            format!(
                "({file_count} file{}, {error_count} error{})",
                plural_s(file_count),
                plural_s(error_count)
            )
            .dimmed()
        );

        for (path, reason) in &self.unreadable {
            eprintln!("{}{}{}", "[".dimmed(), path.cyan(), "]".dimmed());
            eprintln!("{} {}", "→".red(), reason);
        }

        for (path, errors) in &self.files {
            eprintln!("{}{}{}", "[".dimmed(), path.cyan(), "]".dimmed());
            for error in errors {
                eprintln!(
                    "{} {} {}",
                    "→".red(),
                    format!("`{}`", error.language_tag).yellow(),
                    error.message
                );
                if let Some(first) = error.raw_text.lines().find(|l| !l.trim().is_empty()) {
                    eprintln!("  {}", first.trim().dimmed());
                }
            }
        }
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.error_count();
        if total == 0 {
            write!(f, "{}", "all blocks rendered".green())
        } else {
            write!(
                f,
                "{} {} {}",
                "found".dimmed(),
                total.to_string().red().bold(),
                format!("error{}", plural_s(total)).dimmed()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let mut report = CheckReport::default();
        assert!(report.is_empty());

        report.add_blocks("a.md".into(), Vec::new());
        assert_eq!(report.file_count(), 0);

        report.add_blocks(
            "a.md".into(),
            vec![
                ErrorPresentation::new("No data provided", "", "stat-block"),
                ErrorPresentation::new("No diagram content provided", "", "mermaid"),
            ],
        );
        report.add_unreadable("b.md".into(), "Invalid TOML frontmatter".into());

        assert_eq!(report.file_count(), 2);
        assert_eq!(report.error_count(), 3);
        assert!(!report.is_empty());
    }

    #[test]
    fn test_display() {
        owo_colors::set_override(false);
        let mut report = CheckReport::default();
        assert_eq!(report.to_string(), "all blocks rendered");

        report.add_blocks(
            "a.md".into(),
            vec![ErrorPresentation::new("Invalid JSON: x", "{", "timeline")],
        );
        assert_eq!(report.to_string(), "found 1 error");
    }
}
