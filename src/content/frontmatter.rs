//! Frontmatter detection and parsing.
//!
//! Two forms are recognised at the very start of a file:
//!
//! ```text
//! ---                      +++
//! title: Hello             title = "Hello"
//! date: 2024-01-01         date = 2024-01-01
//! ---                      +++
//! ```

use anyhow::{Context, Result};
use rustc_hash::FxHashMap;

/// Raw frontmatter fields, values already flattened to strings.
pub type Fields = FxHashMap<String, String>;

/// Split `content` into `(fields, body)`.
///
/// Files without frontmatter yield empty fields and the whole content as body.
pub fn split(content: &str) -> Result<(Fields, &str)> {
    match detect(content) {
        Some((fm, body, true)) => Ok((parse_toml(fm)?, body)),
        Some((fm, body, false)) => Ok((parse_yaml_like(fm), body)),
        None => Ok((Fields::default(), content)),
    }
}

/// Returns `(frontmatter, body, is_toml)` if found.
fn detect(content: &str) -> Option<(&str, &str, bool)> {
    let trimmed = content.trim_start();

    for (fence, is_toml) in [("---", false), ("+++", true)] {
        if let Some(rest) = trimmed.strip_prefix(fence)
            && let Some(end) = rest.find(&format!("\n{fence}"))
        {
            let fm = rest[..end].trim();
            let body = rest[end + 1 + fence.len()..].trim_start_matches(['\r', '\n']);
            return Some((fm, body, is_toml));
        }
    }

    None
}

/// Parse simple YAML-like frontmatter (`key: value`).
///
/// One field per line. Lists and block scalars are not expanded.
fn parse_yaml_like(content: &str) -> Fields {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_lowercase(), unquote(value.trim()).to_string()))
        .collect()
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

fn parse_toml(content: &str) -> Result<Fields> {
    let table: toml::Table = toml::from_str(content).context("Invalid TOML frontmatter")?;
    Ok(table
        .into_iter()
        .filter_map(|(key, value)| {
            let value = match value {
                toml::Value::String(s) => s,
                toml::Value::Datetime(dt) => dt.to_string(),
                toml::Value::Integer(n) => n.to_string(),
                toml::Value::Float(n) => n.to_string(),
                toml::Value::Boolean(b) => b.to_string(),
                toml::Value::Array(_) | toml::Value::Table(_) => return None,
            };
            Some((key.to_lowercase(), value))
        })
        .collect())
}
