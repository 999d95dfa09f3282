//! Content loader: markdown files with frontmatter.

mod frontmatter;

use anyhow::{Context, Result};
use jwalk::WalkDir;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_DATE: &str = "2020-01-01";
const DEFAULT_TAG: &str = "general";

/// Listing metadata of a content file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentMeta {
    pub title: String,
    pub date: String,
    pub description: String,
    pub tag: String,
    /// Name of the containing directory (`article`, `developer`, ...).
    pub kind: String,
    /// File stem.
    pub slug: String,
}

/// A loaded content file.
#[derive(Debug, Clone)]
pub struct Content {
    pub meta: ContentMeta,
    pub body: String,
}

impl Content {
    /// Read `path` and split it into metadata and markdown body.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(path, &text).with_context(|| format!("in {}", path.display()))
    }

    /// Parse `text` as if it were read from `path`.
    pub fn parse(path: &Path, text: &str) -> Result<Self> {
        let (mut fields, body) = frontmatter::split(text)?;

        let slug = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let kind = path
            .parent()
            .and_then(Path::file_name)
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut take = |key: &str| fields.remove(key).filter(|v| !v.is_empty());
        let meta = ContentMeta {
            title: take("title").unwrap_or_else(|| slug.clone()),
            date: take("date").unwrap_or_else(|| DEFAULT_DATE.to_string()),
            description: take("description").unwrap_or_default(),
            tag: take("tag").unwrap_or_else(|| DEFAULT_TAG.to_string()),
            kind,
            slug,
        };

        Ok(Self {
            meta,
            body: body.to_string(),
        })
    }
}

/// Collect markdown files from `paths`, expanding directories recursively.
///
/// Plain files are kept as given regardless of extension. The result is
/// sorted and free of duplicates.
pub fn scan(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path).skip_hidden(true) {
                let entry = entry.with_context(|| format!("Failed to walk {}", path.display()))?;
                let entry_path = entry.path();
                if entry.file_type().is_file() && is_markdown(&entry_path) {
                    files.push(entry_path);
                }
            }
        } else if path.is_file() {
            files.push(path.clone());
        } else {
            anyhow::bail!("No such file or directory: {}", path.display());
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn is_markdown(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "md")
}
