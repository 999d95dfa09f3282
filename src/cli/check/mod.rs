//! `folio check`: report malformed blocks without compiling diagrams.

mod report;

use std::path::{Path, PathBuf};

use anyhow::Result;
use parking_lot::Mutex;
use rayon::prelude::*;

use crate::config::SiteConfig;
use crate::content::{self, Content};
use crate::log;
use crate::logger::ProgressLine;
use crate::markdown::Renderer;
use crate::markdown::diagram::DiagramCompiler;
use crate::utils::plural_count;

use report::CheckReport;

/// Check every markdown file under `paths` (default: the content directory).
pub fn check_content(paths: &[PathBuf], config: &SiteConfig) -> Result<()> {
    let roots = if paths.is_empty() {
        vec![config.content_dir().to_path_buf()]
    } else {
        paths.to_vec()
    };
    let files = content::scan(&roots)?;

    if files.is_empty() {
        log!("check"; "no content files found");
        return Ok(());
    }

    log!("check"; "checking {}", plural_count(files.len(), "file"));

    let renderer = Renderer::from_config(config);
    let report = check_files(&files, &renderer, &config.root);

    report.print();
    if !report.is_empty() {
        eprintln!();
    }
    log!("check"; "{report}");

    if report.is_empty() {
        Ok(())
    } else {
        anyhow::bail!(
            "found {} with block errors",
            plural_count(report.file_count(), "file")
        )
    }
}

fn check_files<C: DiagramCompiler>(
    files: &[PathBuf],
    renderer: &Renderer<C>,
    root: &Path,
) -> CheckReport {
    let report = Mutex::new(CheckReport::default());
    let progress = ProgressLine::new("check", &[("files", files.len())]);

    files.par_iter().for_each(|path| {
        let source = display_path(path, root);
        match Content::load(path) {
            Ok(content) => {
                let errors = renderer.convert(&content.body).failures();
                report.lock().add_blocks(source, errors);
            }
            Err(err) => report.lock().add_unreadable(source, format!("{err:#}")),
        }
        progress.inc("files");
    });

    progress.finish();
    report.into_inner()
}

/// Path relative to the project root when possible.
fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::diagram::testing::FakeCompiler;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, text: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_check_files_groups_failures() {
        let dir = TempDir::new().unwrap();
        let good = write(
            dir.path(),
            "good.md",
            "# Fine\n\n```stat-block\n{\"value\": \"1\"}\n```\n",
        );
        let bad = write(
            dir.path(),
            "bad.md",
            "---\ntitle: Bad\n---\n```timeline\n{\"items\": 1}\n```\n\n```mermaid\n```\n",
        );
        let broken = write(dir.path(), "broken.md", "+++\ntitle = \n+++\n");

        let renderer = Renderer::new(FakeCompiler::new());
        let report = check_files(&[good, bad, broken], &renderer, dir.path());

        assert_eq!(report.file_count(), 2);
        assert_eq!(report.error_count(), 3);
    }

    #[test]
    fn test_display_path() {
        assert_eq!(
            display_path(Path::new("/site/content/a.md"), Path::new("/site")),
            "content/a.md"
        );
        assert_eq!(
            display_path(Path::new("/other/a.md"), Path::new("/site")),
            "/other/a.md"
        );
    }
}
