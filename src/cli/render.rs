//! `folio render`: one content file to an HTML fragment.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::SiteConfig;
use crate::content::{Content, ContentMeta};
use crate::markdown::node::{Element, Node};
use crate::markdown::{RenderedDocument, Renderer};
use crate::utils::plural_count;
use crate::{debug, log};

/// Render `file` and write the article to `output` (stdout when `None`).
pub async fn render_file(file: &Path, output: Option<&Path>, config: &SiteConfig) -> Result<()> {
    let content = Content::load(file)?;
    debug!("render"; "{} ({})", content.meta.title, file.display());

    let doc = Renderer::from_config(config).render(&content.body).await;
    for error in &doc.errors {
        debug!("render"; "`{}` block failed: {}", error.language_tag, error.message);
    }
    if !doc.errors.is_empty() {
        log!(
            "render";
            "{} rendered as error cards",
            plural_count(doc.errors.len(), "block")
        );
    }

    let html = article(&content.meta, doc).to_html();
    match output {
        Some(path) => {
            fs::write(path, html).with_context(|| format!("Failed to write {}", path.display()))?;
            log!("render"; "wrote {}", path.display());
        }
        None => {
            let mut out = std::io::stdout().lock();
            writeln!(out, "{html}").context("Failed to write to stdout")?;
        }
    }

    Ok(())
}

/// Wrap a rendered body in `<article>` with the title as heading.
fn article(meta: &ContentMeta, doc: RenderedDocument) -> Node {
    let mut article = Element::new("article")
        .attr("id", &meta.slug)
        .attr("data-date", &meta.date)
        .attr("data-tag", &meta.tag);
    if !meta.kind.is_empty() {
        article.set_attr("data-type", &meta.kind);
    }
    if !meta.description.is_empty() {
        article.set_attr("data-description", &meta.description);
    }
    article
        .child(Element::new("h1").text(&meta.title))
        .child(Node::raw(doc.html))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use tempfile::TempDir;

    fn meta(description: &str) -> ContentMeta {
        ContentMeta {
            title: "Q1 <Report>".into(),
            date: "2024-04-01".into(),
            description: description.into(),
            tag: "work".into(),
            kind: "article".into(),
            slug: "q1".into(),
        }
    }

    #[test]
    fn test_article_wraps_body() {
        let doc = RenderedDocument {
            html: "<p>Body</p>".into(),
            errors: Vec::new(),
        };
        let html = article(&meta(""), doc).to_html();
        assert_eq!(
            html,
            "<article id=\"q1\" data-date=\"2024-04-01\" data-tag=\"work\" data-type=\"article\"><h1>Q1 &lt;Report&gt;</h1><p>Body</p></article>"
        );
    }

    #[test]
    fn test_article_description() {
        let doc = RenderedDocument {
            html: String::new(),
            errors: Vec::new(),
        };
        let html = article(&meta("numbers"), doc).to_html();
        assert!(html.contains("data-description=\"numbers\""));
    }

    #[tokio::test]
    async fn test_render_file_to_output() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("post.md");
        let output = dir.path().join("post.html");
        fs::write(
            &input,
            "---\ntitle: Hello\n---\n```progress-bar\n{\"progress\": 40}\n```\n\n```mermaid\ngraph TD; A-->B\n```\n",
        )
        .unwrap();

        let config = test_parse_config("[diagram]\nenabled = false\n\n[render]\nhighlight = false");
        render_file(&input, Some(&output), &config).await.unwrap();

        let html = fs::read_to_string(&output).unwrap();
        assert!(html.starts_with("<article"));
        assert!(html.contains("<h1>Hello</h1>"));
        assert!(html.contains("progress-fill--blue"));
        assert!(html.contains("language-mermaid"));
    }
}
