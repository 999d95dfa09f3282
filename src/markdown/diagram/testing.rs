//! Scripted compiler for diagram tests.

use std::time::Duration;

use parking_lot::Mutex;

use super::compiler::{DiagramCompiler, DiagramError};
use super::theme::Palette;

/// Sources containing this marker fail to compile.
pub const SYNTAX_ERROR: &str = "syntax error";

#[derive(Debug, Default)]
pub struct FakeCompiler {
    delay: Duration,
    ids: Mutex<Vec<String>>,
}

impl FakeCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    /// Attempt ids seen so far, in call order.
    pub fn ids(&self) -> Vec<String> {
        self.ids.lock().clone()
    }
}

impl DiagramCompiler for FakeCompiler {
    async fn compile(
        &self,
        id: &str,
        source: &str,
        palette: &'static Palette,
    ) -> Result<String, DiagramError> {
        self.ids.lock().push(id.to_string());
        tokio::time::sleep(self.delay).await;

        if source.contains(SYNTAX_ERROR) {
            return Err(DiagramError::Compile(format!(
                "Parse error on line 1: {}",
                source.lines().next().unwrap_or_default()
            )));
        }
        Ok(format!(
            r#"<svg id="{id}" data-background="{}"></svg>"#,
            palette.background
        ))
    }
}
