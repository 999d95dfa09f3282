//! Mermaid diagram blocks.
//!
//! A [`DiagramView`] owns one diagram for as long as it is mounted:
//!
//! ```text
//! mount ──► Loading ──► Rendered(svg)
//!              ▲    └──► Failed(message)
//!              └── theme change (re-entered from any state)
//! ```
//!
//! Compilation runs on a spawned task. Every attempt gets a fresh id, and a
//! theme change that arrives mid-compile supersedes the attempt in flight.
//! Dropping the view unsubscribes from the theme signal and discards whatever
//! the task was still computing.

pub mod compiler;
#[cfg(test)]
pub(crate) mod testing;
pub mod theme;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::error::error_card;
use super::node::{Element, Node};
use crate::debug;

pub use compiler::{DiagramCompiler, DiagramError, MermaidCli, next_id};
pub use theme::{ColorMode, ThemeSignal};

// =============================================================================
// State
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagramState {
    Loading,
    /// Compiled SVG markup.
    Rendered(String),
    /// Human-readable failure.
    Failed(String),
}

impl DiagramState {
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Loading)
    }

    /// Display node for this state. `source` is shown when compilation failed.
    pub fn to_node(&self, source: &str) -> Node {
        match self {
            Self::Loading => Element::with_class("div", "mermaid-diagram mermaid-loading")
                .child(
                    Element::with_class("span", "mermaid-loading-text").text("Loading diagram..."),
                )
                .into(),
            Self::Rendered(svg) => Element::with_class("div", "mermaid-diagram")
                .child(Node::raw(svg))
                .into(),
            Self::Failed(message) => error_card("mermaid-error", "Mermaid Error:", message, source),
        }
    }
}

// =============================================================================
// View
// =============================================================================

/// A mounted diagram.
#[derive(Debug)]
pub struct DiagramView {
    source: String,
    state: watch::Receiver<DiagramState>,
    alive: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl DiagramView {
    /// Mount a diagram and start compiling it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn mount<C: DiagramCompiler>(
        source: impl Into<String>,
        compiler: Arc<C>,
        theme: watch::Receiver<ColorMode>,
        timeout: Duration,
    ) -> Self {
        let source = source.into();
        let (tx, state) = watch::channel(DiagramState::Loading);
        let alive = Arc::new(AtomicBool::new(true));

        let task = tokio::spawn(run(
            source.trim().to_string(),
            compiler,
            theme,
            timeout,
            Publisher {
                tx,
                alive: Arc::clone(&alive),
            },
        ));

        Self {
            source,
            state,
            alive,
            task,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Receiver following every state transition.
    #[cfg(test)]
    pub fn watch(&self) -> watch::Receiver<DiagramState> {
        self.state.clone()
    }

    /// Wait until the current attempt leaves `Loading`.
    pub async fn settled(&mut self) -> DiagramState {
        match self.state.wait_for(DiagramState::is_settled).await {
            Ok(state) => state.clone(),
            Err(_) => DiagramState::Failed("Diagram renderer stopped".into()),
        }
    }

    pub fn to_node(&self) -> Node {
        self.state.borrow().to_node(&self.source)
    }
}

impl Drop for DiagramView {
    fn drop(&mut self) {
        self.alive.store(false, Ordering::SeqCst);
        self.task.abort();
    }
}

// =============================================================================
// Compile Task
// =============================================================================

/// State sender guarded by the owning view's liveness flag.
struct Publisher {
    tx: watch::Sender<DiagramState>,
    alive: Arc<AtomicBool>,
}

impl Publisher {
    /// Returns `false` once the view is gone.
    fn publish(&self, state: DiagramState) -> bool {
        if !self.alive.load(Ordering::SeqCst) {
            debug!("diagram"; "view unmounted, discarding result");
            return false;
        }
        self.tx.send_replace(state);
        true
    }
}

enum Wake<T> {
    Done(T),
    ThemeChanged,
    SignalClosed,
}

async fn run<C: DiagramCompiler>(
    source: String,
    compiler: Arc<C>,
    mut theme: watch::Receiver<ColorMode>,
    timeout: Duration,
    publisher: Publisher,
) {
    if source.is_empty() {
        publisher.publish(DiagramState::Failed(DiagramError::Empty.to_string()));
        return;
    }

    loop {
        let mode = *theme.borrow_and_update();
        let id = next_id();
        if !publisher.publish(DiagramState::Loading) {
            return;
        }

        let attempt = tokio::time::timeout(timeout, compiler.compile(&id, &source, mode.palette()));
        tokio::pin!(attempt);

        let wake = tokio::select! {
            biased;
            changed = theme.changed() => match changed {
                Ok(()) => Wake::ThemeChanged,
                Err(_) => Wake::SignalClosed,
            },
            result = &mut attempt => Wake::Done(result),
        };

        let result = match wake {
            Wake::Done(result) => result,
            Wake::ThemeChanged => {
                debug!("diagram"; "{} superseded by theme change", id);
                continue;
            }
            // Nobody can change the theme anymore: finish this attempt and stop.
            Wake::SignalClosed => {
                let result = (&mut attempt).await;
                publisher.publish(settle(&id, result, timeout));
                return;
            }
        };

        if !publisher.publish(settle(&id, result, timeout)) {
            return;
        }

        if theme.changed().await.is_err() {
            return;
        }
    }
}

fn settle(
    id: &str,
    result: Result<Result<String, DiagramError>, tokio::time::error::Elapsed>,
    timeout: Duration,
) -> DiagramState {
    match result {
        Ok(Ok(svg)) => {
            debug!("diagram"; "{} rendered", id);
            DiagramState::Rendered(svg)
        }
        Ok(Err(e)) => {
            debug!("diagram"; "{} failed: {}", id, e);
            DiagramState::Failed(e.to_string())
        }
        Err(_) => {
            debug!("diagram"; "{} timed out", id);
            DiagramState::Failed(DiagramError::Timeout(timeout).to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{FakeCompiler, SYNTAX_ERROR};
    use super::theme::Palette;
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn mount(source: &str, compiler: &Arc<FakeCompiler>, signal: &ThemeSignal) -> DiagramView {
        DiagramView::mount(source, Arc::clone(compiler), signal.subscribe(), TIMEOUT)
    }

    #[tokio::test]
    async fn test_renders_with_current_palette() {
        let compiler = Arc::new(FakeCompiler::new());
        let signal = ThemeSignal::new(ColorMode::Dark);
        let mut view = mount("graph TD; A-->B", &compiler, &signal);

        let DiagramState::Rendered(svg) = view.settled().await else {
            panic!("expected rendered diagram");
        };
        assert!(svg.contains(Palette::DARK.background));
        assert!(view.to_node().to_html().contains("<svg"));
    }

    #[tokio::test]
    async fn test_empty_source_fails_without_compiling() {
        let compiler = Arc::new(FakeCompiler::new());
        let signal = ThemeSignal::default();
        let mut view = mount("  \n ", &compiler, &signal);

        assert_eq!(
            view.settled().await,
            DiagramState::Failed("No diagram content provided".into())
        );
        assert!(compiler.ids().is_empty());
    }

    #[tokio::test]
    async fn test_compile_error_shows_source() {
        let compiler = Arc::new(FakeCompiler::new());
        let signal = ThemeSignal::default();
        let source = format!("graph TD; {SYNTAX_ERROR}");
        let mut view = mount(&source, &compiler, &signal);

        assert!(matches!(view.settled().await, DiagramState::Failed(_)));
        let html = view.to_node().to_html();
        assert!(html.contains("Mermaid Error:"));
        assert!(html.contains("View source"));
        assert!(html.contains(SYNTAX_ERROR));
    }

    #[tokio::test]
    async fn test_theme_change_rerenders_with_fresh_id() {
        let compiler = Arc::new(FakeCompiler::new());
        let signal = ThemeSignal::new(ColorMode::Light);
        let mut view = mount("graph TD; A-->B", &compiler, &signal);
        view.settled().await;

        signal.set(ColorMode::Dark);
        let mut rx = view.watch();
        let state = rx
            .wait_for(|s| {
                matches!(s, DiagramState::Rendered(svg) if svg.contains(Palette::DARK.background))
            })
            .await
            .unwrap()
            .clone();
        assert!(state.is_settled());

        let ids = compiler.ids();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
    }

    #[tokio::test]
    async fn test_theme_change_supersedes_slow_attempt() {
        let compiler = Arc::new(FakeCompiler::with_delay(Duration::from_millis(200)));
        let signal = ThemeSignal::new(ColorMode::Light);
        let mut view = mount("graph TD; A-->B", &compiler, &signal);

        tokio::time::sleep(Duration::from_millis(20)).await;
        signal.set(ColorMode::Dark);

        let DiagramState::Rendered(svg) = view.settled().await else {
            panic!("expected rendered diagram");
        };
        assert!(svg.contains(Palette::DARK.background));
        assert_eq!(compiler.ids().len(), 2);
    }

    #[tokio::test]
    async fn test_result_discarded_after_unmount() {
        let compiler = Arc::new(FakeCompiler::with_delay(Duration::from_millis(50)));
        let signal = ThemeSignal::default();
        let view = mount("graph TD; A-->B", &compiler, &signal);
        let rx = view.watch();
        assert_eq!(signal.subscribers(), 1);

        drop(view);
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(*rx.borrow(), DiagramState::Loading);
        assert_eq!(signal.subscribers(), 0);
    }

    #[tokio::test]
    async fn test_timeout() {
        let compiler = Arc::new(FakeCompiler::with_delay(Duration::from_secs(10)));
        let signal = ThemeSignal::default();
        let mut view = DiagramView::mount(
            "graph TD; A-->B",
            compiler,
            signal.subscribe(),
            Duration::from_millis(30),
        );

        let DiagramState::Failed(message) = view.settled().await else {
            panic!("expected failure");
        };
        assert!(message.starts_with("Diagram compilation timed out after"));
    }

    #[test]
    fn test_loading_node() {
        let html = DiagramState::Loading.to_node("graph").to_html();
        assert!(html.contains("Loading diagram..."));
    }
}
