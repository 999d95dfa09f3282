//! Markdown rendering with infographic and diagram blocks.
//!
//! - [`convert`] - Markdown → node tree via `pulldown-cmark`
//! - [`dispatch`] - per code block routing (code, infographic, diagram)
//! - [`infographic`] - JSON driven cards
//! - [`diagram`] - asynchronously compiled mermaid diagrams
//! - [`render`] - the document pipeline tying it together

pub mod convert;
pub mod diagram;
pub mod dispatch;
pub mod error;
pub mod highlight;
pub mod infographic;
pub mod language;
pub mod node;
pub mod render;


pub use error::ErrorPresentation;
pub use render::{RenderedDocument, Renderer};
