//! Shared helpers.

pub mod html;
pub mod plural;

pub use plural::{plural_count, plural_s};
