//! Fixed glyph tables for icons and indicators.

use crate::markdown::node::{Element, Node};

/// Decorative glyph span, hidden from screen readers.
pub(super) fn glyph(class: impl Into<String>, symbol: &str) -> Node {
    Element::with_class("span", class)
        .attr("aria-hidden", "true")
        .text(symbol)
        .into()
}

// =============================================================================
// Stat Icons
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    DollarSign,
    Users,
    Activity,
    Target,
    Zap,
}

impl Icon {
    /// Look up an icon by name. Unknown names have no icon.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "dollar-sign" => Some(Self::DollarSign),
            "users" => Some(Self::Users),
            "activity" => Some(Self::Activity),
            "target" => Some(Self::Target),
            "zap" => Some(Self::Zap),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::DollarSign => "dollar-sign",
            Self::Users => "users",
            Self::Activity => "activity",
            Self::Target => "target",
            Self::Zap => "zap",
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            Self::DollarSign => "$",
            Self::Users => "👥",
            Self::Activity => "📈",
            Self::Target => "🎯",
            Self::Zap => "⚡",
        }
    }

    pub fn to_node(self) -> Node {
        glyph(format!("icon icon-{}", self.name()), self.symbol())
    }
}

// =============================================================================
// Trend Indicator
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

impl Trend {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            "neutral" => Some(Self::Neutral),
            _ => None,
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Up => "↗",
            Self::Down => "↘",
            Self::Neutral => "→",
        }
    }

    /// Color semantics: up is good news, down is bad news.
    pub const fn tone(self) -> &'static str {
        match self {
            Self::Up => "positive",
            Self::Down => "negative",
            Self::Neutral => "neutral",
        }
    }

    pub fn to_node(self) -> Node {
        glyph("trend-icon", self.symbol())
    }
}

// =============================================================================
// Boolean Cells
// =============================================================================

pub(super) fn yes() -> Node {
    glyph("cell-yes", "✓")
}

pub(super) fn no() -> Node {
    glyph("cell-no", "✗")
}
