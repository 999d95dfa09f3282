//! Light/dark mode signal and the diagram palettes keyed by it.

use serde_json::{Value, json};
use tokio::sync::watch;

// =============================================================================
// Color Mode
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    #[default]
    Light,
    Dark,
}

impl ColorMode {
    pub const fn from_dark(dark: bool) -> Self {
        if dark { Self::Dark } else { Self::Light }
    }

    pub const fn palette(self) -> &'static Palette {
        match self {
            Self::Light => &Palette::LIGHT,
            Self::Dark => &Palette::DARK,
        }
    }
}

// =============================================================================
// Palette
// =============================================================================

/// Theme variables handed to the diagram compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub primary_color: &'static str,
    pub primary_text_color: &'static str,
    pub primary_border_color: &'static str,
    pub line_color: &'static str,
    pub secondary_color: &'static str,
    pub tertiary_color: &'static str,
    pub background: &'static str,
    pub main_bkg: &'static str,
    pub second_bkg: &'static str,
    pub tertiary_bkg: &'static str,
    pub text_color: &'static str,
    pub border1: &'static str,
    pub border2: &'static str,
    pub arrowhead_color: &'static str,
    pub font_family: &'static str,
    pub font_size: &'static str,
}

impl Palette {
    pub const LIGHT: Self = Self {
        primary_color: "#0d9488",
        primary_text_color: "#18181b",
        primary_border_color: "#0f766e",
        line_color: "#a1a1aa",
        secondary_color: "#f4f4f5",
        tertiary_color: "#fafafa",
        background: "#ffffff",
        main_bkg: "#fafafa",
        second_bkg: "#f4f4f5",
        tertiary_bkg: "#e4e4e7",
        text_color: "#18181b",
        border1: "#d4d4d8",
        border2: "#a1a1aa",
        arrowhead_color: "#a1a1aa",
        font_family: "ui-sans-serif, system-ui, sans-serif",
        font_size: "16px",
    };

    pub const DARK: Self = Self {
        primary_color: "#2dd4bf",
        primary_text_color: "#fafafa",
        primary_border_color: "#0d9488",
        line_color: "#71717a",
        secondary_color: "#3f3f46",
        tertiary_color: "#27272a",
        background: "#18181b",
        main_bkg: "#27272a",
        second_bkg: "#3f3f46",
        tertiary_bkg: "#52525b",
        text_color: "#fafafa",
        border1: "#52525b",
        border2: "#71717a",
        arrowhead_color: "#71717a",
        font_family: "ui-sans-serif, system-ui, sans-serif",
        font_size: "16px",
    };

    /// Mermaid configuration object using the `base` theme with these
    /// variables.
    pub fn to_mermaid_config(&self) -> Value {
        json!({
            "theme": "base",
            "securityLevel": "loose",
            "themeVariables": {
                "primaryColor": self.primary_color,
                "primaryTextColor": self.primary_text_color,
                "primaryBorderColor": self.primary_border_color,
                "lineColor": self.line_color,
                "secondaryColor": self.secondary_color,
                "tertiaryColor": self.tertiary_color,
                "background": self.background,
                "mainBkg": self.main_bkg,
                "secondBkg": self.second_bkg,
                "tertiaryBkg": self.tertiary_bkg,
                "textColor": self.text_color,
                "border1": self.border1,
                "border2": self.border2,
                "arrowheadColor": self.arrowhead_color,
                "fontFamily": self.font_family,
                "fontSize": self.font_size,
            }
        })
    }
}

// =============================================================================
// Theme Signal
// =============================================================================

/// The document-wide dark mode flag.
///
/// Views subscribe on mount and drop their receiver on teardown; setting the
/// same mode again does not wake anyone.
#[derive(Debug)]
pub struct ThemeSignal {
    tx: watch::Sender<ColorMode>,
}

impl ThemeSignal {
    pub fn new(mode: ColorMode) -> Self {
        let (tx, _) = watch::channel(mode);
        Self { tx }
    }

    #[cfg(test)]
    pub fn get(&self) -> ColorMode {
        *self.tx.borrow()
    }

    /// Change the mode. Returns whether subscribers were notified.
    pub fn set(&self, mode: ColorMode) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == mode {
                false
            } else {
                *current = mode;
                true
            }
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<ColorMode> {
        self.tx.subscribe()
    }

    /// Number of live subscriptions.
    #[cfg(test)]
    pub fn subscribers(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ThemeSignal {
    fn default() -> Self {
        Self::new(ColorMode::default())
    }
}
