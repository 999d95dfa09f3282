//! `progress-bar`: one or more percentage bars.

use serde_json::Value;

use super::InfographicError;
use super::value::{as_list, is_truthy, name_field, text_field};
use crate::markdown::node::{Element, Node};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BarColor {
    #[default]
    Blue,
    Green,
    Teal,
    Red,
    Yellow,
}

impl BarColor {
    /// Unknown or missing names fall back to blue.
    fn from_name(name: Option<&str>) -> Self {
        match name {
            Some("green") => Self::Green,
            Some("teal") => Self::Teal,
            Some("red") => Self::Red,
            Some("yellow") => Self::Yellow,
            _ => Self::Blue,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Teal => "teal",
            Self::Red => "red",
            Self::Yellow => "yellow",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub title: Option<String>,
    /// Always within `0.0..=100.0`.
    pub progress: f64,
    pub show_percentage: bool,
    pub label: Option<String>,
    pub color: BarColor,
}

impl Bar {
    fn from_value(data: &Value) -> Result<Self, InfographicError> {
        if !data.is_object() {
            return Err(InfographicError::Shape("Progress bar entries must be objects".into()));
        }
        Ok(Self {
            title: text_field(data, "title"),
            progress: clamp_progress(data.get("progress")),
            show_percentage: data.get("showPercentage").is_some_and(is_truthy),
            label: text_field(data, "label"),
            color: BarColor::from_name(name_field(data, "color")),
        })
    }

    /// Display form of the clamped value: `50`, `33.5`.
    pub fn percentage(&self) -> String {
        format_percent(self.progress)
    }
}

/// Clamp into `[0, 100]`; anything that is not a number counts as 0.
pub fn clamp_progress(value: Option<&Value>) -> f64 {
    value
        .and_then(Value::as_f64)
        .unwrap_or(0.0)
        .clamp(0.0, 100.0)
}

fn format_percent(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Strategy entry point.
pub fn render(data: &Value) -> Result<Node, InfographicError> {
    let bars = as_list(data)
        .into_iter()
        .map(Bar::from_value)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Element::with_class("div", "progress-group")
        .children(bars.iter().map(render_bar))
        .into())
}

fn render_bar(bar: &Bar) -> Element {
    let percentage = bar.percentage();

    let mut header = Element::with_class("div", "progress-header");
    if let Some(title) = &bar.title {
        header = header.child(Element::with_class("div", "progress-title").text(title));
    }
    if bar.show_percentage {
        header = header
            .child(Element::with_class("div", "progress-percent").text(format!("{percentage}%")));
    }

    let fill_class = format!("progress-fill progress-fill--{}", bar.color.name());
    let fill = Element::with_class("div", fill_class)
        .attr("style", format!("width: {percentage}%"));
    let track = Element::with_class("div", "progress-track")
        .attr("role", "progressbar")
        .attr("aria-valuemin", "0")
        .attr("aria-valuemax", "100")
        .attr("aria-valuenow", percentage.as_str())
        .child(fill);

    let mut card = Element::with_class("div", "progress-card").child(header).child(track);
    if let Some(label) = &bar.label {
        card = card.child(Element::with_class("div", "progress-label").text(label));
    }
    card
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn percent_text(data: Value) -> String {
        let node = render(&data).unwrap();
        Node::from(node.find_class("progress-percent")[0].clone()).text_content()
    }

    #[test]
    fn test_clamping() {
        let cases = [(-10, "0%"), (0, "0%"), (50, "50%"), (100, "100%"), (150, "100%")];
        for (input, expected) in cases {
            assert_eq!(
                percent_text(json!({"progress": input, "showPercentage": true})),
                expected,
                "progress {input}"
            );
        }
    }

    #[test]
    fn test_non_numeric_progress_is_zero() {
        assert_eq!(clamp_progress(Some(&json!("75"))), 0.0);
        assert_eq!(clamp_progress(Some(&json!(null))), 0.0);
        assert_eq!(clamp_progress(None), 0.0);
    }

    #[test]
    fn test_fractional_percentage() {
        assert_eq!(percent_text(json!({"progress": 33.5, "showPercentage": true})), "33.5%");
    }

    #[test]
    fn test_percentage_is_opt_in() {
        let node = render(&json!({"progress": 40})).unwrap();
        assert!(node.find_class("progress-percent").is_empty());
        let fill = node.find_class("progress-fill")[0];
        assert_eq!(fill.get_attr("style"), Some("width: 40%"));
    }

    #[test]
    fn test_color_palette() {
        let node = render(&json!([
            {"progress": 1, "color": "green"},
            {"progress": 2, "color": "purple"},
            {"progress": 3}
        ]))
        .unwrap();
        assert_eq!(node.find_class("progress-card").len(), 3);
        assert_eq!(node.find_class("progress-fill--green").len(), 1);
        assert_eq!(node.find_class("progress-fill--blue").len(), 2);
    }

    #[test]
    fn test_title_and_label() {
        let data = json!({"title": "Migration", "label": "3 of 4 services", "progress": 75});
        let node = render(&data).unwrap();
        assert_eq!(node.find_class("progress-title").len(), 1);
        assert_eq!(node.find_class("progress-label").len(), 1);
    }

    #[test]
    fn test_entries_must_be_objects() {
        let shape = InfographicError::Shape("Progress bar entries must be objects".into());
        for data in [json!(null), json!("hello"), json!(40), json!([[1, 2]]), json!(["x", 7])] {
            assert_eq!(render(&data), Err(shape.clone()), "{data}");
        }
        let mixed = json!([{"progress": 10}, null]);
        assert_eq!(render(&mixed), Err(shape));
    }
}
