//! `stat-block`: key metrics with optional icon and trend indicator.
//!
//! Accepted payloads:
//!
//! ```text
//! {"value": "$1.2M", "title": "Revenue", "change": "+12%", "trend": "up"}
//! [{"value": 5}, {"value": 6}]
//! {"columns": 2, "stats": [{"value": 5}, {"value": 6}]}
//! ```

use serde_json::Value;

use super::InfographicError;
use super::glyph::{Icon, Trend};
use super::value::{as_list, display, name_field, text_field};
use crate::markdown::node::{Element, Node};

/// Explicit grid width. Anything else falls back to the auto layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Columns {
    One,
    Two,
    Three,
    Four,
}

impl Columns {
    fn from_value(value: Option<&Value>) -> Option<Self> {
        let n = value?.as_f64()?;
        [Self::One, Self::Two, Self::Three, Self::Four]
            .into_iter()
            .find(|cols| f64::from(cols.count()) == n)
    }

    fn count(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stat {
    pub title: Option<String>,
    pub value: String,
    pub change: Option<String>,
    pub trend: Option<Trend>,
    pub description: Option<String>,
    pub icon: Option<Icon>,
}

impl Stat {
    fn from_value(data: &Value) -> Result<Self, InfographicError> {
        if !data.is_object() {
            return Err(InfographicError::Shape("Stat block entries must be objects".into()));
        }
        Ok(Self {
            title: text_field(data, "title"),
            value: data.get("value").map(display).unwrap_or_default(),
            change: text_field(data, "change"),
            trend: name_field(data, "trend").and_then(Trend::from_name),
            description: text_field(data, "description"),
            icon: name_field(data, "icon").and_then(Icon::from_name),
        })
    }
}

/// Normalized stat payload.
#[derive(Debug, Clone, PartialEq)]
pub struct StatCollection {
    pub columns: Option<Columns>,
    pub stats: Vec<Stat>,
}

impl StatCollection {
    pub fn from_value(data: &Value) -> Result<Self, InfographicError> {
        let (columns, entries) = match data.get("stats").and_then(Value::as_array) {
            Some(stats) => (Columns::from_value(data.get("columns")), stats.iter().collect()),
            None if data.is_array() => (None, as_list(data)),
            None => (Columns::from_value(data.get("columns")), vec![data]),
        };
        let stats = entries
            .into_iter()
            .map(Stat::from_value)
            .collect::<Result<_, _>>()?;
        Ok(Self { columns, stats })
    }
}

/// Strategy entry point.
pub fn render(data: &Value) -> Result<Node, InfographicError> {
    Ok(render_collection(&StatCollection::from_value(data)?))
}

fn render_collection(collection: &StatCollection) -> Node {
    let grid_class = match collection.columns {
        Some(cols) => format!("stat-grid stat-grid--cols-{}", cols.count()),
        None => "stat-grid stat-grid--auto".to_string(),
    };

    Element::with_class("div", grid_class)
        .children(collection.stats.iter().map(render_stat))
        .into()
}

fn render_stat(stat: &Stat) -> Element {
    let mut card = Element::with_class("div", "stat-card");

    if let Some(icon) = stat.icon {
        card = card.child(Element::with_class("div", "stat-icon").child(icon.to_node()));
    }
    if let Some(title) = &stat.title {
        card = card.child(Element::with_class("div", "stat-title").text(title));
    }

    let mut body = Element::with_class("div", "stat-body")
        .child(Element::with_class("div", "stat-value").text(&stat.value));

    // The change figure only makes sense next to a direction.
    if let (Some(change), Some(trend)) = (&stat.change, stat.trend) {
        body = body.child(
            Element::with_class("div", format!("stat-change trend-{}", trend.tone()))
                .child(trend.to_node())
                .child(Element::new("span").text(change)),
        );
    }
    card = card.child(body);

    if let Some(description) = &stat.description {
        card = card.child(Element::with_class("div", "stat-description").text(description));
    }

    card
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rendered(data: Value) -> Node {
        render(&data).unwrap()
    }

    #[test]
    fn test_single_object_equals_list() {
        assert_eq!(rendered(json!({"value": 5})), rendered(json!([{"value": 5}])));
    }

    #[test]
    fn test_stats_object_uses_columns_hint() {
        let collection = StatCollection::from_value(&json!({
            "columns": 2,
            "stats": [{"value": 1}, {"value": 2}, {"value": 3}]
        }))
        .unwrap();
        assert_eq!(collection.columns, Some(Columns::Two));
        assert_eq!(collection.stats.len(), 3);

        let node = render_collection(&collection);
        assert_eq!(node.find_class("stat-grid--cols-2").len(), 1);
        assert_eq!(node.find_class("stat-card").len(), 3);
    }

    #[test]
    fn test_invalid_columns_use_auto_layout() {
        for columns in [json!(0), json!(5), json!("2"), json!(2.5)] {
            let node = rendered(json!({"columns": columns, "stats": [{"value": 1}]}));
            assert_eq!(node.find_class("stat-grid--auto").len(), 1, "{columns}");
        }
        assert_eq!(rendered(json!([{"value": 1}])).find_class("stat-grid--auto").len(), 1);
    }

    #[test]
    fn test_round_trip_fields() {
        let node = rendered(json!({
            "title": "Monthly Revenue",
            "value": "$45,231",
            "change": "+20.1%",
            "trend": "up"
        }));
        assert_eq!(node.find_class("stat-title")[0].children, vec![Node::text("Monthly Revenue")]);
        assert_eq!(node.find_class("stat-value")[0].children, vec![Node::text("$45,231")]);
        let change = Node::from(node.find_class("stat-change")[0].clone());
        assert!(change.text_content().ends_with("+20.1%"));
    }

    #[test]
    fn test_numeric_value_rendered_as_is() {
        let node = rendered(json!({"value": 1234.5}));
        assert_eq!(node.find_class("stat-value")[0].children, vec![Node::text("1234.5")]);
    }

    #[test]
    fn test_trend_tones() {
        let node = rendered(json!([
            {"value": 1, "change": "+1", "trend": "up"},
            {"value": 2, "change": "-1", "trend": "down"},
            {"value": 3, "change": "0", "trend": "neutral"}
        ]));
        assert_eq!(node.find_class("trend-positive").len(), 1);
        assert_eq!(node.find_class("trend-negative").len(), 1);
        assert_eq!(node.find_class("trend-neutral").len(), 1);
    }

    #[test]
    fn test_trend_omitted_without_change_or_direction() {
        let node = rendered(json!([
            {"value": 1, "trend": "up"},
            {"value": 2, "change": "+5%"},
            {"value": 3, "change": "+5%", "trend": "sideways"}
        ]));
        assert!(node.find_class("stat-change").is_empty());
    }

    #[test]
    fn test_unknown_icon_renders_nothing() {
        let node = rendered(json!([
            {"value": 1, "icon": "users"},
            {"value": 2, "icon": "rocket"}
        ]));
        assert_eq!(node.find_class("stat-icon").len(), 1);
        assert_eq!(node.find_class("icon-users").len(), 1);
    }

    #[test]
    fn test_entries_must_be_objects() {
        let shape = InfographicError::Shape("Stat block entries must be objects".into());
        for data in [
            json!(null),
            json!("hello"),
            json!(7),
            json!([[1, 2]]),
            json!(["x", 7]),
            json!({"stats": [{"value": 1}, "two"]}),
        ] {
            assert_eq!(render(&data), Err(shape.clone()), "{data}");
        }
    }
}
