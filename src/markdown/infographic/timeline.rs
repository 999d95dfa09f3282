//! `timeline`: vertical list of dated milestones with status markers.

use serde_json::Value;

use super::InfographicError;
use super::glyph::glyph;
use super::value::{array_field, name_field, text_field};
use crate::markdown::node::{Element, Node};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Completed,
    Current,
    Upcoming,
    /// Missing or unrecognized status.
    Pending,
}

impl Status {
    fn from_name(name: Option<&str>) -> Self {
        match name {
            Some("completed") => Self::Completed,
            Some("current") => Self::Current,
            Some("upcoming") => Self::Upcoming,
            _ => Self::Pending,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Current => "current",
            Self::Upcoming => "upcoming",
            Self::Pending => "pending",
        }
    }

    const fn symbol(self) -> &'static str {
        match self {
            Self::Completed => "✔",
            Self::Current => "◉",
            Self::Upcoming => "◷",
            Self::Pending => "○",
        }
    }

    /// Color of the line leading to the next item.
    const fn line_tone(self) -> &'static str {
        match self {
            Self::Completed => "positive",
            Self::Current => "accent",
            Self::Upcoming | Self::Pending => "muted",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineItem {
    pub date: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Status,
}

impl TimelineItem {
    fn from_value(data: &Value) -> Self {
        Self {
            date: text_field(data, "date"),
            title: text_field(data, "title"),
            description: text_field(data, "description"),
            status: Status::from_name(name_field(data, "status")),
        }
    }
}

/// Shape-check a timeline payload.
pub fn parse(data: &Value) -> Result<Vec<TimelineItem>, InfographicError> {
    let items = array_field(data, "items")
        .ok_or_else(|| InfographicError::Shape("Timeline requires an items array".into()))?;
    Ok(items.iter().map(TimelineItem::from_value).collect())
}

/// Strategy entry point.
pub fn render(data: &Value) -> Result<Node, InfographicError> {
    let items = parse(data)?;
    let last = items.len().saturating_sub(1);

    let list = Element::with_class("div", "timeline-list").children(
        items
            .iter()
            .enumerate()
            .map(|(index, item)| render_item(item, index < last)),
    );

    Ok(Element::with_class("div", "timeline").child(list).into())
}

fn render_item(item: &TimelineItem, connect: bool) -> Element {
    let class = format!("timeline-item status-{}", item.status.name());
    let mut row = Element::with_class("div", class);

    if connect {
        row = row.child(Element::with_class(
            "div",
            format!("timeline-line line-{}", item.status.line_tone()),
        ));
    }

    row = row.child(
        Element::with_class("div", "timeline-marker").child(glyph(
            format!("marker-{}", item.status.name()),
            item.status.symbol(),
        )),
    );

    let mut content = Element::with_class("div", "timeline-content");
    if let Some(date) = &item.date {
        content = content.child(Element::with_class("div", "timeline-date").text(date));
    }
    if let Some(title) = &item.title {
        content = content.child(Element::with_class("div", "timeline-title").text(title));
    }
    if let Some(description) = &item.description {
        content =
            content.child(Element::with_class("div", "timeline-description").text(description));
    }

    row.child(content)
}
