//! `comparison-table`: feature grid with check/cross cells.

use serde_json::Value;

use super::InfographicError;
use super::glyph::{no, yes};
use super::value::{array_field, display, text_field};
use crate::markdown::node::{Element, Node};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Yes,
    No,
    Text(String),
}

impl Cell {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::Bool(true) => Self::Yes,
            Value::Bool(false) => Self::No,
            other => Self::Text(display(other)),
        }
    }

    fn to_node(&self) -> Node {
        match self {
            Self::Yes => yes(),
            Self::No => no(),
            Self::Text(text) => Node::text(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub feature: String,
    pub values: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonTable {
    pub title: Option<String>,
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

/// Shape-check a comparison table payload.
///
/// `headers` and `rows` are validated independently so the message names the
/// field that is actually wrong.
pub fn parse(data: &Value) -> Result<ComparisonTable, InfographicError> {
    let headers = array_field(data, "headers").ok_or_else(|| {
        InfographicError::Shape("Comparison table requires a headers array".into())
    })?;
    let rows = array_field(data, "rows")
        .ok_or_else(|| InfographicError::Shape("Comparison table requires a rows array".into()))?;

    let rows = rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let values = array_field(row, "values").ok_or_else(|| {
                InfographicError::Shape(format!(
                    "Comparison table row {} requires a values array",
                    index + 1
                ))
            })?;
            Ok(Row {
                feature: row.get("feature").map(display).unwrap_or_default(),
                values: values.iter().map(Cell::from_value).collect(),
            })
        })
        .collect::<Result<Vec<_>, InfographicError>>()?;

    Ok(ComparisonTable {
        title: text_field(data, "title"),
        headers: headers.iter().map(display).collect(),
        rows,
    })
}

/// Strategy entry point.
pub fn render(data: &Value) -> Result<Node, InfographicError> {
    let table = parse(data)?;

    let mut card = Element::with_class("div", "comparison-table");
    if let Some(title) = &table.title {
        card = card.child(
            Element::with_class("div", "comparison-title").child(Element::new("h3").text(title)),
        );
    }

    let head = Element::new("thead").child(
        Element::new("tr").children(
            table
                .headers
                .iter()
                .map(|header| Element::new("th").attr("scope", "col").text(header)),
        ),
    );

    let body = Element::new("tbody").children(table.rows.iter().map(|row| {
        Element::new("tr")
            .child(Element::with_class("td", "comparison-feature").text(&row.feature))
            .children(
                row.values
                    .iter()
                    .map(|cell| Element::new("td").child(cell.to_node())),
            )
    }));

    let scroll = Element::with_class("div", "comparison-scroll")
        .child(Element::new("table").child(head).child(body));

    Ok(card.child(scroll).into())
}
