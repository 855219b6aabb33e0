//! # Field Selection
//!
//! Typed form of the user-built `WHERE` clause over the field table.
//!
//! Attribute names, operators and connectors come from a closed set and are
//! mapped to static SQL fragments; only the compared values reach the query,
//! and they are always bound as parameters. Conditions whose attribute or
//! operator is not recognized are dropped (with a warning) rather than
//! rejected, so a stale browser form still gets an answer.

use shared::{SelectionCondition, SelectionRequest};
use tracing::warn;

use crate::error::{FarmError, FarmResult};

/// Columns of the field table that may be filtered on or projected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldColumn {
    FieldId,
    FarmId,
    Area,
}

impl FieldColumn {
    pub const ALL: [FieldColumn; 3] = [FieldColumn::FieldId, FieldColumn::FarmId, FieldColumn::Area];

    /// Case-insensitive lookup by the attribute name the browser uses
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|column| column.label().eq_ignore_ascii_case(name))
    }

    /// Attribute name as exposed over HTTP
    pub fn label(self) -> &'static str {
        match self {
            FieldColumn::FieldId => "FieldID",
            FieldColumn::FarmId => "FarmID",
            FieldColumn::Area => "Area",
        }
    }

    pub fn sql(self) -> &'static str {
        match self {
            FieldColumn::FieldId => "field_id",
            FieldColumn::FarmId => "farm_id",
            FieldColumn::Area => "area",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
}

impl Comparison {
    pub fn parse(op: &str) -> Option<Self> {
        match op.trim() {
            "=" => Some(Comparison::Eq),
            "<>" => Some(Comparison::Ne),
            ">" => Some(Comparison::Gt),
            "<" => Some(Comparison::Lt),
            ">=" => Some(Comparison::Ge),
            "<=" => Some(Comparison::Le),
            _ => None,
        }
    }

    pub fn sql(self) -> &'static str {
        match self {
            Comparison::Eq => " = ",
            Comparison::Ne => " <> ",
            Comparison::Gt => " > ",
            Comparison::Lt => " < ",
            Comparison::Ge => " >= ",
            Comparison::Le => " <= ",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connector {
    #[default]
    And,
    Or,
}

impl Connector {
    /// Missing and unrecognized connectors fall back to `AND`
    pub fn parse(connector: Option<&str>) -> Self {
        match connector.map(str::trim) {
            Some(c) if c.eq_ignore_ascii_case("or") => Connector::Or,
            _ => Connector::And,
        }
    }

    pub fn sql(self) -> &'static str {
        match self {
            Connector::And => " AND ",
            Connector::Or => " OR ",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: FieldColumn,
    pub comparison: Comparison,
    pub value: f64,
    /// Joins this condition to everything before it; ignored on the first one
    pub connector: Connector,
}

/// An ordered list of conditions, combined strictly left to right
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSelection {
    conditions: Vec<Condition>,
}

impl FieldSelection {
    pub fn from_request(request: &SelectionRequest) -> FarmResult<Self> {
        let mut conditions = Vec::with_capacity(request.conditions.len());
        for raw in &request.conditions {
            if let Some(condition) = Self::parse_condition(raw)? {
                conditions.push(condition);
            }
        }
        Ok(Self { conditions })
    }

    fn parse_condition(raw: &SelectionCondition) -> FarmResult<Option<Condition>> {
        let Some(column) = FieldColumn::parse(&raw.attribute) else {
            warn!("Dropping selection condition on unknown attribute {:?}", raw.attribute);
            return Ok(None);
        };
        let Some(comparison) = Comparison::parse(&raw.operator) else {
            warn!("Dropping selection condition with unknown operator {:?}", raw.operator);
            return Ok(None);
        };
        let value = raw
            .value
            .as_ref()
            .and_then(|value| value.as_f64())
            .ok_or_else(|| {
                FarmError::validation(format!("Value for {} must be a number.", column.label()))
            })?;

        Ok(Some(Condition {
            column,
            comparison,
            value,
            connector: Connector::parse(raw.connector.as_deref()),
        }))
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

/// Parse a comma-separated projection list.
///
/// Unknown names are dropped, repeated names are kept once, and the order of
/// first appearance is preserved.
pub fn parse_projection(display: &str) -> Vec<FieldColumn> {
    let mut columns = Vec::new();
    for token in display.split(',') {
        match FieldColumn::parse(token) {
            Some(column) if !columns.contains(&column) => columns.push(column),
            Some(_) => {}
            None if token.trim().is_empty() => {}
            None => warn!("Dropping unknown projection column {:?}", token.trim()),
        }
    }
    columns
}
