// File: crates/dash-core/src/axis.rs
// Summary: Axis model of the chart option (category, time or value axis).

use serde::Serialize;

use crate::format::ValueFormat;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisKind {
    Category,
    Time,
    Value,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    #[serde(rename = "type")]
    pub kind: AxisKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<String>,
    /// Leave room before the first and after the last category.
    pub boundary_gap: bool,
    /// Do not force the value axis to include zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_format: Option<ValueFormat>,
}

impl Axis {
    pub fn category(labels: Vec<String>) -> Self {
        Self { kind: AxisKind::Category, data: labels, boundary_gap: false, scale: None, label_format: None }
    }

    pub fn time() -> Self {
        Self { kind: AxisKind::Time, data: Vec::new(), boundary_gap: false, scale: None, label_format: None }
    }

    pub fn value(format: ValueFormat) -> Self {
        Self { kind: AxisKind::Value, data: Vec::new(), boundary_gap: false, scale: Some(true), label_format: Some(format) }
    }

    pub fn with_boundary_gap(mut self) -> Self {
        self.boundary_gap = true;
        self
    }
}
