use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::identifier::Identifier;

/// Why a widget configuration cannot be turned into a query
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WidgetConfigError {
    #[error("Unknown widget type: {0}")]
    UnknownWidgetType(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("At least one column must be selected")]
    EmptyColumns,

    #[error("Invalid identifier: {0:?}")]
    InvalidIdentifier(String),
}

/// Widget kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetType {
    Kpi,
    BarChart,
    LineChart,
    DonutChart,
    DataTable,
    Gauge,
}

impl WidgetType {
    pub const ALL: [WidgetType; 6] = [
        WidgetType::Kpi,
        WidgetType::BarChart,
        WidgetType::LineChart,
        WidgetType::DonutChart,
        WidgetType::DataTable,
        WidgetType::Gauge,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetType::Kpi => "kpi",
            WidgetType::BarChart => "bar_chart",
            WidgetType::LineChart => "line_chart",
            WidgetType::DonutChart => "donut_chart",
            WidgetType::DataTable => "data_table",
            WidgetType::Gauge => "gauge",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            WidgetType::Kpi => "KPI",
            WidgetType::BarChart => "Bar chart",
            WidgetType::LineChart => "Line chart",
            WidgetType::DonutChart => "Donut chart",
            WidgetType::DataTable => "Data table",
            WidgetType::Gauge => "Gauge",
        }
    }
}

/// SQL aggregate function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Aggregation {
    #[serde(alias = "sum")]
    Sum,
    #[serde(alias = "avg")]
    Avg,
    #[serde(alias = "count")]
    Count,
    #[serde(alias = "min")]
    Min,
    #[serde(alias = "max")]
    Max,
}

impl Aggregation {
    pub const ALL: [Aggregation; 5] = [
        Aggregation::Sum,
        Aggregation::Avg,
        Aggregation::Count,
        Aggregation::Min,
        Aggregation::Max,
    ];

    pub fn to_sql(&self) -> &'static str {
        match self {
            Aggregation::Sum => "SUM",
            Aggregation::Avg => "AVG",
            Aggregation::Count => "COUNT",
            Aggregation::Min => "MIN",
            Aggregation::Max => "MAX",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.to_sql().eq_ignore_ascii_case(s.trim()))
    }

    /// SUM and AVG only make sense over numeric columns
    pub fn requires_numeric(&self) -> bool {
        matches!(self, Aggregation::Sum | Aggregation::Avg)
    }
}

/// Draft widget configuration, as produced by the editors and stored as JSON.
///
/// Every field is optional; [`WidgetConfig::to_spec`] is the only place where
/// presence is checked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget_type: Option<WidgetType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<Aggregation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_axis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_axis_aggregation: Option<Aggregation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_axis_column: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    // Display-only fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

/// Y axis of a bar/line chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YAxis {
    /// `COUNT(*)`, no value column needed
    Count,
    Aggregate {
        aggregation: Aggregation,
        column: Identifier,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSpec {
    pub x_axis: Identifier,
    pub y_axis: YAxis,
}

/// Fully specified widget query: one variant per widget type, holding only
/// required and validated fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetSpec {
    Kpi {
        aggregation: Aggregation,
        column: Identifier,
    },
    Gauge {
        aggregation: Aggregation,
        column: Identifier,
    },
    BarChart(ChartSpec),
    LineChart(ChartSpec),
    DonutChart {
        category: Identifier,
        value: Identifier,
    },
    DataTable {
        columns: Vec<Identifier>,
    },
}

impl WidgetSpec {
    pub fn widget_type(&self) -> WidgetType {
        match self {
            WidgetSpec::Kpi { .. } => WidgetType::Kpi,
            WidgetSpec::Gauge { .. } => WidgetType::Gauge,
            WidgetSpec::BarChart(_) => WidgetType::BarChart,
            WidgetSpec::LineChart(_) => WidgetType::LineChart,
            WidgetSpec::DonutChart { .. } => WidgetType::DonutChart,
            WidgetSpec::DataTable { .. } => WidgetType::DataTable,
        }
    }
}

fn required<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, WidgetConfigError> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(WidgetConfigError::MissingField(name)),
    }
}

fn required_ident(value: &Option<String>, name: &'static str) -> Result<Identifier, WidgetConfigError> {
    Identifier::parse(required(value, name)?)
}

impl WidgetConfig {
    pub fn new(widget_type: WidgetType) -> Self {
        Self {
            widget_type: Some(widget_type),
            ..Default::default()
        }
    }

    /// Convert the draft into a typed spec for the given widget type
    pub fn to_spec(&self, widget_type: WidgetType) -> Result<WidgetSpec, WidgetConfigError> {
        match widget_type {
            WidgetType::Kpi | WidgetType::Gauge => {
                let column = required_ident(&self.column, "column")?;
                let aggregation = self
                    .aggregation
                    .ok_or(WidgetConfigError::MissingField("aggregation"))?;
                Ok(if widget_type == WidgetType::Kpi {
                    WidgetSpec::Kpi { aggregation, column }
                } else {
                    WidgetSpec::Gauge { aggregation, column }
                })
            }
            WidgetType::BarChart | WidgetType::LineChart => {
                let x_axis = required_ident(&self.x_axis, "xAxis")?;
                let aggregation = self
                    .y_axis_aggregation
                    .ok_or(WidgetConfigError::MissingField("yAxisAggregation"))?;
                let y_axis = match aggregation {
                    Aggregation::Count => YAxis::Count,
                    _ => YAxis::Aggregate {
                        aggregation,
                        column: required_ident(&self.y_axis_column, "yAxisColumn")?,
                    },
                };
                let chart = ChartSpec { x_axis, y_axis };
                Ok(if widget_type == WidgetType::BarChart {
                    WidgetSpec::BarChart(chart)
                } else {
                    WidgetSpec::LineChart(chart)
                })
            }
            WidgetType::DonutChart => Ok(WidgetSpec::DonutChart {
                category: required_ident(&self.category, "category")?,
                value: required_ident(&self.value, "value")?,
            }),
            WidgetType::DataTable => {
                let raw = self.columns.as_deref().unwrap_or_default();
                if raw.is_empty() {
                    return Err(WidgetConfigError::EmptyColumns);
                }
                let columns = raw
                    .iter()
                    .map(|c| Identifier::parse(c))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(WidgetSpec::DataTable { columns })
            }
        }
    }

    /// Title to show in the widget header
    pub fn display_title(&self, widget_type: WidgetType) -> String {
        match self.title.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => widget_type.display_name().to_string(),
        }
    }
}
