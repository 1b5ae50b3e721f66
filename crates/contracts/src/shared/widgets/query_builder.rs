//! Widget configuration → SQL
//!
//! All queries read from a table of the fixed data schema. Identifiers are
//! validated by [`Identifier`] and double-quoted; aggregations come from a
//! closed enum, so no caller-supplied text reaches the SQL unchecked.

use super::config::{Aggregation, ChartSpec, WidgetConfig, WidgetConfigError, WidgetSpec, WidgetType, YAxis};
use super::identifier::Identifier;

/// Schema every widget query reads from
pub const DATA_SCHEMA: &str = "be_exponential";

/// `"be_exponential"."<table>"`
pub fn qualified_table(table: &Identifier) -> String {
    format!("\"{}\".{}", DATA_SCHEMA, table.quoted())
}

fn aggregate_expr(aggregation: Aggregation, column: &Identifier) -> String {
    format!("{}({})", aggregation.to_sql(), column.quoted())
}

fn chart_sql(chart: &ChartSpec, from: &str) -> String {
    let x = chart.x_axis.quoted();
    let y = match &chart.y_axis {
        YAxis::Count => "COUNT(*)".to_string(),
        YAxis::Aggregate {
            aggregation,
            column,
        } => aggregate_expr(*aggregation, column),
    };
    format!(
        "SELECT {x}, {y} AS \"value\" FROM {from} GROUP BY {x} ORDER BY {x} ASC"
    )
}

impl WidgetSpec {
    /// Render the SELECT statement for this spec against `table`
    pub fn to_sql(&self, table: &Identifier) -> String {
        let from = qualified_table(table);

        match self {
            WidgetSpec::Kpi {
                aggregation,
                column,
            }
            | WidgetSpec::Gauge {
                aggregation,
                column,
            } => format!("SELECT {} FROM {}", aggregate_expr(*aggregation, column), from),
            WidgetSpec::BarChart(chart) | WidgetSpec::LineChart(chart) => chart_sql(chart, &from),
            WidgetSpec::DonutChart { category, value } => {
                let cat = category.quoted();
                let val = value.quoted();
                format!("SELECT {cat}, SUM({val}) AS {val} FROM {from} GROUP BY {cat}")
            }
            WidgetSpec::DataTable { columns } => {
                let list = columns
                    .iter()
                    .map(Identifier::quoted)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("SELECT {} FROM {}", list, from)
            }
        }
    }
}

/// Build the query, reporting why it could not be built
pub fn try_build_widget_query(
    widget_type: &str,
    table: &str,
    config: &WidgetConfig,
) -> Result<String, WidgetConfigError> {
    let widget_type = WidgetType::parse(widget_type)
        .ok_or_else(|| WidgetConfigError::UnknownWidgetType(widget_type.to_string()))?;
    if table.is_empty() {
        return Err(WidgetConfigError::MissingField("table"));
    }
    let table = Identifier::parse(table)?;
    let spec = config.to_spec(widget_type)?;
    Ok(spec.to_sql(&table))
}

/// Build the query for a widget.
///
/// Returns an empty string when the configuration is incomplete or invalid;
/// callers must treat `""` as "do not query".
pub fn build_widget_query(widget_type: &str, table: &str, config: &WidgetConfig) -> String {
    try_build_widget_query(widget_type, table, config).unwrap_or_default()
}

/// Same as [`build_widget_query`] but takes the table and type from the config itself
pub fn build_query_for_config(config: &WidgetConfig) -> String {
    match (config.widget_type, config.table.as_deref()) {
        (Some(t), Some(table)) => build_widget_query(t.as_str(), table, config),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kpi(column: &str, aggregation: Aggregation) -> WidgetConfig {
        WidgetConfig {
            column: Some(column.into()),
            aggregation: Some(aggregation),
            ..Default::default()
        }
    }

    #[test]
    fn kpi_sum_query() {
        let sql = build_widget_query("kpi", "ventas", &kpi("monto", Aggregation::Sum));
        assert_eq!(sql, r#"SELECT SUM("monto") FROM "be_exponential"."ventas""#);
    }

    #[test]
    fn kpi_query_for_every_aggregation() {
        for agg in Aggregation::ALL {
            let sql = build_widget_query("kpi", "pedidos", &kpi("importe", agg));
            assert_eq!(
                sql,
                format!(
                    r#"SELECT {}("importe") FROM "be_exponential"."pedidos""#,
                    agg.to_sql()
                )
            );
        }
    }

    #[test]
    fn gauge_uses_kpi_shape() {
        let sql = build_widget_query("gauge", "ventas", &kpi("monto", Aggregation::Avg));
        assert_eq!(sql, r#"SELECT AVG("monto") FROM "be_exponential"."ventas""#);
    }

    #[test]
    fn bar_chart_with_aggregate() {
        let config = WidgetConfig {
            x_axis: Some("region".into()),
            y_axis_aggregation: Some(Aggregation::Sum),
            y_axis_column: Some("monto".into()),
            ..Default::default()
        };
        assert_eq!(
            build_widget_query("bar_chart", "ventas", &config),
            r#"SELECT "region", SUM("monto") AS "value" FROM "be_exponential"."ventas" GROUP BY "region" ORDER BY "region" ASC"#
        );
    }

    #[test]
    fn count_chart_ignores_value_column() {
        let without = WidgetConfig {
            x_axis: Some("mes".into()),
            y_axis_aggregation: Some(Aggregation::Count),
            ..Default::default()
        };
        let with = WidgetConfig {
            y_axis_column: Some("monto".into()),
            ..without.clone()
        };
        let expected = r#"SELECT "mes", COUNT(*) AS "value" FROM "be_exponential"."ventas" GROUP BY "mes" ORDER BY "mes" ASC"#;
        assert_eq!(build_widget_query("line_chart", "ventas", &without), expected);
        assert_eq!(build_widget_query("line_chart", "ventas", &with), expected);
    }

    #[test]
    fn donut_aliases_value_to_its_own_name() {
        let config = WidgetConfig {
            category: Some("categoria".into()),
            value: Some("monto".into()),
            ..Default::default()
        };
        let sql = build_widget_query("donut_chart", "ventas", &config);
        assert_eq!(
            sql,
            r#"SELECT "categoria", SUM("monto") AS "monto" FROM "be_exponential"."ventas" GROUP BY "categoria""#
        );
        assert!(!sql.contains(r#"AS "value""#));
    }

    #[test]
    fn data_table_columns() {
        let empty = WidgetConfig {
            columns: Some(vec![]),
            ..Default::default()
        };
        assert_eq!(build_widget_query("data_table", "t", &empty), "");

        let two = WidgetConfig {
            columns: Some(vec!["a".into(), "b".into()]),
            ..Default::default()
        };
        assert_eq!(
            build_widget_query("data_table", "t", &two),
            r#"SELECT "a", "b" FROM "be_exponential"."t""#
        );
    }

    #[test]
    fn incomplete_config_yields_empty_string_idempotently() {
        let cases: Vec<(&str, WidgetConfig)> = vec![
            ("kpi", WidgetConfig { column: Some("monto".into()), ..Default::default() }),
            ("kpi", WidgetConfig { aggregation: Some(Aggregation::Sum), ..Default::default() }),
            ("bar_chart", WidgetConfig { y_axis_aggregation: Some(Aggregation::Count), ..Default::default() }),
            ("bar_chart", WidgetConfig { x_axis: Some("x".into()), ..Default::default() }),
            ("donut_chart", WidgetConfig { category: Some("c".into()), ..Default::default() }),
            ("data_table", WidgetConfig::default()),
        ];
        for (widget_type, config) in cases {
            let first = build_widget_query(widget_type, "ventas", &config);
            let second = build_widget_query(widget_type, "ventas", &config);
            assert_eq!(first, "", "{widget_type} with {config:?}");
            assert_eq!(first, second);
        }
    }

    #[test]
    fn unknown_type_or_missing_table_yields_empty_string() {
        let config = kpi("monto", Aggregation::Sum);
        assert_eq!(build_widget_query("org_chart", "ventas", &config), "");
        assert_eq!(build_widget_query("kpi", "", &config), "");
        assert_eq!(
            try_build_widget_query("org_chart", "ventas", &config),
            Err(WidgetConfigError::UnknownWidgetType("org_chart".into()))
        );
    }

    #[test]
    fn hostile_identifiers_never_reach_sql() {
        let config = kpi(r#"monto") FROM x; DROP TABLE ventas; --"#, Aggregation::Sum);
        assert_eq!(build_widget_query("kpi", "ventas", &config), "");

        let config = kpi("monto", Aggregation::Sum);
        assert_eq!(build_widget_query("kpi", r#"ventas"; DELETE"#, &config), "");
    }

    #[test]
    fn build_from_config_uses_embedded_type_and_table() {
        let mut config = kpi("monto", Aggregation::Max);
        assert_eq!(build_query_for_config(&config), "");
        config.widget_type = Some(WidgetType::Kpi);
        config.table = Some("ventas".into());
        assert_eq!(
            build_query_for_config(&config),
            r#"SELECT MAX("monto") FROM "be_exponential"."ventas""#
        );
    }
}
