use contracts::shared::data_source::QueryRows;

/// Состояние отрисовки виджета
#[derive(Debug, Clone, PartialEq)]
pub enum RenderState {
    /// Конфигурация неполная, запрос не строится и не отправляется
    NotConfigured,
    Loading,
    Error(String),
    /// Запрос выполнен, строк нет
    NoData,
    Ready(QueryRows),
}

impl RenderState {
    pub fn from_result(result: Result<QueryRows, String>) -> Self {
        match result {
            Ok(rows) if rows.is_empty() => RenderState::NoData,
            Ok(rows) => RenderState::Ready(rows),
            Err(e) => RenderState::Error(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_result_is_no_data_not_error() {
        let empty = QueryRows {
            columns: vec!["region".into()],
            rows: vec![],
            truncated: false,
        };
        assert_eq!(RenderState::from_result(Ok(empty)), RenderState::NoData);
    }

    #[test]
    fn rows_and_errors() {
        let rows = QueryRows {
            columns: vec!["count".into()],
            rows: vec![vec![json!(480)]],
            truncated: false,
        };
        assert!(matches!(RenderState::from_result(Ok(rows)), RenderState::Ready(_)));
        assert_eq!(
            RenderState::from_result(Err("no such column: foo".into())),
            RenderState::Error("no such column: foo".into())
        );
    }
}
