use crate::domain::model::{AlignedRecord, Alignment, Location, PartialColumn, RawColumnSet, StatValue};
use crate::domain::stats::{DEFAULT_LOCATION_COLUMN, DEFAULT_PRESENCE_KEY};
use crate::utils::error::{Result, ScrapeError};

/// 對齊設定：哪個欄位決定「有出賽」，哪個欄位是主客場標記
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignOptions {
    pub presence_key: String,
    pub location_column: Option<String>,
}

impl AlignOptions {
    pub fn new(presence_key: impl Into<String>, location_column: Option<String>) -> Self {
        Self {
            presence_key: presence_key.into(),
            location_column,
        }
    }
}

impl Default for AlignOptions {
    fn default() -> Self {
        Self::new(DEFAULT_PRESENCE_KEY, Some(DEFAULT_LOCATION_COLUMN.to_string()))
    }
}

/// 過濾掉非出賽列（presence key 為空），並把其餘欄位依相同索引對齊。
///
/// - presence key 欄位不存在，或任一欄位比它長：`MalformedInput`
/// - 欄位比它短：缺的位置填 `StatValue::Absent`，並記錄在 `Alignment::partial`
pub fn align(columns: &RawColumnSet, options: &AlignOptions) -> Result<Alignment> {
    let key = columns
        .get(&options.presence_key)
        .ok_or_else(|| ScrapeError::MalformedInput {
            message: format!("presence key column '{}' is missing", options.presence_key),
        })?;
    let row_count = key.len();

    let valid: Vec<usize> = key
        .iter()
        .enumerate()
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(i, _)| i)
        .collect();

    let mut partial = Vec::new();
    for (name, values) in columns.iter() {
        if values.len() > row_count {
            return Err(ScrapeError::MalformedInput {
                message: format!(
                    "column '{}' has {} rows but presence key '{}' has {}",
                    name,
                    values.len(),
                    options.presence_key,
                    row_count
                ),
            });
        }
        if values.len() < row_count {
            tracing::debug!(
                "Column '{}' is short ({} of {} rows), filling with absent marker",
                name,
                values.len(),
                row_count
            );
            partial.push(PartialColumn {
                column: name.to_string(),
                expected: row_count,
                actual: values.len(),
            });
        }
    }

    let location_values = options
        .location_column
        .as_deref()
        .and_then(|name| columns.get(name));

    let records = valid
        .iter()
        .map(|&row| {
            let fields = columns
                .iter()
                .map(|(name, values)| {
                    let value = values
                        .get(row)
                        .map(|text| StatValue::Text(text.clone()))
                        .unwrap_or(StatValue::Absent);
                    (name.to_string(), value)
                })
                .collect();
            let location = location_values
                .and_then(|values| values.get(row))
                .map(|raw| Location::from_marker(raw));
            AlignedRecord::new(location, fields)
        })
        .collect();

    Ok(Alignment {
        records,
        columns: columns.names().map(str::to_string).collect(),
        partial,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> AlignOptions {
        AlignOptions::new("game_season", Some("game_location".to_string()))
    }

    #[test]
    fn test_drops_rows_without_game_number() {
        let columns = RawColumnSet::new()
            .with_column("game_season", &["1", "", "2", "3"])
            .with_column("game_location", &["", "@", "@", ""]);

        let alignment = align(&columns, &options()).unwrap();

        assert_eq!(alignment.len(), 3);
        let locations: Vec<Option<Location>> =
            alignment.records.iter().map(|r| r.location).collect();
        assert_eq!(
            locations,
            vec![Some(Location::Home), Some(Location::Away), Some(Location::Home)]
        );
        assert!(alignment.partial.is_empty());
    }

    #[test]
    fn test_short_column_is_filled_with_absent() {
        let columns = RawColumnSet::new()
            .with_column("game_season", &["1", "2", "3"])
            .with_column("pts", &["10", "11"]);

        let alignment = align(&columns, &options()).unwrap();

        assert_eq!(alignment.len(), 3);
        assert_eq!(alignment.records[0].text("pts"), Some("10"));
        assert_eq!(alignment.records[1].text("pts"), Some("11"));
        assert_eq!(alignment.records[2].get("pts"), Some(&StatValue::Absent));
        assert_eq!(
            alignment.partial,
            vec![PartialColumn {
                column: "pts".to_string(),
                expected: 3,
                actual: 2,
            }]
        );
    }

    #[test]
    fn test_missing_presence_key_is_malformed() {
        let columns = RawColumnSet::new().with_column("pts", &["10"]);
        let err = align(&columns, &options()).unwrap_err();
        assert!(matches!(err, ScrapeError::MalformedInput { .. }));
    }

    #[test]
    fn test_long_column_is_malformed() {
        let columns = RawColumnSet::new()
            .with_column("game_season", &["1"])
            .with_column("pts", &["10", "12"]);
        let err = align(&columns, &options()).unwrap_err();
        assert!(matches!(err, ScrapeError::MalformedInput { .. }));
    }

    #[test]
    fn test_whitespace_only_game_number_is_not_a_game() {
        let columns = RawColumnSet::new()
            .with_column("game_season", &["  ", "1", "\t"])
            .with_column("pts", &["", "22", ""]);

        let alignment = align(&columns, &options()).unwrap();
        assert_eq!(alignment.len(), 1);
        assert_eq!(alignment.records[0].text("pts"), Some("22"));
    }

    #[test]
    fn test_without_location_column() {
        let columns = RawColumnSet::new().with_column("game_season", &["1", "2"]);
        let alignment = align(&columns, &options()).unwrap();
        assert!(alignment.records.iter().all(|r| r.location.is_none()));

        let no_location = AlignOptions::new("game_season", None);
        let columns = columns.with_column("game_location", &["@", ""]);
        let alignment = align(&columns, &no_location).unwrap();
        assert!(alignment.records.iter().all(|r| r.location.is_none()));
    }

    #[test]
    fn test_fields_keep_column_order() {
        let columns = RawColumnSet::new()
            .with_column("pts", &["30"])
            .with_column("game_season", &["1"])
            .with_column("ast", &["8"]);

        let alignment = align(&columns, &options()).unwrap();
        let names: Vec<&str> = alignment.records[0]
            .fields()
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();
        assert_eq!(names, vec!["pts", "game_season", "ast"]);
        assert_eq!(alignment.columns, vec!["pts", "game_season", "ast"]);
    }

    #[test]
    fn test_empty_table_yields_no_records() {
        let columns = RawColumnSet::new()
            .with_column("game_season", &[])
            .with_column("pts", &[]);
        let alignment = align(&columns, &options()).unwrap();
        assert!(alignment.is_empty());
    }
}
