use chrono::NaiveDate;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 單一頁面抽出的原始欄位：統計名稱 -> 每列文字，順序即文件順序
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawColumnSet {
    columns: Vec<(String, Vec<String>)>,
}

impl RawColumnSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 同名欄位會原位取代
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<String>) {
        let name = name.into();
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = values,
            None => self.columns.push((name, values)),
        }
    }

    pub fn with_column(mut self, name: impl Into<String>, values: &[&str]) -> Self {
        self.insert(name, values.iter().map(|v| v.to_string()).collect());
        self
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.columns
            .iter()
            .map(|(n, values)| (n.as_str(), values.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// 單一統計值；`Absent` 代表該場比賽抓不到此欄位
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatValue {
    Text(String),
    Absent,
}

impl StatValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            StatValue::Text(text) => Some(text.as_str()),
            StatValue::Absent => None,
        }
    }

    /// 數值解析交給使用端；空字串與 Absent 都回傳 None
    pub fn parse<T: FromStr>(&self) -> Option<T> {
        self.as_text()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .and_then(|text| text.parse().ok())
    }
}

impl Serialize for StatValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            StatValue::Text(text) => serializer.serialize_str(text),
            StatValue::Absent => serializer.serialize_none(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    Home,
    Away,
}

impl Location {
    /// 只有 `"@"` 是客場，其餘（包含空字串與帶空白的 `"@ "`）皆為主場
    pub fn from_marker(raw: &str) -> Self {
        if raw == "@" {
            Location::Away
        } else {
            Location::Home
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Home => "Home",
            Location::Away => "Away",
        }
    }
}

/// 一場實際出賽的統計紀錄
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedRecord {
    pub location: Option<Location>,
    fields: Vec<(String, StatValue)>,
}

impl AlignedRecord {
    pub fn new(location: Option<Location>, fields: Vec<(String, StatValue)>) -> Self {
        Self { location, fields }
    }

    pub fn get(&self, stat: &str) -> Option<&StatValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == stat)
            .map(|(_, value)| value)
    }

    pub fn text(&self, stat: &str) -> Option<&str> {
        self.get(stat).and_then(StatValue::as_text)
    }

    pub fn fields(&self) -> &[(String, StatValue)] {
        &self.fields
    }

    pub fn game_number(&self, presence_key: &str) -> Option<u32> {
        self.get(presence_key).and_then(StatValue::parse)
    }

    pub fn date(&self) -> Option<NaiveDate> {
        let text = self.text(crate::domain::stats::DATE_COLUMN)?;
        NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok()
    }

    /// 追加欄位；已存在的欄位不覆蓋
    pub fn extend_missing(&mut self, other: &AlignedRecord) {
        for (name, value) in &other.fields {
            if self.get(name).is_none() {
                self.fields.push((name.clone(), value.clone()));
            }
        }
    }
}

impl Serialize for AlignedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        map.serialize_entry("location", &self.location)?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// 某欄位比 presence key 短時記錄下來，不中斷處理
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartialColumn {
    pub column: String,
    pub expected: usize,
    pub actual: usize,
}

/// Aligner 輸出
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    pub records: Vec<AlignedRecord>,
    pub columns: Vec<String>,
    pub partial: Vec<PartialColumn>,
}

impl Alignment {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 轉回欄位形式。Absent 只會出現在短欄位的尾端，
    /// 所以欄位在第一個 Absent 處截斷，再對齊時會得到相同的紀錄
    pub fn to_columns(&self) -> RawColumnSet {
        let mut set = RawColumnSet::new();
        for column in &self.columns {
            let values = self
                .records
                .iter()
                .map_while(|record| record.text(column).map(str::to_string))
                .collect();
            set.insert(column.clone(), values);
        }
        set
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerIdentity {
    pub name: String,
    pub team: String,
    pub path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatPage {
    Basic,
    Advanced,
}

/// 非致命的資料問題
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataIssue {
    PartialColumn {
        page: StatPage,
        column: String,
        expected: usize,
        actual: usize,
    },
    AdvancedUnavailable {
        reason: String,
    },
    RowDrift {
        basic_games: usize,
        advanced_games: usize,
        first_mismatch: Option<usize>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerFetchResult {
    pub player: PlayerIdentity,
    pub basic: Vec<AlignedRecord>,
    pub advanced: Vec<AlignedRecord>,
    pub issues: Vec<DataIssue>,
}

impl PlayerFetchResult {
    pub fn games_played(&self) -> usize {
        self.basic.len()
    }

    /// 基本與進階欄位依位置合併後的紀錄
    pub fn merged_records(&self) -> Vec<AlignedRecord> {
        self.basic
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let mut merged = record.clone();
                if let Some(advanced) = self.advanced.get(i) {
                    merged.extend_missing(advanced);
                }
                merged
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    Roster,
    Fetch,
    Align,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerFailure {
    pub player: String,
    pub stage: FailureStage,
    pub message: String,
}

/// extract 階段的輸出，每位球員一筆；錯誤只影響該球員
#[derive(Debug)]
pub struct PlayerPages {
    pub name: String,
    pub player: crate::utils::error::Result<PlayerIdentity>,
    pub basic: Option<crate::utils::error::Result<RawColumnSet>>,
    pub advanced: Option<crate::utils::error::Result<RawColumnSet>>,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub players: Vec<PlayerFetchResult>,
    pub failures: Vec<PlayerFailure>,
    pub csv_output: String,
    pub tsv_output: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_mapping_is_total() {
        assert_eq!(Location::from_marker("@"), Location::Away);
        assert_eq!(Location::from_marker(""), Location::Home);
        assert_eq!(Location::from_marker("N"), Location::Home);
        assert_eq!(Location::from_marker("@@"), Location::Home);
        assert_eq!(Location::from_marker("@ "), Location::Home);
        assert_eq!(Location::from_marker(" @"), Location::Home);
    }

    #[test]
    fn test_stat_value_parse() {
        assert_eq!(StatValue::Text("12".to_string()).parse::<u32>(), Some(12));
        assert_eq!(StatValue::Text(".545".to_string()).parse::<f64>(), Some(0.545));
        assert_eq!(StatValue::Text("".to_string()).parse::<u32>(), None);
        assert_eq!(StatValue::Absent.parse::<u32>(), None);
    }

    #[test]
    fn test_raw_column_set_insert_replaces_in_place() {
        let mut set = RawColumnSet::new()
            .with_column("game_season", &["1"])
            .with_column("pts", &["10"]);
        set.insert("game_season", vec!["2".to_string()]);

        let names: Vec<&str> = set.names().collect();
        assert_eq!(names, vec!["game_season", "pts"]);
        assert_eq!(set.get("game_season").unwrap(), &["2".to_string()]);
    }

    #[test]
    fn test_record_serializes_absent_as_null() {
        let record = AlignedRecord::new(
            Some(Location::Away),
            vec![
                ("pts".to_string(), StatValue::Text("31".to_string())),
                ("bpm".to_string(), StatValue::Absent),
            ],
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["location"], "Away");
        assert_eq!(json["pts"], "31");
        assert!(json["bpm"].is_null());
    }

    #[test]
    fn test_record_date_parsing() {
        let record = AlignedRecord::new(
            None,
            vec![("date_game".to_string(), StatValue::Text("2024-01-15".to_string()))],
        );
        assert_eq!(record.date(), NaiveDate::from_ymd_opt(2024, 1, 15));
    }
}
