//! 網站上 `data-stat` 屬性的預設名稱

/// 球員本季第幾場；空白代表該列不是實際出賽
pub const DEFAULT_PRESENCE_KEY: &str = "game_season";
/// `@` 代表客場
pub const DEFAULT_LOCATION_COLUMN: &str = "game_location";
pub const DATE_COLUMN: &str = "date_game";

pub const DEFAULT_BASIC_TABLE: &str = "pgl_basic";
pub const DEFAULT_ADVANCED_TABLE: &str = "pgl_advanced";
pub const DEFAULT_ROSTER_TABLE: &str = "roster";

pub const DEFAULT_BASIC_STATS: &[&str] = &[
    "game_season",
    "date_game",
    "game_location",
    "opp_id",
    "game_result",
    "mp",
    "fg",
    "fga",
    "fg3",
    "fg3a",
    "ft",
    "fta",
    "trb",
    "ast",
    "stl",
    "blk",
    "tov",
    "pts",
    "plus_minus",
];

pub const DEFAULT_ADVANCED_STATS: &[&str] = &[
    "game_season",
    "date_game",
    "game_location",
    "ts_pct",
    "efg_pct",
    "orb_pct",
    "drb_pct",
    "ast_pct",
    "usg_pct",
    "off_rtg",
    "def_rtg",
    "game_score",
    "bpm",
];

pub const DEFAULT_SUMMARY_STATS: &[&str] = &["pts", "trb", "ast"];

pub fn to_owned_list(stats: &[&str]) -> Vec<String> {
    stats.iter().map(|s| s.to_string()).collect()
}
