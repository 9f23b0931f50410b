use crate::domain::model::{AlignedRecord, PlayerFetchResult};
use crate::utils::error::{Result, ScrapeError};
use serde::Serialize;

/// 所有球員合併後欄位的聯集，依第一次出現的順序
pub fn stat_header(players: &[PlayerFetchResult]) -> Vec<String> {
    let mut header: Vec<String> = Vec::new();
    for player in players {
        for record in player.basic.iter().chain(player.advanced.iter()) {
            for (name, _) in record.fields() {
                if !header.iter().any(|h| h == name) {
                    header.push(name.clone());
                }
            }
        }
    }
    header
}

fn render(players: &[PlayerFetchResult], delimiter: u8) -> Result<String> {
    let stats = stat_header(players);
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    let mut header = vec!["player".to_string(), "team".to_string(), "location".to_string()];
    header.extend(stats.iter().cloned());
    writer.write_record(&header)?;

    for player in players {
        for record in player.merged_records() {
            let mut row = vec![
                player.player.name.clone(),
                player.player.team.clone(),
                record
                    .location
                    .map(|l| l.as_str().to_string())
                    .unwrap_or_default(),
            ];
            row.extend(
                stats
                    .iter()
                    .map(|stat| record.text(stat).unwrap_or_default().to_string()),
            );
            writer.write_record(&row)?;
        }
    }

    let bytes = writer.into_inner().map_err(|e| ScrapeError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| ScrapeError::IoError(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        e,
    )))
}

pub fn render_csv(players: &[PlayerFetchResult]) -> Result<String> {
    render(players, b',')
}

pub fn render_tsv(players: &[PlayerFetchResult]) -> Result<String> {
    render(players, b'\t')
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatAverage {
    pub stat: String,
    pub average: Option<f64>,
    pub games_counted: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSummary {
    pub player: String,
    pub games: usize,
    pub away_games: usize,
    pub averages: Vec<StatAverage>,
}

/// 數值解析在這裡做；空白或無法解析的值不列入平均
pub fn average(records: &[AlignedRecord], stat: &str) -> StatAverage {
    let values: Vec<f64> = records
        .iter()
        .filter_map(|record| record.get(stat).and_then(|value| value.parse::<f64>()))
        .collect();

    let average = if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    };

    StatAverage {
        stat: stat.to_string(),
        average,
        games_counted: values.len(),
    }
}

pub fn summarize(player: &PlayerFetchResult, stats: &[String]) -> PlayerSummary {
    let records = player.merged_records();
    PlayerSummary {
        player: player.player.name.clone(),
        games: player.games_played(),
        away_games: records
            .iter()
            .filter(|r| r.location == Some(crate::domain::model::Location::Away))
            .count(),
        averages: stats.iter().map(|stat| average(&records, stat)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Location, PlayerIdentity, StatValue};

    fn text(value: &str) -> StatValue {
        StatValue::Text(value.to_string())
    }

    fn player() -> PlayerFetchResult {
        PlayerFetchResult {
            player: PlayerIdentity {
                name: "LeBron James".to_string(),
                team: "LAL".to_string(),
                path: "/players/j/jamesle01.html".to_string(),
            },
            basic: vec![
                AlignedRecord::new(
                    Some(Location::Home),
                    vec![
                        ("game_season".to_string(), text("1")),
                        ("pts".to_string(), text("21")),
                    ],
                ),
                AlignedRecord::new(
                    Some(Location::Away),
                    vec![
                        ("game_season".to_string(), text("2")),
                        ("pts".to_string(), text("30")),
                    ],
                ),
            ],
            advanced: vec![AlignedRecord::new(
                Some(Location::Home),
                vec![
                    ("game_season".to_string(), text("1")),
                    ("bpm".to_string(), text("5.1")),
                ],
            )],
            issues: vec![],
        }
    }

    #[test]
    fn test_render_csv_merges_advanced_columns() {
        let csv = render_csv(&[player()]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "player,team,location,game_season,pts,bpm");
        assert_eq!(lines[1], "LeBron James,LAL,Home,1,21,5.1");
        assert_eq!(lines[2], "LeBron James,LAL,Away,2,30,");
    }

    #[test]
    fn test_render_tsv() {
        let tsv = render_tsv(&[player()]).unwrap();
        assert!(tsv.starts_with("player\tteam\tlocation\tgame_season\tpts\tbpm\n"));
    }

    #[test]
    fn test_render_empty() {
        let csv = render_csv(&[]).unwrap();
        assert_eq!(csv, "player,team,location\n");
    }

    #[test]
    fn test_summary_skips_unparseable_values() {
        let mut player = player();
        player.basic.push(AlignedRecord::new(
            Some(Location::Away),
            vec![
                ("game_season".to_string(), text("3")),
                ("pts".to_string(), StatValue::Absent),
            ],
        ));

        let summary = summarize(&player, &["pts".to_string(), "ast".to_string()]);
        assert_eq!(summary.games, 3);
        assert_eq!(summary.away_games, 2);
        assert_eq!(summary.averages[0].average, Some(25.5));
        assert_eq!(summary.averages[0].games_counted, 2);
        assert_eq!(summary.averages[1].average, None);
    }
}
