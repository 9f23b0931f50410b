use crate::domain::model::{PlayerIdentity, RosterEntry};
use crate::utils::error::{Result, ScrapeError};
use std::collections::HashMap;

/// 球隊名單，用球員姓名查個人頁路徑
#[derive(Debug, Clone, Default)]
pub struct Roster {
    team: String,
    entries: Vec<RosterEntry>,
}

/// 小寫並合併多餘空白，用於姓名比對
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

impl Roster {
    pub fn new(team: impl Into<String>, entries: Vec<RosterEntry>) -> Self {
        Self {
            team: team.into(),
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 先比對完全相同的姓名，再忽略大小寫與多餘空白
    pub fn find(&self, name: &str) -> Result<PlayerIdentity> {
        let wanted = normalize_name(name);
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|entry| normalize_name(&entry.name) == wanted)
            })
            .map(|entry| PlayerIdentity {
                name: entry.name.clone(),
                team: self.team.clone(),
                path: entry.path.clone(),
            })
            .ok_or_else(|| ScrapeError::PlayerNotFound {
                player: name.to_string(),
                team: self.team.clone(),
            })
    }
}

/// 查詢是否有手動指定的球員路徑；完全相同的鍵優先，其次忽略大小寫與空白
pub fn path_override(overrides: &HashMap<String, String>, name: &str, team: &str) -> Option<PlayerIdentity> {
    let wanted = normalize_name(name);
    overrides
        .get(name)
        .or_else(|| {
            overrides
                .iter()
                .find(|(key, _)| normalize_name(key) == wanted)
                .map(|(_, path)| path)
        })
        .map(|path| PlayerIdentity {
            name: name.to_string(),
            team: team.to_string(),
            path: path.clone(),
        })
}

fn trim_base(base_url: &str) -> &str {
    base_url.trim_end_matches('/')
}

/// `/players/j/jamesle01.html` -> `/players/j/jamesle01`
fn player_dir(path: &str) -> &str {
    let path = path.trim_end_matches('/');
    path.strip_suffix(".html").unwrap_or(path)
}

fn ensure_leading_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

pub fn roster_url(base_url: &str, team: &str, season: u16) -> String {
    format!(
        "{}/teams/{}/{}.html",
        trim_base(base_url),
        team.to_uppercase(),
        season
    )
}

pub fn gamelog_url(base_url: &str, player_path: &str, season: u16) -> String {
    format!(
        "{}{}/gamelog/{}",
        trim_base(base_url),
        ensure_leading_slash(player_dir(player_path)),
        season
    )
}

pub fn advanced_gamelog_url(base_url: &str, player_path: &str, season: u16) -> String {
    format!(
        "{}{}/gamelog-advanced/{}",
        trim_base(base_url),
        ensure_leading_slash(player_dir(player_path)),
        season
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Roster {
        Roster::new(
            "LAL",
            vec![
                RosterEntry {
                    name: "LeBron James".to_string(),
                    path: "/players/j/jamesle01.html".to_string(),
                },
                RosterEntry {
                    name: "Anthony Davis".to_string(),
                    path: "/players/d/davisan02.html".to_string(),
                },
            ],
        )
    }

    #[test]
    fn test_find_exact_and_case_insensitive() {
        let roster = roster();
        assert_eq!(roster.find("LeBron James").unwrap().path, "/players/j/jamesle01.html");

        let player = roster.find("  anthony   DAVIS ").unwrap();
        assert_eq!(player.name, "Anthony Davis");
        assert_eq!(player.team, "LAL");
    }

    #[test]
    fn test_find_unknown_player() {
        let err = roster().find("Michael Jordan").unwrap_err();
        assert!(matches!(err, ScrapeError::PlayerNotFound { .. }));
    }

    #[test]
    fn test_path_override() {
        let mut overrides = HashMap::new();
        overrides.insert("Austin Reaves".to_string(), "/players/r/reaveau01.html".to_string());

        let player = path_override(&overrides, "austin reaves", "LAL").unwrap();
        assert_eq!(player.path, "/players/r/reaveau01.html");
        assert!(path_override(&overrides, "LeBron James", "LAL").is_none());
    }

    #[test]
    fn test_path_override_prefers_exact_key() {
        let mut overrides = HashMap::new();
        overrides.insert("Marcus Morris".to_string(), "/players/m/morrima03.html".to_string());
        overrides.insert("marcus  morris".to_string(), "/players/m/morrima02.html".to_string());

        for _ in 0..10 {
            let player = path_override(&overrides, "Marcus Morris", "LAC").unwrap();
            assert_eq!(player.path, "/players/m/morrima03.html");
            let player = path_override(&overrides, "marcus  morris", "LAC").unwrap();
            assert_eq!(player.path, "/players/m/morrima02.html");
        }
    }

    #[test]
    fn test_urls() {
        assert_eq!(
            roster_url("https://www.basketball-reference.com/", "lal", 2024),
            "https://www.basketball-reference.com/teams/LAL/2024.html"
        );
        assert_eq!(
            gamelog_url("https://www.basketball-reference.com", "/players/j/jamesle01.html", 2024),
            "https://www.basketball-reference.com/players/j/jamesle01/gamelog/2024"
        );
        assert_eq!(
            advanced_gamelog_url("http://localhost:8080", "players/j/jamesle01", 2023),
            "http://localhost:8080/players/j/jamesle01/gamelog-advanced/2023"
        );
    }
}
