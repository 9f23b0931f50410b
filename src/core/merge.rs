use crate::domain::model::{AlignedRecord, DataIssue};

/// 檢查進階數據是否與基本數據逐場對應。
///
/// 兩頁各自用自己的 presence key 對齊，因此只能假設位置相同；
/// 場數不同或同一位置日期不同時回傳 `RowDrift`。
pub fn detect_drift(basic: &[AlignedRecord], advanced: &[AlignedRecord]) -> Option<DataIssue> {
    let first_mismatch = basic
        .iter()
        .zip(advanced)
        .position(|(b, a)| match (b.date(), a.date()) {
            (Some(basic_date), Some(advanced_date)) => basic_date != advanced_date,
            _ => false,
        });

    if basic.len() == advanced.len() && first_mismatch.is_none() {
        return None;
    }

    Some(DataIssue::RowDrift {
        basic_games: basic.len(),
        advanced_games: advanced.len(),
        first_mismatch,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::StatValue;

    fn game(date: &str) -> AlignedRecord {
        AlignedRecord::new(
            None,
            vec![("date_game".to_string(), StatValue::Text(date.to_string()))],
        )
    }

    #[test]
    fn test_matching_games_have_no_drift() {
        let basic = vec![game("2024-01-01"), game("2024-01-03")];
        let advanced = vec![game("2024-01-01"), game("2024-01-03")];
        assert!(detect_drift(&basic, &advanced).is_none());
    }

    #[test]
    fn test_length_mismatch_is_drift() {
        let basic = vec![game("2024-01-01"), game("2024-01-03")];
        let advanced = vec![game("2024-01-01")];
        assert_eq!(
            detect_drift(&basic, &advanced),
            Some(DataIssue::RowDrift {
                basic_games: 2,
                advanced_games: 1,
                first_mismatch: None,
            })
        );
    }

    #[test]
    fn test_date_mismatch_is_drift() {
        let basic = vec![game("2024-01-01"), game("2024-01-03")];
        let advanced = vec![game("2024-01-01"), game("2024-01-05")];
        assert_eq!(
            detect_drift(&basic, &advanced),
            Some(DataIssue::RowDrift {
                basic_games: 2,
                advanced_games: 2,
                first_mismatch: Some(1),
            })
        );
    }

    #[test]
    fn test_missing_dates_are_not_compared() {
        let basic = vec![AlignedRecord::new(None, vec![])];
        let advanced = vec![game("2024-01-01")];
        assert!(detect_drift(&basic, &advanced).is_none());
    }
}
