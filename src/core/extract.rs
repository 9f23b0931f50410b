use crate::domain::model::{RawColumnSet, RosterEntry};
use crate::utils::error::{Result, ScrapeError};
use scraper::{ElementRef, Html, Selector};

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| ScrapeError::SelectorError {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .collect::<Vec<_>>()
        .join("")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn find_table<'a>(document: &'a Html, table_id: &str, url: &str) -> Result<ElementRef<'a>> {
    let table_sel = parse_selector(&format!("table#{}", table_id))?;
    document
        .select(&table_sel)
        .next()
        .ok_or_else(|| ScrapeError::ExtractionError {
            url: url.to_string(),
            message: format!("no table with id '{}' found", table_id),
        })
}

/// 從 game log 表格抽出指定的 `data-stat` 欄位。
///
/// 每個 `tbody tr`（略過重複表頭列 `tr.thead`）對每個 stat 產生一個值，
/// 找不到對應儲存格時為空字串，因此所有欄位長度一致。
pub fn stat_columns(html: &str, url: &str, table_id: &str, stats: &[String]) -> Result<RawColumnSet> {
    let document = Html::parse_document(html);
    let table = find_table(&document, table_id, url)?;
    let row_sel = parse_selector("tbody > tr")?;

    let cell_sels = stats
        .iter()
        .map(|stat| parse_selector(&format!("[data-stat=\"{}\"]", stat)))
        .collect::<Result<Vec<_>>>()?;

    let mut values: Vec<Vec<String>> = vec![Vec::new(); stats.len()];
    let mut rows = 0usize;

    for row in table.select(&row_sel) {
        if row.value().classes().any(|class| class == "thead") {
            continue;
        }
        rows += 1;
        for (column, cell_sel) in values.iter_mut().zip(&cell_sels) {
            let text = row.select(cell_sel).next().map(cell_text).unwrap_or_default();
            column.push(text);
        }
    }

    tracing::debug!(
        "Extracted {} rows x {} stats from table '{}' at {}",
        rows,
        stats.len(),
        table_id,
        url
    );

    let mut columns = RawColumnSet::new();
    for (stat, column) in stats.iter().zip(values) {
        columns.insert(stat.clone(), column);
    }
    Ok(columns)
}

/// 從球隊名單表格抽出球員名稱與個人頁連結
pub fn roster_entries(html: &str, url: &str, table_id: &str) -> Result<Vec<RosterEntry>> {
    let document = Html::parse_document(html);
    let table = find_table(&document, table_id, url)?;
    let link_sel = parse_selector("[data-stat=\"player\"] a")?;

    let entries: Vec<RosterEntry> = table
        .select(&link_sel)
        .filter_map(|link| {
            let path = link.value().attr("href")?.trim().to_string();
            let name = cell_text(link);
            (!name.is_empty() && !path.is_empty()).then_some(RosterEntry { name, path })
        })
        .collect();

    if entries.is_empty() {
        return Err(ScrapeError::ExtractionError {
            url: url.to_string(),
            message: format!("roster table '{}' has no player links", table_id),
        });
    }

    Ok(entries)
}
