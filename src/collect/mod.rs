//! Jackpot history collection.
//!
//! Fetches the public fairness table page by page and turns each row into a
//! [`GameImport`] ready for the store.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::CollectorConfig;
use crate::models::GameImport;

/// Games listed on one page of the fairness table.
pub const GAMES_PER_PAGE: usize = 10;

/// Errors that can occur while collecting games.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Invalid selector: {0}")]
    Selector(String),
}

/// Why a table row could not be turned into a game.
#[derive(Debug, Error, PartialEq)]
enum RowError {
    #[error("expected at least 5 cells, found {0}")]
    TooFewCells(usize),

    #[error("bad game id {0:?}")]
    GameId(String),

    #[error("bad game value {0:?}")]
    GameValue(String),

    #[error("bad winning ticket {0:?}")]
    WinningTicket(String),
}

fn selector(css: &str) -> Result<Selector, CollectError> {
    Selector::parse(css).map_err(|e| CollectError::Selector(e.to_string()))
}

/// Text of a cell with each text node trimmed.
fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().map(str::trim).collect()
}

fn parse_row(cells: &[String]) -> Result<GameImport, RowError> {
    let [id, value, ticket, winner, eos_block, ..] = cells else {
        return Err(RowError::TooFewCells(cells.len()));
    };

    let game_id = id
        .trim_start_matches('#')
        .parse::<u64>()
        .map_err(|_| RowError::GameId(id.clone()))?;

    let game_value = value
        .trim_end_matches("SOL")
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
        .ok_or_else(|| RowError::GameValue(value.clone()))?;

    let winning_ticket = ticket
        .replace(',', "")
        .parse::<u64>()
        .map_err(|_| RowError::WinningTicket(ticket.clone()))?;

    let eos_block = (!eos_block.is_empty()).then(|| eos_block.clone());

    Ok(GameImport::from_round(
        game_id,
        game_value,
        winning_ticket,
        winner.clone(),
        eos_block,
    ))
}

/// Parse the rows of the first table's body into games.
///
/// Rows that cannot be parsed are logged and skipped.
pub fn parse_fairness_table(html: &str) -> Result<Vec<GameImport>, CollectError> {
    let document = Html::parse_document(html);
    let table_sel = selector("table")?;
    let row_sel = selector("tbody tr")?;
    let cell_sel = selector("td")?;

    let Some(table) = document.select(&table_sel).next() else {
        warn!("No table found in page");
        return Ok(Vec::new());
    };

    let mut games = Vec::new();
    for (idx, row) in table.select(&row_sel).enumerate() {
        let cells: Vec<String> = row.select(&cell_sel).map(cell_text).collect();
        match parse_row(&cells) {
            Ok(game) => games.push(game),
            Err(e) => warn!("Skipping row {}: {}", idx + 1, e),
        }
    }

    debug!("Parsed {} games from table", games.len());
    Ok(games)
}

/// HTTP client for the fairness table.
pub struct Collector {
    client: Client,
    base_url: Url,
    page_delay: Duration,
}

impl Collector {
    pub fn new(config: &CollectorConfig) -> Result<Self, CollectError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| CollectError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).unwrap_or_else(|_| {
                HeaderValue::from_static(concat!("soldash/", env!("CARGO_PKG_VERSION")))
            }),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url,
            page_delay: Duration::from_millis(config.page_delay_ms),
        })
    }

    /// URL of a 1-indexed table page. Page 1 is the bare base URL.
    pub fn page_url(&self, page: u32) -> Url {
        let mut url = self.base_url.clone();
        if page > 1 {
            url.query_pairs_mut().append_pair("page", &page.to_string());
        }
        url
    }

    /// Fetch and parse one page.
    pub async fn scrape_page(&self, page: u32) -> Result<Vec<GameImport>, CollectError> {
        let url = self.page_url(page);
        info!("Fetching {}", url);

        let response = self.client.get(url.as_str()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CollectError::HttpStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.text().await?;
        let games = parse_fairness_table(&body)?;
        info!("Found {} games on page {}", games.len(), page);
        Ok(games)
    }

    /// Fetch pages `1..=pages` in order, pausing between them.
    ///
    /// A page that fails is logged and contributes no games.
    pub async fn scrape_pages(&self, pages: u32) -> Vec<GameImport> {
        let mut all_games = Vec::new();

        for page in 1..=pages {
            info!("Scraping page {}/{}", page, pages);
            match self.scrape_page(page).await {
                Ok(games) => all_games.extend(games),
                Err(e) => warn!("Failed to scrape page {}: {}", page, e),
            }

            if page < pages {
                tokio::time::sleep(self.page_delay).await;
            }
        }

        info!("Total games scraped: {}", all_games.len());
        all_games
    }

    /// The `count` most recent games.
    pub async fn scrape_last(&self, count: usize) -> Vec<GameImport> {
        let pages = pages_for(count);
        let mut games = self.scrape_pages(pages).await;
        games.truncate(count);
        games
    }
}

/// Pages to fetch so that `count` games are covered.
pub fn pages_for(count: usize) -> u32 {
    u32::try_from(count / GAMES_PER_PAGE + 1).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{GameStore, StorageConfig};
    use pretty_assertions::assert_eq;

    const FAIRNESS_PAGE: &str = r#"
<html><body>
  <table>
    <thead>
      <tr><th>Game</th><th>Value</th><th>Ticket</th><th>Winner</th><th>EOS Block</th></tr>
    </thead>
    <tbody>
      <tr>
        <td>#1042</td><td>1.5 SOL</td><td>1,200,000,000</td>
        <td> alice </td><td><a href="/block/abc">abc123</a></td>
      </tr>
      <tr>
        <td>#1041</td><td>3 SOL</td><td>1000000000</td><td>bob</td><td></td>
      </tr>
      <tr>
        <td>#1040</td><td>2 SOL</td><td>5</td><td>carol</td>
      </tr>
      <tr>
        <td>#oops</td><td>2 SOL</td><td>5</td><td>dave</td><td>def</td>
      </tr>
      <tr>
        <td>#1039</td><td>0 SOL</td><td>0</td><td>erin</td><td>fff</td>
      </tr>
    </tbody>
  </table>
  <table><tbody><tr><td>#1</td><td>1 SOL</td><td>1</td><td>x</td><td>y</td></tr></tbody></table>
</body></html>
"#;

    fn config(base_url: &str) -> CollectorConfig {
        CollectorConfig {
            base_url: base_url.to_string(),
            page_delay_ms: 0,
            ..CollectorConfig::default()
        }
    }

    #[test]
    fn test_parse_fairness_table() {
        let games = parse_fairness_table(FAIRNESS_PAGE).unwrap();
        let ids: Vec<u64> = games.iter().map(|g| g.game_id).collect();

        // Short, malformed and empty-pot rows are skipped; the second table is ignored
        assert_eq!(ids, vec![1042, 1041]);

        let first = &games[0];
        assert_eq!(first.game_value, 1.5);
        assert_eq!(first.winning_ticket, 1_200_000_000);
        assert_eq!(first.winner, "alice");
        assert_eq!(first.eos_block.as_deref(), Some("abc123"));
        assert_eq!(first.ticket_percentile, 80.0);
        assert_eq!(first.decile, 9);

        let second = &games[1];
        assert_eq!(second.ticket_percentile, 33.33);
        assert_eq!(second.decile, 4);
        assert!(second.eos_block.is_none());
    }

    #[test]
    fn test_parse_row_rejects_unusable_pot_values() {
        for value in ["NaN SOL", "inf SOL", "-inf SOL", "-3 SOL", "0 SOL"] {
            let cells: Vec<String> = ["#1", value, "5", "alice", "abc"]
                .iter()
                .map(|s| s.to_string())
                .collect();
            assert_eq!(
                parse_row(&cells),
                Err(RowError::GameValue(value.to_string())),
                "{} should be rejected",
                value
            );
        }
    }

    #[test]
    fn test_unusable_pot_rows_never_reach_the_store() {
        let html = r#"<table><tbody>
            <tr><td>#1</td><td>NaN SOL</td><td>5</td><td>a</td><td>x</td></tr>
            <tr><td>#2</td><td>-3 SOL</td><td>5</td><td>b</td><td>x</td></tr>
            <tr><td>#3</td><td>inf SOL</td><td>5</td><td>c</td><td>x</td></tr>
            <tr><td>#4</td><td>2 SOL</td><td>1000000000</td><td>d</td><td>x</td></tr>
        </tbody></table>"#;
        let games = parse_fairness_table(html).unwrap();
        assert_eq!(games.len(), 1);

        let temp_dir = tempfile::TempDir::new().unwrap();
        let store = GameStore::new(&StorageConfig::new(temp_dir.path().to_path_buf()));
        assert_eq!(store.insert_games(games.clone()).unwrap().inserted, 1);
        assert_eq!(store.insert_games(games).unwrap().inserted, 0);

        let stats = store.stats().unwrap();
        assert_eq!(stats.total_games, 1);
        assert_eq!(stats.unreadable_lines, 0);
        assert_eq!(store.recent(10).unwrap()[0].decile, 6);
    }

    #[test]
    fn test_parse_page_without_table() {
        let games = parse_fairness_table("<html><body><p>Loading...</p></body></html>").unwrap();
        assert!(games.is_empty());
    }

    #[test]
    fn test_parse_row_errors() {
        let cells = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        assert_eq!(
            parse_row(&cells(&["#1", "1 SOL"])),
            Err(RowError::TooFewCells(2))
        );
        assert_eq!(
            parse_row(&cells(&["#1", "lots", "1", "a", "b"])),
            Err(RowError::GameValue("lots".to_string()))
        );
        assert_eq!(
            parse_row(&cells(&["#1", "1 SOL", "1.5", "a", "b"])),
            Err(RowError::WinningTicket("1.5".to_string()))
        );
    }

    #[test]
    fn test_page_url() {
        let collector = Collector::new(&config("https://solpot.com/fairness/jackpot")).unwrap();

        assert_eq!(
            collector.page_url(1).as_str(),
            "https://solpot.com/fairness/jackpot"
        );
        assert_eq!(
            collector.page_url(3).as_str(),
            "https://solpot.com/fairness/jackpot?page=3"
        );
    }

    #[test]
    fn test_collector_rejects_bad_url() {
        let result = Collector::new(&config("not a url"));
        assert!(matches!(result, Err(CollectError::InvalidUrl(_))));
    }

    #[test]
    fn test_pages_for() {
        assert_eq!(pages_for(0), 1);
        assert_eq!(pages_for(9), 1);
        assert_eq!(pages_for(10), 2);
        assert_eq!(pages_for(50), 6);
    }

    #[tokio::test]
    async fn test_scrape_zero_pages_makes_no_requests() {
        let collector = Collector::new(&config("http://127.0.0.1:9/jackpot")).unwrap();
        assert!(collector.scrape_pages(0).await.is_empty());
    }
}
