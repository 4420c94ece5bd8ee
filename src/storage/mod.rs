//! Record store for scraped mutual-fund data.
//!
//! Sqlite-backed system of record: funds, per-period returns, holdings and
//! FAQ pairs, keyed by the fund's numeric primary key. The retrieval and
//! indexing pipelines only ever read from here; the write path serves
//! ingestion and the sample-data seeder.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};

use crate::core::config::AppPaths;
use crate::core::errors::ApiError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldingRecord {
    pub holding_name: String,
    pub allocation: Option<String>,
    pub sector: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqRecord {
    pub question: String,
    pub answer: String,
}

/// Ingestion payload for one fund page. Scraped fields are free text; absent
/// values stay `None` rather than empty strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FundUpsert {
    pub fund_name: String,
    pub source_url: String,
    pub expense_ratio: Option<String>,
    pub exit_load: Option<String>,
    pub minimum_sip: Option<String>,
    pub minimum_lumpsum: Option<String>,
    pub fund_manager: Option<String>,
    pub benchmark: Option<String>,
    pub riskometer: Option<String>,
    pub lock_in: Option<String>,
    pub nav: Option<String>,
    pub aum: Option<String>,
    pub scraped_at: Option<String>,
    #[serde(default)]
    pub returns: BTreeMap<String, String>,
    #[serde(default)]
    pub holdings: Vec<HoldingRecord>,
    #[serde(default)]
    pub faqs: Vec<FaqRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FundRecord {
    pub id: i64,
    pub fund_name: String,
    pub source_url: Option<String>,
    pub expense_ratio: Option<String>,
    pub exit_load: Option<String>,
    pub minimum_sip: Option<String>,
    pub minimum_lumpsum: Option<String>,
    pub fund_manager: Option<String>,
    pub benchmark: Option<String>,
    pub riskometer: Option<String>,
    pub nav: Option<String>,
    pub aum: Option<String>,
    pub returns: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FundDetail {
    #[serde(flatten)]
    pub fund: FundRecord,
    pub holdings: Vec<HoldingRecord>,
    pub faqs: Vec<FaqRecord>,
    pub scraped_at: Option<String>,
}

/// One FAQ row joined with its fund, as consumed by the indexing pipeline.
#[derive(Debug, Clone)]
pub struct FaqRow {
    pub faq_id: i64,
    pub fund_name: String,
    pub question: String,
    pub answer: String,
}

/// One fund row with its returns pre-concatenated as `"period: value"`
/// pairs, as consumed by the indexing pipeline.
#[derive(Debug, Clone)]
pub struct FundTextRow {
    pub fund_id: i64,
    pub fund_name: String,
    pub fund_manager: Option<String>,
    pub expense_ratio: Option<String>,
    pub riskometer: Option<String>,
    pub returns_text: Option<String>,
    pub aum: Option<String>,
    pub benchmark: Option<String>,
    pub minimum_sip: Option<String>,
    pub minimum_lumpsum: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FaqSearchRow {
    pub fund_name: Option<String>,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FundSource {
    pub fund_name: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoreStats {
    pub funds: usize,
    pub returns: usize,
    pub holdings: usize,
    pub faqs: usize,
}

#[derive(Clone)]
pub struct FundStore {
    pool: SqlitePool,
}

impl FundStore {
    pub async fn new(paths: &AppPaths) -> Result<Self, ApiError> {
        Self::with_path(paths.db_path.clone()).await
    }

    pub async fn with_path(db_path: PathBuf) -> Result<Self, ApiError> {
        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(ApiError::internal)?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), ApiError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS funds (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                fund_name TEXT,
                source_url TEXT UNIQUE,
                expense_ratio TEXT,
                exit_load TEXT,
                minimum_sip TEXT,
                minimum_lumpsum TEXT,
                fund_manager TEXT,
                benchmark TEXT,
                riskometer TEXT,
                lock_in TEXT,
                nav TEXT,
                aum TEXT,
                scraped_at TEXT,
                updated_at TEXT NOT NULL DEFAULT (STRFTIME('%Y-%m-%dT%H:%M:%fZ', 'now'))
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(ApiError::internal)?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS returns (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                fund_id INTEGER NOT NULL,
                period TEXT NOT NULL,
                return_value TEXT NOT NULL,
                FOREIGN KEY (fund_id) REFERENCES funds(id)
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(ApiError::internal)?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS holdings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                fund_id INTEGER NOT NULL,
                holding_name TEXT NOT NULL,
                allocation TEXT,
                sector TEXT,
                FOREIGN KEY (fund_id) REFERENCES funds(id)
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(ApiError::internal)?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS faqs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                fund_id INTEGER NOT NULL,
                question TEXT NOT NULL,
                answer TEXT NOT NULL,
                FOREIGN KEY (fund_id) REFERENCES funds(id)
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(ApiError::internal)?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_returns_fund ON returns(fund_id)")
            .execute(&self.pool)
            .await
            .map_err(ApiError::internal)?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_holdings_fund ON holdings(fund_id)")
            .execute(&self.pool)
            .await
            .map_err(ApiError::internal)?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_faqs_fund ON faqs(fund_id)")
            .execute(&self.pool)
            .await
            .map_err(ApiError::internal)?;

        Ok(())
    }

    /// Insert or update one fund page keyed by source URL, replacing its
    /// child rows. Returns the fund's primary key.
    pub async fn save_fund(&self, fund: &FundUpsert) -> Result<i64, ApiError> {
        let mut tx = self.pool.begin().await.map_err(ApiError::internal)?;

        sqlx::query(
            "INSERT INTO funds
                (fund_name, source_url, expense_ratio, exit_load, minimum_sip,
                 minimum_lumpsum, fund_manager, benchmark, riskometer, lock_in,
                 nav, aum, scraped_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
             ON CONFLICT(source_url) DO UPDATE SET
                fund_name = excluded.fund_name,
                expense_ratio = excluded.expense_ratio,
                exit_load = excluded.exit_load,
                minimum_sip = excluded.minimum_sip,
                minimum_lumpsum = excluded.minimum_lumpsum,
                fund_manager = excluded.fund_manager,
                benchmark = excluded.benchmark,
                riskometer = excluded.riskometer,
                lock_in = excluded.lock_in,
                nav = excluded.nav,
                aum = excluded.aum,
                scraped_at = excluded.scraped_at,
                updated_at = STRFTIME('%Y-%m-%dT%H:%M:%fZ', 'now')",
        )
        .bind(&fund.fund_name)
        .bind(&fund.source_url)
        .bind(&fund.expense_ratio)
        .bind(&fund.exit_load)
        .bind(&fund.minimum_sip)
        .bind(&fund.minimum_lumpsum)
        .bind(&fund.fund_manager)
        .bind(&fund.benchmark)
        .bind(&fund.riskometer)
        .bind(&fund.lock_in)
        .bind(&fund.nav)
        .bind(&fund.aum)
        .bind(&fund.scraped_at)
        .execute(&mut *tx)
        .await
        .map_err(ApiError::internal)?;

        let fund_id: i64 = sqlx::query_scalar("SELECT id FROM funds WHERE source_url = ?1")
            .bind(&fund.source_url)
            .fetch_one(&mut *tx)
            .await
            .map_err(ApiError::internal)?;

        if !fund.returns.is_empty() {
            sqlx::query("DELETE FROM returns WHERE fund_id = ?1")
                .bind(fund_id)
                .execute(&mut *tx)
                .await
                .map_err(ApiError::internal)?;
            for (period, value) in &fund.returns {
                sqlx::query("INSERT INTO returns (fund_id, period, return_value) VALUES (?1, ?2, ?3)")
                    .bind(fund_id)
                    .bind(period)
                    .bind(value)
                    .execute(&mut *tx)
                    .await
                    .map_err(ApiError::internal)?;
            }
        }

        if !fund.holdings.is_empty() {
            sqlx::query("DELETE FROM holdings WHERE fund_id = ?1")
                .bind(fund_id)
                .execute(&mut *tx)
                .await
                .map_err(ApiError::internal)?;
            for holding in &fund.holdings {
                sqlx::query(
                    "INSERT INTO holdings (fund_id, holding_name, allocation, sector)
                     VALUES (?1, ?2, ?3, ?4)",
                )
                .bind(fund_id)
                .bind(&holding.holding_name)
                .bind(&holding.allocation)
                .bind(&holding.sector)
                .execute(&mut *tx)
                .await
                .map_err(ApiError::internal)?;
            }
        }

        if !fund.faqs.is_empty() {
            sqlx::query("DELETE FROM faqs WHERE fund_id = ?1")
                .bind(fund_id)
                .execute(&mut *tx)
                .await
                .map_err(ApiError::internal)?;
            for faq in &fund.faqs {
                sqlx::query("INSERT INTO faqs (fund_id, question, answer) VALUES (?1, ?2, ?3)")
                    .bind(fund_id)
                    .bind(&faq.question)
                    .bind(&faq.answer)
                    .execute(&mut *tx)
                    .await
                    .map_err(ApiError::internal)?;
            }
        }

        tx.commit().await.map_err(ApiError::internal)?;
        Ok(fund_id)
    }

    fn row_to_fund(row: &sqlx::sqlite::SqliteRow) -> FundRecord {
        FundRecord {
            id: row.get("id"),
            fund_name: row.get::<Option<String>, _>("fund_name").unwrap_or_default(),
            source_url: row.get("source_url"),
            expense_ratio: row.get("expense_ratio"),
            exit_load: row.get("exit_load"),
            minimum_sip: row.get("minimum_sip"),
            minimum_lumpsum: row.get("minimum_lumpsum"),
            fund_manager: row.get("fund_manager"),
            benchmark: row.get("benchmark"),
            riskometer: row.get("riskometer"),
            nav: row.get("nav"),
            aum: row.get("aum"),
            returns: BTreeMap::new(),
        }
    }

    async fn returns_for(&self, fund_id: i64) -> Result<BTreeMap<String, String>, ApiError> {
        let rows = sqlx::query("SELECT period, return_value FROM returns WHERE fund_id = ?1")
            .bind(fund_id)
            .fetch_all(&self.pool)
            .await
            .map_err(ApiError::internal)?;

        Ok(rows
            .iter()
            .map(|row| (row.get("period"), row.get("return_value")))
            .collect())
    }

    pub async fn list_funds(&self) -> Result<Vec<FundRecord>, ApiError> {
        let rows = sqlx::query("SELECT * FROM funds WHERE fund_name IS NOT NULL ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(ApiError::internal)?;

        let mut funds = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut fund = Self::row_to_fund(row);
            fund.returns = self.returns_for(fund.id).await?;
            funds.push(fund);
        }
        Ok(funds)
    }

    pub async fn fund_detail(&self, fund_id: i64) -> Result<Option<FundDetail>, ApiError> {
        let row = sqlx::query("SELECT * FROM funds WHERE id = ?1")
            .bind(fund_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(ApiError::internal)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut fund = Self::row_to_fund(&row);
        fund.returns = self.returns_for(fund_id).await?;
        let scraped_at: Option<String> = row.get("scraped_at");

        let holding_rows = sqlx::query(
            "SELECT holding_name, allocation, sector FROM holdings WHERE fund_id = ?1",
        )
        .bind(fund_id)
        .fetch_all(&self.pool)
        .await
        .map_err(ApiError::internal)?;
        let holdings = holding_rows
            .iter()
            .map(|row| HoldingRecord {
                holding_name: row.get("holding_name"),
                allocation: row.get("allocation"),
                sector: row.get("sector"),
            })
            .collect();

        let faq_rows = sqlx::query("SELECT question, answer FROM faqs WHERE fund_id = ?1")
            .bind(fund_id)
            .fetch_all(&self.pool)
            .await
            .map_err(ApiError::internal)?;
        let faqs = faq_rows
            .iter()
            .map(|row| FaqRecord {
                question: row.get("question"),
                answer: row.get("answer"),
            })
            .collect();

        Ok(Some(FundDetail {
            fund,
            holdings,
            faqs,
            scraped_at,
        }))
    }

    pub async fn search_funds(&self, query: &str) -> Result<Vec<FundRecord>, ApiError> {
        let pattern = format!("%{}%", query.trim());
        let rows = sqlx::query("SELECT * FROM funds WHERE fund_name LIKE ?1 ORDER BY id")
            .bind(&pattern)
            .fetch_all(&self.pool)
            .await
            .map_err(ApiError::internal)?;

        let mut funds = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut fund = Self::row_to_fund(row);
            fund.returns = self.returns_for(fund.id).await?;
            funds.push(fund);
        }
        Ok(funds)
    }

    /// Plain-text FAQ search (LIKE over question and answer), for the
    /// non-semantic API path.
    pub async fn search_faqs_text(&self, query: &str) -> Result<Vec<FaqSearchRow>, ApiError> {
        let pattern = format!("%{}%", query.trim());
        let rows = sqlx::query(
            "SELECT f.fund_name, faq.question, faq.answer
             FROM faqs faq
             LEFT JOIN funds f ON f.id = faq.fund_id
             WHERE faq.question LIKE ?1 OR faq.answer LIKE ?1
             ORDER BY faq.id",
        )
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await
        .map_err(ApiError::internal)?;

        Ok(rows
            .iter()
            .map(|row| FaqSearchRow {
                fund_name: row.get("fund_name"),
                question: row.get("question"),
                answer: row.get("answer"),
            })
            .collect())
    }

    pub async fn stats(&self) -> Result<StoreStats, ApiError> {
        let funds: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM funds")
            .fetch_one(&self.pool)
            .await
            .map_err(ApiError::internal)?;
        let returns: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM returns")
            .fetch_one(&self.pool)
            .await
            .map_err(ApiError::internal)?;
        let holdings: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM holdings")
            .fetch_one(&self.pool)
            .await
            .map_err(ApiError::internal)?;
        let faqs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM faqs")
            .fetch_one(&self.pool)
            .await
            .map_err(ApiError::internal)?;

        Ok(StoreStats {
            funds: funds as usize,
            returns: returns as usize,
            holdings: holdings as usize,
            faqs: faqs as usize,
        })
    }

    /// Every FAQ joined with its fund name, for the indexing pipeline.
    pub async fn faq_rows(&self) -> Result<Vec<FaqRow>, ApiError> {
        let rows = sqlx::query(
            "SELECT faq.id AS faq_id, f.fund_name, faq.question, faq.answer
             FROM funds f
             INNER JOIN faqs faq ON f.id = faq.fund_id
             WHERE f.fund_name IS NOT NULL
             ORDER BY faq.id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(ApiError::internal)?;

        Ok(rows
            .iter()
            .map(|row| FaqRow {
                faq_id: row.get("faq_id"),
                fund_name: row.get("fund_name"),
                question: row.get("question"),
                answer: row.get("answer"),
            })
            .collect())
    }

    /// Every fund with returns concatenated to `"period: value"` pairs, for
    /// the indexing pipeline.
    pub async fn fund_text_rows(&self) -> Result<Vec<FundTextRow>, ApiError> {
        let rows = sqlx::query(
            "SELECT f.id, f.fund_name, f.fund_manager, f.expense_ratio, f.riskometer,
                    f.aum, f.benchmark, f.minimum_sip, f.minimum_lumpsum,
                    GROUP_CONCAT(r.period || ': ' || r.return_value, ', ') AS returns_text
             FROM funds f
             LEFT JOIN returns r ON f.id = r.fund_id
             WHERE f.fund_name IS NOT NULL
             GROUP BY f.id
             ORDER BY f.id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(ApiError::internal)?;

        Ok(rows
            .iter()
            .map(|row| FundTextRow {
                fund_id: row.get("id"),
                fund_name: row.get("fund_name"),
                fund_manager: row.get("fund_manager"),
                expense_ratio: row.get("expense_ratio"),
                riskometer: row.get("riskometer"),
                returns_text: row.get("returns_text"),
                aum: row.get("aum"),
                benchmark: row.get("benchmark"),
                minimum_sip: row.get("minimum_sip"),
                minimum_lumpsum: row.get("minimum_lumpsum"),
            })
            .collect())
    }

    /// Denormalized dump of every fund and its FAQs. This is the degraded
    /// context path when semantic retrieval is unavailable; bounded only by
    /// database size.
    pub async fn full_context(&self) -> Result<String, ApiError> {
        let funds = self.fund_text_rows().await?;

        let mut context = String::from("Available Mutual Funds Information:\n\n");
        for fund in &funds {
            context.push_str(&format!("Fund: {}\n", fund.fund_name));
            if let Some(expense_ratio) = &fund.expense_ratio {
                context.push_str(&format!("  - Expense Ratio: {expense_ratio}\n"));
            }
            if let Some(minimum_sip) = &fund.minimum_sip {
                context.push_str(&format!("  - Minimum SIP: {minimum_sip}\n"));
            }
            if let Some(minimum_lumpsum) = &fund.minimum_lumpsum {
                context.push_str(&format!("  - Minimum Lumpsum: {minimum_lumpsum}\n"));
            }
            if let Some(fund_manager) = &fund.fund_manager {
                context.push_str(&format!("  - Fund Manager: {fund_manager}\n"));
            }
            if let Some(riskometer) = &fund.riskometer {
                context.push_str(&format!("  - Risk Level: {riskometer}\n"));
            }
            if let Some(returns_text) = &fund.returns_text {
                context.push_str(&format!("  - Returns: {returns_text}\n"));
            }

            let faq_rows = sqlx::query("SELECT question, answer FROM faqs WHERE fund_id = ?1")
                .bind(fund.fund_id)
                .fetch_all(&self.pool)
                .await
                .map_err(ApiError::internal)?;
            if !faq_rows.is_empty() {
                context.push_str("  - FAQs:\n");
                for row in &faq_rows {
                    let question: String = row.get("question");
                    let answer: String = row.get("answer");
                    context.push_str(&format!("    Q: {question}\n"));
                    context.push_str(&format!("    A: {answer}\n"));
                }
            }

            context.push('\n');
        }

        Ok(context)
    }

    /// Funds with their source URLs, for citation extraction.
    pub async fn fund_sources(&self) -> Result<Vec<FundSource>, ApiError> {
        let rows = sqlx::query(
            "SELECT DISTINCT fund_name, source_url
             FROM funds
             WHERE fund_name IS NOT NULL AND source_url IS NOT NULL",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(ApiError::internal)?;

        Ok(rows
            .iter()
            .map(|row| FundSource {
                fund_name: row.get("fund_name"),
                url: row.get("source_url"),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_store() -> (FundStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = FundStore::with_path(dir.path().join("funds.db"))
            .await
            .unwrap();
        (store, dir)
    }

    fn sample_fund(name: &str, url: &str) -> FundUpsert {
        FundUpsert {
            fund_name: name.to_string(),
            source_url: url.to_string(),
            expense_ratio: Some("0.75%".to_string()),
            fund_manager: Some("A. Manager".to_string()),
            riskometer: Some("Very High".to_string()),
            minimum_sip: Some("₹500".to_string()),
            returns: BTreeMap::from([
                ("1Y".to_string(), "28.5%".to_string()),
                ("3Y".to_string(), "24.3%".to_string()),
            ]),
            holdings: vec![HoldingRecord {
                holding_name: "Infosys Ltd".to_string(),
                allocation: Some("4.2%".to_string()),
                sector: Some("Technology".to_string()),
            }],
            faqs: vec![FaqRecord {
                question: "What is the minimum SIP amount?".to_string(),
                answer: "₹500 per month.".to_string(),
            }],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn save_and_read_back() {
        let (store, _dir) = test_store().await;

        let id = store
            .save_fund(&sample_fund("Mid Cap Fund", "https://example.com/mid-cap"))
            .await
            .unwrap();

        let detail = store.fund_detail(id).await.unwrap().unwrap();
        assert_eq!(detail.fund.fund_name, "Mid Cap Fund");
        assert_eq!(detail.fund.returns.get("1Y").unwrap(), "28.5%");
        assert_eq!(detail.holdings.len(), 1);
        assert_eq!(detail.faqs.len(), 1);
    }

    #[tokio::test]
    async fn resave_replaces_children_and_keeps_id() {
        let (store, _dir) = test_store().await;

        let url = "https://example.com/mid-cap";
        let first_id = store.save_fund(&sample_fund("Mid Cap Fund", url)).await.unwrap();

        let mut updated = sample_fund("Mid Cap Fund", url);
        updated.returns = BTreeMap::from([("5Y".to_string(), "22.1%".to_string())]);
        let second_id = store.save_fund(&updated).await.unwrap();

        assert_eq!(first_id, second_id);
        let detail = store.fund_detail(first_id).await.unwrap().unwrap();
        assert_eq!(detail.fund.returns.len(), 1);
        assert!(detail.fund.returns.contains_key("5Y"));
    }

    #[tokio::test]
    async fn faq_rows_join_fund_names() {
        let (store, _dir) = test_store().await;
        store
            .save_fund(&sample_fund("Mid Cap Fund", "https://example.com/a"))
            .await
            .unwrap();
        store
            .save_fund(&sample_fund("Small Cap Fund", "https://example.com/b"))
            .await
            .unwrap();

        let rows = store.faq_rows().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().any(|r| r.fund_name == "Mid Cap Fund"));
        assert!(rows.iter().any(|r| r.fund_name == "Small Cap Fund"));
    }

    #[tokio::test]
    async fn fund_text_rows_concatenate_returns() {
        let (store, _dir) = test_store().await;
        store
            .save_fund(&sample_fund("Mid Cap Fund", "https://example.com/a"))
            .await
            .unwrap();

        let rows = store.fund_text_rows().await.unwrap();
        assert_eq!(rows.len(), 1);
        let returns_text = rows[0].returns_text.as_deref().unwrap();
        assert!(returns_text.contains("1Y: 28.5%"));
        assert!(returns_text.contains("3Y: 24.3%"));
    }

    #[tokio::test]
    async fn full_context_includes_faqs() {
        let (store, _dir) = test_store().await;
        store
            .save_fund(&sample_fund("Mid Cap Fund", "https://example.com/a"))
            .await
            .unwrap();

        let context = store.full_context().await.unwrap();
        assert!(context.contains("Fund: Mid Cap Fund"));
        assert!(context.contains("Q: What is the minimum SIP amount?"));
        assert!(context.contains("Risk Level: Very High"));
    }

    #[tokio::test]
    async fn stats_count_all_tables() {
        let (store, _dir) = test_store().await;
        store
            .save_fund(&sample_fund("Mid Cap Fund", "https://example.com/a"))
            .await
            .unwrap();

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.funds, 1);
        assert_eq!(stats.returns, 2);
        assert_eq!(stats.holdings, 1);
        assert_eq!(stats.faqs, 1);
    }
}
