//! SQLite journal adapter.
//!
//! Decimals are stored as TEXT so amounts round-trip exactly. Dates use
//! `YYYY-MM-DD`, which keeps lexical and chronological order identical.

use crate::domain::category::Category;
use crate::domain::config_validation::pool_size;
use crate::domain::daily_stat::{DailyStat, DailyTotals, RefreshOutcome};
use crate::domain::error::JournalError;
use crate::domain::trade::{
    DATE_FORMAT, DateRange, Direction, NewTrade, TIME_FORMAT, Trade, TradeFilter,
};
use crate::ports::config_port::ConfigPort;
use crate::ports::daily_stat_port::DailyStatPort;
use crate::ports::journal_port::JournalPort;
use crate::ports::trade_port::TradePort;
use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, SubsecRound, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OptionalExtension, Row, TransactionBehavior, params, params_from_iter};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const TRADE_COLUMNS: &str = "id, created_at, trade_date, trade_time, pair, trade_type, \
                             entry_price, exit_price, position_size, pnl_usd, pnl_pct, \
                             category, tags, comment";

pub struct SqliteAdapter {
    pool: Pool<SqliteConnectionManager>,
}

fn pool_err(e: r2d2::Error) -> JournalError {
    JournalError::Database {
        reason: e.to_string(),
    }
}

fn query_err(e: rusqlite::Error) -> JournalError {
    JournalError::DatabaseQuery {
        reason: e.to_string(),
    }
}

impl SqliteAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, JournalError> {
        let db_path =
            config
                .get_string("sqlite", "path")
                .ok_or_else(|| JournalError::ConfigMissing {
                    section: "sqlite".into(),
                    key: "path".into(),
                })?;

        let pool_size = pool_size(config, "sqlite")?;

        let manager = SqliteConnectionManager::file(&db_path)
            .with_init(|conn| conn.busy_timeout(BUSY_TIMEOUT));
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(manager)
            .map_err(pool_err)?;

        info!(path = %db_path, pool_size, "opened sqlite journal");
        Ok(Self { pool })
    }

    pub fn in_memory() -> Result<Self, JournalError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(pool_err)?;

        Ok(Self { pool })
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>, JournalError> {
        self.pool.get().map_err(pool_err)
    }
}

impl JournalPort for SqliteAdapter {
    fn initialize_schema(&self) -> Result<(), JournalError> {
        let conn = self.conn()?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS trades (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                created_at TEXT NOT NULL,
                trade_date TEXT NOT NULL,
                trade_time TEXT NOT NULL,
                pair TEXT NOT NULL,
                trade_type TEXT NOT NULL,
                entry_price TEXT NOT NULL,
                exit_price TEXT NOT NULL,
                position_size TEXT,
                pnl_usd TEXT NOT NULL,
                pnl_pct TEXT NOT NULL,
                category TEXT NOT NULL,
                tags TEXT,
                comment TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_trades_date ON trades(trade_date DESC);
            CREATE INDEX IF NOT EXISTS idx_trades_category ON trades(category);
            CREATE INDEX IF NOT EXISTS idx_trades_created ON trades(created_at DESC);

            CREATE TABLE IF NOT EXISTS daily_stats (
                stat_date TEXT PRIMARY KEY,
                total_trades INTEGER NOT NULL DEFAULT 0,
                strategy_trades INTEGER NOT NULL DEFAULT 0,
                impulse_trades INTEGER NOT NULL DEFAULT 0,
                total_pnl TEXT NOT NULL DEFAULT '0',
                strategy_pnl TEXT NOT NULL DEFAULT '0',
                impulse_pnl TEXT NOT NULL DEFAULT '0',
                updated_at TEXT NOT NULL
            );",
        )
        .map_err(query_err)?;

        Ok(())
    }
}

impl TradePort for SqliteAdapter {
    fn insert_trade(&self, trade: &NewTrade) -> Result<Trade, JournalError> {
        let conn = self.conn()?;
        let created_at = Utc::now().trunc_subsecs(6);

        conn.execute(
            "INSERT INTO trades (created_at, trade_date, trade_time, pair, trade_type,
                                 entry_price, exit_price, position_size, pnl_usd, pnl_pct,
                                 category, tags, comment)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                format_timestamp(created_at),
                trade.trade_date.format(DATE_FORMAT).to_string(),
                trade.trade_time.format(TIME_FORMAT).to_string(),
                trade.pair,
                trade.direction.as_str(),
                trade.entry_price.to_string(),
                trade.exit_price.to_string(),
                trade.position_size.map(|d| d.to_string()),
                trade.pnl_usd.to_string(),
                trade.pnl_pct.to_string(),
                trade.category.as_str(),
                trade.tags,
                trade.comment,
            ],
        )
        .map_err(query_err)?;

        let id = conn.last_insert_rowid();
        debug!(id, "inserted trade row");
        Ok(Trade::new(id, created_at, trade.clone()))
    }

    fn query_trades(&self, filter: &TradeFilter) -> Result<Vec<Trade>, JournalError> {
        let conn = self.conn()?;
        select_trades(&conn, filter)
    }
}

impl DailyStatPort for SqliteAdapter {
    fn refresh_daily_stat(&self, date: NaiveDate) -> Result<DailyStat, JournalError> {
        let mut conn = self.conn()?;

        // IMMEDIATE takes the write lock up front, so no insert can land between
        // the scan and the upsert.
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(query_err)?;

        let trades = select_trades(&tx, &TradeFilter::range(DateRange::day(date)))?;
        let totals = DailyTotals::compute(date, &trades)?;
        let existing = select_daily_stat(&tx, date)?;

        match DailyStat::refreshed(date, existing, totals, Utc::now().trunc_subsecs(6)) {
            RefreshOutcome::Unchanged(stat) => {
                debug!(%date, "daily stat unchanged");
                Ok(stat)
            }
            RefreshOutcome::Changed(stat) => {
                upsert_daily_stat(&tx, &stat)?;
                tx.commit().map_err(query_err)?;
                debug!(%date, trades = stat.totals.total_trades, "daily stat refreshed");
                Ok(stat)
            }
        }
    }

    fn get_daily_stat(&self, date: NaiveDate) -> Result<Option<DailyStat>, JournalError> {
        let conn = self.conn()?;
        select_daily_stat(&conn, date)
    }
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn select_trades(conn: &Connection, filter: &TradeFilter) -> Result<Vec<Trade>, JournalError> {
    let mut clauses: Vec<String> = Vec::new();
    let mut values: Vec<String> = Vec::new();

    if let Some(start) = filter.range.start {
        values.push(start.format(DATE_FORMAT).to_string());
        clauses.push(format!("trade_date >= ?{}", values.len()));
    }
    if let Some(end) = filter.range.end {
        values.push(end.format(DATE_FORMAT).to_string());
        clauses.push(format!("trade_date <= ?{}", values.len()));
    }
    if let Some(category) = filter.category {
        let mut placeholders = Vec::new();
        for spelling in category.spellings() {
            values.push(spelling.to_string());
            placeholders.push(format!("?{}", values.len()));
        }
        clauses.push(format!("category IN ({})", placeholders.join(", ")));
    }

    let mut sql = format!("SELECT {TRADE_COLUMNS} FROM trades");
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY trade_date DESC, id DESC");
    if let Some(limit) = filter.limit {
        sql.push_str(&format!(" LIMIT {limit}"));
    }

    let mut stmt = conn.prepare(&sql).map_err(query_err)?;
    let rows = stmt
        .query_map(params_from_iter(values.iter()), RawTrade::from_row)
        .map_err(query_err)?;

    let mut trades = Vec::new();
    for row in rows {
        trades.push(row.map_err(query_err)?.into_trade()?);
    }

    Ok(trades)
}

fn select_daily_stat(conn: &Connection, date: NaiveDate) -> Result<Option<DailyStat>, JournalError> {
    let raw = conn
        .query_row(
            "SELECT stat_date, total_trades, strategy_trades, impulse_trades,
                    total_pnl, strategy_pnl, impulse_pnl, updated_at
             FROM daily_stats WHERE stat_date = ?1",
            params![date.format(DATE_FORMAT).to_string()],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, String>(6)?,
                    row.get::<_, String>(7)?,
                ))
            },
        )
        .optional()
        .map_err(query_err)?;

    let Some((stat_date, total, strategy, impulse, total_pnl, strategy_pnl, impulse_pnl, updated)) =
        raw
    else {
        return Ok(None);
    };

    let what = format!("daily stat {stat_date}");
    Ok(Some(DailyStat {
        stat_date: parse_stored_date(&stat_date, &what)?,
        totals: DailyTotals {
            total_trades: total,
            strategy_trades: strategy,
            impulse_trades: impulse,
            total_pnl: parse_stored_decimal(&total_pnl, &what, "total_pnl")?,
            strategy_pnl: parse_stored_decimal(&strategy_pnl, &what, "strategy_pnl")?,
            impulse_pnl: parse_stored_decimal(&impulse_pnl, &what, "impulse_pnl")?,
        },
        updated_at: parse_stored_timestamp(&updated, &what)?,
    }))
}

fn upsert_daily_stat(conn: &Connection, stat: &DailyStat) -> Result<(), JournalError> {
    let t = &stat.totals;
    conn.execute(
        "INSERT INTO daily_stats (stat_date, total_trades, strategy_trades, impulse_trades,
                                  total_pnl, strategy_pnl, impulse_pnl, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         ON CONFLICT(stat_date) DO UPDATE SET
             total_trades = excluded.total_trades,
             strategy_trades = excluded.strategy_trades,
             impulse_trades = excluded.impulse_trades,
             total_pnl = excluded.total_pnl,
             strategy_pnl = excluded.strategy_pnl,
             impulse_pnl = excluded.impulse_pnl,
             updated_at = excluded.updated_at",
        params![
            stat.stat_date.format(DATE_FORMAT).to_string(),
            t.total_trades,
            t.strategy_trades,
            t.impulse_trades,
            t.total_pnl.to_string(),
            t.strategy_pnl.to_string(),
            t.impulse_pnl.to_string(),
            format_timestamp(stat.updated_at),
        ],
    )
    .map_err(query_err)?;
    Ok(())
}

/// A trade row exactly as stored; every column may be null or malformed in a
/// database written by something other than this adapter.
struct RawTrade {
    id: i64,
    created_at: Option<String>,
    trade_date: Option<String>,
    trade_time: Option<String>,
    pair: Option<String>,
    trade_type: Option<String>,
    entry_price: Option<String>,
    exit_price: Option<String>,
    position_size: Option<String>,
    pnl_usd: Option<String>,
    pnl_pct: Option<String>,
    category: Option<String>,
    tags: Option<String>,
    comment: Option<String>,
}

impl RawTrade {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            created_at: row.get(1)?,
            trade_date: row.get(2)?,
            trade_time: row.get(3)?,
            pair: row.get(4)?,
            trade_type: row.get(5)?,
            entry_price: row.get(6)?,
            exit_price: row.get(7)?,
            position_size: row.get(8)?,
            pnl_usd: row.get(9)?,
            pnl_pct: row.get(10)?,
            category: row.get(11)?,
            tags: row.get(12)?,
            comment: row.get(13)?,
        })
    }

    fn into_trade(self) -> Result<Trade, JournalError> {
        let what = format!("trade {}", self.id);
        let need = |value: Option<String>, column: &str| {
            value.ok_or_else(|| JournalError::consistency(format!("{what}: {column} is null")))
        };

        let trade_type = need(self.trade_type, "trade_type")?;
        let direction = Direction::normalize(&trade_type).ok_or_else(|| {
            JournalError::consistency(format!("{what}: unknown trade_type '{trade_type}'"))
        })?;
        let category_raw = need(self.category, "category")?;
        let category = Category::normalize(&category_raw).ok_or_else(|| {
            JournalError::consistency(format!("{what}: unknown category '{category_raw}'"))
        })?;
        let time_raw = need(self.trade_time, "trade_time")?;
        let trade_time = NaiveTime::parse_from_str(&time_raw, TIME_FORMAT).map_err(|_| {
            JournalError::consistency(format!("{what}: bad trade_time '{time_raw}'"))
        })?;

        Ok(Trade {
            id: self.id,
            created_at: parse_stored_timestamp(&need(self.created_at, "created_at")?, &what)?,
            trade_date: parse_stored_date(&need(self.trade_date, "trade_date")?, &what)?,
            trade_time,
            pair: need(self.pair, "pair")?,
            direction,
            entry_price: parse_stored_decimal(
                &need(self.entry_price, "entry_price")?,
                &what,
                "entry_price",
            )?,
            exit_price: parse_stored_decimal(
                &need(self.exit_price, "exit_price")?,
                &what,
                "exit_price",
            )?,
            position_size: self
                .position_size
                .map(|s| parse_stored_decimal(&s, &what, "position_size"))
                .transpose()?,
            pnl_usd: parse_stored_decimal(&need(self.pnl_usd, "pnl_usd")?, &what, "pnl_usd")?,
            pnl_pct: parse_stored_decimal(&need(self.pnl_pct, "pnl_pct")?, &what, "pnl_pct")?,
            category,
            tags: self.tags,
            comment: self.comment,
        })
    }
}

fn parse_stored_date(s: &str, what: &str) -> Result<NaiveDate, JournalError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|_| JournalError::consistency(format!("{what}: bad date '{s}'")))
}

fn parse_stored_timestamp(s: &str, what: &str) -> Result<DateTime<Utc>, JournalError> {
    DateTime::parse_from_rfc3339(s)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| JournalError::consistency(format!("{what}: bad timestamp '{s}'")))
}

fn parse_stored_decimal(s: &str, what: &str, column: &str) -> Result<Decimal, JournalError> {
    Decimal::from_str(s)
        .map_err(|_| JournalError::consistency(format!("{what}: {column} '{s}' is not a decimal")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    struct EmptyConfig;

    impl ConfigPort for EmptyConfig {
        fn get_string(&self, _section: &str, _key: &str) -> Option<String> {
            None
        }
        fn get_int(&self, _section: &str, _key: &str, default: i64) -> i64 {
            default
        }
    }

    struct OversizedPool;

    impl ConfigPort for OversizedPool {
        fn get_string(&self, section: &str, key: &str) -> Option<String> {
            (section == "sqlite" && key == "path").then(|| ":memory:".to_string())
        }
        fn get_int(&self, _section: &str, key: &str, default: i64) -> i64 {
            if key == "pool_size" {
                1 << 33
            } else {
                default
            }
        }
    }

    fn adapter() -> SqliteAdapter {
        let adapter = SqliteAdapter::in_memory().unwrap();
        adapter.initialize_schema().unwrap();
        adapter
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn new_trade(date: NaiveDate, category: Category, pnl: Decimal) -> NewTrade {
        NewTrade {
            trade_date: date,
            trade_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            pair: "BTCUSDT".into(),
            direction: Direction::Long,
            entry_price: dec!(100),
            exit_price: dec!(110),
            position_size: Some(dec!(0.5)),
            pnl_usd: pnl,
            pnl_pct: dec!(10),
            category,
            tags: Some("plan".into()),
            comment: None,
        }
    }

    fn insert_raw(adapter: &SqliteAdapter, date: &str, trade_type: &str, category: &str, pnl: &str) {
        adapter
            .pool
            .get()
            .unwrap()
            .execute(
                "INSERT INTO trades (created_at, trade_date, trade_time, pair, trade_type,
                                     entry_price, exit_price, pnl_usd, pnl_pct, category)
                 VALUES ('2024-01-01T00:00:00.000000Z', ?1, '09:00:00', 'ETH', ?2,
                         '10', '11', ?3, '10', ?4)",
                params![date, trade_type, pnl, category],
            )
            .unwrap();
    }

    #[test]
    fn from_config_missing_path() {
        let config = EmptyConfig;
        let result = SqliteAdapter::from_config(&config);
        match result {
            Err(JournalError::ConfigMissing { section, key }) => {
                assert_eq!(section, "sqlite");
                assert_eq!(key, "path");
            }
            Err(other) => panic!("expected ConfigMissing, got: {other}"),
            Ok(_) => panic!("expected error, got Ok"),
        }
    }

    #[test]
    fn from_config_rejects_oversized_pool() {
        assert!(matches!(
            SqliteAdapter::from_config(&OversizedPool),
            Err(JournalError::ConfigInvalid { key, .. }) if key == "pool_size"
        ));
    }

    #[test]
    fn schema_initialization_is_repeatable() {
        let adapter = adapter();
        adapter.initialize_schema().unwrap();
    }

    #[test]
    fn insert_assigns_increasing_ids() {
        let adapter = adapter();
        let a = adapter
            .insert_trade(&new_trade(d(1), Category::Strategy, dec!(1)))
            .unwrap();
        let b = adapter
            .insert_trade(&new_trade(d(1), Category::Strategy, dec!(2)))
            .unwrap();
        assert!(b.id > a.id);
        assert!(b.created_at >= a.created_at);
    }

    #[test]
    fn inserted_trade_reads_back_identically() {
        let adapter = adapter();
        let input = new_trade(d(1), Category::Impulse, dec!(-12.345));
        let stored = adapter.insert_trade(&input).unwrap();

        let fetched = adapter
            .query_trades(&TradeFilter::range(DateRange::day(d(1))))
            .unwrap();
        assert_eq!(fetched, vec![stored.clone()]);
        assert_eq!(fetched[0].to_new_trade(), input);
    }

    #[test]
    fn query_orders_by_date_then_insert_desc() {
        let adapter = adapter();
        let first = adapter
            .insert_trade(&new_trade(d(2), Category::Strategy, dec!(1)))
            .unwrap();
        let older = adapter
            .insert_trade(&new_trade(d(1), Category::Strategy, dec!(1)))
            .unwrap();
        let second = adapter
            .insert_trade(&new_trade(d(2), Category::Strategy, dec!(1)))
            .unwrap();

        let ids: Vec<i64> = adapter
            .query_trades(&TradeFilter::default())
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![second.id, first.id, older.id]);
    }

    #[test]
    fn query_filters_range_category_and_limit() {
        let adapter = adapter();
        for (day, cat) in [
            (1, Category::Strategy),
            (2, Category::Impulse),
            (3, Category::Impulse),
            (4, Category::Strategy),
        ] {
            adapter.insert_trade(&new_trade(d(day), cat, dec!(1))).unwrap();
        }

        let in_range = adapter
            .query_trades(&TradeFilter::range(DateRange::between(d(2), d(3))))
            .unwrap();
        assert_eq!(in_range.len(), 2);

        let impulse = adapter
            .query_trades(&TradeFilter::default().with_category(Category::Impulse))
            .unwrap();
        assert!(impulse.iter().all(|t| t.category == Category::Impulse));
        assert_eq!(impulse.len(), 2);

        let limited = adapter
            .query_trades(&TradeFilter::default().with_limit(1))
            .unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].trade_date, d(4));
    }

    #[test]
    fn legacy_russian_spellings_are_read() {
        let adapter = adapter();
        insert_raw(&adapter, "2024-01-05", "шорт", "импульс", "-7");

        let trades = adapter
            .query_trades(&TradeFilter::default().with_category(Category::Impulse))
            .unwrap();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].direction, Direction::Short);
        assert_eq!(trades[0].category, Category::Impulse);
    }

    #[test]
    fn corrupt_row_is_a_consistency_error() {
        let adapter = adapter();
        insert_raw(&adapter, "2024-01-05", "sideways", "strategy", "1");
        let err = adapter.query_trades(&TradeFilter::default()).unwrap_err();
        assert!(matches!(err, JournalError::Consistency { .. }));
    }

    #[test]
    fn refresh_with_corrupt_row_writes_nothing() {
        let adapter = adapter();
        insert_raw(&adapter, "2024-01-05", "long", "strategy", "not-a-number");
        let err = adapter.refresh_daily_stat(d(5)).unwrap_err();
        assert!(matches!(err, JournalError::Consistency { .. }));
        assert_eq!(adapter.get_daily_stat(d(5)).unwrap(), None);
    }

    #[test]
    fn refresh_computes_and_caches() {
        let adapter = adapter();
        adapter
            .insert_trade(&new_trade(d(1), Category::Strategy, dec!(50)))
            .unwrap();

        assert_eq!(adapter.get_daily_stat(d(1)).unwrap(), None);
        let stat = adapter.refresh_daily_stat(d(1)).unwrap();
        assert_eq!(stat.totals.total_trades, 1);
        assert_eq!(stat.totals.strategy_trades, 1);
        assert_eq!(stat.totals.impulse_trades, 0);
        assert_eq!(stat.totals.total_pnl, dec!(50));
        assert_eq!(stat.totals.strategy_pnl, dec!(50));
        assert_eq!(stat.totals.impulse_pnl, dec!(0));
        assert_eq!(adapter.get_daily_stat(d(1)).unwrap(), Some(stat));
    }

    #[test]
    fn refresh_twice_is_identical() {
        let adapter = adapter();
        adapter
            .insert_trade(&new_trade(d(1), Category::Impulse, dec!(3.10)))
            .unwrap();
        let first = adapter.refresh_daily_stat(d(1)).unwrap();
        let second = adapter.refresh_daily_stat(d(1)).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.updated_at, second.updated_at);
    }

    #[test]
    fn refresh_upserts_single_row_per_date() {
        let adapter = adapter();
        adapter
            .insert_trade(&new_trade(d(1), Category::Strategy, dec!(10)))
            .unwrap();
        adapter.refresh_daily_stat(d(1)).unwrap();
        adapter
            .insert_trade(&new_trade(d(1), Category::Impulse, dec!(-4)))
            .unwrap();
        let stat = adapter.refresh_daily_stat(d(1)).unwrap();
        assert_eq!(stat.totals.total_trades, 2);
        assert_eq!(stat.totals.total_pnl, dec!(6));

        let rows: i64 = adapter
            .pool
            .get()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM daily_stats", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn refresh_of_empty_date_stores_zero_row() {
        let adapter = adapter();
        let stat = adapter.refresh_daily_stat(d(9)).unwrap();
        assert_eq!(stat.totals, DailyTotals::default());
        assert!(adapter.get_daily_stat(d(9)).unwrap().is_some());
    }
}
