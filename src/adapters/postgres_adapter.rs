//! PostgreSQL journal adapter.

use crate::domain::category::Category;
use crate::domain::config_validation::pool_size;
use crate::domain::daily_stat::{DailyStat, DailyTotals, RefreshOutcome};
use crate::domain::error::JournalError;
use crate::domain::trade::{DateRange, Direction, NewTrade, Trade, TradeFilter};
use crate::ports::config_port::ConfigPort;
use crate::ports::daily_stat_port::DailyStatPort;
use crate::ports::journal_port::JournalPort;
use crate::ports::trade_port::TradePort;
use chrono::{DateTime, NaiveDate, NaiveTime, SubsecRound, Utc};
use postgres::types::ToSql;
use postgres::{GenericClient, IsolationLevel, NoTls, Row};
use r2d2::{Pool, PooledConnection};
use r2d2_postgres::PostgresConnectionManager;
use rust_decimal::Decimal;
use tracing::{debug, info};

type Manager = PostgresConnectionManager<NoTls>;
type Param = Box<dyn ToSql + Sync>;

const TRADE_COLUMNS: &str = "id, created_at, trade_date, trade_time, pair, trade_type, \
                             entry_price, exit_price, position_size, pnl_usd, pnl_pct, \
                             category, tags, comment";

pub struct PostgresAdapter {
    pool: Pool<Manager>,
}

fn pool_err(e: r2d2::Error) -> JournalError {
    JournalError::Database {
        reason: e.to_string(),
    }
}

fn query_err(e: postgres::Error) -> JournalError {
    JournalError::DatabaseQuery {
        reason: e.to_string(),
    }
}

impl PostgresAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, JournalError> {
        // [postgres] connection_string first, then [database] conninfo
        let connection_string = config
            .get_string("postgres", "connection_string")
            .or_else(|| config.get_string("database", "conninfo"))
            .ok_or_else(|| JournalError::ConfigMissing {
                section: "database".into(),
                key: "conninfo".into(),
            })?;

        let pg_config: postgres::Config =
            connection_string
                .parse()
                .map_err(|e: postgres::Error| JournalError::ConfigInvalid {
                    section: "database".into(),
                    key: "conninfo".into(),
                    reason: e.to_string(),
                })?;

        let pool_size = pool_size(config, "postgres")?;
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(PostgresConnectionManager::new(pg_config, NoTls))
            .map_err(pool_err)?;

        info!(pool_size, "connected to postgres journal");
        Ok(Self { pool })
    }

    fn conn(&self) -> Result<PooledConnection<Manager>, JournalError> {
        self.pool.get().map_err(pool_err)
    }
}

impl JournalPort for PostgresAdapter {
    fn initialize_schema(&self) -> Result<(), JournalError> {
        let mut conn = self.conn()?;
        conn.batch_execute(
            "CREATE TABLE IF NOT EXISTS trades (
                id BIGSERIAL PRIMARY KEY,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                trade_date DATE NOT NULL,
                trade_time TIME NOT NULL,
                pair TEXT NOT NULL,
                trade_type TEXT NOT NULL,
                entry_price NUMERIC NOT NULL,
                exit_price NUMERIC NOT NULL,
                position_size NUMERIC,
                pnl_usd NUMERIC NOT NULL,
                pnl_pct NUMERIC NOT NULL,
                category TEXT NOT NULL,
                tags TEXT,
                comment TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_trades_date ON trades(trade_date DESC);
            CREATE INDEX IF NOT EXISTS idx_trades_category ON trades(category);
            CREATE INDEX IF NOT EXISTS idx_trades_created ON trades(created_at DESC);

            CREATE TABLE IF NOT EXISTS daily_stats (
                stat_date DATE PRIMARY KEY,
                total_trades BIGINT NOT NULL DEFAULT 0,
                strategy_trades BIGINT NOT NULL DEFAULT 0,
                impulse_trades BIGINT NOT NULL DEFAULT 0,
                total_pnl NUMERIC NOT NULL DEFAULT 0,
                strategy_pnl NUMERIC NOT NULL DEFAULT 0,
                impulse_pnl NUMERIC NOT NULL DEFAULT 0,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            );",
        )
        .map_err(query_err)
    }
}

impl TradePort for PostgresAdapter {
    fn insert_trade(&self, trade: &NewTrade) -> Result<Trade, JournalError> {
        let mut conn = self.conn()?;
        let created_at = Utc::now().trunc_subsecs(6);

        let row = conn
            .query_one(
                "INSERT INTO trades (created_at, trade_date, trade_time, pair, trade_type,
                                     entry_price, exit_price, position_size, pnl_usd, pnl_pct,
                                     category, tags, comment)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
                 RETURNING id",
                &[
                    &created_at,
                    &trade.trade_date,
                    &trade.trade_time,
                    &trade.pair,
                    &trade.direction.as_str(),
                    &trade.entry_price,
                    &trade.exit_price,
                    &trade.position_size,
                    &trade.pnl_usd,
                    &trade.pnl_pct,
                    &trade.category.as_str(),
                    &trade.tags,
                    &trade.comment,
                ],
            )
            .map_err(query_err)?;

        let id: i64 = row.get(0);
        debug!(id, "inserted trade row");
        Ok(Trade::new(id, created_at, trade.clone()))
    }

    fn query_trades(&self, filter: &TradeFilter) -> Result<Vec<Trade>, JournalError> {
        let mut conn = self.conn()?;
        select_trades(&mut *conn, filter)
    }
}

impl DailyStatPort for PostgresAdapter {
    fn refresh_daily_stat(&self, date: NaiveDate) -> Result<DailyStat, JournalError> {
        let mut conn = self.conn()?;
        let mut tx = conn
            .build_transaction()
            .isolation_level(IsolationLevel::RepeatableRead)
            .start()
            .map_err(query_err)?;

        let trades = select_trades(&mut tx, &TradeFilter::range(DateRange::day(date)))?;
        let totals = DailyTotals::compute(date, &trades)?;
        let existing = select_daily_stat(&mut tx, date)?;

        match DailyStat::refreshed(date, existing, totals, Utc::now().trunc_subsecs(6)) {
            RefreshOutcome::Unchanged(stat) => Ok(stat),
            RefreshOutcome::Changed(stat) => {
                let t = &stat.totals;
                tx.execute(
                    "INSERT INTO daily_stats (stat_date, total_trades, strategy_trades,
                                              impulse_trades, total_pnl, strategy_pnl,
                                              impulse_pnl, updated_at)
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                     ON CONFLICT (stat_date) DO UPDATE SET
                         total_trades = EXCLUDED.total_trades,
                         strategy_trades = EXCLUDED.strategy_trades,
                         impulse_trades = EXCLUDED.impulse_trades,
                         total_pnl = EXCLUDED.total_pnl,
                         strategy_pnl = EXCLUDED.strategy_pnl,
                         impulse_pnl = EXCLUDED.impulse_pnl,
                         updated_at = EXCLUDED.updated_at",
                    &[
                        &stat.stat_date,
                        &t.total_trades,
                        &t.strategy_trades,
                        &t.impulse_trades,
                        &t.total_pnl,
                        &t.strategy_pnl,
                        &t.impulse_pnl,
                        &stat.updated_at,
                    ],
                )
                .map_err(query_err)?;
                tx.commit().map_err(query_err)?;
                debug!(%date, trades = t.total_trades, "daily stat refreshed");
                Ok(stat)
            }
        }
    }

    fn get_daily_stat(&self, date: NaiveDate) -> Result<Option<DailyStat>, JournalError> {
        let mut conn = self.conn()?;
        select_daily_stat(&mut *conn, date)
    }
}

/// `WHERE`/`ORDER BY`/`LIMIT` tail for `filter`, with its positional parameters.
fn filter_clause(filter: &TradeFilter) -> (String, Vec<Param>) {
    let mut clauses: Vec<String> = Vec::new();
    let mut params: Vec<Param> = Vec::new();

    if let Some(start) = filter.range.start {
        params.push(Box::new(start));
        clauses.push(format!("trade_date >= ${}", params.len()));
    }
    if let Some(end) = filter.range.end {
        params.push(Box::new(end));
        clauses.push(format!("trade_date <= ${}", params.len()));
    }
    if let Some(category) = filter.category {
        let mut placeholders = Vec::new();
        for spelling in category.spellings() {
            params.push(Box::new(spelling));
            placeholders.push(format!("${}", params.len()));
        }
        clauses.push(format!("category IN ({})", placeholders.join(", ")));
    }

    let mut sql = String::new();
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY trade_date DESC, id DESC");
    if let Some(limit) = filter.limit {
        sql.push_str(&format!(" LIMIT {limit}"));
    }
    (sql, params)
}

fn select_trades<C: GenericClient>(
    client: &mut C,
    filter: &TradeFilter,
) -> Result<Vec<Trade>, JournalError> {
    let (tail, params) = filter_clause(filter);
    let sql = format!("SELECT {TRADE_COLUMNS} FROM trades{tail}");
    let refs: Vec<&(dyn ToSql + Sync)> = params.iter().map(|p| p.as_ref()).collect();

    let rows = client.query(sql.as_str(), &refs).map_err(query_err)?;
    rows.iter().map(row_to_trade).collect()
}

fn select_daily_stat<C: GenericClient>(
    client: &mut C,
    date: NaiveDate,
) -> Result<Option<DailyStat>, JournalError> {
    let row = client
        .query_opt(
            "SELECT stat_date, total_trades, strategy_trades, impulse_trades,
                    total_pnl, strategy_pnl, impulse_pnl, updated_at
             FROM daily_stats WHERE stat_date = $1",
            &[&date],
        )
        .map_err(query_err)?;

    let Some(row) = row else {
        return Ok(None);
    };

    Ok(Some(DailyStat {
        stat_date: row.try_get(0).map_err(query_err)?,
        totals: DailyTotals {
            total_trades: row.try_get(1).map_err(query_err)?,
            strategy_trades: row.try_get(2).map_err(query_err)?,
            impulse_trades: row.try_get(3).map_err(query_err)?,
            total_pnl: row.try_get(4).map_err(query_err)?,
            strategy_pnl: row.try_get(5).map_err(query_err)?,
            impulse_pnl: row.try_get(6).map_err(query_err)?,
        },
        updated_at: row.try_get(7).map_err(query_err)?,
    }))
}

fn row_to_trade(row: &Row) -> Result<Trade, JournalError> {
    let id: i64 = row.try_get(0).map_err(query_err)?;
    let what = format!("trade {id}");

    fn need<T>(value: Option<T>, what: &str, column: &str) -> Result<T, JournalError> {
        value.ok_or_else(|| JournalError::consistency(format!("{what}: {column} is null")))
    }
    fn get<'a, T: postgres::types::FromSql<'a>>(
        row: &'a Row,
        idx: usize,
    ) -> Result<Option<T>, JournalError> {
        row.try_get::<_, Option<T>>(idx).map_err(query_err)
    }

    let trade_type: String = need(get(row, 5)?, &what, "trade_type")?;
    let direction = Direction::normalize(&trade_type).ok_or_else(|| {
        JournalError::consistency(format!("{what}: unknown trade_type '{trade_type}'"))
    })?;
    let category_raw: String = need(get(row, 11)?, &what, "category")?;
    let category = Category::normalize(&category_raw).ok_or_else(|| {
        JournalError::consistency(format!("{what}: unknown category '{category_raw}'"))
    })?;

    Ok(Trade {
        id,
        created_at: need::<DateTime<Utc>>(get(row, 1)?, &what, "created_at")?,
        trade_date: need::<NaiveDate>(get(row, 2)?, &what, "trade_date")?,
        trade_time: need::<NaiveTime>(get(row, 3)?, &what, "trade_time")?,
        pair: need(get(row, 4)?, &what, "pair")?,
        direction,
        entry_price: need::<Decimal>(get(row, 6)?, &what, "entry_price")?,
        exit_price: need::<Decimal>(get(row, 7)?, &what, "exit_price")?,
        position_size: get(row, 8)?,
        pnl_usd: need::<Decimal>(get(row, 9)?, &what, "pnl_usd")?,
        pnl_pct: need::<Decimal>(get(row, 10)?, &what, "pnl_pct")?,
        category,
        tags: get(row, 12)?,
        comment: get(row, 13)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EmptyConfig;

    impl ConfigPort for EmptyConfig {
        fn get_string(&self, _section: &str, _key: &str) -> Option<String> {
            None
        }
        fn get_int(&self, _section: &str, _key: &str, default: i64) -> i64 {
            default
        }
    }

    struct ConnConfig(&'static str);

    impl ConfigPort for ConnConfig {
        fn get_string(&self, section: &str, key: &str) -> Option<String> {
            (section == "database" && key == "conninfo").then(|| self.0.to_string())
        }
        fn get_int(&self, _section: &str, _key: &str, default: i64) -> i64 {
            default
        }
    }

    #[test]
    fn from_config_missing_connection_string() {
        let config = EmptyConfig;
        let result = PostgresAdapter::from_config(&config);
        match result {
            Err(JournalError::ConfigMissing { section, key }) => {
                assert_eq!(section, "database");
                assert_eq!(key, "conninfo");
            }
            Err(other) => panic!("expected ConfigMissing, got: {other}"),
            Ok(_) => panic!("expected error, got Ok"),
        }
    }

    #[test]
    fn from_config_rejects_malformed_connection_string() {
        let config = ConnConfig("host=localhost port=notaport");
        assert!(matches!(
            PostgresAdapter::from_config(&config),
            Err(JournalError::ConfigInvalid { .. })
        ));
    }

    #[test]
    fn filter_clause_unfiltered() {
        let (sql, params) = filter_clause(&TradeFilter::default());
        assert_eq!(sql, " ORDER BY trade_date DESC, id DESC");
        assert!(params.is_empty());
    }

    #[test]
    fn filter_clause_numbers_parameters_in_order() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        let filter = TradeFilter::range(DateRange::between(d(1), d(7)))
            .with_category(Category::Impulse)
            .with_limit(10);
        let (sql, params) = filter_clause(&filter);
        assert_eq!(
            sql,
            " WHERE trade_date >= $1 AND trade_date <= $2 AND category IN ($3, $4) \
             ORDER BY trade_date DESC, id DESC LIMIT 10"
        );
        assert_eq!(params.len(), 4);
    }
}
