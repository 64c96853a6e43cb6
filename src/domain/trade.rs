//! Trade records: raw submissions, validation, and the persisted form.

use super::category::{Category, CategoryTags};
use super::error::{JournalError, ValidationError};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Decimal places kept when the PnL percentage is derived from prices.
const PNL_PCT_SCALE: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub fn normalize(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "long" | "лонг" => Some(Direction::Long),
            "short" | "шорт" => Some(Direction::Short),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Long => "long",
            Direction::Short => "short",
        }
    }
}

impl FromStr for Direction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Direction::normalize(s).ok_or_else(|| ValidationError::Direction(s.trim().to_string()))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field values as collected from the user, before validation.
///
/// Required fields are plain strings (blank means missing); optional ones are
/// `None` or blank. `category: None` asks for classification from tags/comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TradeFields {
    pub trade_date: String,
    pub trade_time: String,
    pub pair: String,
    pub trade_type: String,
    pub entry_price: String,
    pub exit_price: String,
    pub position_size: Option<String>,
    pub pnl_usd: String,
    pub pnl_pct: Option<String>,
    pub category: Option<String>,
    pub tags: Option<String>,
    pub comment: Option<String>,
}

impl TradeFields {
    pub fn validate(&self, tags: &CategoryTags) -> Result<NewTrade, ValidationError> {
        let trade_date = parse_date(required(&self.trade_date, "trade_date")?)?;
        let trade_time = parse_time(required(&self.trade_time, "trade_time")?)?;
        let pair = required(&self.pair, "pair")?.to_uppercase();
        let direction: Direction = required(&self.trade_type, "trade_type")?.parse()?;
        let entry_price = parse_decimal(required(&self.entry_price, "entry_price")?, "entry_price")?;
        let exit_price = parse_decimal(required(&self.exit_price, "exit_price")?, "exit_price")?;
        let position_size = optional(&self.position_size)
            .map(|s| parse_decimal(s, "position_size"))
            .transpose()?;
        let pnl_usd = parse_decimal(required(&self.pnl_usd, "pnl_usd")?, "pnl_usd")?;

        let pnl_pct = match optional(&self.pnl_pct) {
            Some(s) => parse_decimal(s, "pnl_pct")?,
            None => derive_pnl_pct(direction, entry_price, exit_price)?,
        };

        let tags_text = optional(&self.tags).map(str::to_string);
        let comment = optional(&self.comment).map(str::to_string);

        let category = match optional(&self.category) {
            Some(raw) => raw.parse()?,
            None => {
                let text = [tags_text.as_deref(), comment.as_deref()]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(" ");
                tags.classify(&text)
            }
        };

        Ok(NewTrade {
            trade_date,
            trade_time,
            pair,
            direction,
            entry_price,
            exit_price,
            position_size,
            pnl_usd,
            pnl_pct,
            category,
            tags: tags_text,
            comment,
        })
    }
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::Missing { field })
    } else {
        Ok(trimmed)
    }
}

fn optional(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

pub fn parse_date(s: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| ValidationError::Invalid {
        field: "trade_date",
        reason: format!("'{}' is not a date (expected YYYY-MM-DD)", s.trim()),
    })
}

/// Accepts `HH:MM:SS` or `HH:MM`.
pub fn parse_time(s: &str) -> Result<NaiveTime, ValidationError> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|_| ValidationError::Invalid {
            field: "trade_time",
            reason: format!("'{s}' is not a time (expected HH:MM:SS)"),
        })
}

/// Parses an exact decimal; a leading `+` is allowed.
pub fn parse_decimal(s: &str, field: &'static str) -> Result<Decimal, ValidationError> {
    let s = s.trim();
    let unsigned = s.strip_prefix('+').unwrap_or(s);
    Decimal::from_str(unsigned).map_err(|_| ValidationError::Invalid {
        field,
        reason: format!("'{s}' is not a number"),
    })
}

/// Percentage move from entry to exit, sign-adjusted for shorts.
pub fn derive_pnl_pct(
    direction: Direction,
    entry_price: Decimal,
    exit_price: Decimal,
) -> Result<Decimal, ValidationError> {
    if entry_price.is_zero() {
        return Err(ValidationError::Invalid {
            field: "entry_price",
            reason: "must be non-zero to derive pnl_pct".into(),
        });
    }
    let pct = exit_price
        .checked_sub(entry_price)
        .and_then(|delta| delta.checked_div(entry_price))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or_else(|| ValidationError::Invalid {
            field: "pnl_pct",
            reason: format!("cannot derive from entry {entry_price} and exit {exit_price}"),
        })?;
    let pct = match direction {
        Direction::Long => pct,
        Direction::Short => -pct,
    };
    Ok(pct.round_dp(PNL_PCT_SCALE))
}

/// A validated trade, ready to be appended to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTrade {
    pub trade_date: NaiveDate,
    pub trade_time: NaiveTime,
    pub pair: String,
    pub direction: Direction,
    pub entry_price: Decimal,
    pub exit_price: Decimal,
    pub position_size: Option<Decimal>,
    pub pnl_usd: Decimal,
    pub pnl_pct: Decimal,
    pub category: Category,
    pub tags: Option<String>,
    pub comment: Option<String>,
}

/// A persisted trade. Never mutated after insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trade {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub trade_date: NaiveDate,
    pub trade_time: NaiveTime,
    pub pair: String,
    pub direction: Direction,
    pub entry_price: Decimal,
    pub exit_price: Decimal,
    pub position_size: Option<Decimal>,
    pub pnl_usd: Decimal,
    pub pnl_pct: Decimal,
    pub category: Category,
    pub tags: Option<String>,
    pub comment: Option<String>,
}

impl Trade {
    pub fn new(id: i64, created_at: DateTime<Utc>, trade: NewTrade) -> Self {
        Self {
            id,
            created_at,
            trade_date: trade.trade_date,
            trade_time: trade.trade_time,
            pair: trade.pair,
            direction: trade.direction,
            entry_price: trade.entry_price,
            exit_price: trade.exit_price,
            position_size: trade.position_size,
            pnl_usd: trade.pnl_usd,
            pnl_pct: trade.pnl_pct,
            category: trade.category,
            tags: trade.tags,
            comment: trade.comment,
        }
    }

    /// The submitted part of the record, without identity fields.
    pub fn to_new_trade(&self) -> NewTrade {
        NewTrade {
            trade_date: self.trade_date,
            trade_time: self.trade_time,
            pair: self.pair.clone(),
            direction: self.direction,
            entry_price: self.entry_price,
            exit_price: self.exit_price,
            position_size: self.position_size,
            pnl_usd: self.pnl_usd,
            pnl_pct: self.pnl_pct,
            category: self.category,
            tags: self.tags.clone(),
            comment: self.comment.clone(),
        }
    }

    pub fn is_win(&self) -> bool {
        self.pnl_usd > Decimal::ZERO
    }

    pub fn is_loss(&self) -> bool {
        self.pnl_usd < Decimal::ZERO
    }
}

/// Adds a trade's PnL to a running sum. A sum outside the `Decimal` range is a
/// consistency error, not a panic.
pub fn add_pnl(sum: Decimal, trade: &Trade) -> Result<Decimal, JournalError> {
    sum.checked_add(trade.pnl_usd).ok_or_else(|| {
        JournalError::consistency(format!("pnl total overflows at trade {}", trade.id))
    })
}

/// Inclusive date window; an open end is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn day(date: NaiveDate) -> Self {
        Self::between(date, date)
    }

    /// Everything on or after `today - days`. A window reaching back before
    /// year 1 has no start bound.
    pub fn last_days(today: NaiveDate, days: u32) -> Self {
        let start = today
            .checked_sub_signed(Duration::days(i64::from(days)))
            .filter(|start| start.year() >= 1);
        Self { start, end: None }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|s| date >= s) && self.end.is_none_or(|e| date <= e)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TradeFilter {
    pub range: DateRange,
    pub category: Option<Category>,
    pub limit: Option<usize>,
}

impl TradeFilter {
    pub fn range(range: DateRange) -> Self {
        Self {
            range,
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
