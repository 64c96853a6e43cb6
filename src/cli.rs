//! CLI definition and dispatch.

use chrono::{Local, NaiveDate, NaiveDateTime};
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::error;

use crate::adapters::csv_adapter::CsvTradeFile;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report_adapter::{
    TextReportAdapter, render_daily_stat, render_summary, render_trades,
};
use crate::domain::category::{Category, CategoryTags};
use crate::domain::config_validation::{DEFAULT_REPORT_DAYS, backend, validate_journal_config};
use crate::domain::error::JournalError;
use crate::domain::ledger;
use crate::domain::patterns::DEFAULT_LATE_NIGHT_HOUR;
use crate::domain::trade::{DATE_FORMAT, DateRange, TIME_FORMAT, TradeFields, TradeFilter};
use crate::logging::LoggingConfig;
use crate::ports::config_port::ConfigPort;
use crate::ports::journal_port::JournalPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "tradelog", about = "Trade journal with daily rollups and reviews")]
pub struct Cli {
    /// Path to the INI config file
    #[arg(short, long, global = true, default_value = "tradelog.ini")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the journal tables
    Init,
    /// Record a closed trade
    #[command(allow_negative_numbers = true)]
    Record(RecordArgs),
    /// List trades, newest first
    List {
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Only the last N days (overrides --from/--to)
        #[arg(long)]
        days: Option<u32>,
        #[arg(long)]
        category: Option<Category>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Recompute the cached daily stats for a date
    Refresh {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Show the cached daily stats for a date
    Stats {
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Recompute before showing
        #[arg(long)]
        refresh: bool,
    },
    /// Per-date, per-category summary
    Summary {
        #[arg(long)]
        days: Option<u32>,
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Performance review with patterns and recommendations
    Report {
        #[arg(long)]
        days: Option<u32>,
    },
    /// Write trades to a CSV file
    Export {
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Record every row of a CSV file
    Import {
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct RecordArgs {
    pub pair: String,
    /// long/short (лонг/шорт)
    pub trade_type: String,
    pub entry: String,
    pub exit: String,
    /// Profit in USD; `+` and `$` are accepted
    #[arg(allow_hyphen_values = true)]
    pub pnl: String,
    /// Free-form tags, used for classification when --category is absent
    pub tags: Vec<String>,
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long)]
    pub time: Option<String>,
    #[arg(long)]
    pub size: Option<String>,
    #[arg(long)]
    pub pnl_pct: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub comment: Option<String>,
}

pub fn run(cli: Cli) -> ExitCode {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match execute(&cli, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Runs one command against the journal named by `cli.config`, writing its
/// result to `out`.
pub fn execute(cli: &Cli, out: &mut dyn Write) -> Result<(), JournalError> {
    let config = load_config(&cli.config)?;
    validate_journal_config(&config)?;
    LoggingConfig::from_config(&config).init();

    let store = open_store(&config)?;
    let store = store.as_ref();
    let tags = CategoryTags::from_config(&config);
    let today = Local::now().date_naive();

    match &cli.command {
        Command::Init => {
            writeln!(out, "journal ready ({} backend)", backend(&config))?;
        }
        Command::Record(args) => {
            let fields = build_trade_fields(args, Local::now().naive_local());
            let trade = ledger::record_trade(store, &fields, &tags)?;
            writeln!(
                out,
                "recorded trade #{} {} {} {} ({})",
                trade.id, trade.pair, trade.direction, trade.pnl_usd, trade.category
            )?;
        }
        Command::List {
            from,
            to,
            days,
            category,
            limit,
        } => {
            let filter = TradeFilter {
                range: resolve_range(*from, *to, *days, today),
                category: *category,
                limit: *limit,
            };
            let trades = store.query_trades(&filter)?;
            write!(out, "{}", render_trades(&trades))?;
        }
        Command::Refresh { date } => {
            let stat = store.refresh_daily_stat(date.unwrap_or(today))?;
            write!(out, "{}", render_daily_stat(&stat))?;
        }
        Command::Stats { date, refresh } => {
            let date = date.unwrap_or(today);
            match ledger::daily_stat(store, date, *refresh)? {
                Some(stat) => write!(out, "{}", render_daily_stat(&stat))?,
                None => writeln!(
                    out,
                    "no stats cached for {}; run with --refresh",
                    date.format(DATE_FORMAT)
                )?,
            }
        }
        Command::Summary { days, from, to } => {
            let days = if from.is_none() && to.is_none() {
                Some(days.unwrap_or_else(|| report_days(&config)))
            } else {
                *days
            };
            let rows = ledger::summarize_range(store, resolve_range(*from, *to, days, today))?;
            write!(out, "{}", render_summary(&rows))?;
        }
        Command::Report { days } => {
            let days = days.unwrap_or_else(|| report_days(&config));
            let late_night_hour =
                config.get_int("report", "late_night_hour", DEFAULT_LATE_NIGHT_HOUR as i64) as u32;
            let report =
                ledger::weekly_report(store, DateRange::last_days(today, days), late_night_hour)?;
            TextReportAdapter::new(format!("Trading report, last {days} days")).write(&report, out)?;
        }
        Command::Export { output, from, to } => {
            let trades = store.query_trades(&TradeFilter::range(DateRange {
                start: *from,
                end: *to,
            }))?;
            let file = CsvTradeFile::new(output);
            file.export(&trades)?;
            writeln!(
                out,
                "exported {} trades to {}",
                trades.len(),
                file.path().display()
            )?;
        }
        Command::Import { input } => {
            let rows = CsvTradeFile::new(input).read()?;
            let trades = ledger::import_trades(store, &rows, &tags)?;
            writeln!(out, "imported {} trades", trades.len())?;
        }
    }

    Ok(())
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, JournalError> {
    FileConfigAdapter::from_file(path).map_err(|e| JournalError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Opens the configured backend and makes sure its tables exist.
pub fn open_store(config: &dyn ConfigPort) -> Result<Box<dyn JournalPort>, JournalError> {
    let store: Box<dyn JournalPort> = match backend(config).as_str() {
        #[cfg(feature = "sqlite")]
        "sqlite" => Box::new(crate::adapters::sqlite_adapter::SqliteAdapter::from_config(
            config,
        )?),
        #[cfg(feature = "postgres")]
        "postgres" => Box::new(
            crate::adapters::postgres_adapter::PostgresAdapter::from_config(config)?,
        ),
        other => {
            return Err(JournalError::ConfigInvalid {
                section: "journal".into(),
                key: "backend".into(),
                reason: format!("backend '{other}' is not enabled in this build"),
            });
        }
    };
    store.initialize_schema()?;
    Ok(store)
}

fn report_days(config: &dyn ConfigPort) -> u32 {
    config.get_int("report", "days", DEFAULT_REPORT_DAYS) as u32
}

/// `days` wins over an explicit `from`/`to` window.
pub fn resolve_range(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    days: Option<u32>,
    today: NaiveDate,
) -> DateRange {
    match days {
        Some(days) => DateRange::last_days(today, days),
        None => DateRange {
            start: from,
            end: to,
        },
    }
}

/// Raw submission for `record`; date and time default to `now`.
pub fn build_trade_fields(args: &RecordArgs, now: NaiveDateTime) -> TradeFields {
    let tags = args.tags.join(" ");
    TradeFields {
        trade_date: args
            .date
            .clone()
            .unwrap_or_else(|| now.date().format(DATE_FORMAT).to_string()),
        trade_time: args
            .time
            .clone()
            .unwrap_or_else(|| now.time().format(TIME_FORMAT).to_string()),
        pair: args.pair.clone(),
        trade_type: args.trade_type.clone(),
        entry_price: args.entry.clone(),
        exit_price: args.exit.clone(),
        position_size: args.size.clone(),
        pnl_usd: args.pnl.replace('$', ""),
        pnl_pct: args.pnl_pct.clone(),
        category: args.category.clone(),
        tags: (!tags.trim().is_empty()).then_some(tags),
        comment: args.comment.clone(),
    }
}
