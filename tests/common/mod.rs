#![allow(dead_code)]

use std::io::Write;
use std::path::Path;
use tradelog::domain::trade::TradeFields;

/// Raw submission with both prices and pnl_pct set, so nothing is derived.
pub fn trade_fields(date: &str, category: &str, pnl: &str) -> TradeFields {
    TradeFields {
        trade_date: date.into(),
        trade_time: "10:00:00".into(),
        pair: "BTCUSDT".into(),
        trade_type: "long".into(),
        entry_price: "100".into(),
        exit_price: "101".into(),
        pnl_usd: pnl.into(),
        pnl_pct: Some("1".into()),
        category: Some(category.into()),
        ..TradeFields::default()
    }
}

pub fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Config for a file-backed SQLite journal at `db_path`.
pub fn sqlite_ini(db_path: &Path) -> String {
    format!(
        "[journal]\nbackend = sqlite\n\n[sqlite]\npath = {}\npool_size = 2\n\n[logging]\nlevel = warn\n",
        db_path.display()
    )
}

#[cfg(feature = "sqlite")]
pub fn memory_store() -> tradelog::adapters::sqlite_adapter::SqliteAdapter {
    use tradelog::ports::journal_port::JournalPort;

    let store = tradelog::adapters::sqlite_adapter::SqliteAdapter::in_memory().unwrap();
    store.initialize_schema().unwrap();
    store
}
