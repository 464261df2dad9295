//! Row Source backed by a JSON file.

use std::path::{Path, PathBuf};

use eyre::{bail, WrapErr};
use serde_json::Value;
use tracing::warn;
use vesting_dash_core::Row;

pub const ROWS_FILE_ENV: &str = "VESTING_DASH_ROWS_FILE";

pub fn rows_file_from_env() -> Option<PathBuf> {
    std::env::var_os(ROWS_FILE_ENV).map(PathBuf::from)
}

pub fn load_rows(path: &Path) -> eyre::Result<Vec<Row>> {
    let raw = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read rows file {}", path.display()))?;
    parse_rows(&raw).wrap_err_with(|| format!("invalid rows file {}", path.display()))
}

/// Parses a JSON array of row objects. Non-object entries are skipped.
pub fn parse_rows(raw: &str) -> eyre::Result<Vec<Row>> {
    let value: Value = serde_json::from_str(raw).wrap_err("rows file is not JSON")?;
    let Value::Array(items) = value else {
        bail!("rows file must hold a JSON array");
    };
    let total = items.len();
    let rows: Vec<Row> = items.iter().filter_map(Row::from_json).collect();
    if rows.len() != total {
        warn!(skipped = total - rows.len(), "non-object rows skipped");
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use vesting_dash_core::{CellValue, StatusKind, TxStatus};

    use super::*;

    #[test]
    fn parses_objects_in_order_and_skips_others() {
        let rows = parse_rows(
            r#"[
                {"txHash":"abc","txIndex":"0","date":"2024/03/01 12:00:00","status":"Pending"},
                42,
                {"txHash":"def","txIndex":"1","status":"Executed"}
            ]"#,
        )
        .expect("rows");

        assert_eq!(rows.len(), 2);
        let keys: Vec<_> = rows[0].keys().collect();
        assert_eq!(keys, vec!["txHash", "txIndex", "date", "status"]);
        assert!(matches!(
            rows[1].get("status"),
            Some(CellValue::Status(StatusKind::Known(TxStatus::Executed)))
        ));
    }

    #[test]
    fn rejects_non_array_documents() {
        assert!(parse_rows(r#"{"rows":[]}"#).is_err());
        assert!(parse_rows("not json").is_err());
    }
}
