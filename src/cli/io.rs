//! JSON I/O handling for CLI
//!
//! - Input: one JSON table per file, or stdin for "-"
//! - Output: a single JSON object on stdout
//! - UTF-8 only

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use serde_json::{json, Value};

use super::errors::{CliError, CliResult};
use crate::table::Table;

/// Read a JSON table from `path`, or from stdin when `path` is "-"
pub fn read_table(path: &Path) -> CliResult<Table> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().lock().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(path)
            .map_err(|e| CliError::io_error(format!("Failed to read {}: {}", path.display(), e)))?
    };

    if content.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }

    let table: Table = serde_json::from_str(&content)?;
    Ok(table)
}

/// Response envelope for a command result
///
/// `{"status": "ok", "data": ...}` on success,
/// `{"status": "error", "code": ..., "message": ...}` on failure.
pub fn envelope(result: &CliResult<Value>) -> Value {
    match result {
        Ok(data) => json!({"status": "ok", "data": data}),
        Err(e) => json!({"status": "error", "code": e.code_str(), "message": e.message()}),
    }
}

/// Write the response envelope as one line on stdout
pub fn write_result(result: &CliResult<Value>) -> CliResult<()> {
    write_line(io::stdout().lock(), &envelope(result))
}

fn write_line<W: Write>(mut out: W, value: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut out, value)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
