//! JSON I/O handling for the CLI
//!
//! - Input: an NDJSON log (file or stdin), or one JSON value on stdin
//! - Output: exactly one JSON envelope per command, success or error
//! - UTF-8 only

use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Read the whole transaction log from `path`, or from `stdin` when `None`
pub fn read_log<R: Read>(path: Option<&Path>, stdin: &mut R) -> CliResult<Vec<u8>> {
    match path {
        Some(path) => fs::read(path).map_err(|e| {
            CliError::io_error(format!("Failed to read {}: {}", path.display(), e))
        }),
        None => {
            let mut buffer = Vec::new();
            stdin.read_to_end(&mut buffer)?;
            Ok(buffer)
        }
    }
}

/// Read one JSON value from `stdin`
pub fn read_request<R: Read>(stdin: &mut R) -> CliResult<Value> {
    let mut input = String::new();
    stdin.read_to_string(&mut input)?;

    if input.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }

    Ok(serde_json::from_str(&input)?)
}

/// Write a success envelope
pub fn write_response<W: Write, T: Serialize>(writer: &mut W, data: &T) -> CliResult<()> {
    let envelope = serde_json::json!({
        "status": "ok",
        "data": serde_json::to_value(data)?
    });
    write_envelope(writer, &envelope)
}

/// Write an error envelope
pub fn write_error<W: Write>(writer: &mut W, code: &str, message: &str) -> CliResult<()> {
    let envelope = serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    });
    write_envelope(writer, &envelope)
}

fn write_envelope<W: Write>(writer: &mut W, envelope: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut *writer, envelope)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
