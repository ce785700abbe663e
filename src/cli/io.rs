//! JSON output for the CLI
//!
//! One JSON object per invocation on stdout:
//! - `{"status":"ok","data":...}`
//! - `{"status":"error","code":...,"message":...}`

use std::io::{self, Write};

use serde_json::{json, Value};

use super::errors::CliResult;

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_value(&mut io::stdout(), &ok_envelope(data))
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    write_value(&mut io::stdout(), &error_envelope(code, message))
}

fn ok_envelope(data: Value) -> Value {
    json!({
        "status": "ok",
        "data": data
    })
}

fn error_envelope(code: &str, message: &str) -> Value {
    json!({
        "status": "error",
        "code": code,
        "message": message
    })
}

fn write_value<W: Write>(writer: &mut W, value: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut *writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_envelope_is_one_line() {
        let mut buffer = Vec::new();
        write_value(&mut buffer, &ok_envelope(json!({"key": "alice"}))).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text.matches('\n').count(), 1);
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["status"], "ok");
        assert_eq!(parsed["data"]["key"], "alice");
    }

    #[test]
    fn test_error_envelope() {
        let value = error_envelope("DOCSTORE_NOT_FOUND", "Document not found: bob");
        assert_eq!(value["status"], "error");
        assert_eq!(value["code"], "DOCSTORE_NOT_FOUND");
    }
}
