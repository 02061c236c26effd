//! Memory access trace format.
//!
//! One access per line:
//!
//! ```text
//! # comment
//! R 0x1000
//! W 0x1008 0xdeadbeef
//! w 4096 17
//! ```
//!
//! Addresses and values are hexadecimal with a `0x` prefix or decimal.
//! Blank lines and lines starting with `#` are skipped.

use thiserror::Error;

/// One access from a trace file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceOp {
    /// Read the word at the address.
    Read(u64),
    /// Write the value to the word at the address.
    Write(u64, u64),
}

/// A malformed trace line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TraceError {
    /// The line does not start with `R` or `W`.
    #[error("line {line}: unknown access kind `{kind}` (expected R or W)")]
    UnknownKind {
        /// 1-based line number.
        line: usize,
        /// The offending token.
        kind: String,
    },
    /// A required field is missing.
    #[error("line {line}: missing {field}")]
    Missing {
        /// 1-based line number.
        line: usize,
        /// Name of the missing field.
        field: &'static str,
    },
    /// A number could not be parsed.
    #[error("line {line}: invalid number `{text}`")]
    BadNumber {
        /// 1-based line number.
        line: usize,
        /// The offending token.
        text: String,
    },
    /// Extra tokens after the access.
    #[error("line {line}: unexpected trailing `{text}`")]
    Trailing {
        /// 1-based line number.
        line: usize,
        /// The first extra token.
        text: String,
    },
}

/// Parses a whole trace, stopping at the first malformed line.
pub fn parse(text: &str) -> Result<Vec<TraceOp>, TraceError> {
    let mut ops = Vec::new();
    for (index, line) in text.lines().enumerate() {
        if let Some(op) = parse_line(index + 1, line)? {
            ops.push(op);
        }
    }
    Ok(ops)
}

/// Parses one line; `Ok(None)` for blank lines and comments.
pub fn parse_line(line: usize, text: &str) -> Result<Option<TraceOp>, TraceError> {
    let text = text.trim();
    if text.is_empty() || text.starts_with('#') {
        return Ok(None);
    }

    let mut fields = text.split_whitespace();
    let kind = fields.next().unwrap_or_default();
    let mut number = |field: &'static str| -> Result<u64, TraceError> {
        let token = fields.next().ok_or(TraceError::Missing { line, field })?;
        parse_number(token).ok_or_else(|| TraceError::BadNumber {
            line,
            text: token.to_string(),
        })
    };

    let op = match kind {
        "R" | "r" => TraceOp::Read(number("address")?),
        "W" | "w" => {
            let addr = number("address")?;
            TraceOp::Write(addr, number("value")?)
        }
        other => {
            return Err(TraceError::UnknownKind {
                line,
                kind: other.to_string(),
            });
        }
    };

    if let Some(extra) = fields.next() {
        return Err(TraceError::Trailing {
            line,
            text: extra.to_string(),
        });
    }
    Ok(Some(op))
}

/// Parses `0x`-prefixed hexadecimal or plain decimal.
pub fn parse_number(token: &str) -> Option<u64> {
    match token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => token.parse().ok(),
    }
}
