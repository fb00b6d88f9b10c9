//! Comma-separated report encoding.
//!
//! Rows have no header. A field is quoted only when it contains a comma, a
//! double quote, CR or LF; inner quotes are doubled. Every row ends with
//! `\r\n`.

use std::io::{self, Write};
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::core::MatchedRow;
use crate::errors::MatchError;

const DELIMITER: char = ',';
const QUOTE: char = '"';
const TERMINATOR: &str = "\r\n";

/// Number of columns in a report row.
pub const COLUMNS: usize = 5;

fn needs_quoting(field: &str) -> bool {
    field.contains([DELIMITER, QUOTE, '\r', '\n'])
}

fn write_field<W: Write>(out: &mut W, field: &str) -> io::Result<()> {
    if needs_quoting(field) {
        write!(out, "{QUOTE}{}{QUOTE}", field.replace(QUOTE, "\"\""))
    } else {
        out.write_all(field.as_bytes())
    }
}

/// Write `rows` to `out`.
pub fn write_rows<W: Write>(out: &mut W, rows: &[MatchedRow]) -> io::Result<()> {
    for row in rows {
        for (i, field) in row.fields().iter().enumerate() {
            if i > 0 {
                write!(out, "{DELIMITER}")?;
            }
            write_field(out, field)?;
        }
        out.write_all(TERMINATOR.as_bytes())?;
    }
    out.flush()
}

/// Serialize `rows` into report bytes.
///
/// On failure the error carries every row so nothing computed is lost.
pub fn to_csv(rows: &[MatchedRow]) -> Result<Vec<u8>, MatchError> {
    let mut buf = Vec::new();
    write_rows(&mut buf, rows).map_err(|e| MatchError::Serialization {
        message: e.to_string(),
        rows: rows.to_vec(),
    })?;
    Ok(buf)
}

/// Split report text into records of raw fields.
fn parse_records(text: &str) -> Result<Vec<Vec<String>>, String> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut chars = text.chars().peekable();
    let mut in_quotes = false;
    let mut at_field_start = true;

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == QUOTE {
                if chars.peek() == Some(&QUOTE) {
                    chars.next();
                    field.push(QUOTE);
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }

        match c {
            QUOTE if at_field_start => {
                in_quotes = true;
                at_field_start = false;
            }
            DELIMITER => {
                record.push(std::mem::take(&mut field));
                at_field_start = true;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
                at_field_start = true;
            }
            _ => {
                field.push(c);
                at_field_start = false;
            }
        }
    }

    if in_quotes {
        return Err("unterminated quoted field".to_string());
    }
    if !at_field_start || !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    Ok(records)
}

/// Parse report bytes back into rows.
pub fn parse_rows(bytes: &[u8]) -> Result<Vec<MatchedRow>, MatchError> {
    let parse_error = |message: String| MatchError::Serialization {
        message,
        rows: Vec::new(),
    };
    let text = std::str::from_utf8(bytes).map_err(|e| parse_error(e.to_string()))?;

    parse_records(text)
        .map_err(parse_error)?
        .into_iter()
        .enumerate()
        .map(|(line, fields)| -> Result<MatchedRow, MatchError> {
            let [call_id, date, number, operator, risk_score]: [String; COLUMNS] =
                fields.try_into().map_err(|fields: Vec<String>| {
                    parse_error(format!(
                        "row {line}: expected {COLUMNS} fields, found {}",
                        fields.len()
                    ))
                })?;
            let risk_score = Decimal::from_str(&risk_score).map_err(|e| {
                parse_error(format!("row {line}: invalid risk score {risk_score:?}: {e}"))
            })?;
            Ok(MatchedRow {
                call_id,
                date,
                number,
                operator,
                risk_score,
            })
        })
        .collect()
}
