use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, DataType, Reader};
use csv::ReaderBuilder;
use indexmap::IndexSet;
use quick_xml::events::Event;
use serde_json::Value;

use crate::dataset::{CellValue, Dataset, Record};
use crate::types::{AppError, AppResult};

fn parse_err(context: &str, err: impl std::fmt::Display) -> AppError {
    AppError::Parse(format!("{}: {}", context, err))
}

fn header_name(raw: &str, idx: usize) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        format!("column_{}", idx + 1)
    } else {
        trimmed.to_string()
    }
}

/// Gives every record the union of all columns, in first-seen order, filling gaps
/// with nulls.
fn normalize(records: Vec<Record>) -> Dataset {
    let columns: IndexSet<String> = records.iter().flat_map(|r| r.keys().cloned()).collect();
    records
        .into_iter()
        .map(|mut r| {
            columns
                .iter()
                .map(|c| (c.clone(), r.swap_remove(c).unwrap_or(CellValue::Null)))
                .collect()
        })
        .collect()
}

pub fn parse_csv(bytes: &[u8], max_rows: usize) -> AppResult<Dataset> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| parse_err("invalid CSV header", e))?
        .iter()
        .enumerate()
        .map(|(idx, h)| header_name(h, idx))
        .collect();

    let mut records = Vec::new();
    for row in rdr.records().take(max_rows) {
        let row = row.map_err(|e| parse_err("invalid CSV row", e))?;
        let record: Record = headers
            .iter()
            .enumerate()
            .map(|(idx, h)| {
                let cell = row.get(idx).map(CellValue::from_text).unwrap_or(CellValue::Null);
                (h.clone(), cell)
            })
            .collect();
        records.push(record);
    }
    Ok(Dataset::new(records))
}

fn excel_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::from_text(s),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(_) => match cell.as_datetime() {
            Some(dt) if dt.time() == chrono::NaiveTime::MIN => {
                CellValue::Text(dt.format("%Y-%m-%d").to_string())
            }
            Some(dt) => CellValue::Text(dt.format("%Y-%m-%dT%H:%M:%S").to_string()),
            None => CellValue::Null,
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::from_text(s),
        _ => CellValue::Null,
    }
}

/// First worksheet; its first row is the header.
pub fn parse_excel(bytes: &[u8], max_rows: usize) -> AppResult<Dataset> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| parse_err("unreadable workbook", e))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::Parse("workbook has no worksheets".to_string()))?
        .map_err(|e| parse_err("unreadable worksheet", e))?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Dataset::default());
    };
    let headers: Vec<String> = header_row
        .iter()
        .enumerate()
        .map(|(idx, c)| header_name(&c.to_string(), idx))
        .collect();

    let records: Dataset = rows
        .take(max_rows)
        .map(|row| {
            headers
                .iter()
                .enumerate()
                .map(|(idx, h)| (h.clone(), row.get(idx).map(excel_cell).unwrap_or(CellValue::Null)))
                .collect()
        })
        .collect();
    Ok(records)
}

fn json_cell(value: Value) -> CellValue {
    match value {
        Value::Null => CellValue::Null,
        Value::Bool(b) => CellValue::Bool(b),
        Value::Number(n) => n.as_f64().map(CellValue::Number).unwrap_or(CellValue::Null),
        Value::String(s) => CellValue::Text(s),
        nested => CellValue::Text(nested.to_string()),
    }
}

fn json_record(value: Value) -> Record {
    match value {
        Value::Object(fields) => fields.into_iter().map(|(k, v)| (k, json_cell(v))).collect(),
        scalar => std::iter::once(("value".to_string(), json_cell(scalar))).collect(),
    }
}

/// A list of row objects, or an object keyed by row label (stored as `index`).
pub fn parse_json(bytes: &[u8], max_rows: usize) -> AppResult<Dataset> {
    let value: Value = serde_json::from_slice(bytes).map_err(|e| parse_err("invalid JSON", e))?;
    let records: Vec<Record> = match value {
        Value::Array(items) => items.into_iter().take(max_rows).map(json_record).collect(),
        Value::Object(rows) => rows
            .into_iter()
            .take(max_rows)
            .map(|(key, row)| {
                let mut record = Record::new();
                record.insert("index".to_string(), CellValue::Text(key));
                record.extend(json_record(row));
                record
            })
            .collect(),
        _ => return Err(AppError::Parse("Unsupported JSON structure".to_string())),
    };
    Ok(normalize(records))
}

/// Each child of the root element is a row; each of its children is a cell.
pub fn parse_xml(bytes: &[u8], max_rows: usize) -> AppResult<Dataset> {
    let text = std::str::from_utf8(bytes).map_err(|e| parse_err("XML is not UTF-8", e))?;
    let mut reader = quick_xml::Reader::from_str(text);

    let mut records: Vec<Record> = Vec::new();
    let mut current: Option<Record> = None;
    let mut field: Option<(String, String)> = None;
    let mut depth = 0usize;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| parse_err("invalid XML", e))?;
        match event {
            Event::Start(e) => {
                depth += 1;
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                match depth {
                    2 => current = Some(Record::new()),
                    3 => field = Some((name, String::new())),
                    _ => {}
                }
            }
            Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                match depth {
                    1 => records.push(Record::new()),
                    2 => {
                        if let Some(record) = current.as_mut() {
                            record.insert(name, CellValue::Null);
                        }
                    }
                    _ => {}
                }
            }
            Event::Text(t) => {
                if let Some((_, buf)) = field.as_mut() {
                    let unescaped = t.unescape().map_err(|e| parse_err("invalid XML text", e))?;
                    buf.push_str(&unescaped);
                }
            }
            Event::CData(c) => {
                if let Some((_, buf)) = field.as_mut() {
                    buf.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Event::End(_) => {
                match depth {
                    2 => {
                        if let Some(record) = current.take() {
                            records.push(record);
                        }
                    }
                    3 => {
                        if let (Some((name, text)), Some(record)) = (field.take(), current.as_mut()) {
                            record.insert(name, CellValue::from_text(text.trim()));
                        }
                    }
                    _ => {}
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
        if records.len() >= max_rows {
            break;
        }
    }
    Ok(normalize(records))
}
