use std::io::Cursor;

use calamine::{Data, ExcelDateTime, Reader, Xlsx};
use chrono::Timelike;

use crate::error::DocTextError;
use crate::extraction::table::Table;
use crate::extraction::TextExtractor;
use crate::format::FileFormat;

/// CSV and XLSX extraction: parse into a [`Table`] and render it as text.
pub struct SpreadsheetText;

impl TextExtractor for SpreadsheetText {
    fn name(&self) -> &'static str {
        "spreadsheet"
    }

    fn handles(&self, format: FileFormat) -> bool {
        format.is_spreadsheet()
    }

    fn extract(&self, content: &[u8], format: FileFormat) -> Result<String, DocTextError> {
        let table = match format {
            FileFormat::Csv => parse_csv(content)?,
            FileFormat::Xlsx => parse_xlsx(content)?,
            other => {
                return Err(DocTextError::Spreadsheet(format!(
                    "not a spreadsheet format: {other}"
                )))
            }
        };
        Ok(table.render())
    }
}

/// Parse CSV bytes. The first record is the header; rows may be ragged.
pub fn parse_csv(bytes: &[u8]) -> Result<Table, DocTextError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| DocTextError::Spreadsheet(format!("failed to read CSV header: {e}")))?
        .iter()
        .map(str::to_string)
        .collect();

    if headers.is_empty() {
        return Err(DocTextError::Spreadsheet("no columns to parse from CSV".into()));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record =
            record.map_err(|e| DocTextError::Spreadsheet(format!("failed to read CSV row: {e}")))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Table { headers, rows })
}

/// Parse the first worksheet of an xlsx workbook. Row 1 is the header.
pub fn parse_xlsx(bytes: &[u8]) -> Result<Table, DocTextError> {
    let cursor = Cursor::new(bytes);
    let mut workbook: Xlsx<_> = calamine::open_workbook_from_rs(cursor)
        .map_err(|e| DocTextError::Spreadsheet(format!("failed to open xlsx: {e}")))?;

    let sheet = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| DocTextError::Spreadsheet("workbook has no worksheets".into()))?
        .map_err(|e| DocTextError::Spreadsheet(format!("failed to read first worksheet: {e}")))?;

    let mut rows = sheet
        .rows()
        .map(|row| row.iter().map(cell_as_string).collect::<Vec<_>>());

    let headers = rows
        .next()
        .ok_or_else(|| DocTextError::Spreadsheet("first worksheet is empty".into()))?;

    Ok(Table {
        headers,
        rows: rows.collect(),
    })
}

fn cell_as_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => excel_datetime_as_string(dt),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Empty => String::new(),
        _ => format!("{cell}"),
    }
}

/// Dates print as `YYYY-MM-DD`, with the time only when it is not midnight.
/// Duration-formatted cells print as `H:MM:SS`.
fn excel_datetime_as_string(dt: &ExcelDateTime) -> String {
    if dt.is_duration() {
        if let Some(d) = dt.as_duration() {
            let secs = d.num_seconds();
            let sign = if secs < 0 { "-" } else { "" };
            let secs = secs.abs();
            return format!("{sign}{}:{:02}:{:02}", secs / 3600, secs / 60 % 60, secs % 60);
        }
    } else if let Some(datetime) = dt.as_datetime() {
        return if datetime.num_seconds_from_midnight() == 0 {
            datetime.format("%Y-%m-%d").to_string()
        } else {
            datetime.format("%Y-%m-%d %H:%M:%S").to_string()
        };
    }
    dt.as_f64().to_string()
}
