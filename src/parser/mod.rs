//! CSV ingestion with encoding and delimiter auto-detection.
//!
//! Turns uploaded bytes into a raw header + rows table. No enrollment
//! semantics here; column meaning is resolved later by
//! [`crate::schema`].
//!
//! University exports in the wild arrive as UTF-8 or CP949/EUC-KR, with
//! comma, semicolon or tab separators, so both properties are detected
//! rather than assumed.

use crate::error::{CsvError, CsvResult};
use std::path::Path;

/// Result of parsing with metadata.
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Column headers, trimmed.
    pub headers: Vec<String>,
    /// Data rows; each row has exactly `headers.len()` cells (short rows
    /// are padded with empty strings, long rows truncated).
    pub rows: Vec<Vec<String>>,
    /// Detected or used encoding.
    pub encoding: String,
    /// Detected or used delimiter.
    pub delimiter: char,
}

/// Detect the encoding of raw bytes using chardet.
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "euc-kr" | "uhc" | "cp949" | "windows-949" | "ks_c_5601-1987" => "euc-kr".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding.
pub fn decode_content(bytes: &[u8], encoding: &str) -> CsvResult<String> {
    let decoded = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => match String::from_utf8(bytes.to_vec()) {
            Ok(s) => s,
            Err(_) => String::from_utf8_lossy(bytes).to_string(),
        },
        "euc-kr" | "cp949" | "windows-949" => encoding_rs::EUC_KR.decode(bytes).0.to_string(),
        "iso-8859-1" | "latin-1" | "latin1" => {
            encoding_rs::ISO_8859_15.decode(bytes).0.to_string()
        }
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.to_string(),
        // Fallback: UTF-8 with lossy conversion
        _ => String::from_utf8_lossy(bytes).to_string(),
    };

    // Strip a UTF-8 BOM so the first header name matches exactly
    Ok(decoded.trim_start_matches('\u{feff}').to_string())
}

/// Detect the delimiter by counting occurrences in the first line.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse CSV text with an explicit delimiter.
///
/// Quoted fields and embedded delimiters are handled by the `csv` crate;
/// blank lines are skipped.
pub fn parse_str(content: &str, delimiter: char) -> CsvResult<ParseResult> {
    if content.trim().is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(CsvError::NoHeaders);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let mut row: Vec<String> = record
            .iter()
            .take(headers.len())
            .map(|cell| cell.trim().to_string())
            .collect();
        row.resize(headers.len(), String::new());
        rows.push(row);
    }

    Ok(ParseResult {
        headers,
        rows,
        encoding: "utf-8".to_string(),
        delimiter,
    })
}

/// Parse CSV bytes with auto-detection of encoding and delimiter.
pub fn parse_bytes_auto(bytes: &[u8]) -> CsvResult<ParseResult> {
    if bytes.is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;
    let delimiter = detect_delimiter(&content);

    let mut result = parse_str(&content, delimiter)?;
    result.encoding = encoding;
    Ok(result)
}

/// Parse a CSV file with auto-detection of encoding and delimiter.
pub fn parse_file_auto<P: AsRef<Path>>(path: P) -> CsvResult<ParseResult> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes_auto(&bytes)
}
