//! Reading `owner id, question, response` rows from an uploaded file.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{FeedmarkError, Result};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Column positions, fixed by the upload format.
const OWNER_COLUMN: usize = 0;
const QUESTION_COLUMN: usize = 1;
const RESPONSE_COLUMN: usize = 2;

/// One student's answer to one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabularRow {
    /// Identifier of the student who owns the row.
    pub owner_id: u64,
    /// Question text.
    pub question: String,
    /// The student's response.
    pub response: String,
}

impl TabularRow {
    /// Create a new row.
    pub fn new(owner_id: u64, question: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            owner_id,
            question: question.into(),
            response: response.into(),
        }
    }
}

/// Metadata about an uploaded file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Delimiter that was used.
    pub format: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// When the file was read.
    pub read_at: DateTime<Utc>,
}

/// An uploaded file read once from disk.
#[derive(Debug, Clone)]
pub struct Upload {
    /// Decoded file contents, exactly as the rows were read from.
    pub text: String,
    /// Data rows, header excluded.
    pub rows: Vec<TabularRow>,
    /// Metadata about the file.
    pub metadata: UploadMetadata,
}

/// Row reader configuration.
#[derive(Debug, Clone)]
pub struct RowReaderConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Quote character.
    pub quote: u8,
}

impl Default for RowReaderConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            quote: b'"',
        }
    }
}

/// Reads uploaded rows. The first row is always treated as a header.
#[derive(Debug, Clone, Default)]
pub struct RowReader {
    config: RowReaderConfig,
}

impl RowReader {
    /// Create a reader with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reader with custom configuration.
    pub fn with_config(config: RowReaderConfig) -> Self {
        Self { config }
    }

    /// Read a file once, returning its text, rows and metadata.
    pub fn read_file(&self, path: impl AsRef<Path>) -> Result<Upload> {
        let path = path.as_ref();
        let io_err = |source: std::io::Error| FeedmarkError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut file = File::open(path).map_err(io_err)?;
        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(io_err)?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let size_bytes = contents.len() as u64;
        let text = String::from_utf8(contents)
            .map_err(|e| io_err(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;

        let delimiter = self.delimiter_for(text.as_bytes())?;
        let rows = self.read_bytes(text.as_bytes(), delimiter)?;

        let metadata = UploadMetadata {
            file: path
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path: path.to_path_buf(),
            hash,
            size_bytes,
            format: format_name(delimiter).to_string(),
            row_count: rows.len(),
            read_at: Utc::now(),
        };

        Ok(Upload {
            text,
            rows,
            metadata,
        })
    }

    /// Read rows from already-loaded text.
    pub fn read_str(&self, text: &str) -> Result<Vec<TabularRow>> {
        let delimiter = self.delimiter_for(text.as_bytes())?;
        self.read_bytes(text.as_bytes(), delimiter)
    }

    fn delimiter_for(&self, bytes: &[u8]) -> Result<u8> {
        match self.config.delimiter {
            Some(d) => Ok(d),
            None => detect_delimiter(bytes),
        }
    }

    fn read_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<Vec<TabularRow>> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let mut rows = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            let record = result?;
            // Line numbers count the header.
            let row = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(row_idx + 2);

            let owner_field = record.get(OWNER_COLUMN).unwrap_or("").trim();
            let owner_id = owner_field.parse::<u64>().map_err(|_| FeedmarkError::Parse {
                row,
                column: OWNER_COLUMN + 1,
                message: format!("owner id '{}' is not a non-negative integer", owner_field),
            })?;

            rows.push(TabularRow {
                owner_id,
                question: record.get(QUESTION_COLUMN).unwrap_or("").to_string(),
                response: record.get(RESPONSE_COLUMN).unwrap_or("").to_string(),
            });
        }

        debug!(rows = rows.len(), format = format_name(delimiter), "read upload rows");
        Ok(rows)
    }
}

fn format_name(delimiter: u8) -> &'static str {
    match delimiter {
        b'\t' => "tsv",
        b',' => "csv",
        b';' => "csv-semicolon",
        b'|' => "psv",
        _ => "delimited",
    }
}

/// Detect the delimiter by analyzing the first few lines.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let lines: Vec<String> = BufReader::new(bytes)
        .lines()
        .take(10)
        .filter_map(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(FeedmarkError::EmptyData("No lines in upload".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        // Consistent counts across lines win; tab breaks ties.
        let score = if counts.iter().all(|&c| c == first_count) {
            first_count * 1000 + if delim == b'\t' { 100 } else { 0 }
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut in_quotes = false;

    line.chars()
        .filter(|&ch| {
            if ch == '"' {
                in_quotes = !in_quotes;
            }
            ch == delim_char && !in_quotes
        })
        .count()
}
