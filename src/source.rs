//! Record source: discovers NDJSON / zstd-compressed JSONL files and streams their
//! lines into typed records. Malformed lines are counted and skipped; a file that
//! fails to decode is logged and skipped without aborting the run.

use crate::date::{period_from_epoch, period_from_rfc3339, period_from_url};
use crate::util::open_with_backoff;
use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zstd::stream::read::Decoder;

/// One raw text record as produced by an upstream loader.
/// `period` wins when present; otherwise it is derived from `timestamp`
/// (unix seconds), `created_at` (RFC 3339) or a dated `url`, in that order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InputRecord {
    pub text: Option<String>,
    pub period: Option<String>,
    pub group: Option<String>,
    pub timestamp: Option<i64>,
    pub created_at: Option<String>,
    pub url: Option<String>,
}

impl InputRecord {
    pub fn new(text: Option<&str>, period: &str, group: &str) -> Self {
        Self {
            text: text.map(str::to_string),
            period: Some(period.to_string()),
            group: Some(group.to_string()),
            ..Default::default()
        }
    }

    /// The record's period key, or `None` when nothing usable is present.
    pub fn resolved_period(&self) -> Option<String> {
        if let Some(p) = self.period.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
            return Some(p.to_string());
        }
        self.timestamp
            .and_then(period_from_epoch)
            .or_else(|| self.created_at.as_deref().and_then(period_from_rfc3339))
            .or_else(|| self.url.as_deref().and_then(period_from_url))
            .map(|ym| ym.to_string())
    }
}

/// Line-level outcome of reading one file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub lines: u64,
    pub records: u64,
    pub malformed: u64,
}

impl LoadStats {
    pub fn merge(&mut self, other: LoadStats) {
        self.lines += other.lines;
        self.records += other.records;
        self.malformed += other.malformed;
    }
}

const INPUT_EXTENSIONS: &[&str] = &["jsonl", "ndjson", "json", "zst"];

/// Input files under `path` (a file, or a directory walked recursively), sorted.
pub fn discover_inputs(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }
    let mut out: Vec<PathBuf> = WalkDir::new(path)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|x| x.to_str())
                .map(|x| INPUT_EXTENSIONS.contains(&x))
                .unwrap_or(false)
        })
        .collect();
    out.sort();
    out
}

fn is_zst(path: &Path) -> bool {
    path.extension().and_then(|x| x.to_str()) == Some("zst")
}

fn for_each_line_attempt(path: &Path, read_buf_bytes: usize, on_line: &mut impl FnMut(&[u8])) -> Result<()> {
    let file = open_with_backoff(path, 16, 50)?;
    let inner: Box<dyn Read> = if is_zst(path) {
        let mut decoder = Decoder::new(file)?;
        decoder.window_log_max(31)?;
        Box::new(decoder)
    } else {
        Box::new(file)
    };
    let mut reader = BufReader::with_capacity(read_buf_bytes.max(8 * 1024), inner);

    // Invalid UTF-8 is left for the record parser to reject.
    let mut buf: Vec<u8> = Vec::with_capacity(16 * 1024);
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let mut line = buf.as_slice();
        while let [rest @ .., b'\n' | b'\r'] = line {
            line = rest;
        }
        if !line.iter().all(u8::is_ascii_whitespace) {
            on_line(line);
        }
    }
    Ok(())
}

/// Stream the non-empty lines of `path` as raw bytes (zstd-decoded for `.zst`).
/// A read or decode error is logged and the rest of the file is skipped.
pub fn for_each_line(path: &Path, read_buf_bytes: usize, mut on_line: impl FnMut(&[u8])) {
    if let Err(e) = for_each_line_attempt(path, read_buf_bytes, &mut on_line) {
        let abs = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        tracing::warn!("skipping rest of {} after read error: {:#}", abs.display(), e);
    }
}

/// Deserialize each line of `path` as `T` and hand it to `on_record`.
/// Lines that are not valid JSON (or not valid UTF-8) count as malformed.
pub fn for_each_record<T, F>(path: &Path, read_buf_bytes: usize, mut on_record: F) -> LoadStats
where
    T: DeserializeOwned,
    F: FnMut(T),
{
    let mut stats = LoadStats::default();
    for_each_line(path, read_buf_bytes, |line| {
        stats.lines += 1;
        match serde_json::from_slice::<T>(line) {
            Ok(rec) => {
                stats.records += 1;
                on_record(rec);
            }
            Err(e) => {
                stats.malformed += 1;
                tracing::debug!("malformed line {} in {}: {}", stats.lines, path.display(), e);
            }
        }
    });
    stats
}

/// Read every record of `path` into memory.
pub fn read_records<T: DeserializeOwned>(path: &Path, read_buf_bytes: usize) -> (Vec<T>, LoadStats) {
    let mut out = Vec::new();
    let stats = for_each_record(path, read_buf_bytes, |r| out.push(r));
    (out, stats)
}
