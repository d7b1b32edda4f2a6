#![allow(dead_code)]

use serde_json::json;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use trendscan::InputRecord;

/// Write a compressed `.zst` file containing the provided JSONL lines.
pub fn write_zst_lines(path: &Path, lines: &[String]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let f = File::create(path).unwrap();
    let mut enc = zstd::stream::write::Encoder::new(f, 3).unwrap();
    for l in lines {
        writeln!(&mut enc, "{}", l).unwrap();
    }
    enc.finish().unwrap();
}

/// Write a plain JSONL file.
pub fn write_lines(path: &Path, lines: &[String]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut f = File::create(path).unwrap();
    for l in lines {
        writeln!(&mut f, "{}", l).unwrap();
    }
}

/// Read a text file line-by-line into strings (skips empty lines).
pub fn read_lines(path: &Path) -> Vec<String> {
    let f = File::open(path).unwrap();
    let r = BufReader::new(f);
    r.lines().map(|l| l.unwrap()).filter(|s| !s.is_empty()).collect()
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9 * b.abs().max(1.0)
}

/// A two-month tech-news corpus:
/// - Jan 2013: "rustacean" x1, "compiler" x3 (4 tokens)
/// - Feb 2013: "rustacean" x2, "compiler" x2 (4 tokens)
/// Short words ("the", "new") fall below the default min length of 5.
pub fn two_month_records() -> Vec<InputRecord> {
    vec![
        InputRecord::new(Some("The new compiler, compiler!"), "2013-01", "news"),
        InputRecord::new(Some("Rustacean compiler"), "2013-01", "blog"),
        InputRecord::new(Some("Rustacean RUSTACEAN"), "2013-02", "news"),
        InputRecord::new(Some("compiler... compiler"), "2013-02", "blog"),
    ]
}

/// The same corpus split across a plain `.jsonl` file (January) and a `.zst` file
/// (February, period derived from unix timestamps), plus one malformed line.
pub fn make_corpus_files() -> PathBuf {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.into_path();

    let jan = vec![
        json!({"text": "The new compiler, compiler!", "period": "2013-01", "group": "news"}).to_string(),
        json!({"text": "Rustacean compiler", "period": "2013-01", "group": "blog"}).to_string(),
        "{not json".to_string(),
    ];
    write_lines(&base.join("input").join("2013-01.jsonl"), &jan);

    // 1359676800 == 2013-02-01T00:00:00Z
    let feb = vec![
        json!({"text": "Rustacean RUSTACEAN", "timestamp": 1359676800i64, "group": "news"}).to_string(),
        json!({"text": "compiler... compiler", "timestamp": 1359763200i64, "group": "blog"}).to_string(),
        json!({"text": "no period anywhere", "group": "blog"}).to_string(),
    ];
    write_zst_lines(&base.join("input").join("2013-02.zst"), &feb);

    base
}
