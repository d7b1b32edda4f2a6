#[path = "common/mod.rs"]
mod common;

use common::{make_corpus_files, read_lines};
use indicatif::{MultiProgress, ProgressDrawTarget};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use trendscan::{null_safe, null_safe2, period_from_url, set_global_multiprogress, InputRecord, RankedSink, TrendPipeline};

/// A missing argument short-circuits to a missing result.
#[test]
fn null_propagation() {
    let period = null_safe(period_from_url);
    assert!(period(None).is_none());
    assert!(period(Some("https://x.example/2013/02/a")).is_some());

    let ratio = null_safe2(|a: u64, b: u64| a as f64 / b as f64);
    assert_eq!(ratio(Some(1), Some(4)), Some(0.25));
    assert_eq!(ratio(None, Some(4)), None);
    assert_eq!(ratio(Some(1), None), None);
}

#[derive(Serialize)]
struct Row {
    period: &'static str,
    total: u64,
}

/// Rows land in the final file only after `finish()`; an existing report is replaced.
#[test]
fn ranked_sink_promotes_on_finish() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("nested").join("report.ndjson");
    std::fs::create_dir_all(out.parent().unwrap()).unwrap();
    std::fs::write(&out, "stale\n").unwrap();

    let sink = RankedSink::create(&out, 8 * 1024).unwrap();
    sink.write_all(&[Row { period: "2013-01", total: 3 }, Row { period: "2013-02", total: 5 }]).unwrap();
    assert_eq!(read_lines(&out), vec!["stale"]);
    assert_eq!(sink.finish().unwrap(), 2);

    let lines = read_lines(&out);
    assert_eq!(lines, vec![r#"{"period":"2013-01","total":3}"#, r#"{"period":"2013-02","total":5}"#]);
}

/// A row that fails to serialize discards the partial output and keeps the old report.
#[test]
fn failed_write_leaves_previous_report() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("report.ndjson");
    std::fs::write(&out, "stale\n").unwrap();

    // serde_json rejects non-string map keys.
    let mut bad: BTreeMap<Vec<u8>, u64> = BTreeMap::new();
    bad.insert(vec![1, 2], 3);
    let err = TrendPipeline::new().progress(false).write_ranked(&[bad], &out);
    assert!(err.is_err());

    assert_eq!(read_lines(&out), vec!["stale"]);
    assert!(!tmp.path().join("report.ndjson.inprogress").exists());

    let sink = RankedSink::create(&out, 8 * 1024).unwrap();
    sink.write_row(&Row { period: "2013-01", total: 1 }).unwrap();
    sink.abort().unwrap();
    assert_eq!(read_lines(&out), vec!["stale"]);
    assert!(!tmp.path().join("report.ndjson.inprogress").exists());
}

/// Progress bars attach to an installed MultiProgress without affecting results.
#[test]
fn progress_under_shared_multiprogress() {
    set_global_multiprogress(Arc::new(MultiProgress::with_draw_target(ProgressDrawTarget::hidden())));
    let base = make_corpus_files();
    let records: Vec<InputRecord> = TrendPipeline::new()
        .progress(true)
        .progress_label("Load test corpus")
        .load_records(&base.join("input"))
        .unwrap();
    assert_eq!(records.len(), 5);
}
