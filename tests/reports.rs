use trendscan::{
    associations, sentiment_by_group, top_words_by_group, trending_by_period, uri_report_by_date, InputRecord,
    Lexicon, LogRecord, SortField, VelocityRecord,
};

fn log(date: Option<&str>, uri: Option<&str>, bytes: Option<u64>) -> LogRecord {
    LogRecord { date: date.map(String::from), uri: uri.map(String::from), bytes }
}

fn logs() -> Vec<LogRecord> {
    let d1 = Some("2024-01-01");
    vec![
        log(d1, Some("/a"), Some(10)),
        log(d1, Some("/b"), Some(500)),
        log(d1, Some("/a"), Some(10)),
        log(d1, Some("/c"), Some(1)),
        log(d1, Some("/a"), Some(10)),
        log(d1, Some("/c"), None),
        log(Some("2024-01-02"), Some("/a"), Some(100)),
        log(None, Some("/a"), Some(999)),
        log(d1, None, Some(999)),
    ]
}

/// Per date totals plus the top 2 URIs by request count.
/// 2024-01-01: /a x3 (30 bytes), /b x1 (500), /c x2 (1) -> top: /a, /c.
/// Records without date or URI are dropped.
#[test]
fn uri_report_by_count() {
    let report = uri_report_by_date(&logs(), SortField::Count, 2);
    assert_eq!(report.len(), 2);

    let day1 = &report[0];
    assert_eq!(day1.date, "2024-01-01");
    assert_eq!(day1.total_requests, 6);
    assert_eq!(day1.total_bytes, 531);
    let uris: Vec<(&str, u64)> = day1.top.iter().map(|s| (s.uri.as_str(), s.requests)).collect();
    assert_eq!(uris, vec![("/a", 3), ("/c", 2)]);

    assert_eq!(report[1].date, "2024-01-02");
    assert_eq!(report[1].total_requests, 1);
    assert_eq!(report[1].top.len(), 1);
}

/// Same data ordered by bytes: /b (500) beats /a (30).
#[test]
fn uri_report_by_bytes() {
    let report = uri_report_by_date(&logs(), SortField::Bytes, 2);
    let uris: Vec<(&str, u64)> = report[0].top.iter().map(|s| (s.uri.as_str(), s.bytes)).collect();
    assert_eq!(uris, vec![("/b", 500), ("/a", 30)]);
    assert_eq!("bytes".parse::<SortField>().unwrap(), SortField::Bytes);
    assert!("median".parse::<SortField>().is_err());
}

fn vel(word: &str, period: &str, combined: Option<f64>) -> VelocityRecord {
    VelocityRecord {
        word: word.into(),
        period: period.into(),
        frequency: 0.1,
        absolute_velocity: 0.0,
        relative_velocity: combined.map(|_| 1.0),
        combined_velocity: combined,
    }
}

/// Only positive combined velocities are ranked; periods with none disappear.
#[test]
fn trending_keeps_only_rising_words() {
    let records = vec![
        vel("alpha", "2013-01", Some(10.0)),
        vel("beta", "2013-01", Some(30.0)),
        vel("gamma", "2013-01", Some(-50.0)),
        vel("delta", "2013-01", None),
        vel("eps", "2013-01", Some(20.0)),
        vel("zeta", "2013-02", Some(0.0)),
    ];
    let ranked = trending_by_period(&records, 2);
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].group_key, "2013-01");
    let words: Vec<&str> = ranked[0].items.iter().map(|r| r.word.as_str()).collect();
    assert_eq!(words, vec!["beta", "eps"]);
}

/// Top words per group; equal counts fall back to alphabetical order.
#[test]
fn top_words_per_group() {
    let records = vec![
        InputRecord::new(Some("tokio tokio serde"), "2024-01", "rust"),
        InputRecord::new(Some("serde rayon"), "2024-02", "rust"),
        InputRecord::new(Some("django flask flask"), "2024-01", "python"),
        InputRecord { text: Some("ignored".into()), group: None, ..Default::default() },
    ];
    let ranked = top_words_by_group(&records, 1, 2);
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].group_key, "python");
    assert_eq!(ranked[0].items[0].word, "flask");
    assert_eq!(ranked[0].items[0].count, 2);
    assert_eq!(ranked[1].group_key, "rust");
    let words: Vec<(&str, u64)> = ranked[1].items.iter().map(|w| (w.word.as_str(), w.count)).collect();
    assert_eq!(words, vec![("serde", 2), ("tokio", 2)]);
}

/// Sentiment totals per group, best group first. Missing text is skipped, not scored as 0.
#[test]
fn sentiment_per_group() {
    let records = vec![
        InputRecord::new(Some("Very good!"), "2024-01", "rust"),
        InputRecord::new(Some("not good"), "2024-01", "rust"),
        InputRecord::new(None, "2024-01", "rust"),
        InputRecord::new(Some("awful, awful"), "2024-01", "php"),
    ];
    let ranked = sentiment_by_group(&records, Lexicon::builtin(), 1, 10);
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].group, "rust");
    assert_eq!(ranked[0].records, 2);
    assert_eq!(ranked[0].total, 1.5);
    assert_eq!(ranked[0].mean, 0.75);
    assert_eq!(ranked[1].group, "php");
    assert_eq!(ranked[1].total, -2.0);
}

/// Corpus of 9 tokens; "rust" co-occurs with cargo x2 and crate x1.
/// cargo: (2/3) / (3/9) = 2.0, crate: (1/3) / (1/9) = 3.0.
#[test]
fn associations_rank_by_lift() {
    let docs = vec![
        vec!["rust", "cargo", "crate"],
        vec!["rust", "cargo"],
        vec!["python", "pip"],
        vec!["python", "cargo"],
    ];
    let all = associations(&docs, "rust", 0.0, 100);
    let got: Vec<(&str, u64)> = all.iter().map(|a| (a.word.as_str(), a.co_occurrences)).collect();
    assert_eq!(got, vec![("crate", 1), ("cargo", 2)]);
    assert!((all[0].score - 3.0).abs() < 1e-9);
    assert!((all[1].score - 2.0).abs() < 1e-9);

    // crate's corpus frequency (1/9) is under the threshold
    let frequent = associations(&docs, "rust", 0.2, 100);
    assert_eq!(frequent.len(), 1);
    assert_eq!(frequent[0].word, "cargo");

    assert_eq!(associations(&docs, "rust", 0.0, 1).len(), 1);
    assert!(associations(&docs, "haskell", 0.0, 100).is_empty());
}
