use crate::aggregate::{Aggregator, PeriodCounts, WordPeriodFrequency};
use crate::associations::{associations, Association};
use crate::concurrency::map_files_limited;
use crate::config::{SortField, TrendOptions};
use crate::progress::maybe_count_progress;
use crate::rank::RankedResult;
use crate::reports::{self, GroupSentiment, LogRecord, UriDateReport, WordCount};
use crate::sentiment::Lexicon;
use crate::sink::RankedSink;
use crate::source::{discover_inputs, for_each_record, read_records, InputRecord, LoadStats};
use crate::tokenize::tokenize;
use crate::util::init_tracing_once;
use crate::velocity::{velocities_parallel, VelocityRecord, WordTimeSeries};
use anyhow::{bail, Result};
use rayon::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Batch entry point. Configure with the builder methods, then call a report.
/// In-memory operations take record slices; `*_files` variants read NDJSON/zst inputs.
#[derive(Clone, Default)]
pub struct TrendPipeline {
    pub(crate) opts: TrendOptions,
}

impl TrendPipeline {
    pub fn new() -> Self {
        Self { opts: TrendOptions::default() }
    }

    pub fn from_options(opts: TrendOptions) -> Self {
        Self { opts }
    }

    // -------- Builder methods --------
    pub fn min_word_len(mut self, n: usize) -> Self { self.opts = self.opts.with_min_word_len(n); self }
    pub fn min_corpus_frequency(mut self, f: f64) -> Self { self.opts = self.opts.with_min_corpus_frequency(f); self }
    pub fn max_associations(mut self, n: usize) -> Self { self.opts = self.opts.with_max_associations(n); self }
    pub fn top_k(mut self, n: usize) -> Self { self.opts = self.opts.with_top_k(n); self }
    pub fn sort_field(mut self, field: SortField) -> Self { self.opts = self.opts.with_sort_field(field); self }
    pub fn parallelism(mut self, threads: usize) -> Self { self.opts = self.opts.with_parallelism(threads); self }
    pub fn file_concurrency(mut self, n: usize) -> Self { self.opts = self.opts.with_file_concurrency(n); self }
    pub fn progress(mut self, yes: bool) -> Self { self.opts = self.opts.with_progress(yes); self }
    pub fn progress_label(mut self, label: impl Into<String>) -> Self { self.opts = self.opts.with_progress_label(label); self }
    pub fn io_buffers(mut self, read_bytes: usize, write_bytes: usize) -> Self { self.opts = self.opts.with_io_buffers(read_bytes, write_bytes); self }

    pub fn options(&self) -> &TrendOptions {
        &self.opts
    }

    fn init(&self) {
        init_tracing_once();
        if let Some(n) = self.opts.parallelism { if n > 0 { rayon::ThreadPoolBuilder::new().num_threads(n).build_global().ok(); } }
    }

    // -------- word frequencies & velocity --------

    /// Count tokens per (period, word). Records whose period cannot be resolved are dropped.
    pub fn word_counts(&self, records: &[InputRecord]) -> PeriodCounts {
        self.init();
        let min_len = self.opts.min_word_len;
        let (counts, dropped) = records
            .par_iter()
            .fold(
                || (PeriodCounts::default(), 0u64),
                |(mut acc, mut dropped), r| {
                    if !ingest_record(&mut acc, r, min_len) {
                        dropped += 1;
                    }
                    (acc, dropped)
                },
            )
            .reduce(
                || (PeriodCounts::default(), 0u64),
                |(mut a, da), (b, db)| {
                    a.merge(b);
                    (a, da + db)
                },
            );
        if dropped > 0 {
            tracing::info!("dropped {} records without a usable period", dropped);
        }
        counts
    }

    pub fn word_frequencies(&self, records: &[InputRecord]) -> Vec<WordPeriodFrequency> {
        self.word_counts(records).frequencies()
    }

    pub fn time_series(&self, records: &[InputRecord]) -> Vec<WordTimeSeries> {
        WordTimeSeries::from_frequencies(&self.word_frequencies(records))
    }

    pub fn velocities(&self, records: &[InputRecord]) -> Vec<VelocityRecord> {
        velocities_parallel(&self.time_series(records))
    }

    /// Per period, the top-K rising words by combined velocity.
    pub fn trending(&self, records: &[InputRecord]) -> Vec<RankedResult<String, VelocityRecord>> {
        trending_from_counts(&self.word_counts(records), self.opts.top_k)
    }

    // -------- other reports --------

    pub fn associations(&self, records: &[InputRecord], target: &str) -> Vec<Association> {
        self.init();
        let min_len = self.opts.min_word_len;
        let docs: Vec<Vec<String>> = records
            .par_iter()
            .map(|r| tokenize(r.text.as_deref(), min_len).collect())
            .collect();
        let target = target.trim().to_lowercase();
        associations(&docs, &target, self.opts.min_corpus_frequency, self.opts.max_associations)
    }

    pub fn top_words_by_group(&self, records: &[InputRecord]) -> Vec<RankedResult<String, WordCount>> {
        self.init();
        reports::top_words_by_group(records, self.opts.min_word_len, self.opts.top_k)
    }

    /// Uses the built-in lexicon.
    /// Text is tokenized with `min_word_len` like every other report; at the default
    /// of 5 short lexicon entries ("not", "very", "good", "bad") never reach the scorer.
    /// Lower it (e.g. `.min_word_len(1)`) to score those words.
    pub fn sentiment_by_group(&self, records: &[InputRecord]) -> Vec<GroupSentiment> {
        self.sentiment_by_group_with(records, Lexicon::builtin())
    }

    pub fn sentiment_by_group_with(&self, records: &[InputRecord], lexicon: &Lexicon) -> Vec<GroupSentiment> {
        self.init();
        reports::sentiment_by_group(records, lexicon, self.opts.min_word_len, self.opts.top_k)
    }

    pub fn uri_report(&self, logs: &[LogRecord]) -> Vec<UriDateReport> {
        self.init();
        reports::uri_report_by_date(logs, self.opts.sort_field, self.opts.top_k)
    }

    // -------- file-backed operations --------

    fn plan_inputs(&self, input: &Path) -> Result<Vec<PathBuf>> {
        let files = discover_inputs(input);
        if files.is_empty() {
            bail!("no input files found under {}", input.display());
        }
        tracing::info!("Planned {} files for processing.", files.len());
        Ok(files)
    }

    fn progress_label_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.opts.progress_label.as_deref().unwrap_or(default)
    }

    /// Load every record under `input` (a file or directory).
    pub fn load_records<T: DeserializeOwned + Send>(&self, input: &Path) -> Result<Vec<T>> {
        self.init();
        let files = self.plan_inputs(input)?;
        let pb = maybe_count_progress(self.opts.progress, files.len() as u64, self.progress_label_or("Load records"));
        let read_buf = self.opts.read_buffer_bytes;

        let parts = map_files_limited(&files, self.opts.file_concurrency, |path| {
            let part: (Vec<T>, LoadStats) = read_records(path, read_buf);
            if let Some(pb) = &pb { pb.inc(1); }
            part
        });
        if let Some(pb) = pb { pb.finish_with_message("Load records: done"); }

        let mut stats = LoadStats::default();
        let mut out = Vec::new();
        for (recs, s) in parts {
            stats.merge(s);
            out.extend(recs);
        }
        log_stats(&stats);
        Ok(out)
    }

    /// Build one `PeriodCounts` per input file in parallel, then merge them.
    /// Records are never held in memory beyond the file being read.
    pub fn aggregate_files_parallel(&self, input: &Path) -> Result<PeriodCounts> {
        self.init();
        let files = self.plan_inputs(input)?;
        let pb = maybe_count_progress(self.opts.progress, files.len() as u64, self.progress_label_or("Aggregate: count words"));
        let read_buf = self.opts.read_buffer_bytes;
        let min_len = self.opts.min_word_len;

        let shards = map_files_limited(&files, self.opts.file_concurrency, |path| {
            let mut counts = PeriodCounts::default();
            let mut dropped = 0u64;
            let stats = for_each_record(path, read_buf, |r: InputRecord| {
                if !ingest_record(&mut counts, &r, min_len) {
                    dropped += 1;
                }
            });
            if dropped > 0 {
                tracing::debug!("{}: dropped {} records without a usable period", path.display(), dropped);
            }
            if let Some(pb) = &pb { pb.inc(1); }
            (counts, stats)
        });
        if let Some(pb) = pb { pb.finish_with_message("Aggregate: shards built"); }

        let mut total = PeriodCounts::default();
        let mut stats = LoadStats::default();
        for (part, s) in shards {
            total.merge(part);
            stats.merge(s);
        }
        log_stats(&stats);
        Ok(total)
    }

    /// Trending words per period for every record under `input`, written as NDJSON
    /// (one ranked period per line) to `out`. Returns the number of rows written.
    pub fn trending_files(&self, input: &Path, out: &Path) -> Result<u64> {
        let counts = self.aggregate_files_parallel(input)?;
        let ranked = trending_from_counts(&counts, self.opts.top_k);
        self.write_ranked(&ranked, out)
    }

    /// Write rows to `out` as NDJSON, atomically.
    pub fn write_ranked<T: Serialize>(&self, rows: &[T], out: &Path) -> Result<u64> {
        let sink = RankedSink::create(out, self.opts.write_buffer_bytes)?;
        if let Err(e) = sink.write_all(rows) {
            sink.abort().ok();
            return Err(e);
        }
        sink.finish()
    }
}

/// Returns false when the record has no resolvable period.
fn ingest_record(counts: &mut PeriodCounts, r: &InputRecord, min_len: usize) -> bool {
    let Some(period) = r.resolved_period() else { return false };
    counts.add_tokens(&period, tokenize(r.text.as_deref(), min_len));
    true
}

fn trending_from_counts(counts: &PeriodCounts, top_k: usize) -> Vec<RankedResult<String, VelocityRecord>> {
    let series = WordTimeSeries::from_frequencies(&counts.frequencies());
    let velocities = velocities_parallel(&series);
    tracing::info!(
        "computed {} velocity records for {} words over {} periods",
        velocities.len(),
        series.len(),
        counts.period_count()
    );
    reports::trending_by_period(&velocities, top_k)
}

fn log_stats(stats: &LoadStats) {
    if stats.malformed > 0 {
        tracing::warn!("skipped {} malformed lines out of {}", stats.malformed, stats.lines);
    }
    tracing::info!("loaded {} records", stats.records);
}
