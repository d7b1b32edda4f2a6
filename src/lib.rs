mod config;
mod date;
mod tokenize;
mod util;

mod aggregate;
mod velocity;
mod rank;
mod sentiment;
mod associations;
mod reports;

mod source;
mod sink;
mod progress;
mod concurrency;
mod pipeline;

pub use crate::config::{SortField, TrendOptions};
pub use crate::date::{consecutive_periods, period_from_epoch, period_from_rfc3339, period_from_url, YearMonth};
pub use crate::pipeline::TrendPipeline;

// Core building blocks: tokenizer, aggregation, velocity, ranking.
pub use crate::tokenize::{normalize_token, tokenize, Tokens, DEFAULT_MIN_WORD_LEN};
pub use crate::aggregate::{aggregate_parallel, Aggregator, PeriodCounts, WordPeriodCount, WordPeriodFrequency};
pub use crate::velocity::{
    combined_velocity, relative_velocity, velocities, velocities_parallel, VelocityRecord, WordTimeSeries,
    GAP_RELATIVE_VELOCITY, VELOCITY_SCALE,
};
pub use crate::rank::{group_top_k, top_k_by, RankedResult};

// Sentiment lexicon and scorer.
pub use crate::sentiment::{score_tokens, Lexicon, SetName};

// Reports built on the ranker.
pub use crate::associations::{associations, Association};
pub use crate::reports::{
    sentiment_by_group, top_words_by_group, trending_by_period, uri_report_by_date, GroupSentiment, LogRecord,
    UriDateReport, UriStat, WordCount,
};

// Null-propagating combinators.
pub use crate::util::{init_tracing_once, null_safe, null_safe2};

// Record source / ranked sink.
pub use crate::source::{discover_inputs, for_each_record, read_records, InputRecord, LoadStats};
pub use crate::sink::RankedSink;

// Shared MultiProgress for callers that draw their own bars alongside ours.
pub use crate::progress::set_global_multiprogress;
