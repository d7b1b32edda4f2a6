use crate::tokenize::DEFAULT_MIN_WORD_LEN;

/// Metric used to order uri-by-date reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Count,
    Bytes,
}

impl std::str::FromStr for SortField {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "count" | "requests" => Ok(SortField::Count),
            "bytes" | "byte_total" => Ok(SortField::Bytes),
            other => anyhow::bail!("unknown sort field: {other:?} (expected count|bytes)"),
        }
    }
}

/// User-facing options with sensible defaults and builder chaining.
#[derive(Clone, Debug)]
pub struct TrendOptions {
    pub min_word_len: usize,
    pub min_corpus_frequency: f64,  // association candidates below this are ignored
    pub max_associations: usize,
    pub top_k: usize,               // per-group cut for every ranked report
    pub sort_field: SortField,
    pub parallelism: Option<usize>, // Some(N) to set rayon threads, None to use default
    pub file_concurrency: usize,    // limit number of input files decoded concurrently
    pub progress: bool,
    pub progress_label: Option<String>,

    // IO tuning
    pub read_buffer_bytes: usize,
    pub write_buffer_bytes: usize,
}

impl Default for TrendOptions {
    fn default() -> Self {
        Self {
            min_word_len: DEFAULT_MIN_WORD_LEN,
            min_corpus_frequency: 0.000_000_5,
            max_associations: 100,
            top_k: 10,
            sort_field: SortField::Count,
            parallelism: None,
            file_concurrency: 1,
            progress: true,
            progress_label: None,

            read_buffer_bytes: 256 * 1024,
            write_buffer_bytes: 256 * 1024,
        }
    }
}

impl TrendOptions {
    pub fn with_min_word_len(mut self, n: usize) -> Self {
        self.min_word_len = n;
        self
    }
    pub fn with_min_corpus_frequency(mut self, f: f64) -> Self {
        self.min_corpus_frequency = f.max(0.0);
        self
    }
    pub fn with_max_associations(mut self, n: usize) -> Self {
        self.max_associations = n;
        self
    }
    pub fn with_top_k(mut self, n: usize) -> Self {
        self.top_k = n;
        self
    }
    pub fn with_sort_field(mut self, field: SortField) -> Self {
        self.sort_field = field;
        self
    }
    pub fn with_parallelism(mut self, threads: usize) -> Self {
        self.parallelism = Some(threads);
        self
    }
    pub fn with_file_concurrency(mut self, n: usize) -> Self {
        self.file_concurrency = n.max(1);
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }
    pub fn with_progress_label(mut self, label: impl Into<String>) -> Self {
        self.progress_label = Some(label.into());
        self
    }
    pub fn with_io_buffers(mut self, read_bytes: usize, write_bytes: usize) -> Self {
        self.read_buffer_bytes = read_bytes.max(8 * 1024);
        self.write_buffer_bytes = write_bytes.max(8 * 1024);
        self
    }
}
