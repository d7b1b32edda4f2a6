use crate::util::{create_with_backoff, remove_with_backoff, replace_file_atomic_backoff};
use anyhow::{Context, Result};
use parking_lot::Mutex;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// NDJSON sink for ranked rows: one JSON object per line.
/// Rows go to `<final>.inprogress` and are promoted to the final path on `finish()`,
/// so a crashed run never leaves a half-written report behind.
/// `write_row` takes `&self`; the sink can be shared across rayon workers.
pub struct RankedSink {
    tmp_path: PathBuf,
    final_path: PathBuf,
    w: Mutex<BufWriter<File>>,
    rows: AtomicU64,
}

impl RankedSink {
    pub fn create(final_path: &Path, buf_bytes: usize) -> Result<Self> {
        if let Some(dir) = final_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
        }
        let mut tmp_name = final_path.as_os_str().to_owned();
        tmp_name.push(".inprogress");
        let tmp_path = PathBuf::from(tmp_name);
        let f = create_with_backoff(&tmp_path, 16, 50).with_context(|| format!("create {}", tmp_path.display()))?;
        Ok(Self {
            tmp_path,
            final_path: final_path.to_path_buf(),
            w: Mutex::new(BufWriter::with_capacity(buf_bytes.max(8 * 1024), f)),
            rows: AtomicU64::new(0),
        })
    }

    pub fn write_row<T: Serialize>(&self, row: &T) -> Result<()> {
        let line = serde_json::to_string(row)?;
        let mut w = self.w.lock();
        w.write_all(line.as_bytes())?;
        w.write_all(b"\n")?;
        self.rows.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    pub fn write_all<'a, T, I>(&self, rows: I) -> Result<()>
    where
        T: Serialize + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        for r in rows {
            self.write_row(r)?;
        }
        Ok(())
    }

    /// Flush, promote the temp file, and return the number of rows written.
    pub fn finish(self) -> Result<u64> {
        let rows = self.rows.load(Ordering::Relaxed);
        let mut w = self.w.into_inner();
        w.flush().with_context(|| format!("flush {}", self.tmp_path.display()))?;
        drop(w);
        replace_file_atomic_backoff(&self.tmp_path, &self.final_path)?;
        tracing::info!("wrote {} rows to {}", rows, self.final_path.display());
        Ok(rows)
    }

    /// Drop the partial output; the final path is left untouched.
    pub fn abort(self) -> Result<()> {
        drop(self.w.into_inner());
        remove_with_backoff(&self.tmp_path, 16, 50)
            .with_context(|| format!("remove {}", self.tmp_path.display()))?;
        tracing::warn!("discarded partial output {}", self.tmp_path.display());
        Ok(())
    }
}
