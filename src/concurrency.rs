//! Concurrency helper: limit the number of input files decoded in parallel.

use rayon::prelude::*;
use std::path::PathBuf;

/// Map every file through `f`, with at most `limit` files in flight.
/// Results come back in the order of `files`.
pub fn map_files_limited<T, F>(files: &[PathBuf], limit: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Sync + Fn(&PathBuf) -> T,
{
    if limit <= 1 {
        return files.iter().map(&f).collect();
    }
    let mut out = Vec::with_capacity(files.len());
    for chunk in files.chunks(limit) {
        let part: Vec<T> = chunk.par_iter().map(&f).collect();
        out.extend(part);
    }
    out
}
