use anyhow::{Context, Result};
use indicatif::MultiProgress;
use std::path::PathBuf;
use std::sync::Arc;
use trendscan::{set_global_multiprogress, TrendPipeline};

const DEFAULT_INPUT: &str = "./data";
const DEFAULT_OUTPUT: &str = "./trending.ndjson";

/// trendscan [input] [output] [top_k]
/// Reads NDJSON / .zst JSONL records ({"text","period","group",...}) from a file or
/// directory and writes the top trending words of each period as NDJSON.
fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let input = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_INPUT.to_string()));
    let output = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_OUTPUT.to_string()));
    let top_k = match args.next() {
        Some(k) => k.parse::<usize>().with_context(|| format!("invalid top_k: {k}"))?,
        None => 10,
    };
    let mp = Arc::new(MultiProgress::new());
    set_global_multiprogress(mp.clone());
    let hw = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(8);

    let rows = TrendPipeline::new()
        .parallelism(hw)
        .file_concurrency(4)
        .top_k(top_k)
        .progress_label("Counting words")
        .trending_files(&input, &output)?;

    mp.clear().ok();
    println!("Wrote {} trending periods to {}", rows, output.display());
    Ok(())
}
