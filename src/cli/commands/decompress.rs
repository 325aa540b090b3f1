//! Decompress command
//!
//! Decompresses the given container files, or every file in a
//! directory, continuing past individual failures.

use std::path::{Path, PathBuf};
use std::time::Instant;

use indicatif::HumanBytes;

use crate::cli::progress::{DISK, LOOKING_GLASS, PACKAGE, print_done, print_step, simple_bar};
use crate::extract::{decompress_batch, decompress_file, find_container_files};

pub fn execute(
    paths: &[PathBuf],
    all: bool,
    dir: Option<&Path>,
    recursive: bool,
    output: Option<&Path>,
    quiet: bool,
) -> anyhow::Result<()> {
    let started = Instant::now();

    if let Some(out_dir) = output {
        std::fs::create_dir_all(out_dir)?;
    }

    if all {
        let scan_dir = dir.unwrap_or(Path::new("."));
        if !quiet {
            print_step(1, 2, LOOKING_GLASS, &format!("Scanning {}...", scan_dir.display()));
        }
        let files = find_container_files(scan_dir, recursive);
        if files.is_empty() {
            println!("No files found in {}", scan_dir.display());
            return Ok(());
        }

        if !quiet {
            print_step(2, 2, PACKAGE, &format!("Decompressing {} files...", files.len()));
        }
        let bar = if quiet {
            None
        } else {
            Some(simple_bar(files.len() as u64, "Decompressing"))
        };
        let summary = decompress_batch(&files, output, |_, _, _| {
            if let Some(pb) = &bar {
                pb.inc(1);
            }
        });
        if let Some(pb) = bar {
            pb.finish_and_clear();
        }

        for line in &summary.results {
            println!("{line}");
        }
        println!(
            "{} decompressed, {} failed",
            summary.success_count, summary.fail_count
        );
        if !quiet {
            print_done(started.elapsed());
        }
        return Ok(());
    }

    let mut failures = 0usize;
    for (index, path) in paths.iter().enumerate() {
        if !path.exists() {
            println!("File not found: {}", path.display());
            failures += 1;
            continue;
        }
        if !path.is_file() {
            continue;
        }

        match decompress_file(path, output) {
            Ok(outcome) => {
                if !quiet {
                    print_step(
                        index + 1,
                        paths.len(),
                        DISK,
                        &format!(
                            "{} -> {} ({} -> {})",
                            outcome.source.display(),
                            outcome.output.display(),
                            HumanBytes(outcome.compressed_size),
                            HumanBytes(outcome.uncompressed_size),
                        ),
                    );
                }
            }
            Err(e) => {
                // A bad file never aborts the run.
                println!("Failed {}: {e}", path.display());
                failures += 1;
            }
        }
    }

    if !quiet {
        print_done(started.elapsed());
    }
    if failures > 0 {
        println!("{failures} of {} files failed", paths.len());
    }
    Ok(())
}
