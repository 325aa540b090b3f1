//! File-level decompression collaborators.
//!
//! The core decoder is a pure bytes-to-bytes function; this module adds
//! the surrounding tooling behavior: reading a container file, choosing
//! the output name, writing the payload, and batch processing whole
//! directories in parallel.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::cpr;
use crate::error::Result;

/// Input extensions that mark an image-bearing payload. Everything else
/// is written out as generic binary.
const IMAGE_EXTENSIONS: [&str; 4] = ["PHD", "PHN", "PND", "PNN"];

/// Outcome of decompressing a single file.
#[derive(Debug, Clone)]
pub struct DecompressedFile {
    /// The container file that was read.
    pub source: PathBuf,
    /// Where the decoded payload was written.
    pub output: PathBuf,
    /// Size of the container in bytes.
    pub compressed_size: u64,
    /// Size of the decoded payload in bytes.
    pub uncompressed_size: u64,
}

/// Result of a batch decompression run.
#[derive(Debug, Clone)]
pub struct BatchResult {
    /// Number of files decompressed successfully.
    pub success_count: usize,
    /// Number of files that failed.
    pub fail_count: usize,
    /// One message per file processed.
    pub results: Vec<String>,
}

/// Output path for a decompressed input: image-bearing extensions map
/// to `.PNG`, anything else to `.BIN`.
pub fn output_path_for(input: &Path) -> PathBuf {
    let ext = input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    let mapped = if IMAGE_EXTENSIONS
        .iter()
        .any(|image| image.eq_ignore_ascii_case(ext))
    {
        "PNG"
    } else {
        "BIN"
    };
    input.with_extension(mapped)
}

/// Read, decode, and write one container file.
///
/// The output lands next to the input unless `out_dir` redirects it.
pub fn decompress_file(path: &Path, out_dir: Option<&Path>) -> Result<DecompressedFile> {
    tracing::debug!(path = %path.display(), "decompressing container file");

    let data = std::fs::read(path)?;
    let decoded = cpr::decode(&data)?;

    let mut output = output_path_for(path);
    if let Some(dir) = out_dir {
        if let Some(name) = output.file_name() {
            output = dir.join(name);
        }
    }
    std::fs::write(&output, &decoded)?;

    Ok(DecompressedFile {
        source: path.to_path_buf(),
        output,
        compressed_size: data.len() as u64,
        uncompressed_size: decoded.len() as u64,
    })
}

/// Find candidate container files in a directory.
///
/// Non-recursive by default, matching the tool's "decompress everything
/// here" mode. Returns a sorted list.
pub fn find_container_files<P: AsRef<Path>>(dir: P, recursive: bool) -> Vec<PathBuf> {
    let walker = if recursive {
        WalkDir::new(dir)
    } else {
        WalkDir::new(dir).max_depth(1)
    };

    let mut files: Vec<_> = walker
        .follow_links(true)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.path().is_file())
        .map(|e| e.path().to_path_buf())
        .collect();

    files.sort();
    files
}

/// Decompress a set of files in parallel.
///
/// A failing file is reported in the result and skipped; the batch
/// never aborts on a single bad input.
pub fn decompress_batch<F>(files: &[PathBuf], out_dir: Option<&Path>, progress: F) -> BatchResult
where
    F: Fn(usize, usize, &str) + Send + Sync,
{
    let success_counter = AtomicUsize::new(0);
    let fail_counter = AtomicUsize::new(0);
    let processed = AtomicUsize::new(0);
    let total = files.len();

    let results: Vec<String> = files
        .par_iter()
        .map(|path| {
            let display_path = path.display().to_string();
            let current = processed.fetch_add(1, Ordering::SeqCst) + 1;
            progress(current, total, &display_path);

            match decompress_file(path, out_dir) {
                Ok(outcome) => {
                    success_counter.fetch_add(1, Ordering::SeqCst);
                    format!(
                        "Decompressed: {display_path} ({} -> {} bytes)",
                        outcome.compressed_size, outcome.uncompressed_size
                    )
                }
                Err(e) => {
                    fail_counter.fetch_add(1, Ordering::SeqCst);
                    format!("Failed {display_path}: {e}")
                }
            }
        })
        .collect();

    BatchResult {
        success_count: success_counter.load(Ordering::SeqCst),
        fail_count: fail_counter.load(Ordering::SeqCst),
        results,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn image_extensions_map_to_png() {
        for ext in ["PHD", "phn", "Pnd", "PNN"] {
            let path = PathBuf::from(format!("map_tile.{ext}"));
            assert_eq!(output_path_for(&path), PathBuf::from("map_tile.PNG"));
        }
    }

    #[test]
    fn other_extensions_map_to_bin() {
        assert_eq!(
            output_path_for(Path::new("route.dat")),
            PathBuf::from("route.BIN")
        );
        assert_eq!(
            output_path_for(Path::new("noext")),
            PathBuf::from("noext.BIN")
        );
    }
}
