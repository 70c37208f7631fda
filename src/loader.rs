use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::atomic::Ordering;
use std::time::Instant;

use half::f16;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::LoaderConfig;
use crate::cursor::Cursor;
use crate::dataset::{Dataset, Element, LoadStats, LoadedDataset};
use crate::error::{FormatError, LoadError};
use crate::half_tables::tables;

/// Rows between cancellation polls and progress bar updates
pub const CHECK_INTERVAL: usize = 16_384;

const MIB: f64 = 1024.0 * 1024.0;

/// Loader for `<rows> <cols>` headed word-vector text files.
///
/// The whole file is read into one buffer and parsed in a single pass.
/// Rows whose token is longer than `max_token_len` bytes are counted and
/// dropped; every other row contributes its token and exactly `cols` values.
///
/// # Example
///
/// ```no_run
/// use fastvecs_rs::{LoaderConfig, VectorLoader};
///
/// let loader = VectorLoader::with_config(LoaderConfig::new(32).with_quantize(true));
/// let dataset = loader.load("vectors.vec").unwrap();
/// println!("{} x {}", dataset.num_samples(), dataset.num_features());
/// ```
pub struct VectorLoader {
    config: LoaderConfig,
}

impl VectorLoader {
    /// Create a loader with default settings and the given maximum token length
    pub fn new(max_token_len: usize) -> Self {
        Self {
            config: LoaderConfig::new(max_token_len),
        }
    }

    pub fn with_config(config: LoaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load a file, storing samples as `f16` when `quantize` is set and as `f32` otherwise.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<LoadedDataset, LoadError> {
        if self.config.quantize {
            self.load_as::<f16, _>(path).map(LoadedDataset::Half)
        } else {
            self.load_as::<f32, _>(path).map(LoadedDataset::Full)
        }
    }

    /// Load a file with an explicit storage element type.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be opened or fully read
    /// - The header line is missing or malformed
    /// - A data line ends before its token delimiter or its numeric fields
    /// - The cancel flag is raised
    pub fn load_as<T: Element, P: AsRef<Path>>(&self, path: P) -> Result<Dataset<T>, LoadError> {
        let path = path.as_ref();
        let start = Instant::now();
        info!("Loading word vector data from {}", path.display());

        let buffer = read_file(path)?;
        let dataset = self.parse::<T>(&buffer)?;
        drop(buffer);

        info!(
            "Loaded {} x {} in {:.3}s",
            dataset.num_samples(),
            dataset.num_features(),
            start.elapsed().as_secs_f64()
        );
        Ok(dataset)
    }

    /// Parse an in-memory word-vector file.
    pub fn parse<T: Element>(&self, input: &[u8]) -> Result<Dataset<T>, LoadError> {
        let mut cursor = Cursor::new(input);
        let (rows, cols) = parse_header(cursor.take_line())?;
        info!("rows = {} cols = {}", rows, cols);

        // The header only hints at capacity; a bogus row count must not
        // allocate more than the input could possibly hold.
        let max_values = input.len() / 2;
        let mut samples: Vec<T> = Vec::with_capacity(rows.saturating_mul(cols).min(max_values));
        let mut tokens: Vec<Vec<u8>> = Vec::with_capacity(rows.min(max_values));

        let max_token_len = self.config.max_token_len;
        let progress = self.progress_bar(rows);
        let mut lines = 0usize;
        let mut skipped = 0usize;

        while !cursor.is_at_end() {
            if lines % CHECK_INTERVAL == 0 {
                self.check_cancelled(lines)?;
                progress.set_position(lines as u64);
            }

            let token = cursor.take_token()?;
            lines += 1;

            if token.len() > max_token_len {
                skipped += 1;
                cursor.skip_line();
                continue;
            }

            for i in 0..cols {
                if i > 0 {
                    cursor.expect_separator()?;
                }
                samples.push(T::from_f32(cursor.scan_field()?));
            }
            tokens.push(token.to_vec());
            cursor.skip_line();
        }
        progress.finish_and_clear();

        if lines != rows {
            debug!("header declared {} rows, file contains {}", rows, lines);
        }

        let stats = LoadStats {
            declared_rows: rows,
            skipped,
            bytes_read: input.len() as u64,
        };
        info!(
            "skipped words = {} ({:.2}%)",
            skipped,
            stats.skip_percentage()
        );

        let dataset = Dataset {
            samples,
            tokens,
            num_features: cols,
            stats,
        };
        info!(
            "data size in MiB = {:.2}",
            dataset.size_bytes() as f64 / MIB
        );

        Ok(dataset)
    }

    fn check_cancelled(&self, rows_parsed: usize) -> Result<(), LoadError> {
        match &self.config.cancel {
            Some(flag) if flag.load(Ordering::Relaxed) => {
                info!("Load cancelled after {} rows", rows_parsed);
                Err(LoadError::Cancelled { rows_parsed })
            }
            _ => Ok(()),
        }
    }

    fn progress_bar(&self, rows: usize) -> ProgressBar {
        if !self.config.progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(rows as u64);
        if let Ok(style) = ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} rows ({eta})",
        ) {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    }
}

/// Parse the `<rows> <cols>` header line.
pub fn parse_header(line: &[u8]) -> Result<(usize, usize), FormatError> {
    let text = std::str::from_utf8(line)
        .map_err(|_| FormatError::BadHeader("header is not ASCII".to_string()))?;
    let mut fields = text.split_ascii_whitespace();

    let mut next_count = |name: &str| -> Result<usize, FormatError> {
        let field = fields
            .next()
            .ok_or_else(|| FormatError::BadHeader(format!("missing {}", name)))?;
        field
            .parse::<usize>()
            .map_err(|e| FormatError::BadHeader(format!("invalid {} {:?}: {}", name, field, e)))
    };

    let rows = next_count("row count")?;
    let cols = next_count("column count")?;

    if let Some(extra) = fields.next() {
        return Err(FormatError::BadHeader(format!(
            "unexpected field {:?} after column count",
            extra
        )));
    }

    Ok((rows, cols))
}

/// Read the whole file into one buffer, failing on a partial read.
fn read_file(path: &Path) -> Result<Vec<u8>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let read_err = |source: std::io::Error| LoadError::Read {
        path: path.to_path_buf(),
        source,
    };

    let metadata = file.metadata().map_err(read_err)?;
    if metadata.is_dir() {
        return Err(read_err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "path is a directory",
        )));
    }
    let expected = metadata.len();
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(expected as usize)
        .map_err(|e| read_err(std::io::Error::new(std::io::ErrorKind::OutOfMemory, e)))?;

    let start = Instant::now();
    let actual = file
        .take(expected)
        .read_to_end(&mut buffer)
        .map_err(read_err)? as u64;
    if actual != expected {
        return Err(LoadError::ShortRead {
            path: path.to_path_buf(),
            expected,
            actual,
        });
    }

    let secs = start.elapsed().as_secs_f64();
    let mib = actual as f64 / MIB;
    info!(
        "read {:.1} MiB in {:.3}s ({:.1} MiB/s)",
        mib,
        secs,
        if secs > 0.0 { mib / secs } else { 0.0 }
    );

    Ok(buffer)
}

/// Load a word-vector file.
///
/// `max_token_len` is inclusive: a token of exactly that many bytes is kept.
/// With `quantize` set, samples are truncated to half precision.
pub fn load<P: AsRef<Path>>(
    path: P,
    max_token_len: usize,
    quantize: bool,
) -> Result<LoadedDataset, LoadError> {
    let config = LoaderConfig::new(max_token_len).with_quantize(quantize);
    VectorLoader::with_config(config).load(path)
}

/// Load several files in parallel, one result per path in input order.
pub fn load_many<P: AsRef<Path> + Sync>(
    paths: &[P],
    config: &LoaderConfig,
) -> Vec<Result<LoadedDataset, LoadError>> {
    if config.quantize {
        // Generate the shared tables before fanning out
        let _ = tables();
    }

    let loader = VectorLoader::with_config(config.clone());
    paths.par_iter().map(|path| loader.load(path)).collect()
}
