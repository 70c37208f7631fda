//! # fastvecs-rs
//!
//! A fast loader for word-vector text files (word2vec / fastText `.vec`
//! style), producing a contiguous sample matrix ready for k-means and
//! similar ndarray consumers.
//!
//! ## Features
//!
//! - **Single-pass parsing**: the file is buffered once and scanned with a
//!   bounds-checked cursor; no per-field string allocation
//! - **Token filtering**: rows whose token exceeds a maximum byte length are
//!   skipped and counted
//! - **Half-precision storage**: optional `f32 -> f16` truncation through
//!   precomputed 512-entry lookup tables
//! - **ndarray compatible**: `Dataset::view()` is a zero-copy `ArrayView2`
//! - **Parallel multi-file loading** with rayon
//!
//! ## File format
//!
//! ```text
//! <rows> <cols>
//! <token> <v1> <v2> ... <vcols>
//! ...
//! ```
//!
//! ## Example
//!
//! ```rust
//! use fastvecs_rs::VectorLoader;
//!
//! let input = b"3 2\ncat 1.0 2.0\ndog 3.5 4.25\nbird 0.0 -1.0\n";
//! let dataset = VectorLoader::new(3).parse::<f32>(input).unwrap();
//!
//! assert_eq!(dataset.num_samples(), 2);
//! assert_eq!(dataset.stats().skipped, 1);
//! assert_eq!(dataset.view().shape(), &[2, 2]);
//! ```
//!
//! ## Quantized loading
//!
//! ```rust,no_run
//! use fastvecs_rs::load;
//!
//! let dataset = load("wiki.en.vec", 32, true).unwrap();
//! assert!(dataset.is_quantized());
//! ```

mod config;
mod cursor;
mod dataset;
mod error;
pub mod half_tables;
mod loader;
pub mod scan;

pub use config::LoaderConfig;
pub use dataset::{Dataset, Element, LoadStats, LoadedDataset};
pub use error::{FormatError, LoadError};
pub use half_tables::{generate_tables, to_half, to_half_bits, HalfTables};
pub use loader::{load, load_many, parse_header, VectorLoader, CHECK_INTERVAL};
pub use scan::scan_f32;

pub use half::f16;
