use half::f16;
use ndarray::{Array2, ArrayView2};

use crate::half_tables::tables;

/// Storage element for dataset samples.
///
/// Acts as the value sink of the loader: every scanned `f32` goes through
/// `from_f32` before it is appended.
pub trait Element: Copy + Send + Sync + 'static {
    /// Convert a scanned value into storage form
    fn from_f32(value: f32) -> Self;

    /// Widen back to `f32`
    fn to_f32(self) -> f32;
}

impl Element for f32 {
    #[inline(always)]
    fn from_f32(value: f32) -> Self {
        value
    }

    #[inline(always)]
    fn to_f32(self) -> f32 {
        self
    }
}

impl Element for f16 {
    /// Truncating table conversion; `f16::from_f32` would round to nearest.
    #[inline(always)]
    fn from_f32(value: f32) -> Self {
        f16::from_bits(tables().convert(value))
    }

    #[inline(always)]
    fn to_f32(self) -> f32 {
        f16::to_f32(self)
    }
}

/// Accounting gathered during a load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Row count declared by the header line
    pub declared_rows: usize,

    /// Rows dropped because their token exceeded the maximum length
    pub skipped: usize,

    /// Size of the buffered file
    pub bytes_read: u64,
}

impl LoadStats {
    /// Skipped rows as a percentage of the declared row count.
    ///
    /// The header's `rows` is the denominator even when the file holds a
    /// different number of lines, so the figure is approximate in that case.
    pub fn skip_percentage(&self) -> f64 {
        if self.declared_rows == 0 {
            return 0.0;
        }
        self.skipped as f64 / self.declared_rows as f64 * 100.0
    }
}

/// Word vectors loaded from one file.
///
/// `samples` is row-major with `num_features` values per row, and row `i`
/// belongs to `tokens[i]`. Only accepted rows appear, in file order.
#[derive(Debug, Clone)]
pub struct Dataset<T> {
    pub(crate) samples: Vec<T>,
    pub(crate) tokens: Vec<Vec<u8>>,
    pub(crate) num_features: usize,
    pub(crate) stats: LoadStats,
}

impl<T: Element> Dataset<T> {
    /// Number of accepted rows
    pub fn num_samples(&self) -> usize {
        self.tokens.len()
    }

    /// Values per row, as declared by the header
    pub fn num_features(&self) -> usize {
        self.num_features
    }

    /// Flat row-major sample storage
    pub fn samples(&self) -> &[T] {
        &self.samples
    }

    pub fn tokens(&self) -> &[Vec<u8>] {
        &self.tokens
    }

    pub fn token(&self, i: usize) -> &[u8] {
        &self.tokens[i]
    }

    /// Token `i` as UTF-8, if it is valid UTF-8
    pub fn token_str(&self, i: usize) -> Option<&str> {
        std::str::from_utf8(&self.tokens[i]).ok()
    }

    /// Values of row `i`
    pub fn row(&self, i: usize) -> &[T] {
        let start = i * self.num_features;
        &self.samples[start..start + self.num_features]
    }

    /// Iterate over `(token, row)` pairs in file order
    pub fn rows(&self) -> impl Iterator<Item = (&[u8], &[T])> + '_ {
        self.tokens.iter().enumerate().map(move |(i, t)| (t.as_slice(), self.row(i)))
    }

    pub fn stats(&self) -> &LoadStats {
        &self.stats
    }

    /// Bytes occupied by the sample storage
    pub fn size_bytes(&self) -> usize {
        self.samples.len() * std::mem::size_of::<T>()
    }

    /// Zero-copy `(num_samples, num_features)` view, the shape k-means consumers take
    pub fn view(&self) -> ArrayView2<'_, T> {
        ArrayView2::from_shape((self.num_samples(), self.num_features), &self.samples)
            .expect("samples length is num_samples * num_features")
    }

    /// Move the samples into an owned `(num_samples, num_features)` array
    pub fn into_array(self) -> Array2<T> {
        let shape = (self.num_samples(), self.num_features);
        Array2::from_shape_vec(shape, self.samples)
            .expect("samples length is num_samples * num_features")
    }

    /// Split into the flat samples and the tokens
    pub fn into_parts(self) -> (Vec<T>, Vec<Vec<u8>>) {
        (self.samples, self.tokens)
    }

    /// Widen every value to `f32`
    pub fn to_f32(&self) -> Dataset<f32> {
        Dataset {
            samples: self.samples.iter().map(|&v| v.to_f32()).collect(),
            tokens: self.tokens.clone(),
            num_features: self.num_features,
            stats: self.stats,
        }
    }
}

/// A dataset whose storage width was chosen at runtime
#[derive(Debug, Clone)]
pub enum LoadedDataset {
    Full(Dataset<f32>),
    Half(Dataset<f16>),
}

impl LoadedDataset {
    pub fn num_samples(&self) -> usize {
        match self {
            LoadedDataset::Full(d) => d.num_samples(),
            LoadedDataset::Half(d) => d.num_samples(),
        }
    }

    pub fn num_features(&self) -> usize {
        match self {
            LoadedDataset::Full(d) => d.num_features(),
            LoadedDataset::Half(d) => d.num_features(),
        }
    }

    pub fn tokens(&self) -> &[Vec<u8>] {
        match self {
            LoadedDataset::Full(d) => d.tokens(),
            LoadedDataset::Half(d) => d.tokens(),
        }
    }

    pub fn stats(&self) -> &LoadStats {
        match self {
            LoadedDataset::Full(d) => d.stats(),
            LoadedDataset::Half(d) => d.stats(),
        }
    }

    pub fn size_bytes(&self) -> usize {
        match self {
            LoadedDataset::Full(d) => d.size_bytes(),
            LoadedDataset::Half(d) => d.size_bytes(),
        }
    }

    pub fn is_quantized(&self) -> bool {
        matches!(self, LoadedDataset::Half(_))
    }

    /// Full-precision samples, widening half storage if needed
    pub fn into_f32(self) -> Dataset<f32> {
        match self {
            LoadedDataset::Full(d) => d,
            LoadedDataset::Half(d) => d.to_f32(),
        }
    }
}
