use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Configuration for the word-vector loader
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Maximum token length in bytes. Rows whose token is longer are skipped.
    pub max_token_len: usize,

    /// Store samples as half-precision instead of `f32`
    pub quantize: bool,

    /// Draw a progress bar over the declared row count while parsing
    pub progress: bool,

    /// Cooperative cancellation flag, polled between rows.
    /// When it becomes `true` the load aborts with `LoadError::Cancelled`.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            max_token_len: 32,
            quantize: false,
            progress: false,
            cancel: None,
        }
    }
}

impl LoaderConfig {
    /// Create a new configuration with the specified maximum token length
    pub fn new(max_token_len: usize) -> Self {
        Self {
            max_token_len,
            ..Default::default()
        }
    }

    /// Set the maximum token length
    pub fn with_max_token_len(mut self, max_token_len: usize) -> Self {
        self.max_token_len = max_token_len;
        self
    }

    /// Set half-precision storage
    pub fn with_quantize(mut self, quantize: bool) -> Self {
        self.quantize = quantize;
        self
    }

    /// Enable or disable the progress bar
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Attach a cancellation flag
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_cli_default() {
        let config = LoaderConfig::default();
        assert_eq!(config.max_token_len, 32);
        assert!(!config.quantize);
        assert!(!config.progress);
        assert!(config.cancel.is_none());
    }

    #[test]
    fn test_builder_chain() {
        let flag = Arc::new(AtomicBool::new(false));
        let config = LoaderConfig::new(10)
            .with_quantize(true)
            .with_progress(true)
            .with_cancel_flag(flag.clone());

        assert_eq!(config.max_token_len, 10);
        assert!(config.quantize);
        assert!(config.progress);
        assert!(Arc::ptr_eq(config.cancel.as_ref().unwrap(), &flag));
    }
}
