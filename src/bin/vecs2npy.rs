//! Convert a word-vector text file into a .npy sample matrix
//!
//! Loads the file with fastvecs-rs and writes the `(num_samples, num_features)`
//! matrix with ndarray-npy, plus the accepted tokens (one per line) next to it
//! as `<output>.tokens.txt`. With `--f16` values go through half-precision
//! truncation and are widened back to `f32` for the .npy file.
//!
//! Usage: `vecs2npy <input.vec> <output.npy> [max_token_len] [--f16]`

use fastvecs_rs::{LoaderConfig, VectorLoader};
use ndarray_npy::WriteNpyExt;
use std::env;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn setup_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_logging();

    let mut args: Vec<String> = env::args().collect();
    let quantize = match args.iter().position(|a| a == "--f16") {
        Some(i) => {
            args.remove(i);
            true
        }
        None => false,
    };

    if args.len() < 3 || args.len() > 4 {
        eprintln!(
            "Usage: {} <input.vec> <output.npy> [max_token_len] [--f16]",
            args[0]
        );
        std::process::exit(1);
    }

    let input_path = &args[1];
    let output_path = PathBuf::from(&args[2]);
    let max_token_len: usize = match args.get(3) {
        Some(s) => s.parse()?,
        None => LoaderConfig::default().max_token_len,
    };

    info!("max_token_len = {}", max_token_len);
    info!("quantize = {}", quantize);

    let config = LoaderConfig::new(max_token_len)
        .with_quantize(quantize)
        .with_progress(true);
    let dataset = VectorLoader::with_config(config).load(input_path)?;

    info!("num_features = {}", dataset.num_features());
    info!("num_samples = {}", dataset.num_samples());

    let dataset = dataset.into_f32();

    let mut tokens_path = output_path.clone().into_os_string();
    tokens_path.push(".tokens.txt");
    let mut tokens_out = BufWriter::new(File::create(&tokens_path)?);
    for token in dataset.tokens() {
        tokens_out.write_all(token)?;
        tokens_out.write_all(b"\n")?;
    }
    tokens_out.flush()?;

    let samples = dataset.into_array();
    let writer = BufWriter::new(File::create(&output_path)?);
    samples.write_npy(writer)?;

    info!(
        "Saved {:?} matrix to {} (tokens in {})",
        samples.shape(),
        output_path.display(),
        PathBuf::from(tokens_path).display()
    );

    Ok(())
}
