//! `chromakey` command-line host
//!
//! Loads a foreground and a background image, prints the selected key color
//! and writes one composited overlay per requested tolerance.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chromakey::Image;
use chromakey::color::{ChromaKeyOptions, ChromaKeySession, DEFAULT_BUCKET_COUNT, ToleranceRange};
use chromakey::io::{self, ImageFormat};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "chromakey")]
#[command(author, version, about = "Replace the dominant color of an image with a tiled background", long_about = None)]
struct Args {
    /// Foreground image; its most common color becomes the key
    #[arg(short, long, default_value = "foreground.jpg")]
    foreground: PathBuf,

    /// Background image, tiled when smaller than the foreground
    #[arg(short, long, default_value = "background.jpg")]
    background: PathBuf,

    /// Output image; format follows the extension (JPEG if unknown)
    #[arg(short, long, default_value = "overlay.jpg")]
    output: PathBuf,

    /// Histogram buckets per channel (1-256)
    #[arg(long, default_value_t = DEFAULT_BUCKET_COUNT)]
    buckets: u32,

    /// Per-channel tolerance; repeat for several outputs (default: half a bucket width)
    #[arg(short, long)]
    tolerance: Vec<u32>,

    /// Build the histogram and composite rows in parallel
    #[arg(long)]
    parallel: bool,
}

/// Insert `.tNNN` before the extension of `path`
fn with_tolerance_suffix(path: &Path, tolerance: u32) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}.t{:03}.{}", stem, tolerance, ext.to_string_lossy()),
        None => format!("{}.t{:03}", stem, tolerance),
    };
    path.with_file_name(name)
}

/// Load both inputs. Unreadable and zero-sized images are both rejected.
fn load_inputs(foreground: &Path, background: &Path) -> Result<(Image, Image)> {
    match (io::read_image(foreground), io::read_image(background)) {
        (Ok(fg), Ok(bg)) if !fg.is_empty() && !bg.is_empty() => Ok((fg, bg)),
        (fg, bg) => {
            for (path, loaded) in [(foreground, fg), (background, bg)] {
                match loaded {
                    Err(err) => log::error!("{}", err),
                    Ok(image) if image.is_empty() => log::error!("'{}' is empty", path.display()),
                    Ok(_) => {}
                }
            }
            anyhow::bail!(
                "Could not load '{}' and '{}'",
                foreground.display(),
                background.display()
            );
        }
    }
}

/// Clamp requested tolerances into `range`, keeping the first occurrence of
/// each clamped value. No request means the range's starting tolerance.
fn resolve_tolerances(requested: &[u32], range: ToleranceRange) -> Vec<u32> {
    if requested.is_empty() {
        return vec![range.initial];
    }

    let mut tolerances = Vec::with_capacity(requested.len());
    for &value in requested {
        let tolerance = range.clamp(value);
        if tolerance != value {
            log::warn!("tolerance {} clamped to {}", value, tolerance);
        }
        if !tolerances.contains(&tolerance) {
            tolerances.push(tolerance);
        }
    }
    tolerances
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let (foreground, background) = load_inputs(&args.foreground, &args.background)?;
    log::info!(
        "foreground {}x{}, background {}x{}",
        foreground.width(),
        foreground.height(),
        background.width(),
        background.height()
    );

    let options = ChromaKeyOptions::default()
        .with_bucket_count(args.buckets)
        .with_parallel(args.parallel);
    let session = ChromaKeySession::new(foreground, background, options)
        .context("failed to select the key color")?;
    println!("{}", session.report());

    let tolerances = resolve_tolerances(&args.tolerance, session.tolerance_range());
    let format = ImageFormat::from_path(&args.output).unwrap_or(ImageFormat::Jpeg);

    for &tolerance in &tolerances {
        let overlay = session
            .set_tolerance(tolerance)
            .with_context(|| format!("failed to composite at tolerance {}", tolerance))?;
        let path = if tolerances.len() > 1 {
            with_tolerance_suffix(&args.output, tolerance)
        } else {
            args.output.clone()
        };
        io::write_image(&overlay, &path, format)
            .with_context(|| format!("failed to write '{}'", path.display()))?;
        log::info!("tolerance {}: wrote {}", tolerance, path.display());
    }

    Ok(())
}
