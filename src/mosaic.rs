//! Image mosaic conversion
//!
//! Turns a level image into the block grid: centered square crop, smoothed
//! down-sample to an N x N cell grid, brightness filtering, saturation
//! boost, and geometric layout inside the canvas. Fully deterministic: the
//! same image and config always yield the same blocks.

use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::DynamicImage;
use thiserror::Error;

use crate::config::Config;
use crate::sim::field::Block;

/// Level image failed to load or decode. Recoverable: the caller keeps the
/// previous block field and surfaces a message; there is no automatic retry.
#[derive(Debug, Error)]
pub enum LevelLoadError {
    #[error("failed to load level image {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("level loader for {path:?} terminated unexpectedly")]
    WorkerLost { path: PathBuf },
}

/// Load a level image from disk and convert it to blocks
pub fn build_level(path: &Path, config: &Config) -> Result<Vec<Block>, LevelLoadError> {
    let img = image::open(path).map_err(|source| LevelLoadError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!(
        "Decoded level image {:?} ({}x{})",
        path,
        img.width(),
        img.height()
    );
    Ok(blocks_from_image(&img, config))
}

/// Convert a decoded image into the level's block grid
pub fn blocks_from_image(img: &DynamicImage, config: &Config) -> Vec<Block> {
    let n = config.mosaic_n;

    // Centered square crop
    let side = img.width().min(img.height());
    let sx = (img.width() - side) / 2;
    let sy = (img.height() - side) / 2;
    let square = img.crop_imm(sx, sy, side, side);

    // Smoothed down-sample: one representative sample per prospective cell
    let cells = square.resize_exact(n, n, FilterType::Triangle).to_rgb8();

    let layout = GridLayout::compute(config);
    let mut blocks = Vec::with_capacity((n * n) as usize);

    for cy in 0..n {
        for cx in 0..n {
            let [r, g, b] = cells.get_pixel(cx, cy).0;
            let lum = (r as f32 + g as f32 + b as f32) / 3.0;
            // Near-white background cells carry no block
            if lum >= config.bright_cutoff {
                continue;
            }
            blocks.push(Block {
                x: layout.start_x + cx as f32 * layout.stride,
                y: layout.start_y + cy as f32 * layout.stride,
                w: layout.size,
                h: layout.size,
                color: sat_boost(r, g, b, config.sat_boost),
                alive: true,
            });
        }
    }

    log::info!(
        "Mosaic conversion produced {} blocks ({} cells skipped)",
        blocks.len(),
        (n * n) as usize - blocks.len()
    );
    blocks
}

/// Push a color away from its perceptual gray by factor `k`, clamped to the
/// channel range. Pure per-pixel transform; exact no-op on gray input.
pub fn sat_boost(r: u8, g: u8, b: u8, k: f32) -> [u8; 3] {
    let gray = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
    let push = |c: u8| (gray + (c as f32 - gray) * k).clamp(0.0, 255.0).round() as u8;
    [push(r), push(g), push(b)]
}

/// Block edge length and grid origin for an N x N layout
#[derive(Debug, Clone, Copy)]
struct GridLayout {
    size: f32,
    stride: f32,
    start_x: f32,
    start_y: f32,
}

impl GridLayout {
    /// Largest square cell that fits the gapped grid into the configured
    /// canvas fraction both ways, scaled by the enlargement factor. The grid
    /// is centered horizontally and vertically centered in the block band
    /// below the header offset.
    fn compute(config: &Config) -> Self {
        let n = config.mosaic_n as f32;
        let gap = config.block_gap;

        let usable_w = config.canvas_width * config.field_width_frac * config.field_area_scale;
        let usable_h = config.canvas_height * config.field_height_frac * config.field_area_scale;
        let fit_w = (usable_w - gap * (n - 1.0)) / n;
        let fit_h = (usable_h - gap * (n - 1.0)) / n;
        let size = (fit_w.min(fit_h) * config.block_scale).floor();

        let total = n * size + (n - 1.0) * gap;
        let band_h = config.canvas_height * config.field_height_frac;

        Self {
            size,
            stride: size + gap,
            start_x: ((config.canvas_width - total) / 2.0).floor(),
            start_y: (config.field_top_offset + (band_h - total) / 2.0).floor(),
        }
    }
}
