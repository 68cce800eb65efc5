//! Image output.
//!
//! Plain-text PPM (P3) is written directly; any other extension is handed to
//! the `image` crate.

use crate::renderer::{color_to_rgb, ImageBuffer};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while writing a rendered image.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Image buffer holds {actual} pixels, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },
}

pub type OutputResult<T> = Result<T, OutputError>;

fn check_size(image: &ImageBuffer) -> OutputResult<()> {
    let expected = image.width as usize * image.height as usize;
    if image.pixels.len() != expected {
        return Err(OutputError::SizeMismatch {
            expected,
            actual: image.pixels.len(),
        });
    }
    Ok(())
}

/// Write `image` as plain-text PPM: a `P3` header with width, height and
/// maximum channel value, then one RGB triplet per line in scan order.
pub fn write_ppm<W: Write>(image: &ImageBuffer, writer: W) -> OutputResult<()> {
    check_size(image)?;
    let mut writer = BufWriter::new(writer);

    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    for color in &image.pixels {
        let [r, g, b] = color_to_rgb(*color);
        writeln!(writer, "{} {} {}", r, g, b)?;
    }

    writer.flush()?;
    Ok(())
}

/// Save `image` to `path`, choosing the format from the extension.
pub fn save_image(image: &ImageBuffer, path: &Path) -> OutputResult<()> {
    check_size(image)?;

    let is_ppm = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ppm"));

    if is_ppm {
        write_ppm(image, File::create(path)?)?;
    } else {
        image::save_buffer(path, &image.to_rgb8(), image.width, image.height, image::ColorType::Rgb8)?;
    }

    log::info!("Saved {}x{} image to {}", image.width, image.height, path.display());
    Ok(())
}
