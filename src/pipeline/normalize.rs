//! Image normalization: decode one entry and flatten it to opaque RGB.
//!
//! Every page of the output document uses the same colour model — three
//! 8-bit channels, no alpha. Sources that carry transparency (an explicit
//! alpha channel or luminance-plus-alpha; palette images with a transparent
//! index are expanded to RGBA by the decoder) are composited over an opaque
//! white canvas using their own alpha as the blend mask. Everything else is
//! converted directly, discarding nothing.
//!
//! The decoded image is scoped to this module: the returned [`RgbImage`]
//! owns its pixel buffer and the decoder's allocation is released before the
//! call returns, which bounds peak memory to the normalized images alone
//! when batches are large.

use crate::error::EntryError;
use crate::pipeline::discover::ImageEntry;
use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use tracing::debug;

/// Decode one entry in its native format.
///
/// A failure identifies the offending file and the underlying cause; the
/// caller records it and moves on to the next entry. Also used by the batch
/// export variant, which skips the flattening step.
pub fn decode(entry: &ImageEntry) -> Result<DynamicImage, EntryError> {
    image::open(&entry.path).map_err(|e| match e {
        image::ImageError::IoError(io) => EntryError::ReadFailed {
            file: entry.file_name.clone(),
            detail: io.to_string(),
        },
        other => EntryError::DecodeFailed {
            file: entry.file_name.clone(),
            detail: other.to_string(),
        },
    })
}

/// Decode one entry and produce its normalized image.
pub fn normalize(entry: &ImageEntry) -> Result<RgbImage, EntryError> {
    let decoded = decode(entry)?;

    debug!(
        "decoded {} ({}x{}, {:?})",
        entry.file_name,
        decoded.width(),
        decoded.height(),
        decoded.color()
    );

    Ok(flatten(decoded))
}

/// Flatten a decoded image to opaque RGB.
///
/// Consumes the decoded image so its backing memory is freed here rather
/// than held alongside the result.
pub fn flatten(decoded: DynamicImage) -> RgbImage {
    if decoded.color().has_alpha() {
        composite_over_white(&decoded.into_rgba8())
    } else {
        decoded.into_rgb8()
    }
}

/// Standard "over" compositing onto a white background.
///
/// `out = src * a + 255 * (1 - a)` per channel, in integer arithmetic with
/// rounding: a fully transparent pixel becomes pure white, a fully opaque
/// one is unchanged.
fn composite_over_white(src: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(src.width(), src.height(), |x, y| {
        let Rgba([r, g, b, a]) = *src.get_pixel(x, y);
        let a = u32::from(a);
        let blend = |c: u8| -> u8 { ((u32::from(c) * a + 255 * (255 - a) + 127) / 255) as u8 };
        Rgb([blend(r), blend(g), blend(b)])
    })
}
