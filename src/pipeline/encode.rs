//! Image encoding: `DynamicImage` → base64 PNG wrapped in `ImageData`.
//!
//! Vision APIs accept images as base64 data-URIs embedded in the JSON request
//! body. PNG is chosen over JPEG because it is lossless — the callout numbers
//! and hardware spec text in a part drawing are small, and JPEG artefacts on
//! rendered text measurably degrade what the model reads back.
//! `detail: "high"` instructs GPT-4-class models to use the full image tile
//! budget; without it fine print is lost.

use crate::error::ManualError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use edgequake_llm::ImageData;
use image::DynamicImage;
use std::io::Cursor;
use tracing::debug;

/// Encode a rasterised page as a base64 PNG ready for the vision API.
pub fn encode_page(img: &DynamicImage) -> Result<ImageData, image::ImageError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;

    let b64 = STANDARD.encode(&buf);
    debug!("Encoded image → {} bytes base64", b64.len());

    Ok(ImageData::new(b64, "image/png").with_detail("high"))
}

/// Encode every rendered page, preserving document order.
///
/// Any page failing to encode aborts the run; a manual extracted from a
/// partial page sequence would silently misnumber steps.
pub fn encode_pages(
    rendered: &[(usize, DynamicImage)],
) -> Result<Vec<ImageData>, ManualError> {
    rendered
        .iter()
        .map(|(idx, img)| {
            encode_page(img).map_err(|e| ManualError::Internal(format!(
                "PNG encoding failed for page {}: {}",
                idx + 1,
                e
            )))
        })
        .collect()
}
