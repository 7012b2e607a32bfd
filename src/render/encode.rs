use anyhow::Context;
use image::{Rgb, RgbImage, RgbaImage, codecs::jpeg::JpegEncoder};

use crate::foundation::{
    core::Size,
    error::{CarddivError, CarddivResult},
};

/// Encode a composed spread as baseline JPEG. Alpha is dropped.
pub fn encode_jpeg(img: &RgbaImage, quality: u8) -> CarddivResult<Vec<u8>> {
    if !(1..=100).contains(&quality) {
        return Err(CarddivError::validation(format!(
            "jpeg quality must be in 1..=100, got {quality}"
        )));
    }
    if Size::new(img.width(), img.height()).is_empty() {
        return Err(CarddivError::validation("cannot encode an empty image"));
    }

    let rgb = RgbImage::from_fn(img.width(), img.height(), |x, y| {
        let [r, g, b, _] = img.get_pixel(x, y).0;
        Rgb([r, g, b])
    });
    let mut out = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut out, quality))
        .context("encode JPEG")?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/render/encode.rs"]
mod tests;
