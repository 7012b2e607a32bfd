use image::{GenericImageView, Rgba, RgbaImage, imageops};

use crate::foundation::core::{Point, Size};

/// Canvas background and placeholder fill.
pub const BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);

pub fn blank_canvas(size: Size) -> RgbaImage {
    RgbaImage::from_pixel(size.width, size.height, BACKGROUND)
}

/// Solid card-sized block drawn where a card failed to render.
pub fn placeholder(size: Size) -> RgbaImage {
    RgbaImage::from_pixel(size.width, size.height, BACKGROUND)
}

/// Copy `card` onto `canvas` with its top-left corner at `origin`, clipping at the edges.
///
/// Pixels are replaced, not blended.
pub fn draw_card<I>(canvas: &mut RgbaImage, card: &I, origin: Point)
where
    I: GenericImageView<Pixel = Rgba<u8>>,
{
    imageops::replace(canvas, card, origin.x, origin.y);
}

#[cfg(test)]
#[path = "../../tests/unit/render/compose.rs"]
mod tests;
