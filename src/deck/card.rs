use image::{
    GenericImageView, ImageFormat, Rgba, RgbaImage,
    imageops::{self, FilterType},
};

use crate::{
    deck::orientation::{Reversed, Sideways},
    foundation::core::Size,
    foundation::error::{CarddivError, CarddivResult},
};

/// How a drawn card should be turned before it is placed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct CardRenderOptions {
    /// Rotate 180 degrees.
    pub reversed: bool,
    /// Rotate 90 degrees counter-clockwise.
    pub on_side: bool,
}

impl CardRenderOptions {
    pub fn upright() -> Self {
        Self::default()
    }

    pub fn reversed() -> Self {
        Self {
            reversed: true,
            on_side: false,
        }
    }

    pub fn on_side() -> Self {
        Self {
            reversed: false,
            on_side: true,
        }
    }
}

/// Decoded, resized card with its orientation applied as a view.
///
/// Reversal wraps first and sideways second, so a card that is both reads through
/// `Sideways<Reversed<_>>`.
#[derive(Clone, Debug)]
pub enum CardImage {
    Upright(RgbaImage),
    Reversed(Reversed<RgbaImage>),
    OnSide(Sideways<RgbaImage>),
    ReversedOnSide(Sideways<Reversed<RgbaImage>>),
}

impl CardImage {
    pub fn orient(base: RgbaImage, options: CardRenderOptions) -> Self {
        match (options.reversed, options.on_side) {
            (false, false) => Self::Upright(base),
            (true, false) => Self::Reversed(Reversed::new(base)),
            (false, true) => Self::OnSide(Sideways::new(base)),
            (true, true) => Self::ReversedOnSide(Sideways::new(Reversed::new(base))),
        }
    }

    /// Size as seen through the orientation view.
    pub fn size(&self) -> Size {
        let (w, h) = self.dimensions();
        Size::new(w, h)
    }

    /// The resized pixels before any orientation.
    pub fn base(&self) -> &RgbaImage {
        match self {
            Self::Upright(img) => img,
            Self::Reversed(v) => v.inner(),
            Self::OnSide(v) => v.inner(),
            Self::ReversedOnSide(v) => v.inner().inner(),
        }
    }

    pub fn options(&self) -> CardRenderOptions {
        match self {
            Self::Upright(_) => CardRenderOptions::upright(),
            Self::Reversed(_) => CardRenderOptions::reversed(),
            Self::OnSide(_) => CardRenderOptions::on_side(),
            Self::ReversedOnSide(_) => CardRenderOptions {
                reversed: true,
                on_side: true,
            },
        }
    }

    /// Copy the oriented view into a standalone buffer.
    pub fn to_rgba8(&self) -> RgbaImage {
        let (w, h) = self.dimensions();
        RgbaImage::from_fn(w, h, |x, y| self.get_pixel(x, y))
    }
}

impl GenericImageView for CardImage {
    type Pixel = Rgba<u8>;

    fn dimensions(&self) -> (u32, u32) {
        match self {
            Self::Upright(img) => img.dimensions(),
            Self::Reversed(v) => v.dimensions(),
            Self::OnSide(v) => v.dimensions(),
            Self::ReversedOnSide(v) => v.dimensions(),
        }
    }

    fn get_pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        match self {
            Self::Upright(img) => *img.get_pixel(x, y),
            Self::Reversed(v) => v.get_pixel(x, y),
            Self::OnSide(v) => v.get_pixel(x, y),
            Self::ReversedOnSide(v) => v.get_pixel(x, y),
        }
    }
}

/// Decode JPEG bytes into RGBA8.
pub fn decode_jpeg(bytes: &[u8]) -> CarddivResult<RgbaImage> {
    let img = image::load_from_memory_with_format(bytes, ImageFormat::Jpeg)
        .map_err(|e| CarddivError::decode(e.to_string()))?;
    Ok(img.to_rgba8())
}

/// Bicubic resample to exactly `size`.
pub fn resize_card(img: &RgbaImage, size: Size) -> RgbaImage {
    imageops::resize(img, size.width, size.height, FilterType::CatmullRom)
}

#[cfg(test)]
#[path = "../../tests/unit/deck/card.rs"]
mod tests;
