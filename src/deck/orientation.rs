//! Read-time orientation views.
//!
//! Each view wraps an image and translates coordinates on every pixel read. Nothing is copied and
//! the wrapped pixels are never written.

use image::GenericImageView;

/// Card turned 180 degrees: a point reflection about the image's own bounds.
#[derive(Clone, Debug)]
pub struct Reversed<I> {
    inner: I,
}

impl<I> Reversed<I> {
    pub fn new(inner: I) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &I {
        &self.inner
    }
}

impl<I: GenericImageView> GenericImageView for Reversed<I> {
    type Pixel = I::Pixel;

    fn dimensions(&self) -> (u32, u32) {
        self.inner.dimensions()
    }

    fn get_pixel(&self, x: u32, y: u32) -> Self::Pixel {
        let (w, h) = self.inner.dimensions();
        self.inner.get_pixel(w - 1 - x, h - 1 - y)
    }
}

/// Card turned 90 degrees counter-clockwise. Width and height are swapped; the top-right corner
/// of the wrapped image becomes the top-left corner of the view.
#[derive(Clone, Debug)]
pub struct Sideways<I> {
    inner: I,
}

impl<I> Sideways<I> {
    pub fn new(inner: I) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &I {
        &self.inner
    }
}

impl<I: GenericImageView> GenericImageView for Sideways<I> {
    type Pixel = I::Pixel;

    fn dimensions(&self) -> (u32, u32) {
        let (w, h) = self.inner.dimensions();
        (h, w)
    }

    fn get_pixel(&self, x: u32, y: u32) -> Self::Pixel {
        let (w, _) = self.inner.dimensions();
        self.inner.get_pixel(w - 1 - y, x)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/deck/orientation.rs"]
mod tests;
