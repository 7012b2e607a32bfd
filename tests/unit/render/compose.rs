use image::Rgba;

use super::*;
use crate::deck::{CardImage, CardRenderOptions};

#[test]
fn draw_card_replaces_pixels_at_origin() {
    let mut canvas = blank_canvas(Size::new(10, 10));
    let card = RgbaImage::from_pixel(3, 2, Rgba([255, 0, 0, 255]));
    draw_card(&mut canvas, &card, Point::new(4, 5));

    assert_eq!(*canvas.get_pixel(4, 5), Rgba([255, 0, 0, 255]));
    assert_eq!(*canvas.get_pixel(6, 6), Rgba([255, 0, 0, 255]));
    assert_eq!(*canvas.get_pixel(7, 5), BACKGROUND);
    assert_eq!(*canvas.get_pixel(4, 7), BACKGROUND);
}

#[test]
fn draw_card_clips_at_edges() {
    let mut canvas = blank_canvas(Size::new(4, 4));
    let card = RgbaImage::from_pixel(3, 3, Rgba([0, 255, 0, 255]));
    draw_card(&mut canvas, &card, Point::new(2, -1));

    assert_eq!(*canvas.get_pixel(3, 0), Rgba([0, 255, 0, 255]));
    assert_eq!(*canvas.get_pixel(2, 1), Rgba([0, 255, 0, 255]));
    assert_eq!(*canvas.get_pixel(2, 2), BACKGROUND);
    assert_eq!(*canvas.get_pixel(1, 0), BACKGROUND);
}

#[test]
fn draw_card_reads_through_orientation() {
    let base = RgbaImage::from_fn(2, 3, |x, y| Rgba([x as u8 * 100, y as u8 * 100, 0, 255]));
    let side = CardImage::orient(base.clone(), CardRenderOptions::on_side());
    let mut canvas = blank_canvas(Size::new(3, 2));
    draw_card(&mut canvas, &side, Point::new(0, 0));

    // Quarter turn counter-clockwise: the top-right source pixel lands top-left.
    assert_eq!(*canvas.get_pixel(0, 0), *base.get_pixel(1, 0));
    assert_eq!(*canvas.get_pixel(0, 1), *base.get_pixel(0, 0));
    assert_eq!(*canvas.get_pixel(2, 0), *base.get_pixel(1, 2));
}

#[test]
fn placeholder_is_solid_black() {
    let block = placeholder(Size::new(5, 7));
    assert_eq!(block.dimensions(), (5, 7));
    assert!(block.pixels().all(|p| *p == Rgba([0, 0, 0, 255])));
}
