use std::path::PathBuf;

use image::{GenericImageView, ImageFormat};

use super::*;
use crate::{
    deck::DeckLibrary,
    fixtures::{ZipFixture, card_deck, jpeg_bytes, temp_dir},
};

fn setup(name: &str) -> (PathBuf, DeckCache) {
    let root = temp_dir(name);
    card_deck(&root, "Poker.zip", 52, 20, 30);
    card_deck(&root, "Lenormand.zip", 36, 30, 50);
    let cache = DeckCache::new(DeckLibrary::new(&root), "Poker.zip");
    (root, cache)
}

fn upright_only() -> RenderOpts {
    RenderOpts {
        allow_reversed: false,
        ..RenderOpts::default()
    }
}

#[test]
fn default_row_renders_three_cards() {
    let (root, cache) = setup("pipeline_row");
    let renderer = SpreadRenderer::new(&cache, RenderOpts::default());
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    let out = renderer.render(&SpreadRequest::default(), &mut rng).unwrap();
    assert_eq!(out.plan.card, crate::foundation::core::Size::new(200, 333));
    assert_eq!(out.image.dimensions(), (600, 333));
    assert_eq!(out.cards.len(), 3);
    assert_eq!(out.placeholders(), 0);
    assert!(out.deck.ends_with("Lenormand.zip"));

    let mut idx: Vec<_> = out.cards.iter().map(|c| c.index).collect();
    idx.sort_unstable();
    idx.dedup();
    assert_eq!(idx.len(), 3);
    assert!(idx.iter().all(|&i| i < 36));

    assert!(cache.open_decks().is_empty());
    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn same_seed_same_spread() {
    let (root, cache) = setup("pipeline_seed");
    let renderer = SpreadRenderer::new(&cache, RenderOpts::default());
    let req = SpreadRequest::new("Lenormand", 700, Spread::CelticCross);

    let a = renderer
        .render(&req, &mut ChaCha8Rng::seed_from_u64(42))
        .unwrap();
    let b = renderer
        .render(&req, &mut ChaCha8Rng::seed_from_u64(42))
        .unwrap();
    assert_eq!(a.cards, b.cards);
    assert_eq!(a.image, b.image);

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn celtic_cross_turns_second_card() {
    let (root, cache) = setup("pipeline_celtic");
    let renderer = SpreadRenderer::new(&cache, upright_only());
    let req = SpreadRequest::new("Lenormand", 700, Spread::CelticCross);

    let out = renderer
        .render(&req, &mut ChaCha8Rng::seed_from_u64(3))
        .unwrap();
    assert_eq!(out.cards.len(), 10);
    for card in &out.cards {
        assert!(!card.options.reversed);
        assert_eq!(card.options.on_side, card.slot == 1);
    }
    assert_eq!(out.image.dimensions(), (700, 4 * 167));

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn tableau_uses_every_card_of_a_lenormand_deck() {
    let (root, cache) = setup("pipeline_tableau");
    let renderer = SpreadRenderer::new(&cache, RenderOpts::default());
    let req = SpreadRequest::new("Lenormand", 900, Spread::GrandTableau);

    let out = renderer
        .render(&req, &mut ChaCha8Rng::seed_from_u64(9))
        .unwrap();
    let mut idx: Vec<_> = out.cards.iter().map(|c| c.index).collect();
    idx.sort_unstable();
    assert_eq!(idx, (0..36).collect::<Vec<_>>());

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn small_deck_cannot_fill_spread() {
    let (root, cache) = setup("pipeline_small");
    card_deck(&root, "Tiny.zip", 5, 10, 20);
    let renderer = SpreadRenderer::new(&cache, RenderOpts::default());
    let req = SpreadRequest::new("Tiny", 700, Spread::CelticCross);

    let err = renderer
        .render(&req, &mut ChaCha8Rng::seed_from_u64(0))
        .unwrap_err();
    assert!(matches!(
        err,
        CarddivError::InsufficientCards {
            requested: 10,
            available: 5
        }
    ));
    assert!(cache.open_decks().is_empty());

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn corrupt_card_becomes_placeholder() {
    let (root, cache) = setup("pipeline_placeholder");
    ZipFixture::new()
        .file("0.jpg", jpeg_bytes(30, 30, [255, 255, 255]))
        .file("1.jpg", b"not a jpeg".to_vec())
        .file("2.jpg", jpeg_bytes(30, 30, [255, 255, 255]))
        .write(&root.join("Chipped.zip"));
    let renderer = SpreadRenderer::new(&cache, upright_only());
    let req = SpreadRequest::new(
        "Chipped",
        300,
        Spread::Row {
            cards: 3,
            showing_pct: 100,
        },
    );

    let out = renderer
        .render(&req, &mut ChaCha8Rng::seed_from_u64(5))
        .unwrap();
    assert_eq!(out.placeholders(), 1);

    let bad = out.cards.iter().find(|c| c.placeholder).unwrap();
    assert_eq!(bad.index, 1);
    let origin = out.plan.placements[bad.slot].origin;
    let px = out.image.get_pixel(origin.x as u32 + 50, 50);
    assert_eq!(px.0, [0, 0, 0, 255]);
    let good = out.cards.iter().find(|c| !c.placeholder).unwrap();
    let origin = out.plan.placements[good.slot].origin;
    assert!(out.image.get_pixel(origin.x as u32 + 50, 50).0[0] > 200);

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn missing_deck_renders_from_default() {
    let (root, cache) = setup("pipeline_fallback");
    let renderer = SpreadRenderer::new(&cache, RenderOpts::default());
    let req = SpreadRequest::new("Thoth", 600, Spread::Houses);

    let out = renderer
        .render(&req, &mut ChaCha8Rng::seed_from_u64(11))
        .unwrap();
    assert!(out.deck.ends_with("Poker.zip"));
    assert_eq!(cache.stats().fallbacks, 1);

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn render_rejects_zero_width() {
    let (root, cache) = setup("pipeline_zero_width");
    let renderer = SpreadRenderer::new(&cache, RenderOpts::default());
    let req = SpreadRequest::new("Lenormand", 0, Spread::default());
    assert!(matches!(
        renderer.render(&req, &mut ChaCha8Rng::seed_from_u64(0)),
        Err(CarddivError::Validation(_))
    ));
    assert_eq!(cache.stats().opened, 0);
    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn render_jpeg_produces_canvas_sized_image() {
    let (root, cache) = setup("pipeline_jpeg");
    let renderer = SpreadRenderer::new(&cache, RenderOpts::default());
    let req = SpreadRequest::new("Poker", 400, Spread::Houses);

    let bytes = renderer
        .render_jpeg(&req, &mut ChaCha8Rng::seed_from_u64(2))
        .unwrap();
    let img = image::load_from_memory_with_format(&bytes, ImageFormat::Jpeg).unwrap();
    // 20x30 cards at width 100 are 150 tall.
    assert_eq!(img.dimensions(), (400, 600));

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn batch_opens_each_deck_once_and_is_reproducible() {
    let (root, cache) = setup("pipeline_batch");
    let renderer = SpreadRenderer::new(
        &cache,
        RenderOpts {
            threads: Some(4),
            ..RenderOpts::default()
        },
    );
    let reqs: Vec<_> = (0..8)
        .map(|i| {
            let spread = if i % 2 == 0 {
                Spread::GrandTableau
            } else {
                Spread::default()
            };
            SpreadRequest::new("Lenormand", 450, spread)
        })
        .collect();

    let first = renderer.render_batch(&reqs, 100).unwrap();
    assert_eq!(first.len(), 8);
    assert!(first.iter().all(|r| r.is_ok()));
    assert_eq!(cache.stats().opened, 1);
    assert!(cache.open_decks().is_empty());

    let second = renderer.render_batch(&reqs, 100).unwrap();
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.as_ref().unwrap(), b.as_ref().unwrap());
    }

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn batch_reports_failures_per_request() {
    let (root, cache) = setup("pipeline_batch_errors");
    let renderer = SpreadRenderer::new(&cache, RenderOpts::default());
    let reqs = vec![
        SpreadRequest::new("Lenormand", 300, Spread::Houses),
        SpreadRequest::new("Lenormand", 300, Spread::Row { cards: 40, showing_pct: 50 }),
    ];

    let out = renderer.render_batch(&reqs, 0).unwrap();
    assert!(out[0].is_ok());
    assert!(matches!(out[1], Err(CarddivError::InsufficientCards { .. })));

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn batch_rejects_zero_threads() {
    let (root, cache) = setup("pipeline_batch_threads");
    let renderer = SpreadRenderer::new(
        &cache,
        RenderOpts {
            threads: Some(0),
            ..RenderOpts::default()
        },
    );
    assert!(matches!(
        renderer.render_batch(&[SpreadRequest::default()], 0),
        Err(CarddivError::Validation(_))
    ));
    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn opts_follow_config() {
    let cfg = CarddivConfig {
        jpeg_quality: 55,
        allow_reversed: false,
        threads: Some(2),
        ..CarddivConfig::default()
    };
    assert_eq!(
        RenderOpts::from_config(&cfg),
        RenderOpts {
            jpeg_quality: 55,
            allow_reversed: false,
            threads: Some(2),
        }
    );
}
