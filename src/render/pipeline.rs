use std::collections::BTreeSet;

use image::RgbaImage;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::{
    cache::DeckCache,
    deck::CardRenderOptions,
    foundation::config::{CarddivConfig, DEFAULT_JPEG_QUALITY, DEFAULT_WIDTH},
    foundation::error::{CarddivError, CarddivResult},
    layout::{Spread, SpreadPlan},
    render::compose::{blank_canvas, draw_card, placeholder},
    render::encode::encode_jpeg,
};

/// One spread to render: which deck, how wide, which layout.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SpreadRequest {
    pub deck: String,
    pub width: u32,
    pub spread: Spread,
}

impl SpreadRequest {
    pub fn new(deck: impl Into<String>, width: u32, spread: Spread) -> Self {
        Self {
            deck: deck.into(),
            width,
            spread,
        }
    }
}

impl Default for SpreadRequest {
    fn default() -> Self {
        Self::new("Lenormand", DEFAULT_WIDTH, Spread::default())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderOpts {
    pub jpeg_quality: u8,
    /// Reverse each drawn card with probability 1/2.
    pub allow_reversed: bool,
    /// Worker threads for [`SpreadRenderer::render_batch`]. `None` uses rayon defaults.
    pub threads: Option<usize>,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            allow_reversed: true,
            threads: None,
        }
    }
}

impl RenderOpts {
    pub fn from_config(cfg: &CarddivConfig) -> Self {
        Self {
            jpeg_quality: cfg.jpeg_quality,
            allow_reversed: cfg.allow_reversed,
            threads: cfg.threads,
        }
    }
}

/// A card as it landed in a rendered spread.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct DrawnCard {
    pub slot: usize,
    /// Index of the card within its deck.
    pub index: usize,
    pub options: CardRenderOptions,
    /// Drawn as a placeholder because the card could not be decoded.
    pub placeholder: bool,
}

#[derive(Clone, Debug)]
pub struct SpreadImage {
    pub image: RgbaImage,
    /// Identifier of the deck that was actually used, after any fallback.
    pub deck: String,
    pub plan: SpreadPlan,
    pub cards: Vec<DrawnCard>,
}

impl SpreadImage {
    pub fn placeholders(&self) -> usize {
        self.cards.iter().filter(|c| c.placeholder).count()
    }
}

/// Renders spreads against a shared [`DeckCache`].
pub struct SpreadRenderer<'a> {
    cache: &'a DeckCache,
    opts: RenderOpts,
}

impl<'a> SpreadRenderer<'a> {
    pub fn new(cache: &'a DeckCache, opts: RenderOpts) -> Self {
        Self { cache, opts }
    }

    /// Draw the spread's cards from the requested deck and compose them onto one canvas.
    ///
    /// The deck is held for the duration of the call. A card that fails to decode is replaced
    /// by a black placeholder; every other failure aborts the render.
    #[tracing::instrument(skip(self, rng), fields(deck = %req.deck, layout = req.spread.id(), width = req.width))]
    pub fn render<R: Rng>(&self, req: &SpreadRequest, rng: &mut R) -> CarddivResult<SpreadImage> {
        req.spread.validate()?;
        if req.width == 0 {
            return Err(CarddivError::validation("spread width must be > 0"));
        }

        let deck = self.cache.lease(&req.deck)?;
        let plan = req.spread.plan(req.width, |w| deck.card_height(w))?;
        let picks = deck.shuffled_with(rng, plan.placements.len())?;

        let mut canvas = blank_canvas(plan.canvas);
        let mut cards = Vec::with_capacity(plan.placements.len());
        for p in &plan.placements {
            let index = picks[p.slot];
            let options = CardRenderOptions {
                reversed: self.opts.allow_reversed && rng.gen_bool(0.5),
                on_side: p.on_side,
            };
            let drawn = match deck.image(index, plan.card.width, options) {
                Ok(card) => {
                    draw_card(&mut canvas, &card, p.origin);
                    false
                }
                Err(err @ CarddivError::Decode(_)) => {
                    warn!(card = index, error = %err, "card failed to render, drawing placeholder");
                    draw_card(&mut canvas, &placeholder(p.size), p.origin);
                    true
                }
                Err(err) => return Err(err),
            };
            cards.push(DrawnCard {
                slot: p.slot,
                index,
                options,
                placeholder: drawn,
            });
        }

        debug!(
            canvas_w = plan.canvas.width,
            canvas_h = plan.canvas.height,
            cards = cards.len(),
            "rendered spread"
        );
        Ok(SpreadImage {
            image: canvas,
            deck: deck.identifier().to_string(),
            plan,
            cards,
        })
    }

    /// [`SpreadRenderer::render`] followed by JPEG encoding at the configured quality.
    pub fn render_jpeg<R: Rng>(&self, req: &SpreadRequest, rng: &mut R) -> CarddivResult<Vec<u8>> {
        let spread = self.render(req, rng)?;
        encode_jpeg(&spread.image, self.opts.jpeg_quality)
    }

    /// Render every request in parallel. Request `i` draws from a generator seeded with
    /// `seed + i`, so a batch is reproducible regardless of scheduling.
    ///
    /// Each named deck is leased once up front and held until the batch finishes, so workers
    /// never reopen a deck between requests.
    pub fn render_batch(
        &self,
        reqs: &[SpreadRequest],
        seed: u64,
    ) -> CarddivResult<Vec<CarddivResult<Vec<u8>>>> {
        let pool = build_thread_pool(self.opts.threads)?;

        let names: BTreeSet<&str> = reqs.iter().map(|r| r.deck.as_str()).collect();
        let _pinned: Vec<_> = names
            .into_iter()
            .filter_map(|name| match self.cache.lease(name) {
                Ok(lease) => Some(lease),
                Err(err) => {
                    debug!(deck = name, error = %err, "not pinning deck for batch");
                    None
                }
            })
            .collect();

        let out = pool.install(|| {
            reqs.par_iter()
                .enumerate()
                .map(|(i, req)| {
                    let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(i as u64));
                    self.render_jpeg(req, &mut rng)
                })
                .collect::<Vec<_>>()
        });
        Ok(out)
    }
}

fn build_thread_pool(threads: Option<usize>) -> CarddivResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(CarddivError::validation(
            "batch 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| CarddivError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
