use crate::foundation::{
    core::{Point, Size},
    error::{CarddivError, CarddivResult},
};

/// Cards drawn by a row spread when none is requested.
pub const DEFAULT_ROW_CARDS: usize = 3;
/// Percentage of each non-final row card left uncovered by its neighbour.
pub const DEFAULT_SHOWING_PCT: u32 = 100;

/// Named arrangement of card positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum Spread {
    /// Cards left to right, each overlapping the next so only `showing_pct` percent of it shows.
    Row { cards: usize, showing_pct: u32 },
    /// Ten-card celtic cross: a six-card cross beside a four-card staff.
    #[serde(rename = "celtic")]
    CelticCross,
    /// Twelve cards around the edge of a 4x4 grid, one per astrological house.
    Houses,
    /// All 36 cards in a 9x4 grid.
    #[serde(rename = "tableau")]
    GrandTableau,
}

impl Default for Spread {
    fn default() -> Self {
        Self::Row {
            cards: DEFAULT_ROW_CARDS,
            showing_pct: DEFAULT_SHOWING_PCT,
        }
    }
}

/// One drawn card's position on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Placement {
    /// Index into the drawn cards.
    pub slot: usize,
    pub origin: Point,
    /// Extent as drawn, after any quarter turn.
    pub size: Size,
    pub on_side: bool,
}

/// Resolved geometry of a spread at a concrete width.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SpreadPlan {
    /// Upright card extent.
    pub card: Size,
    pub canvas: Size,
    pub placements: Vec<Placement>,
}

impl SpreadPlan {
    /// Whether every placement lies inside the canvas.
    pub fn fits(&self) -> bool {
        self.placements.iter().all(|p| {
            p.origin.x >= 0
                && p.origin.y >= 0
                && p.origin.x + i64::from(p.size.width) <= i64::from(self.canvas.width)
                && p.origin.y + i64::from(p.size.height) <= i64::from(self.canvas.height)
        })
    }
}

const HOUSES_RING: [(i64, i64); 12] = [
    (0, 2),
    (0, 3),
    (1, 3),
    (2, 3),
    (3, 3),
    (3, 2),
    (3, 1),
    (3, 0),
    (2, 0),
    (1, 0),
    (0, 0),
    (0, 1),
];

const TABLEAU_COLUMNS: usize = 9;
const TABLEAU_ROWS: usize = 4;

impl Spread {
    pub fn id(&self) -> &'static str {
        match self {
            Self::Row { .. } => "row",
            Self::CelticCross => "celtic",
            Self::Houses => "houses",
            Self::GrandTableau => "tableau",
        }
    }

    /// Number of distinct cards the spread draws.
    pub fn cards_needed(&self) -> usize {
        match *self {
            Self::Row { cards, .. } => cards,
            Self::CelticCross => 10,
            Self::Houses => HOUSES_RING.len(),
            Self::GrandTableau => TABLEAU_COLUMNS * TABLEAU_ROWS,
        }
    }

    pub fn validate(&self) -> CarddivResult<()> {
        if let Self::Row { cards, showing_pct } = *self {
            if cards == 0 {
                return Err(CarddivError::validation("row spread needs at least one card"));
            }
            if !(1..=100).contains(&showing_pct) {
                return Err(CarddivError::validation(format!(
                    "row showing percentage must be in 1..=100, got {showing_pct}"
                )));
            }
        }
        Ok(())
    }

    /// Upright card width for a spread `width` pixels wide.
    pub fn card_width(&self, width: u32) -> u32 {
        match *self {
            Self::Row { cards, showing_pct } => {
                (f64::from(width) / effective_cards(cards, showing_pct)).floor() as u32
            }
            Self::CelticCross => width / 7,
            Self::Houses => width / 4,
            Self::GrandTableau => width / TABLEAU_COLUMNS as u32,
        }
    }

    /// Lay the spread out at `width`, asking `card_height` for the upright height of a card of a
    /// given width.
    pub fn plan(&self, width: u32, card_height: impl Fn(u32) -> u32) -> CarddivResult<SpreadPlan> {
        self.validate()?;
        let card_w = self.card_width(width);
        if card_w == 0 {
            return Err(CarddivError::validation(format!(
                "width {width} is too narrow for a {} spread",
                self.id()
            )));
        }
        let card = Size::new(card_w, card_height(card_w).max(1));
        let laid_out = match *self {
            Self::Row { cards, showing_pct } => row(card, cards, showing_pct),
            Self::CelticCross => celtic_cross(card),
            Self::Houses => houses(card),
            Self::GrandTableau => grand_tableau(card),
        };
        let Some((canvas, placements)) = laid_out else {
            return Err(CarddivError::validation(format!(
                "width {width} is too large for a {} spread",
                self.id()
            )));
        };
        Ok(SpreadPlan {
            card,
            canvas,
            placements,
        })
    }
}

/// Card widths the row occupies: the final card in full, the rest by their showing share.
fn effective_cards(cards: usize, showing_pct: u32) -> f64 {
    1.0 + cards.saturating_sub(1) as f64 * (f64::from(showing_pct) / 100.0)
}

/// Extent of a `cols` x `rows` block of cards, or `None` if it does not fit in `u32`.
fn grid(card: Size, cols: u32, rows: u32) -> Option<Size> {
    Some(Size::new(
        card.width.checked_mul(cols)?,
        card.height.checked_mul(rows)?,
    ))
}

fn upright(slot: usize, origin: Point, card: Size) -> Placement {
    Placement {
        slot,
        origin,
        size: card,
        on_side: false,
    }
}

fn row(card: Size, cards: usize, showing_pct: u32) -> Option<(Size, Vec<Placement>)> {
    let showing = (f64::from(card.width) * f64::from(showing_pct) / 100.0).floor() as i64;
    let placements: Vec<_> = (0..cards)
        .map(|i| upright(i, Point::new(i as i64 * showing, 0), card))
        .collect();

    let nominal = (effective_cards(cards, showing_pct) * f64::from(card.width)).floor() as i64;
    let last_right = placements
        .last()
        .map_or(0, |p| p.origin.x + i64::from(card.width));
    let width = u32::try_from(nominal.max(last_right)).ok()?;
    Some((Size::new(width, card.height), placements))
}

fn celtic_cross(card: Size) -> Option<(Size, Vec<Placement>)> {
    let (w, h) = (i64::from(card.width), i64::from(card.height));
    let canvas = grid(card, 7, 4)?;
    let (cw, ch) = (7 * w, 4 * h);

    let mid = Point::new((cw - 2 * w) / 2, (ch - h) / 2);
    let vertical = Point::new(0, h + h / 3);
    let horizontal = Point::new(2 * w, 0);

    let mut out = vec![
        upright(0, mid, card),
        Placement {
            slot: 1,
            origin: Point::new((cw - w - h) / 2, (ch - w) / 2),
            size: card.swapped(),
            on_side: true,
        },
        upright(2, mid + vertical, card),
        upright(3, mid - horizontal, card),
        upright(4, mid - vertical, card),
        upright(5, mid + horizontal, card),
    ];
    // Staff, bottom to top.
    for k in 0..4 {
        out.push(upright(6 + k as usize, Point::new(6 * w, (3 - k) * h), card));
    }
    Some((canvas, out))
}

fn houses(card: Size) -> Option<(Size, Vec<Placement>)> {
    let canvas = grid(card, 4, 4)?;
    let (w, h) = (i64::from(card.width), i64::from(card.height));
    let placements = HOUSES_RING
        .iter()
        .enumerate()
        .map(|(slot, &(col, row))| upright(slot, Point::new(col * w, row * h), card))
        .collect();
    Some((canvas, placements))
}

fn grand_tableau(card: Size) -> Option<(Size, Vec<Placement>)> {
    let canvas = grid(card, TABLEAU_COLUMNS as u32, TABLEAU_ROWS as u32)?;
    let (w, h) = (i64::from(card.width), i64::from(card.height));
    let placements = (0..TABLEAU_COLUMNS * TABLEAU_ROWS)
        .map(|slot| {
            let col = (slot % TABLEAU_COLUMNS) as i64;
            let row = (slot / TABLEAU_COLUMNS) as i64;
            upright(slot, Point::new(col * w, row * h), card)
        })
        .collect();
    Some((canvas, placements))
}

#[cfg(test)]
#[path = "../../tests/unit/layout/spread.rs"]
mod tests;
