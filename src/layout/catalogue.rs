use anyhow::Context;
use serde::Serialize;

use crate::{
    foundation::error::CarddivResult,
    layout::spread::{DEFAULT_ROW_CARDS, DEFAULT_SHOWING_PCT, Spread},
};

/// Front-end description of one layout: where it is served and which parameters it takes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LayoutInfo {
    pub id: &'static str,
    pub route: &'static str,
    pub display: &'static str,
    pub params: &'static [&'static str],
}

impl LayoutInfo {
    /// The spread this entry describes, with default parameters.
    pub fn spread(&self) -> Option<Spread> {
        spread_by_id(self.id)
    }
}

static CATALOGUE: [LayoutInfo; 4] = [
    LayoutInfo {
        id: "row",
        route: "/carddiv/row/",
        display: "Row of Cards",
        params: &["cards", "pct"],
    },
    LayoutInfo {
        id: "celtic",
        route: "/carddiv/celtic/",
        display: "Celtic Cross",
        params: &[],
    },
    LayoutInfo {
        id: "houses",
        route: "/carddiv/houses/",
        display: "12 Astrological Houses",
        params: &[],
    },
    LayoutInfo {
        id: "tableau",
        route: "/carddiv/tableau/",
        display: "Grand Tableau",
        params: &[],
    },
];

pub fn catalogue() -> &'static [LayoutInfo] {
    &CATALOGUE
}

pub fn catalogue_json() -> CarddivResult<String> {
    Ok(serde_json::to_string_pretty(catalogue()).context("serialize layout catalogue")?)
}

/// Default-parameter spread for a catalogue id.
pub fn spread_by_id(id: &str) -> Option<Spread> {
    match id {
        "row" => Some(Spread::Row {
            cards: DEFAULT_ROW_CARDS,
            showing_pct: DEFAULT_SHOWING_PCT,
        }),
        "celtic" => Some(Spread::CelticCross),
        "houses" => Some(Spread::Houses),
        "tableau" => Some(Spread::GrandTableau),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/catalogue.rs"]
mod tests;
