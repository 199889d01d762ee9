use std::cmp::Ordering;

use crate::structs::game::GameSummary;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortMode {
    PriceAsc,
    PriceDesc,
    Alphabetical,
    #[default]
    Unordered,
}

pub const SORT_MODES: [(&str, SortMode); 3] = [
    ("priceAsc", SortMode::PriceAsc),
    ("priceDesc", SortMode::PriceDesc),
    ("alphabetical", SortMode::Alphabetical),
];

impl SortMode {
    /// Any value that is not a known sort option keeps the API order
    pub fn from_value(value: &str) -> SortMode {
        let value = value.trim();

        SORT_MODES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(value))
            .map(|(_, mode)| *mode)
            .unwrap_or_default()
    }

    pub fn value(&self) -> &'static str {
        SORT_MODES
            .iter()
            .find(|(_, mode)| mode == self)
            .map(|(name, _)| *name)
            .unwrap_or("")
    }
}

/// Returns a sorted copy, `games` itself is never reordered.
pub fn sort_games(games: &[GameSummary], mode: SortMode) -> Vec<GameSummary> {
    let mut sorted = games.to_vec();

    match mode {
        SortMode::PriceAsc => {
            sorted.sort_by(|a, b| a.cheapest_price().total_cmp(&b.cheapest_price()))
        }
        SortMode::PriceDesc => {
            sorted.sort_by(|a, b| b.cheapest_price().total_cmp(&a.cheapest_price()))
        }
        SortMode::Alphabetical => sorted.sort_by(|a, b| compare_titles(&a.external, &b.external)),
        SortMode::Unordered => (),
    }

    sorted
}

fn compare_titles(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| a.cmp(b))
}
