//! FILENAME: core/records/src/term.rs
//! PURPOSE: Turns admit-term labels ("Fall 2021") into sortable keys.
//! CONTEXT: Any axis bound to the admit term is ordered by `TermKey`, never by
//! the raw label, so "Spring 2022" lands after "Fall 2021".

use std::cmp::Ordering;
use serde::{Deserialize, Serialize};

/// Year assigned to labels that cannot be parsed.
pub const SENTINEL_YEAR: i32 = 9999;

/// Season rank assigned to labels that cannot be parsed (Fall's rank).
pub const SENTINEL_SEASON_RANK: u8 = 3;

/// Ordering key for an admit term: year first, then season within the year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TermKey {
    pub year: i32,
    pub season_rank: u8,
}

impl TermKey {
    pub const SENTINEL: TermKey = TermKey {
        year: SENTINEL_YEAR,
        season_rank: SENTINEL_SEASON_RANK,
    };

    pub fn new(year: i32, season_rank: u8) -> Self {
        TermKey { year, season_rank }
    }
}

/// Rank of a season token. Unrecognized seasons rank after Fall.
pub fn season_rank(season: &str) -> u8 {
    match season {
        "Spring" => 1,
        "Summer" => 2,
        "Fall" => 3,
        _ => 4,
    }
}

/// Parses a raw admit term. Never fails: anything that is not exactly
/// "<Season> <Year>" with an integer year maps to `TermKey::SENTINEL`.
pub fn normalize(raw: Option<&str>) -> TermKey {
    let Some(raw) = raw else {
        return TermKey::SENTINEL;
    };

    let mut tokens = raw.split_whitespace();
    match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(season), Some(year), None) => match year.parse::<i32>() {
            Ok(year) => TermKey::new(year, season_rank(season)),
            Err(_) => TermKey::SENTINEL,
        },
        _ => TermKey::SENTINEL,
    }
}

/// Lexicographic comparison on `(year, season_rank)`.
pub fn compare_term(a: &TermKey, b: &TermKey) -> Ordering {
    a.year
        .cmp(&b.year)
        .then(a.season_rank.cmp(&b.season_rank))
}

/// Compares two raw labels by term key, falling back to the labels
/// themselves so that equal keys still order deterministically.
pub fn compare_term_labels(a: &str, b: &str) -> Ordering {
    compare_term(&normalize(Some(a)), &normalize(Some(b))).then_with(|| a.cmp(b))
}

/// Sorts raw term labels into canonical ascending order.
pub fn sort_terms<S: AsRef<str>>(terms: &mut [S]) {
    terms.sort_by(|a, b| compare_term_labels(a.as_ref(), b.as_ref()));
}
