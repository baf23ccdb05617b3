use std::collections::{BTreeSet, HashSet};

use rand::{Rng, seq::IndexedRandom};

/// Genres sent as `seed_genres` with a recommendations request.
pub const SEED_GENRE_COUNT: usize = 5;

/// Picks up to `count` distinct genres uniformly at random without
/// replacement.
///
/// Duplicates in `genres` are collapsed first, so the result holds
/// `min(count, distinct genres)` entries and the call always terminates.
pub fn select_seed_genres<R: Rng + ?Sized>(
    genres: &[String],
    count: usize,
    rng: &mut R,
) -> BTreeSet<String> {
    let mut seen = HashSet::new();
    let distinct: Vec<&String> = genres
        .iter()
        .filter(|genre| !genre.trim().is_empty())
        .filter(|genre| seen.insert(genre.as_str()))
        .collect();

    let amount = count.min(distinct.len());
    distinct
        .choose_multiple(rng, amount)
        .map(|genre| (*genre).clone())
        .collect()
}
