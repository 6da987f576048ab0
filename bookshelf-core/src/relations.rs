//! Membership helpers for book relationships

use std::collections::HashSet;
use std::hash::Hash;

use crate::types::GenreId;

/// Add `genre` if absent, remove it if present.
///
/// Order carries no meaning; callers sort by name for display.
pub fn toggle_genre(genres: &mut Vec<GenreId>, genre: GenreId) {
    if genres.is_empty() {
        genres.push(genre);
        return;
    }
    match genres.iter().position(|g| *g == genre) {
        Some(index) => {
            genres.remove(index);
        }
        None => genres.push(genre),
    }
}

/// Whether two id collections hold the same members, ignoring order
pub fn same_members<T: Eq + Hash>(a: &[T], b: &[T]) -> bool {
    a.len() == b.len() && a.iter().collect::<HashSet<_>>() == b.iter().collect::<HashSet<_>>()
}
