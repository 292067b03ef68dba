// src/services/moves.rs

//! Move path resolution.

/// A `/`-delimited move path: `CODE/<move>/<move>/…`.
///
/// Only the number of segments after the code matters; their values are
/// ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovePath<'a> {
    pub code: &'a str,
    pub played: usize,
}

impl<'a> MovePath<'a> {
    pub fn parse(path: &'a str) -> Self {
        let mut segments = path.split('/');
        let code = segments.next().unwrap_or_default();
        Self {
            code,
            played: segments.count(),
        }
    }
}

/// Return the move that follows `played` half-moves in `sequence`.
///
/// Tokens that parse as integers are move numbers and are skipped.
pub fn next_move(sequence: &str, played: usize) -> Option<&str> {
    sequence
        .split_whitespace()
        .filter(|token| token.parse::<i64>().is_err())
        .nth(played)
}
