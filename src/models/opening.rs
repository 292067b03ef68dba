//! Opening record data structure.

use serde::{Deserialize, Serialize};

/// One row of the ECO reference table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Opening {
    /// ECO classification code (e.g. "B00")
    pub code: String,

    /// Attribution text from the row (usually the opening's name)
    pub author: String,

    /// Move numbers and moves, whitespace-separated (e.g. "1 e4 e5 2 Nf3")
    #[serde(rename = "moveSequence")]
    pub moves: String,
}

impl Opening {
    pub fn new(
        code: impl Into<String>,
        author: impl Into<String>,
        moves: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            author: author.into(),
            moves: moves.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_move_sequence_field() {
        let opening = Opening::new("B00", "King's pawn opening", "1 e4");
        let json = serde_json::to_value(&opening).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "code": "B00",
                "author": "King's pawn opening",
                "moveSequence": "1 e4"
            })
        );
    }
}
