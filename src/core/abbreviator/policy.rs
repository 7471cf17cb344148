//! Decision policy: commit a candidate only when it is strictly smaller

use crate::core::syntax::char_len;

/// Reason recorded when a candidate does not shrink the statement
pub const NO_CHARACTER_REDUCTION: &str = "No character reduction";

/// Outcome of comparing a statement with its abbreviated candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Replace the statement; `chars_saved` is always positive
    Commit { chars_saved: i64 },
    /// Keep the original; `chars_saved` is zero or negative
    Skip {
        chars_saved: i64,
        reason: &'static str,
    },
}

impl Decision {
    /// Signed size difference that produced this decision
    pub fn chars_saved(&self) -> i64 {
        match self {
            Decision::Commit { chars_saved } | Decision::Skip { chars_saved, .. } => *chars_saved,
        }
    }

    pub fn is_commit(&self) -> bool {
        matches!(self, Decision::Commit { .. })
    }
}

/// `len(original) - len(candidate)`, in characters
pub fn chars_saved(original: &str, candidate: &str) -> i64 {
    char_len(original) as i64 - char_len(candidate) as i64
}

/// Decide whether `candidate` should replace `original`
pub fn decide(original: &str, candidate: &str) -> Decision {
    let saved = chars_saved(original, candidate);
    if saved > 0 {
        Decision::Commit { chars_saved: saved }
    } else {
        Decision::Skip {
            chars_saved: saved,
            reason: NO_CHARACTER_REDUCTION,
        }
    }
}
