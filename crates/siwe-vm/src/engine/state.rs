//! Match states and phrases.

/// Outcome of an operator.
///
/// `Active` exists only while a rule is being evaluated: it is what a
/// descending callback sees, and leaving it untouched asks the engine to run
/// the rule body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseState {
    Active,
    Matched,
    EmptyMatch,
    NoMatch,
}

impl ParseState {
    pub fn is_success(self) -> bool {
        matches!(self, ParseState::Matched | ParseState::EmptyMatch)
    }
}

/// State and matched length of one operator application.
///
/// Also the record a callback reads and overwrites.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Phrase {
    pub state: ParseState,
    pub length: usize,
}

impl Phrase {
    pub const ACTIVE: Self = Self {
        state: ParseState::Active,
        length: 0,
    };

    pub const EMPTY: Self = Self {
        state: ParseState::EmptyMatch,
        length: 0,
    };

    pub const NO_MATCH: Self = Self {
        state: ParseState::NoMatch,
        length: 0,
    };

    /// A successful match; zero length yields `EmptyMatch`.
    pub fn matched(length: usize) -> Self {
        if length == 0 {
            Self::EMPTY
        } else {
            Self {
                state: ParseState::Matched,
                length,
            }
        }
    }

    pub fn is_success(&self) -> bool {
        self.state.is_success()
    }

    /// Force a failure, discarding the length.
    pub fn reject(&mut self) {
        *self = Self::NO_MATCH;
    }
}

/// Collect `length` codepoints of `input` starting at `offset`.
pub fn phrase_text(input: &[char], offset: usize, length: usize) -> String {
    input[offset..offset + length].iter().collect()
}
