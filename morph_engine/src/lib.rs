pub mod vector;
pub mod oracle;
pub mod token;
pub mod vibe;
pub mod rank;
pub mod session;
pub mod error;

#[cfg(test)]
mod test_utils;

pub use error::{MorphError, Result};
pub use oracle::{LexicalOracle, PartOfSpeech};
pub use rank::{Candidate, CandidateRanker, RankParams};
pub use session::{Cursor, MorphSession, TagOutcome, TaggedWord, WordState};
pub use token::{WordId, WordToken};
pub use vector::Vector;
pub use vibe::{Vibe, VibeResolver};
