use crate::token::WordId;

pub type Result<T, E = MorphError> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MorphError {
    /// The vibe word has no embedding. The caller should ask for a different vibe.
    #[error("unknown vibe \"{0}\": not in the embedding space")]
    UnknownVibe(String),

    /// Cycling was requested before any vibe was set.
    #[error("no vibe set")]
    NoVibe,

    /// The referenced word is not tagged in this session.
    #[error("word {0} is not tagged")]
    UntrackedWord(WordId),
}
