use std::fmt;

use crate::oracle::{LexicalOracle, PartOfSpeech};

/// Position of a word in its document's word sequence. Stable for the life of the document.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct WordId(pub usize);

impl fmt::Display for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct WordToken {
    pub id: WordId,
    pub surface: String,
    pub lemma: String,
    pub pos: PartOfSpeech,
}

impl WordToken {
    pub fn new(id: WordId, surface: String, lemma: String, pos: PartOfSpeech) -> Self {
        Self {
            id,
            surface,
            lemma,
            pos,
        }
    }

    /// Builds a token by asking the oracle to tag `surface` within its line.
    pub fn tagged_by<O>(oracle: &O, id: WordId, surface: &str, context: &[&str]) -> Self
    where
        O: LexicalOracle + ?Sized,
    {
        let (pos, lemma) = oracle.pos_and_lemma(surface, context);
        Self::new(id, surface.to_owned(), lemma, pos)
    }
}
