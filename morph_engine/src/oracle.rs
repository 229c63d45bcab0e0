use std::fmt;

use serde::{Deserialize, Serialize};

use crate::vector::Vector;

/// Coarse part of speech. Replacements are only ever drawn from the same class.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    Adverb,
    Other,
}

impl PartOfSpeech {
    pub fn is_morphable(self) -> bool {
        !matches!(self, PartOfSpeech::Other)
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PartOfSpeech::Noun      => "noun",
            PartOfSpeech::Verb      => "verb",
            PartOfSpeech::Adjective => "adjective",
            PartOfSpeech::Adverb    => "adverb",
            PartOfSpeech::Other     => "other",
        })
    }
}

/// Lookup services for embeddings, tagging and inflection.
///
/// Every method must be a pure function of its arguments for the lifetime of a session:
/// ranking relies on repeated calls returning identical answers.
pub trait LexicalOracle: Send + Sync {
    /// The embedding of a word, if it is in the embedding space.
    fn embedding_of(&self, word: &str) -> Option<&Vector>;

    /// Tags a surface form. `context` holds the other words of the line it appears in.
    fn pos_and_lemma(&self, surface: &str, context: &[&str]) -> (PartOfSpeech, String);

    /// Inflects `lemma` to match the inflection of `original` (tense, number, degree...).
    /// Returns `None` when no compatible form exists.
    fn inflect(&self, lemma: &str, pos: PartOfSpeech, original: &str) -> Option<String>;

    /// Every lemma that may replace a word of the given part of speech.
    fn candidate_vocabulary(&self, pos: PartOfSpeech) -> &[String];
}

impl<O> LexicalOracle for &O where O: LexicalOracle + ?Sized {
    fn embedding_of(&self, word: &str) -> Option<&Vector> {
        (**self).embedding_of(word)
    }

    fn pos_and_lemma(&self, surface: &str, context: &[&str]) -> (PartOfSpeech, String) {
        (**self).pos_and_lemma(surface, context)
    }

    fn inflect(&self, lemma: &str, pos: PartOfSpeech, original: &str) -> Option<String> {
        (**self).inflect(lemma, pos, original)
    }

    fn candidate_vocabulary(&self, pos: PartOfSpeech) -> &[String] {
        (**self).candidate_vocabulary(pos)
    }
}
