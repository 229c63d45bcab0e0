use std::collections::HashMap;

use crate::oracle::{LexicalOracle, PartOfSpeech};
use crate::token::{WordId, WordToken};
use crate::vector::Vector;

const EMBEDDINGS: &[(&str, [f32; 3])] = &[
    ("storm",   [1.0, 0.0, 0.0]),
    ("gale",    [0.9, 0.1, 0.0]),
    ("breeze",  [0.6, 0.6, 0.0]),
    ("sun",     [0.3, 0.9, 0.1]),
    ("stone",   [0.0, 0.0, 1.0]),
    ("coal",    [0.0, 0.0, 1.0]),
    ("warmth",  [0.0, 1.0, 0.0]),
    ("rage",    [1.0, 0.1, 0.0]),
    ("glow",    [0.2, 1.0, 0.0]),
    ("burn",    [0.5, 0.5, 0.5]),
    ("cold",    [1.0, -0.5, 0.0]),
    ("mild",    [0.2, 0.8, 0.0]),
    ("quickly", [0.0, 0.2, 1.0]),
];

/// (form, lemma, part of speech, inflection)
const FORMS: &[(&str, &str, PartOfSpeech, &str)] = &[
    ("storm",   "storm",   PartOfSpeech::Noun,      "sg"),
    ("storms",  "storm",   PartOfSpeech::Noun,      "pl"),
    ("gale",    "gale",    PartOfSpeech::Noun,      "sg"),
    ("gales",   "gale",    PartOfSpeech::Noun,      "pl"),
    ("breeze",  "breeze",  PartOfSpeech::Noun,      "sg"),
    ("breezes", "breeze",  PartOfSpeech::Noun,      "pl"),
    ("sun",     "sun",     PartOfSpeech::Noun,      "sg"),
    ("suns",    "sun",     PartOfSpeech::Noun,      "pl"),
    ("stone",   "stone",   PartOfSpeech::Noun,      "sg"),
    ("stones",  "stone",   PartOfSpeech::Noun,      "pl"),
    ("coal",    "coal",    PartOfSpeech::Noun,      "sg"),
    ("warmth",  "warmth",  PartOfSpeech::Noun,      "sg"),
    ("ghost",   "ghost",   PartOfSpeech::Noun,      "sg"),
    ("rage",    "rage",    PartOfSpeech::Verb,      "base"),
    ("raged",   "rage",    PartOfSpeech::Verb,      "past"),
    ("glow",    "glow",    PartOfSpeech::Verb,      "base"),
    ("glowed",  "glow",    PartOfSpeech::Verb,      "past"),
    ("burn",    "burn",    PartOfSpeech::Verb,      "base"),
    ("cold",    "cold",    PartOfSpeech::Adjective, "pos"),
    ("mild",    "mild",    PartOfSpeech::Adjective, "pos"),
    ("quickly", "quickly", PartOfSpeech::Adverb,    "pos"),
    ("the",     "the",     PartOfSpeech::Other,     "-"),
];

/// A tiny three-dimensional lexicon.
///
/// Nouns: breeze, coal, gale, ghost (no embedding), stone, storm, sun, warmth.
/// `coal` has no plural and `burn` has no past tense, so both are dropped for
/// originals with those inflections.
pub(crate) struct ToyOracle {
    embeddings: HashMap<String, Vector>,
    vocabulary: HashMap<PartOfSpeech, Vec<String>>,
}

pub(crate) fn toy_oracle() -> ToyOracle {
    let embeddings = EMBEDDINGS
        .iter()
        .map(|(word, v)| (word.to_string(), Vector::new(v.to_vec())))
        .collect();

    let mut vocabulary = HashMap::<PartOfSpeech, Vec<String>>::new();
    for &(form, lemma, pos, _) in FORMS {
        if form == lemma && pos.is_morphable() {
            vocabulary.entry(pos).or_default().push(lemma.to_owned());
        }
    }
    for lemmas in vocabulary.values_mut() {
        lemmas.sort();
    }

    ToyOracle {
        embeddings,
        vocabulary,
    }
}

impl ToyOracle {
    pub(crate) fn token(&self, id: usize, surface: &str) -> WordToken {
        WordToken::tagged_by(self, WordId(id), surface, &[])
    }
}

impl LexicalOracle for ToyOracle {
    fn embedding_of(&self, word: &str) -> Option<&Vector> {
        self.embeddings.get(word)
    }

    fn pos_and_lemma(&self, surface: &str, _context: &[&str]) -> (PartOfSpeech, String) {
        FORMS
            .iter()
            .find(|(form, ..)| *form == surface)
            .map(|&(_, lemma, pos, _)| (pos, lemma.to_owned()))
            .unwrap_or_else(|| (PartOfSpeech::Other, surface.to_owned()))
    }

    fn inflect(&self, lemma: &str, pos: PartOfSpeech, original: &str) -> Option<String> {
        let &(_, _, _, inflection) = FORMS
            .iter()
            .find(|&&(form, _, p, _)| form == original && p == pos)?;

        FORMS
            .iter()
            .find(|&&(_, l, p, i)| l == lemma && p == pos && i == inflection)
            .map(|&(form, ..)| form.to_owned())
    }

    fn candidate_vocabulary(&self, pos: PartOfSpeech) -> &[String] {
        self.vocabulary
            .get(&pos)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
