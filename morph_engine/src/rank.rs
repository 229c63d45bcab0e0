//! Ranking of replacement candidates for a single word.
//!
//! A word is shifted towards a vibe by vector arithmetic,
//!
//! ```text
//! target = word + shift_scale * direction
//! ```
//!
//! and every vocabulary word of the same part of speech is scored by its cosine similarity
//! to the target. The best lemmas are then inflected to match the original word.

use std::cmp::Ordering;
use std::collections::HashSet;

use tracing::trace;

use crate::oracle::LexicalOracle;
use crate::token::WordToken;
use crate::vector::Vector;

pub const DEFAULT_SHIFT_SCALE: f32 = 1.0;
pub const DEFAULT_TOP_N: usize = 8;

/// Tuning for [`CandidateRanker`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RankParams {
    /// How far the vibe pulls the word. Larger values drift further from the original sense.
    pub shift_scale: f32,
    /// Maximum length of a candidate list.
    pub top_n: usize,
    /// Scale the word vector and the direction to unit length before combining them.
    pub normalize: bool,
}

impl Default for RankParams {
    fn default() -> Self {
        Self {
            shift_scale: DEFAULT_SHIFT_SCALE,
            top_n: DEFAULT_TOP_N,
            normalize: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    pub lemma: String,
    pub surface: String,
    pub score: f32,
}

pub struct CandidateRanker<'a, O: ?Sized> {
    oracle: &'a O,
    params: RankParams,
    excluded: Vec<String>,
}

impl<'a, O> CandidateRanker<'a, O>
where
    O: LexicalOracle + ?Sized,
{
    pub fn new(oracle: &'a O, params: RankParams) -> Self {
        Self {
            oracle,
            params,
            excluded: Vec::new(),
        }
    }

    /// Lemmas that must never be offered, in addition to the word's own lemma.
    pub fn excluding<I, S>(mut self, lemmas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded.extend(lemmas.into_iter().map(Into::into));
        self
    }

    pub fn params(&self) -> RankParams {
        self.params
    }

    /// The replacement surface forms for `word`, best first. Empty when the word cannot be
    /// morphed.
    pub fn rank(&self, word: &WordToken, direction: &Vector) -> Vec<String> {
        self.rank_scored(word, direction)
            .into_iter()
            .map(|candidate| candidate.surface)
            .collect()
    }

    pub fn rank_scored(&self, word: &WordToken, direction: &Vector) -> Vec<Candidate> {
        if !word.pos.is_morphable() || self.params.top_n == 0 {
            return Vec::new();
        }

        let embedding = match self.oracle.embedding_of(&word.lemma) {
            Some(embedding) => embedding,
            None => return Vec::new(),
        };

        let target = self.target(embedding, direction);

        let mut scored = self.oracle
            .candidate_vocabulary(word.pos)
            .iter()
            .filter(|lemma| **lemma != word.lemma && !self.excluded.contains(*lemma))
            .filter_map(|lemma| self.oracle
                .embedding_of(lemma)
                .map(|c| (target.cosine_similarity(c), lemma.as_str())))
            .collect::<Vec<_>>();

        scored.sort_by(|(sa, la), (sb, lb)| by_score_desc(*sa, *sb).then_with(|| la.cmp(lb)));

        let mut seen = HashSet::new();
        let candidates = scored
            .into_iter()
            .filter_map(|(score, lemma)| self.oracle
                .inflect(lemma, word.pos, &word.surface)
                .map(|surface| Candidate {
                    lemma: lemma.to_owned(),
                    surface,
                    score,
                }))
            .filter(|candidate| candidate.surface != word.surface && seen.insert(candidate.surface.clone()))
            .take(self.params.top_n)
            .collect::<Vec<_>>();

        trace!(word = %word.surface, candidates = candidates.len(), "ranked");
        candidates
    }

    fn target(&self, embedding: &Vector, direction: &Vector) -> Vector {
        if self.params.normalize {
            &embedding.normalized() + &(&direction.normalized() * self.params.shift_scale)
        } else {
            embedding + &(direction * self.params.shift_scale)
        }
    }
}

fn by_score_desc(a: f32, b: f32) -> Ordering {
    b.total_cmp(&a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::toy_oracle;

    fn warmth() -> Vector {
        Vector::new(vec![0.0, 1.0, 0.0])
    }

    #[test]
    fn test_storm_towards_warmth() {
        let oracle = toy_oracle();
        let ranker = CandidateRanker::new(&oracle, RankParams::default()).excluding(["warmth"]);
        let storm = oracle.token(0, "storm");

        let scored = ranker.rank_scored(&storm, &warmth());
        let surfaces = scored.iter().map(|c| c.surface.as_str()).collect::<Vec<_>>();
        assert_eq!(surfaces, vec!["breeze", "sun", "gale", "coal", "stone"]);
        assert!(scored.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_inflects_like_original() {
        let oracle = toy_oracle();
        let ranker = CandidateRanker::new(&oracle, RankParams::default()).excluding(["warmth"]);

        // coal has no plural form, so it is dropped
        let storms = oracle.token(0, "storms");
        assert_eq!(ranker.rank(&storms, &warmth()), vec!["breezes", "suns", "gales", "stones"]);

        // burn has no past tense
        let raged = oracle.token(1, "raged");
        assert_eq!(ranker.rank(&raged, &warmth()), vec!["glowed"]);
    }

    #[test]
    fn test_same_part_of_speech() {
        let oracle = toy_oracle();
        let ranker = CandidateRanker::new(&oracle, RankParams::default());
        let storm = oracle.token(0, "storm");
        for surface in ranker.rank(&storm, &warmth()) {
            let (pos, lemma) = oracle.pos_and_lemma(&surface, &[]);
            assert_eq!(pos, storm.pos);
            assert_ne!(lemma, storm.lemma);
        }
    }

    #[test]
    fn test_vibe_word_included_unless_excluded() {
        let oracle = toy_oracle();
        let storm = oracle.token(0, "storm");
        let plain = CandidateRanker::new(&oracle, RankParams::default());
        assert!(plain.rank(&storm, &warmth()).contains(&"warmth".to_owned()));
        let excluding = plain.excluding(["warmth"]);
        assert!(!excluding.rank(&storm, &warmth()).contains(&"warmth".to_owned()));
    }

    #[test]
    fn test_deterministic() {
        let oracle = toy_oracle();
        let ranker = CandidateRanker::new(&oracle, RankParams::default());
        let storm = oracle.token(0, "storm");
        let first = ranker.rank(&storm, &warmth());
        for _ in 0..10 {
            assert_eq!(ranker.rank(&storm, &warmth()), first);
        }
    }

    #[test]
    fn test_ties_broken_by_lemma() {
        let oracle = toy_oracle();
        let ranker = CandidateRanker::new(&oracle, RankParams::default());
        let storm = oracle.token(0, "storm");
        // coal and stone share an embedding
        let ranked = ranker.rank(&storm, &warmth());
        let coal = ranked.iter().position(|s| s == "coal").unwrap();
        let stone = ranked.iter().position(|s| s == "stone").unwrap();
        assert_eq!(stone, coal + 1);
    }

    #[test]
    fn test_top_n() {
        let oracle = toy_oracle();
        let params = RankParams {
            top_n: 2,
            ..RankParams::default()
        };
        let ranker = CandidateRanker::new(&oracle, params).excluding(["warmth"]);
        let storm = oracle.token(0, "storm");
        assert_eq!(ranker.rank(&storm, &warmth()), vec!["breeze", "sun"]);
    }

    #[test]
    fn test_unmorphable() {
        let oracle = toy_oracle();
        let ranker = CandidateRanker::new(&oracle, RankParams::default());
        // in the vocabulary but without an embedding
        assert!(ranker.rank(&oracle.token(0, "ghost"), &warmth()).is_empty());
        // unknown to the tagger
        assert!(ranker.rank(&oracle.token(1, "xyzzy"), &warmth()).is_empty());
        // not a content word
        assert!(ranker.rank(&oracle.token(2, "the"), &warmth()).is_empty());
    }

    #[test]
    fn test_shift_scale() {
        let oracle = toy_oracle();
        let storm = oracle.token(0, "storm");

        // with no shift the nearest neighbour of storm itself comes first
        let still = CandidateRanker::new(&oracle, RankParams {
            shift_scale: 0.0,
            ..RankParams::default()
        });
        assert_eq!(still.rank(&storm, &warmth())[0], "gale");

        let raw = CandidateRanker::new(&oracle, RankParams {
            shift_scale: 10.0,
            normalize: false,
            ..RankParams::default()
        }).excluding(["warmth"]);
        assert_eq!(raw.rank(&storm, &warmth())[0], "sun");
    }
}
