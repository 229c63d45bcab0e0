//! Per-document morph state.
//!
//! Every tagged word moves through `Tagged -> Cycling -> Locked`. The session owns no timer:
//! the host calls [`MorphSession::advance_tick`] at whatever cadence it likes, and reads the
//! current text back through [`MorphSession::current_surface_form`].

use std::sync::Arc;

use rayon::prelude::*;
use tracing::debug;

use crate::error::{MorphError, Result};
use crate::oracle::LexicalOracle;
use crate::rank::{CandidateRanker, RankParams};
use crate::token::{WordId, WordToken};
use crate::vibe::{Vibe, VibeResolver};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum WordState {
    Tagged,
    Cycling,
    Locked,
}

/// Which form of a tagged word is showing.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Cursor {
    Original,
    Candidate(usize),
}

#[derive(Clone, Debug)]
pub struct TaggedWord {
    token: WordToken,
    candidates: Vec<String>,
    cursor: Cursor,
    state: WordState,
}

impl TaggedWord {
    fn new(token: WordToken) -> Self {
        Self {
            token,
            candidates: Vec::new(),
            cursor: Cursor::Original,
            state: WordState::Tagged,
        }
    }

    pub fn token(&self) -> &WordToken {
        &self.token
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn state(&self) -> WordState {
        self.state
    }

    pub fn surface_form(&self) -> &str {
        match self.cursor {
            Cursor::Candidate(i) => &self.candidates[i],
            Cursor::Original => &self.token.surface,
        }
    }

    fn first_candidate(&self) -> Cursor {
        if self.candidates.is_empty() {
            Cursor::Original
        } else {
            Cursor::Candidate(0)
        }
    }

    /// Installs a fresh candidate list, keeping the cursor valid.
    fn replace_candidates(&mut self, candidates: Vec<String>) {
        let showing = self.surface_form().to_owned();
        self.candidates = candidates;
        self.cursor = match self.state {
            WordState::Tagged => Cursor::Original,
            WordState::Cycling => self.first_candidate(),
            WordState::Locked => self.candidates
                .iter()
                .position(|c| *c == showing)
                .map_or(Cursor::Original, Cursor::Candidate),
        };
    }

    fn advance(&mut self) -> bool {
        let len = self.candidates.len();
        if len == 0 {
            return false;
        }
        let next = match self.cursor {
            Cursor::Original => Cursor::Candidate(0),
            Cursor::Candidate(i) => Cursor::Candidate((i + 1) % len),
        };
        let changed = next != self.cursor;
        self.cursor = next;
        changed
    }
}

/// Whether [`MorphSession::tag`] added or removed the word.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TagOutcome {
    Tagged,
    Untagged,
}

pub struct MorphSession<O: ?Sized> {
    oracle: Arc<O>,
    params: RankParams,
    resolver: VibeResolver,
    vibe: Option<Vibe>,
    words: Vec<TaggedWord>,
    highlight: bool,
}

impl<O> MorphSession<O>
where
    O: LexicalOracle + ?Sized,
{
    pub fn new(oracle: Arc<O>, params: RankParams) -> Self {
        Self {
            oracle,
            params,
            resolver: VibeResolver::new(),
            vibe: None,
            words: Vec::new(),
            highlight: true,
        }
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn vibe(&self) -> Option<&Vibe> {
        self.vibe.as_ref()
    }

    /// Tagged words in tagging order.
    pub fn tagged_words(&self) -> &[TaggedWord] {
        &self.words
    }

    pub fn get(&self, id: WordId) -> Option<&TaggedWord> {
        self.words.iter().find(|w| w.token.id == id)
    }

    pub fn state(&self, id: WordId) -> Option<WordState> {
        self.get(id).map(TaggedWord::state)
    }

    /// True iff at least one word is cycling.
    pub fn is_cycling(&self) -> bool {
        self.words.iter().any(|w| w.state == WordState::Cycling)
    }

    pub fn highlight(&self) -> bool {
        self.highlight
    }

    /// Flips the presentation flag and returns its new value.
    pub fn toggle_highlight(&mut self) -> bool {
        self.highlight = !self.highlight;
        self.highlight
    }

    /// Tags the word, or untags it if it is already tagged, whatever its state.
    pub fn tag(&mut self, token: WordToken) -> TagOutcome {
        if self.untag(token.id) {
            return TagOutcome::Untagged;
        }

        let mut word = TaggedWord::new(token);
        if let Some(vibe) = &self.vibe {
            word.candidates = self.ranker(vibe).rank(&word.token, &vibe.direction);
        }
        self.words.push(word);
        TagOutcome::Tagged
    }

    /// Removes the word from the session. Returns false if it was not tagged.
    pub fn untag(&mut self, id: WordId) -> bool {
        match self.position(id) {
            Some(i) => {
                self.words.remove(i);
                true
            },
            None => false,
        }
    }

    pub fn set_vibe(&mut self, vibe: &str) -> Result<()> {
        self.apply_vibe(vibe, None)
    }

    /// Sets a vibe pointing from `away_from` towards `toward`.
    pub fn set_vibe_away_from(&mut self, toward: &str, away_from: &str) -> Result<()> {
        self.apply_vibe(toward, Some(away_from))
    }

    fn apply_vibe(&mut self, toward: &str, away_from: Option<&str>) -> Result<()> {
        let vibe = self.resolver.resolve_vibe(&*self.oracle, toward, away_from)?;

        let lists = {
            let ranker = self.ranker(&vibe);
            self.words
                .par_iter()
                .map(|word| ranker.rank(&word.token, &vibe.direction))
                .collect::<Vec<_>>()
        };

        for (word, candidates) in self.words.iter_mut().zip(lists) {
            word.replace_candidates(candidates);
        }

        debug!(vibe = %vibe.toward, away_from = ?vibe.away_from, words = self.words.len(), "vibe set");
        self.vibe = Some(vibe);
        Ok(())
    }

    /// Starts every tagged word cycling. Returns the number of words that started.
    pub fn start_cycling(&mut self) -> Result<usize> {
        if self.words.is_empty() {
            return Ok(0);
        }
        if self.vibe.is_none() {
            return Err(MorphError::NoVibe);
        }

        let mut started = 0;
        for word in self.words.iter_mut().filter(|w| w.state == WordState::Tagged) {
            word.state = WordState::Cycling;
            word.cursor = word.first_candidate();
            started += 1;
        }
        Ok(started)
    }

    /// Moves every cycling word on to its next candidate. Returns true if any form changed.
    pub fn advance_tick(&mut self) -> bool {
        self.words
            .iter_mut()
            .filter(|w| w.state == WordState::Cycling)
            .fold(false, |changed, word| word.advance() || changed)
    }

    /// Locks every cycling word at its current candidate. Returns the number locked.
    pub fn freeze_all(&mut self) -> usize {
        let mut frozen = 0;
        for word in self.words.iter_mut().filter(|w| w.state == WordState::Cycling) {
            word.state = WordState::Locked;
            frozen += 1;
        }
        frozen
    }

    pub fn stop_cycling(&mut self) -> usize {
        self.freeze_all()
    }

    pub fn lock_one(&mut self, id: WordId) -> Result<()> {
        let i = self.position(id).ok_or(MorphError::UntrackedWord(id))?;
        self.words[i].state = WordState::Locked;
        Ok(())
    }

    /// The form of `token` the document should currently show.
    pub fn current_surface_form<'a>(&'a self, token: &'a WordToken) -> &'a str {
        self.get(token.id)
            .map_or(token.surface.as_str(), TaggedWord::surface_form)
    }

    /// `(original, replacement)` for every locked word showing a replacement.
    pub fn morphed(&self) -> Vec<(&str, &str)> {
        self.words
            .iter()
            .filter(|w| w.state == WordState::Locked && w.cursor != Cursor::Original)
            .map(|w| (w.token.surface.as_str(), w.surface_form()))
            .collect()
    }

    fn position(&self, id: WordId) -> Option<usize> {
        self.words.iter().position(|w| w.token.id == id)
    }

    fn ranker<'a>(&'a self, vibe: &'a Vibe) -> CandidateRanker<'a, O> {
        CandidateRanker::new(&*self.oracle, self.params)
            .excluding(vibe.words())
    }
}
