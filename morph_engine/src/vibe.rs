use std::collections::HashMap;

use tracing::debug;

use crate::error::{MorphError, Result};
use crate::oracle::LexicalOracle;
use crate::vector::Vector;

/// An active vibe: the words it was built from and the direction they resolve to.
#[derive(Clone, Debug, PartialEq)]
pub struct Vibe {
    pub toward: String,
    pub away_from: Option<String>,
    pub direction: Vector,
}

impl Vibe {
    /// The words the vibe was built from. They are never offered as candidates.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.toward.as_str()).chain(self.away_from.as_deref())
    }
}

/// Resolves vibe words to directions, caching each lookup for the session.
#[derive(Default, Debug)]
pub struct VibeResolver {
    cache: HashMap<String, Vector>,
}

impl VibeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve<O>(&mut self, oracle: &O, vibe: &str) -> Result<Vector>
    where
        O: LexicalOracle + ?Sized,
    {
        let key = normalize_vibe(vibe);

        if let Some(direction) = self.cache.get(&key) {
            return Ok(direction.clone());
        }

        let direction = oracle
            .embedding_of(&key)
            .cloned()
            .ok_or_else(|| MorphError::UnknownVibe(vibe.trim().to_owned()))?;

        debug!(vibe = %key, dim = direction.dim(), "resolved vibe");
        self.cache.insert(key, direction.clone());
        Ok(direction)
    }

    /// Resolves a vibe whose direction points from `away_from` towards `toward`.
    /// Both words must exist.
    pub fn resolve_vibe<O>(&mut self, oracle: &O, toward: &str, away_from: Option<&str>) -> Result<Vibe>
    where
        O: LexicalOracle + ?Sized,
    {
        let toward_dir = self.resolve(oracle, toward)?;

        let direction = match away_from {
            Some(away_from) => &toward_dir - &self.resolve(oracle, away_from)?,
            None => toward_dir,
        };

        Ok(Vibe {
            toward: normalize_vibe(toward),
            away_from: away_from.map(normalize_vibe),
            direction,
        })
    }
}

fn normalize_vibe(vibe: &str) -> String {
    vibe.trim().to_lowercase()
}
