use std::str::FromStr;

use morph_engine::PartOfSpeech;

/// Penn Treebank tags for the classes that can be morphed. Every other tag is kept verbatim
/// in `Other`.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub(crate) enum Tag {
    /// Adjective
    JJ,
    /// Adjective, comparative
    JJR,
    /// Adjective, superlative
    JJS,
    /// Noun, singular or mass
    NN,
    /// Noun, plural
    NNS,
    /// Noun, proper singular
    NNP,
    /// Noun, proper plural
    NNPS,
    /// Adverb
    RB,
    /// Adverb, comparative
    RBR,
    /// Adverb, superlative
    RBS,
    /// Verb, base form
    VB,
    /// Verb, past tense
    VBD,
    /// Verb, gerund or present participle
    VBG,
    /// Verb, past participle
    VBN,
    /// Verb, non-3rd person singular present
    VBP,
    /// Verb, 3rd person singular present
    VBZ,
    Other(String),
}

impl Tag {
    pub(crate) fn is_noun(&self) -> bool {
        matches!(self, Tag::NN | Tag::NNS | Tag::NNP | Tag::NNPS)
    }

    pub(crate) fn is_verb(&self) -> bool {
        matches!(self, Tag::VB | Tag::VBD | Tag::VBG | Tag::VBN | Tag::VBP | Tag::VBZ)
    }

    pub(crate) fn is_adjective(&self) -> bool {
        matches!(self, Tag::JJ | Tag::JJR | Tag::JJS)
    }

    pub(crate) fn is_adverb(&self) -> bool {
        matches!(self, Tag::RB | Tag::RBR | Tag::RBS)
    }

    pub(crate) fn pos(&self) -> PartOfSpeech {
        if self.is_noun() {
            PartOfSpeech::Noun
        } else if self.is_verb() {
            PartOfSpeech::Verb
        } else if self.is_adjective() {
            PartOfSpeech::Adjective
        } else if self.is_adverb() {
            PartOfSpeech::Adverb
        } else {
            PartOfSpeech::Other
        }
    }
}

impl FromStr for Tag {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "JJ"   => Tag::JJ,
            "JJR"  => Tag::JJR,
            "JJS"  => Tag::JJS,
            "NN"   => Tag::NN,
            "NNS"  => Tag::NNS,
            "NNP"  => Tag::NNP,
            "NNPS" => Tag::NNPS,
            "RB"   => Tag::RB,
            "RBR"  => Tag::RBR,
            "RBS"  => Tag::RBS,
            "VB"   => Tag::VB,
            "VBD"  => Tag::VBD,
            "VBG"  => Tag::VBG,
            "VBN"  => Tag::VBN,
            "VBP"  => Tag::VBP,
            "VBZ"  => Tag::VBZ,
            other  => Tag::Other(other.to_owned()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pos() {
        let pos = |s: &str| s.parse::<Tag>().unwrap().pos();
        assert_eq!(pos("NNS"), PartOfSpeech::Noun);
        assert_eq!(pos("VBD"), PartOfSpeech::Verb);
        assert_eq!(pos("JJR"), PartOfSpeech::Adjective);
        assert_eq!(pos("RB"), PartOfSpeech::Adverb);
        assert_eq!(pos("DT"), PartOfSpeech::Other);
        assert_eq!("IN".parse::<Tag>().unwrap(), Tag::Other("IN".to_owned()));
    }
}
