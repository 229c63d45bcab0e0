use std::borrow::Cow;

use lazy_static::lazy_static;
use morph_engine::{LexicalOracle, MorphSession, WordId, WordState, WordToken};
use regex::Regex;
use unidecode::unidecode;

lazy_static! {
    static ref WORD_RE: Regex = Regex::new(r"\p{L}+").unwrap();
}

/// A poem split into alternating word and non-word pieces, line by line.
#[derive(Debug)]
pub(crate) struct Poem {
    lines: Vec<Vec<Piece>>,
    words: Vec<PoemWord>,
}

#[derive(Debug)]
enum Piece {
    Text(String),
    Word(usize),
}

#[derive(Debug)]
pub(crate) struct PoemWord {
    /// The word exactly as written.
    pub(crate) text: String,
    /// The word as the oracle sees it: ASCII-folded and lowercase.
    pub(crate) token: WordToken,
}

impl Poem {
    pub(crate) fn parse<O>(text: &str, oracle: &O) -> Self
    where
        O: LexicalOracle + ?Sized,
    {
        let mut lines = Vec::new();
        let mut words = Vec::new();

        for line in text.lines() {
            let keys = WORD_RE
                .find_iter(line)
                .map(|m| unidecode(m.as_str()).to_lowercase())
                .collect::<Vec<_>>();
            let context = keys.iter().map(String::as_str).collect::<Vec<_>>();

            let mut pieces = Vec::new();
            let mut last = 0;

            for (m, key) in WORD_RE.find_iter(line).zip(keys.iter()) {
                if m.start() > last {
                    pieces.push(Piece::Text(line[last..m.start()].to_owned()));
                }

                let id = WordId(words.len());
                words.push(PoemWord {
                    text: m.as_str().to_owned(),
                    token: WordToken::tagged_by(oracle, id, key, &context),
                });
                pieces.push(Piece::Word(id.0));
                last = m.end();
            }

            if last < line.len() {
                pieces.push(Piece::Text(line[last..].to_owned()));
            }

            lines.push(pieces);
        }

        Self {
            lines,
            words,
        }
    }

    pub(crate) fn words(&self) -> &[PoemWord] {
        &self.words
    }

    /// Finds words by `#index` or, case-insensitively, by their text.
    pub(crate) fn find(&self, query: &str) -> Vec<&PoemWord> {
        if let Some(index) = query.strip_prefix('#').and_then(|i| i.parse::<usize>().ok()) {
            return self.words.get(index).into_iter().collect();
        }

        let key = unidecode(query.trim()).to_lowercase();
        self.words
            .iter()
            .filter(|word| word.token.surface == key)
            .collect()
    }

    /// Renders the poem as it currently reads. With `marked`, words that are still cycling
    /// are wrapped in guillemets while the session's highlight flag is on.
    pub(crate) fn render<O>(&self, session: &MorphSession<O>, marked: bool) -> String
    where
        O: LexicalOracle + ?Sized,
    {
        let mut out = String::new();

        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }

            for piece in line {
                match piece {
                    Piece::Text(text) => out.push_str(text),
                    Piece::Word(index) => {
                        let word = &self.words[*index];
                        let showing = display_form(word, session);
                        let mark = marked
                            && session.highlight()
                            && session.state(word.token.id) == Some(WordState::Cycling);

                        if mark {
                            out.push('«');
                        }
                        out.push_str(&showing);
                        if mark {
                            out.push('»');
                        }
                    },
                }
            }
        }

        out
    }
}

pub(crate) fn display_form<'a, O>(word: &'a PoemWord, session: &'a MorphSession<O>) -> Cow<'a, str>
where
    O: LexicalOracle + ?Sized,
{
    let form = session.current_surface_form(&word.token);
    if form == word.token.surface {
        Cow::Borrowed(&word.text)
    } else {
        Cow::Owned(match_case(&word.text, form))
    }
}

/// Copies the capitalisation of `original` onto `replacement`.
fn match_case(original: &str, replacement: &str) -> String {
    let mut chars = original.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => {
            if original.chars().count() > 1 && chars.all(char::is_uppercase) {
                replacement.to_uppercase()
            } else {
                let mut rchars = replacement.chars();
                rchars
                    .next()
                    .map(|c| c.to_uppercase().chain(rchars).collect())
                    .unwrap_or_default()
            }
        },
        _ => replacement.to_owned(),
    }
}
