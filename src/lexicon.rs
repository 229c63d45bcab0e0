//! A plain-text lexical oracle.
//!
//! Embeddings are read from a GloVe text file (`word c1 c2 ...` per line, with an optional
//! word2vec `<count> <dim>` header). Tagging and inflection come from a tab-separated table of
//! `form  lemma  PennTag` rows; a lemma can only replace a word if the table lists its form
//! for the word's tag.

mod tag;

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::Context;
use lazy_static::lazy_static;
use morph_engine::{LexicalOracle, PartOfSpeech, Vector};
use regex::Regex;
use tracing::info;

use crate::error::{LoadError, LoadErrorReason};

pub(crate) use tag::Tag;

#[derive(Clone, PartialEq, Eq, Debug)]
pub(crate) struct Form {
    pub(crate) form: String,
    pub(crate) lemma: String,
    pub(crate) tag: Tag,
}

#[derive(Clone, Debug)]
struct Analysis {
    lemma: String,
    tag: Tag,
}

pub(crate) struct Lexicon {
    embeddings: HashMap<String, Vector>,
    analyses: HashMap<String, Vec<Analysis>>,
    inflections: HashMap<(String, Tag), String>,
    vocabulary: HashMap<PartOfSpeech, Vec<String>>,
}

impl Lexicon {
    pub(crate) fn load(embeddings_path: &Path, forms_path: &Path, limit: Option<usize>) -> anyhow::Result<Self> {
        let embeddings = File::open(embeddings_path)
            .map(BufReader::new)
            .with_context(|| format!("failed to open embeddings file {}", embeddings_path.to_string_lossy()))
            .and_then(|reader| parse_embeddings(reader, limit)
                .with_context(|| format!("failed to read embeddings file {}", embeddings_path.to_string_lossy())))?;

        let forms = File::open(forms_path)
            .map(BufReader::new)
            .with_context(|| format!("failed to open forms file {}", forms_path.to_string_lossy()))
            .and_then(|reader| parse_forms(reader)
                .with_context(|| format!("failed to read forms file {}", forms_path.to_string_lossy())))?;

        let lexicon = Self::from_parts(embeddings, forms);

        info!(
            embeddings = lexicon.embeddings.len(),
            forms = lexicon.analyses.len(),
            nouns = lexicon.candidate_vocabulary(PartOfSpeech::Noun).len(),
            verbs = lexicon.candidate_vocabulary(PartOfSpeech::Verb).len(),
            adjectives = lexicon.candidate_vocabulary(PartOfSpeech::Adjective).len(),
            adverbs = lexicon.candidate_vocabulary(PartOfSpeech::Adverb).len(),
            "lexicon loaded"
        );

        Ok(lexicon)
    }

    pub(crate) fn from_parts(embeddings: HashMap<String, Vector>, forms: Vec<Form>) -> Self {
        lazy_static! {
            static ref CLEAN_RE: Regex = Regex::new(r"^[a-z]+$").unwrap();
        }

        let mut analyses = HashMap::<String, Vec<Analysis>>::new();
        let mut inflections = HashMap::new();
        let mut vocabulary = HashMap::<PartOfSpeech, HashSet<String>>::new();

        for Form { form, lemma, tag } in forms {
            let pos = tag.pos();

            if pos.is_morphable() && CLEAN_RE.is_match(&lemma) && embeddings.contains_key(&lemma) {
                vocabulary.entry(pos).or_default().insert(lemma.clone());
            }

            inflections
                .entry((lemma.clone(), tag.clone()))
                .or_insert_with(|| form.clone());

            analyses
                .entry(form)
                .or_default()
                .push(Analysis { lemma, tag });
        }

        let vocabulary = vocabulary
            .into_iter()
            .map(|(pos, lemmas)| {
                let mut lemmas = lemmas.into_iter().collect::<Vec<_>>();
                lemmas.sort();
                (pos, lemmas)
            })
            .collect();

        Self {
            embeddings,
            analyses,
            inflections,
            vocabulary,
        }
    }

    fn analysis(&self, form: &str, pos: PartOfSpeech) -> Option<&Analysis> {
        self.analyses
            .get(form)?
            .iter()
            .find(|analysis| analysis.tag.pos() == pos)
    }
}

impl LexicalOracle for Lexicon {
    fn embedding_of(&self, word: &str) -> Option<&Vector> {
        self.embeddings.get(word)
    }

    /// Picks the first content-word analysis listed for the form. The table is expected to
    /// list the most frequent reading of each form first.
    fn pos_and_lemma(&self, surface: &str, _context: &[&str]) -> (PartOfSpeech, String) {
        let surface = surface.to_lowercase();
        let analyses = match self.analyses.get(&surface) {
            Some(analyses) => analyses,
            None => return (PartOfSpeech::Other, surface),
        };

        analyses
            .iter()
            .find(|analysis| analysis.tag.pos().is_morphable())
            .or_else(|| analyses.first())
            .map(|analysis| (analysis.tag.pos(), analysis.lemma.clone()))
            .unwrap_or((PartOfSpeech::Other, surface))
    }

    fn inflect(&self, lemma: &str, pos: PartOfSpeech, original: &str) -> Option<String> {
        let tag = self.analysis(&original.to_lowercase(), pos)?.tag.clone();
        self.inflections
            .get(&(lemma.to_owned(), tag))
            .cloned()
    }

    fn candidate_vocabulary(&self, pos: PartOfSpeech) -> &[String] {
        self.vocabulary
            .get(&pos)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Reads at most `limit` embeddings. Every vector must have the dimension of the first.
pub(crate) fn parse_embeddings<R>(reader: R, limit: Option<usize>) -> Result<HashMap<String, Vector>, LoadError>
where
    R: BufRead,
{
    let mut embeddings = HashMap::new();
    let mut dim = None;

    for (i, line) in reader.lines().enumerate() {
        if limit.map_or(false, |limit| embeddings.len() >= limit) {
            break;
        }

        let line_no = i + 1;
        let line = line.map_err(|err| LoadError::new(line_no, LoadErrorReason::Io(Box::new(err))))?;
        let mut fields = line.split_whitespace();

        let word = match fields.next() {
            Some(word) => word,
            None => continue,
        };

        let components = fields
            .map(|field| field
                .parse::<f32>()
                .map_err(|_| LoadError::new(line_no, LoadErrorReason::BadComponent(field.to_owned()))))
            .collect::<Result<Vec<_>, _>>()?;

        if line_no == 1 && is_word2vec_header(word, &components) {
            continue;
        }

        if components.is_empty() {
            return Err(LoadError::new(line_no, LoadErrorReason::MissingField("vector")));
        }

        match dim {
            None => dim = Some(components.len()),
            Some(expected) if expected != components.len() => {
                return Err(LoadError::new(line_no, LoadErrorReason::DimensionMismatch {
                    expected,
                    found: components.len(),
                }));
            },
            Some(_) => (),
        }

        embeddings.insert(word.to_owned(), Vector::new(components));
    }

    Ok(embeddings)
}

fn is_word2vec_header(word: &str, components: &[f32]) -> bool {
    word.parse::<usize>().is_ok()
        && matches!(components, [dim] if dim.fract() == 0.0)
}

/// Reads `form<TAB>lemma<TAB>tag` rows. Blank lines and lines starting with `#` are skipped.
pub(crate) fn parse_forms<R>(reader: R) -> Result<Vec<Form>, LoadError>
where
    R: BufRead,
{
    let mut forms = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        let line = line.map_err(|err| LoadError::new(line_no, LoadErrorReason::Io(Box::new(err))))?;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line.split('\t').map(str::trim);
        let mut field = |name| fields
            .next()
            .filter(|field| !field.is_empty())
            .ok_or(LoadError::new(line_no, LoadErrorReason::MissingField(name)));

        let form = field("form")?.to_lowercase();
        let lemma = field("lemma")?.to_lowercase();
        let tag = match field("tag")?.parse::<Tag>() {
            Ok(tag) => tag,
            Err(never) => match never {},
        };

        forms.push(Form {
            form,
            lemma,
            tag,
        });
    }

    Ok(forms)
}
