use std::fmt::{self, Write};

use anyhow::Context;
use clap::Parser;
use morph_engine::{CandidateRanker, LexicalOracle, PartOfSpeech, RankParams, VibeResolver, WordId, WordToken};
use serde::Serialize;

#[derive(Parser, Debug)]
pub(crate) struct Opts {
    /// The vibe to morph the words towards.
    #[clap(short, long)]
    vibe: String,

    /// A vibe to morph the words away from.
    #[clap(short, long)]
    away_from: Option<String>,

    /// Print the results as JSON.
    #[clap(long)]
    json: bool,

    /// The words to morph. Together they are used as each other's context when tagging.
    #[clap(required = true)]
    words: Vec<String>,
}

#[derive(Serialize, Debug)]
struct Suggestion<'a> {
    original: &'a str,
    pos: PartOfSpeech,
    candidates: Vec<Scored>,
}

#[derive(Serialize, Debug)]
struct Scored {
    word: String,
    score: f32,
}

pub(crate) fn run<O>(oracle: &O, params: RankParams, opts: Opts) -> anyhow::Result<()>
where
    O: LexicalOracle + ?Sized,
{
    let vibe = VibeResolver::new()
        .resolve_vibe(oracle, &opts.vibe, opts.away_from.as_deref())?;

    let ranker = CandidateRanker::new(oracle, params).excluding(vibe.words());

    let context = opts.words
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>();

    let suggestions = opts.words
        .iter()
        .enumerate()
        .map(|(i, word)| {
            let token = WordToken::tagged_by(oracle, WordId(i), &word.to_lowercase(), &context);
            let candidates = ranker
                .rank_scored(&token, &vibe.direction)
                .into_iter()
                .map(|candidate| Scored {
                    word: candidate.surface,
                    score: candidate.score,
                })
                .collect();

            Suggestion {
                original: word,
                pos: token.pos,
                candidates,
            }
        })
        .collect::<Vec<_>>();

    let out = if opts.json {
        serde_json::to_string_pretty(&suggestions)
            .context("failed to serialize suggestions")?
    } else {
        format_suggestions(&suggestions)
            .context("failed to format suggestions")?
    };

    println!("{}", out);
    Ok(())
}

fn format_suggestions(suggestions: &[Suggestion<'_>]) -> Result<String, fmt::Error> {
    let mut out = String::new();

    for suggestion in suggestions {
        if !out.is_empty() {
            out.push('\n');
        }

        write!(out, "{} ({})", suggestion.original, suggestion.pos)?;

        if suggestion.candidates.is_empty() {
            out.push_str(": no candidates");
            continue;
        }

        for (i, candidate) in suggestion.candidates.iter().enumerate() {
            write!(out, "{} {} {:.4}", if i == 0 { ":" } else { "," }, candidate.word, candidate.score)?;
        }
    }

    Ok(out)
}
