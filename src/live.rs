use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context};
use clap::Parser;
use morph_engine::{LexicalOracle, MorphSession, RankParams, TagOutcome, WordState};
use tokio::io::AsyncBufReadExt;
use tracing::{info, warn};

use crate::export::{self, Export};
use crate::poem::{self, Poem};

#[derive(Parser, Debug)]
pub(crate) struct Opts {
    /// The poem to morph.
    poem: PathBuf,

    /// The vibe to morph towards. Can also be set later with the `vibe` command.
    #[clap(short, long)]
    vibe: Option<String>,

    /// A vibe to morph away from.
    #[clap(short, long, requires = "vibe")]
    away_from: Option<String>,

    /// Words to tag before cycling starts, either as text or as `#index`.
    #[clap(short, long)]
    tag: Vec<String>,

    /// Freeze everything after this many ticks.
    #[clap(long)]
    ticks: Option<u64>,

    /// Milliseconds between ticks. Overrides the configured cadence.
    #[clap(long)]
    tick_millis: Option<u64>,

    /// Do not read commands from stdin.
    #[clap(long, requires = "ticks")]
    no_input: bool,

    /// The file to write the finished poem to.
    /// If omitted, it will be written to stdout instead.
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Export the finished poem as JSON, along with the list of replacements.
    #[clap(long)]
    json: bool,
}

/// A line typed by the user while the poem is cycling.
#[derive(Clone, PartialEq, Eq, Debug)]
enum Command {
    Tag(String),
    Lock(String),
    Start,
    Tick,
    Freeze,
    Vibe { toward: String, away_from: Option<String> },
    Highlight,
    Show,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let name = parts.next().ok_or_else(|| anyhow!("empty command"))?;
        let args = parts.collect::<Vec<_>>();

        let command = match (name, args.as_slice()) {
            ("tag", [word]) => Command::Tag(word.to_string()),
            ("lock", [word]) => Command::Lock(word.to_string()),
            ("start", []) => Command::Start,
            ("tick", []) => Command::Tick,
            ("freeze" | "stop", []) => Command::Freeze,
            ("vibe", [toward]) => Command::Vibe {
                toward: toward.to_string(),
                away_from: None,
            },
            ("vibe", [toward, "away", away_from]) => Command::Vibe {
                toward: toward.to_string(),
                away_from: Some(away_from.to_string()),
            },
            ("hl" | "highlight", []) => Command::Highlight,
            ("show", []) => Command::Show,
            ("quit" | "q", []) => Command::Quit,
            _ => return Err(anyhow!("unrecognised command {:?}", s.trim())),
        };

        Ok(command)
    }
}

enum Flow {
    Continue,
    Redraw,
    Quit,
}

pub(crate) async fn run<O>(
    oracle: Arc<O>,
    params: RankParams,
    default_tick: Duration,
    opts: Opts
) -> anyhow::Result<()>
where
    O: LexicalOracle + ?Sized,
{
    let text = tokio::fs::read_to_string(&opts.poem)
        .await
        .with_context(|| format!("failed to read poem {}", opts.poem.to_string_lossy()))?;

    let poem = Poem::parse(&text, &*oracle);
    let mut session = MorphSession::new(oracle, params);

    for query in &opts.tag {
        apply(&mut session, &poem, Command::Tag(query.clone()));
    }

    if let Some(vibe) = &opts.vibe {
        apply(&mut session, &poem, Command::Vibe {
            toward: vibe.clone(),
            away_from: opts.away_from.clone(),
        });
        apply(&mut session, &poem, Command::Start);
    }

    draw(&poem, &session);

    let tick = opts.tick_millis
        .map(Duration::from_millis)
        .unwrap_or(default_tick);
    let mut interval = tokio::time::interval(tick);
    interval.tick().await;

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    let mut reading = !opts.no_input;
    let mut ticks = 0;

    loop {
        if !reading && (opts.ticks.is_none() || !session.is_cycling()) {
            break;
        }

        let flow = tokio::select! {
            _ = interval.tick() => {
                if session.is_cycling() {
                    ticks += 1;
                    let flow = apply(&mut session, &poem, Command::Tick);
                    if opts.ticks.map_or(false, |max| ticks >= max) {
                        Flow::Quit
                    } else {
                        flow
                    }
                } else {
                    Flow::Continue
                }
            },

            line = lines.next_line(), if reading => {
                match line.context("failed to read command from stdin")? {
                    Some(line) if line.trim().is_empty() => Flow::Continue,
                    Some(line) => match line.parse::<Command>() {
                        Ok(command) => apply(&mut session, &poem, command),
                        Err(err) => {
                            warn!("{}", err);
                            Flow::Continue
                        },
                    },
                    None => {
                        reading = false;
                        Flow::Continue
                    },
                }
            },
        };

        match flow {
            Flow::Continue => (),
            Flow::Redraw => draw(&poem, &session),
            Flow::Quit => break,
        }
    }

    let frozen = session.freeze_all();
    info!(ticks, frozen, "finished cycling");

    let export = Export::new(poem.render(&session, false), session.morphed());
    export::run(opts.output.as_deref(), &export, opts.json).await
}

/// Applies one command. Mistakes the user can correct are logged rather than returned.
fn apply<O>(session: &mut MorphSession<O>, poem: &Poem, command: Command) -> Flow
where
    O: LexicalOracle + ?Sized,
{
    let res = match command {
        Command::Tag(query) => {
            let words = poem.find(&query);
            if words.is_empty() {
                warn!(query = %query, "no such word");
            }

            // Words tagged mid-cycle join the cycle straight away.
            let mut joining = false;
            for word in words {
                match session.tag(word.token.clone()) {
                    TagOutcome::Tagged => {
                        info!(word = %word.text, id = %word.token.id, "tagged");
                        joining |= session.is_cycling();
                    },
                    TagOutcome::Untagged => info!(word = %word.text, id = %word.token.id, "untagged"),
                }
            }

            if joining {
                session.start_cycling().map(|_| Flow::Redraw)
            } else {
                Ok(Flow::Redraw)
            }
        },

        Command::Lock(query) => {
            let words = poem
                .find(&query)
                .into_iter()
                .filter(|word| session.get(word.token.id).is_some())
                .collect::<Vec<_>>();

            if words.is_empty() {
                warn!(query = %query, "no tagged word matches");
                Ok(Flow::Continue)
            } else {
                words
                    .into_iter()
                    .try_for_each(|word| session.lock_one(word.token.id))
                    .map(|()| Flow::Redraw)
            }
        },

        Command::Start => session
            .start_cycling()
            .map(|started| {
                info!(started, "cycling");
                Flow::Redraw
            }),

        Command::Tick => Ok(match session.advance_tick() {
            true => Flow::Redraw,
            false => Flow::Continue,
        }),

        Command::Freeze => {
            session.freeze_all();
            Ok(Flow::Redraw)
        },

        Command::Vibe { toward, away_from } => {
            let res = match away_from {
                Some(away_from) => session.set_vibe_away_from(&toward, &away_from),
                None => session.set_vibe(&toward),
            };
            res.map(|()| Flow::Redraw)
        },

        Command::Highlight => {
            session.toggle_highlight();
            Ok(Flow::Redraw)
        },

        Command::Show => {
            show_tagged(poem, session);
            Ok(Flow::Continue)
        },

        Command::Quit => Ok(Flow::Quit),
    };

    res.unwrap_or_else(|err| {
        warn!("{}", err);
        Flow::Continue
    })
}

fn draw<O>(poem: &Poem, session: &MorphSession<O>)
where
    O: LexicalOracle + ?Sized,
{
    eprintln!("\n{}\n", poem.render(session, true));
}

fn show_tagged<O>(poem: &Poem, session: &MorphSession<O>)
where
    O: LexicalOracle + ?Sized,
{
    if session.tagged_words().is_empty() {
        eprintln!("(nothing tagged)");
        return;
    }

    for tagged in session.tagged_words() {
        let word = &poem.words()[tagged.token().id.0];
        let showing = poem::display_form(word, session);
        let status = match tagged.state() {
            WordState::Tagged => "tagged",
            WordState::Cycling => "cycling",
            WordState::Locked => "locked",
        };
        eprintln!(
            "  {} {} -> {} [{}, {} candidates]",
            tagged.token().id, word.text, showing, status, tagged.candidates().len()
        );
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::fs;

    use morph_engine::{PartOfSpeech, Vector, WordId};

    use super::*;

    struct Oracle {
        embeddings: HashMap<String, Vector>,
        nouns: Vec<String>,
    }

    impl LexicalOracle for Oracle {
        fn embedding_of(&self, word: &str) -> Option<&Vector> {
            self.embeddings.get(word)
        }

        fn pos_and_lemma(&self, surface: &str, _context: &[&str]) -> (PartOfSpeech, String) {
            if self.nouns.iter().any(|noun| noun == surface) {
                (PartOfSpeech::Noun, surface.to_owned())
            } else {
                (PartOfSpeech::Other, surface.to_owned())
            }
        }

        fn inflect(&self, lemma: &str, _pos: PartOfSpeech, _original: &str) -> Option<String> {
            Some(lemma.to_owned())
        }

        fn candidate_vocabulary(&self, pos: PartOfSpeech) -> &[String] {
            match pos {
                PartOfSpeech::Noun => &self.nouns,
                _ => &[],
            }
        }
    }

    // Towards "light", "night" ranks its candidates e, d, c, b, a.
    fn oracle() -> Arc<Oracle> {
        let embeddings = [
            ("night", vec![1.0, 0.0]),
            ("light", vec![0.0, 1.0]),
            ("a", vec![1.0, 5.0]),
            ("b", vec![1.0, 4.0]),
            ("c", vec![1.0, 3.0]),
            ("d", vec![1.0, 2.0]),
            ("e", vec![1.0, 1.0]),
        ];

        Arc::new(Oracle {
            embeddings: embeddings
                .into_iter()
                .map(|(w, v)| (w.to_owned(), Vector::new(v)))
                .collect(),
            nouns: ["a", "b", "c", "d", "e", "night"].iter().map(|w| w.to_string()).collect(),
        })
    }

    fn cycling_session(oracle: &Arc<Oracle>, poem: &Poem, tag: &str) -> MorphSession<Oracle> {
        let mut session = MorphSession::new(oracle.clone(), RankParams::default());
        apply(&mut session, poem, Command::Tag(tag.to_owned()));
        apply(&mut session, poem, Command::Vibe { toward: "light".to_owned(), away_from: None });
        apply(&mut session, poem, Command::Start);
        session
    }

    #[tokio::test]
    async fn test_run_applies_every_tick() {
        let dir = std::env::temp_dir().join(format!("ghostwriter-live-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let poem_path = dir.join("poem.txt");
        let output_path = dir.join("out.txt");
        fs::write(&poem_path, "night").unwrap();

        let poem_arg = poem_path.to_string_lossy().into_owned();
        let output_arg = output_path.to_string_lossy().into_owned();
        let opts = Opts::try_parse_from([
            "live", &poem_arg,
            "--vibe", "light",
            "--tag", "night",
            "--ticks", "3",
            "--tick-millis", "1",
            "--no-input",
            "--output", &output_arg,
        ]).unwrap();

        run(oracle(), RankParams::default(), Duration::from_secs(60), opts).await.unwrap();

        // e, then three ticks.
        let out = fs::read_to_string(&output_path).unwrap();
        fs::remove_dir_all(&dir).ok();
        assert_eq!(out, "b\n");
    }

    #[test]
    fn test_tag_joins_running_cycle() {
        let oracle = oracle();
        let poem = Poem::parse("night and night", &*oracle);
        let mut session = cycling_session(&oracle, &poem, "#0");
        assert_eq!(session.state(WordId(0)), Some(WordState::Cycling));

        apply(&mut session, &poem, Command::Tag("#2".to_owned()));
        assert_eq!(session.state(WordId(2)), Some(WordState::Cycling));
        assert_eq!(session.current_surface_form(&poem.words()[2].token), "e");
    }

    #[test]
    fn test_tag_before_start_waits() {
        let oracle = oracle();
        let poem = Poem::parse("night and night", &*oracle);
        let mut session = MorphSession::new(oracle.clone(), RankParams::default());
        apply(&mut session, &poem, Command::Tag("#0".to_owned()));
        assert_eq!(session.state(WordId(0)), Some(WordState::Tagged));
    }

    #[test]
    fn test_lock_skips_untagged_occurrences() {
        let oracle = oracle();
        let poem = Poem::parse("night and night", &*oracle);
        let mut session = cycling_session(&oracle, &poem, "#2");

        apply(&mut session, &poem, Command::Lock("night".to_owned()));
        assert_eq!(session.state(WordId(0)), None);
        assert_eq!(session.state(WordId(2)), Some(WordState::Locked));

        apply(&mut session, &poem, Command::Lock("and".to_owned()));
        assert_eq!(session.state(WordId(1)), None);
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("tag storm".parse::<Command>().unwrap(), Command::Tag("storm".to_owned()));
        assert_eq!("  lock #3 ".parse::<Command>().unwrap(), Command::Lock("#3".to_owned()));
        assert_eq!("stop".parse::<Command>().unwrap(), Command::Freeze);
        assert_eq!("vibe dread".parse::<Command>().unwrap(), Command::Vibe {
            toward: "dread".to_owned(),
            away_from: None,
        });
        assert_eq!("vibe warmth away cold".parse::<Command>().unwrap(), Command::Vibe {
            toward: "warmth".to_owned(),
            away_from: Some("cold".to_owned()),
        });
        assert_eq!("hl".parse::<Command>().unwrap(), Command::Highlight);
        assert!("tag".parse::<Command>().is_err());
        assert!("dance".parse::<Command>().is_err());
        assert!("".parse::<Command>().is_err());
    }
}
