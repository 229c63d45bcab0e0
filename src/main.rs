mod error;
mod export;
mod lexicon;
mod live;
mod poem;
mod suggest;

use std::default::Default;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use morph_engine::RankParams;
use serde::Deserialize;
use tracing::Level;

use error::{InvalidVarError, MissingVarError};
use lexicon::Lexicon;

#[derive(Parser)]
#[clap(version, author, about)]
struct Opts {
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Log debugging information.
    #[clap(short = 'V', long)]
    verbose: bool,

    #[clap(subcommand)]
    command: MainCommand,
}

#[derive(Subcommand)]
enum MainCommand {
    /// Print ranked replacements for some words.
    Suggest(suggest::Opts),

    /// Cycle the tagged words of a poem, then write out the result.
    Live(live::Opts),
}

#[derive(Deserialize, Default)]
struct Config {
    lexicon: Option<LexiconConfig>,
    morph: Option<MorphConfig>,
    live: Option<LiveConfig>,
}

#[derive(Deserialize, Default)]
struct LexiconConfig {
    embeddings: Option<PathBuf>,
    forms: Option<PathBuf>,
    limit: Option<usize>,
}

#[derive(Deserialize, Default)]
struct MorphConfig {
    shift_scale: Option<f32>,
    top_n: Option<usize>,
    normalize: Option<bool>,
}

#[derive(Deserialize, Default)]
struct LiveConfig {
    tick_millis: Option<u64>,
}

const DEFAULT_CONFIG_PATH: &str = "ghostwriter.yaml";

const DEFAULT_TICK_MILLIS: u64 = 2500;

const VAR_CONFIG_PATH: &str = "GW_CONFIG";

const VAR_EMBEDDINGS: &str = "GW_EMBEDDINGS";
const VAR_FORMS: &str = "GW_FORMS";
const VAR_EMBEDDINGS_LIMIT: &str = "GW_EMBEDDINGS_LIMIT";

const VAR_SHIFT_SCALE: &str = "GW_SHIFT_SCALE";
const VAR_TOP_N: &str = "GW_TOP_N";
const VAR_NORMALIZE: &str = "GW_NORMALIZE";

const VAR_TICK_MILLIS: &str = "GW_TICK_MILLIS";

fn main() -> anyhow::Result<()> {
    #[cfg(feature = "dotenv")] {
        dotenv::dotenv().ok();
    }

    let opts = Opts::parse();

    tracing_subscriber::fmt()
        .with_max_level(if opts.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(io::stderr)
        .init();

    let config = match opts.config.as_deref() {
        Some(config_path) => load_config(config_path)
            .with_context(|| format!("failed to read config file {}", config_path.to_string_lossy()))?
            .with_context(|| format!("failed to parse config file {}", config_path.to_string_lossy()))?,

        None => match env::var_os(VAR_CONFIG_PATH) {
            Some(config_path) => load_config(config_path.as_ref())
                .with_context(|| format!("failed to read config file {}", config_path.to_string_lossy()))?
                .with_context(|| format!("failed to parse config file {}", config_path.to_string_lossy()))?,

            None => if cfg!(feature = "default-config-file") {
                load_config(DEFAULT_CONFIG_PATH.as_ref())
                    .ok()
                    .map(|res| res
                        .with_context(|| format!("failed to parse config file {}", DEFAULT_CONFIG_PATH)))
                    .transpose()?
                    .unwrap_or_default()
            } else {
                Config::default()
            },
        },
    };

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?
        .block_on(run(opts, config))
}

async fn run(opts: Opts, config: Config) -> anyhow::Result<()> {
    let params = rank_params(config.morph.unwrap_or_default())?;
    let lexicon = load_lexicon(config.lexicon.unwrap_or_default()).await?;

    match opts.command {
        MainCommand::Suggest(opts) => suggest::run(&*lexicon, params, opts),

        MainCommand::Live(opts) => {
            let tick = tick_interval(config.live.unwrap_or_default())?;
            live::run(lexicon, params, tick, opts).await
        },
    }
}

fn load_config(path: &Path) -> io::Result<serde_yaml::Result<Config>> {
    fs::read_to_string(path)
        .map(|contents| serde_yaml::from_str(&contents))
}

async fn load_lexicon(config: LexiconConfig) -> anyhow::Result<Arc<Lexicon>> {
    let embeddings = env_var(VAR_EMBEDDINGS)
        .context("failed to read embeddings path")?
        .map(PathBuf::from)
        .or(config.embeddings)
        .ok_or(MissingVarError("embeddings path"))?;

    let forms = env_var(VAR_FORMS)
        .context("failed to read forms path")?
        .map(PathBuf::from)
        .or(config.forms)
        .ok_or(MissingVarError("forms path"))?;

    let limit = env_var_parse::<usize>(VAR_EMBEDDINGS_LIMIT)
        .context("failed to read embeddings limit")?
        .or(config.limit);

    tokio::task::spawn_blocking(move || Lexicon::load(&embeddings, &forms, limit))
        .await
        .context("lexicon loading task failed")?
        .map(Arc::new)
}

fn rank_params(config: MorphConfig) -> anyhow::Result<RankParams> {
    let mut params = RankParams::default();

    if let Some(shift_scale) = env_var_parse::<f32>(VAR_SHIFT_SCALE)
        .context("failed to read shift scale")?
        .or(config.shift_scale)
    {
        params.shift_scale = shift_scale;
    }

    if let Some(top_n) = env_var_parse::<usize>(VAR_TOP_N)
        .context("failed to read candidate limit")?
        .or(config.top_n)
    {
        params.top_n = top_n;
    }

    if let Some(normalize) = env_var_parse::<bool>(VAR_NORMALIZE)
        .context("failed to read normalize flag")?
        .or(config.normalize)
    {
        params.normalize = normalize;
    }

    Ok(params)
}

fn tick_interval(config: LiveConfig) -> anyhow::Result<Duration> {
    let millis = env_var_parse::<u64>(VAR_TICK_MILLIS)
        .context("failed to read tick interval")?
        .or(config.tick_millis)
        .unwrap_or(DEFAULT_TICK_MILLIS);

    Ok(Duration::from_millis(millis))
}

fn env_var(key: &str) -> Result<Option<String>, InvalidVarError> {
    match env::var(key) {
        Ok(val) => Ok(Some(val)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(bad_str)) => Err(InvalidVarError::invalid_utf8(bad_str)),
    }
}

fn env_var_parse<T>(key: &str) -> Result<Option<T>, InvalidVarError>
where
    T: FromStr,
{
    env_var(key)
        .and_then(|val| val
            .map(|val| val
                .parse::<T>()
                .map_err(|_| InvalidVarError::parse_error(val.into())))
            .transpose())
}
