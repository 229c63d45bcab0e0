use std::io;
use std::error;
use std::fmt;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use tokio::io::AsyncWriteExt;

/// The finished poem, plus the replacements that were locked in.
#[derive(Serialize, Debug)]
pub(crate) struct Export<'a> {
    pub(crate) text: String,
    pub(crate) morphed: Vec<Morphed<'a>>,
}

#[derive(Serialize, Debug, PartialEq)]
pub(crate) struct Morphed<'a> {
    pub(crate) original: &'a str,
    pub(crate) replacement: &'a str,
}

impl<'a> Export<'a> {
    pub(crate) fn new(text: String, morphed: Vec<(&'a str, &'a str)>) -> Self {
        Self {
            text,
            morphed: morphed
                .into_iter()
                .map(|(original, replacement)| Morphed { original, replacement })
                .collect(),
        }
    }
}

/// Writes the export to `output`, or to stdout if there is no output path.
pub(crate) async fn run(output: Option<&Path>, export: &Export<'_>, json: bool) -> anyhow::Result<()> {
    match output {
        Some(output_path) => {
            let file = tokio::fs::File::create(output_path)
                .await
                .with_context(|| format!("failed to open output file {}", output_path.to_string_lossy()))?;

            let mut buf_writer = tokio::io::BufWriter::new(file);

            write_export(&mut buf_writer, export, json)
                .await
                .with_context(|| format!("failed to write to output file {}", output_path.to_string_lossy()))
        },

        None => {
            let mut stdout = tokio::io::stdout();

            write_export(&mut stdout, export, json)
                .await
                .context("failed to write to stdout")
        },
    }
}

async fn write_export<W>(writer: &mut W, export: &Export<'_>, json: bool) -> Result<(), WriteError>
where
    W: AsyncWriteExt + Unpin,
{
    let mut buf = if json {
        serde_json::to_string_pretty(export)?
    } else {
        export.text.clone()
    };
    buf.push('\n');

    writer.write_all(buf.as_bytes()).await?;
    writer.flush().await?;

    Ok(())
}

#[derive(Debug)]
enum WriteError {
    JsonError(Box<serde_json::Error>),
    IoError(Box<io::Error>),
}

impl fmt::Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::JsonError(err) => err.fmt(f),
            Self::IoError(err) => err.fmt(f),
        }
    }
}

impl error::Error for WriteError {}

impl From<serde_json::Error> for WriteError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(Box::new(err))
    }
}

impl From<io::Error> for WriteError {
    fn from(err: io::Error) -> Self {
        Self::IoError(Box::new(err))
    }
}
