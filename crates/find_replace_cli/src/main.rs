//! find-replace - run the find/replace engine over a plain-text file
//!
//! Each non-empty line of the input becomes one paragraph.
//!
//! ```text
//! find-replace <file> <query> [replacement] [--settings <file.json>]
//! ```
//!
//! Without a replacement the matches are listed; with one, every match is
//! replaced and the new text is printed. A settings file that cannot be
//! read is an error; one that does not parse is logged and the defaults are
//! used. Set `RUST_LOG=debug` to see the engine's logging.

use anyhow::{bail, Context};
use doc_model::DocumentTree;
use edit_engine::{EditingEngine, FindReplaceSession, FindReplaceSettings, FlatText};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage: find-replace <file> <query> [replacement] [--settings <file.json>]";

#[derive(Debug, PartialEq, Eq)]
struct Args {
    file: String,
    query: String,
    replacement: Option<String>,
    settings: Option<String>,
}

impl Args {
    fn parse(args: impl IntoIterator<Item = String>) -> anyhow::Result<Self> {
        let mut positional = Vec::new();
        let mut settings = None;
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            if arg == "--settings" {
                settings = Some(args.next().context("--settings needs a file")?);
            } else {
                positional.push(arg);
            }
        }

        let mut positional = positional.into_iter();
        let (Some(file), Some(query)) = (positional.next(), positional.next()) else {
            bail!(USAGE);
        };
        let replacement = positional.next();
        if positional.next().is_some() {
            bail!(USAGE);
        }

        Ok(Self {
            file,
            query,
            replacement,
            settings,
        })
    }
}

fn load_document(text: &str) -> DocumentTree {
    let paragraphs: Vec<&str> = text.lines().filter(|line| !line.trim().is_empty()).collect();
    DocumentTree::from_paragraphs(&paragraphs)
}

/// Paragraph texts joined by newlines
fn render(tree: &DocumentTree) -> String {
    tree.get(tree.root_id())
        .map(|root| {
            root.children()
                .iter()
                .map(|&id| tree.block_text(id))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default()
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse(std::env::args().skip(1))?;

    let settings_json = args
        .settings
        .as_deref()
        .map(|path| {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read settings from {}", path))
        })
        .transpose()?;
    let settings = FindReplaceSettings::load_or_default(settings_json.as_deref());

    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file))?;
    let mut engine = EditingEngine::with_tree(load_document(&text));
    let mut session = FindReplaceSession::new(settings);

    let count = session.set_query(&mut engine, args.query.as_str());
    tracing::info!("{} match(es) for {:?} in {}", count.total, args.query, args.file);

    match args.replacement {
        Some(replacement) => {
            session.set_replacement(replacement);
            let outcome = session.replace_all(&mut engine)?;
            eprintln!("replaced {} match(es)", outcome.count);
            println!("{}", render(engine.tree()));
        }
        None => {
            let flat = FlatText::from_tree(engine.tree());
            for span in session.matches().iter() {
                println!("{}..{}\t{}", span.from, span.to, flat.slice(*span));
            }
            eprintln!("{}", count);
        }
    }

    Ok(())
}
