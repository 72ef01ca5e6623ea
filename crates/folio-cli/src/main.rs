use folio_common::telemetry::{self, TelemetryConfig};
use folio_common::{Config, FileStore, FolioError, ParseError, SerDeError};
use folio_content::{
    ContentBlock, GalleryLayoutParams, ImageDimensions, NativeDocument, NativeOptions,
    blocks_to_markdown, compute_layout, from_native, html_to_blocks, markdown_to_blocks,
    parse_inline, plain_text, resolve_embed, sandbox_policy, to_native, validate_blocks_str,
};
use miette::{NamedSource, Result};
use serde::Serialize;
use std::borrow::Cow;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(version, about = "Folio - convert and inspect article content", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to a config file (.toml or .json)
    #[arg(long, global = true, env = "FOLIO_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a document between formats
    Convert {
        /// Format of the input
        #[arg(long, value_enum)]
        from: InputFormat,

        /// Format to write to stdout
        #[arg(long, value_enum)]
        to: OutputFormat,

        /// Input file, stdin when omitted
        input: Option<PathBuf>,
    },
    /// Validate block JSON and print a summary of each block
    Validate {
        /// Input file, stdin when omitted
        input: Option<PathBuf>,
    },
    /// Resolve a URL to an embed descriptor and its iframe sandbox policy
    Embed {
        url: String,
    },
    /// Lay out one gallery row
    Gallery {
        /// Container width in pixels
        #[arg(long)]
        width: f64,

        /// Natural image sizes as WIDTHxHEIGHT
        #[arg(required = true, value_parser = parse_dimensions)]
        sizes: Vec<ImageDimensions>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum InputFormat {
    Blocks,
    Markdown,
    Html,
    Native,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Blocks,
    Markdown,
    Native,
}

fn main() -> Result<()> {
    init_miette();
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    telemetry::init(TelemetryConfig::from_env("folio").with_level_str(config.log_level.as_deref()));

    match cli.command {
        Commands::Convert { from, to, input } => convert(&config, from, to, input.as_deref()),
        Commands::Validate { input } => validate(input.as_deref()),
        Commands::Embed { url } => embed(&url),
        Commands::Gallery { width, sizes } => gallery(&config, width, &sizes),
    }
}

fn convert(
    config: &Config,
    from: InputFormat,
    to: OutputFormat,
    input: Option<&Path>,
) -> Result<()> {
    let source = read_input(input)?;
    let options = NativeOptions::from(config);

    let blocks = match from {
        InputFormat::Blocks => validate_blocks_str(&source)?,
        InputFormat::Markdown => markdown_to_blocks(&source),
        InputFormat::Html => html_to_blocks(&source),
        InputFormat::Native => {
            let doc: NativeDocument = serde_json::from_str(&source).map_err(|err| {
                let src = NamedSource::new(Cow::Borrowed("native.json"), Cow::Owned(source.clone()));
                FolioError::from(ParseError::from(err).with_source(src))
            })?;
            from_native(&doc, &options)
        }
    };
    tracing::info!(blocks = blocks.len(), "document loaded");

    let output = match to {
        OutputFormat::Blocks => to_json(&blocks)?,
        OutputFormat::Markdown => blocks_to_markdown(&blocks),
        OutputFormat::Native => to_json(&to_native(&blocks, &options))?,
    };
    println!("{}", output.trim_end());
    Ok(())
}

fn validate(input: Option<&Path>) -> Result<()> {
    let source = read_input(input)?;
    let blocks = validate_blocks_str(&source)?;
    for block in &blocks {
        println!("{}\t{}\t{}", block.id, block.kind(), summary(block));
    }
    println!("{} valid blocks", blocks.len());
    Ok(())
}

fn embed(url: &str) -> Result<()> {
    let descriptor =
        resolve_embed(url).ok_or_else(|| miette::miette!("{url} is not an embeddable URL"))?;
    let sandbox = sandbox_policy(descriptor.provider_type);

    let mut value = serde_json::to_value(&descriptor).map_err(SerDeError::from)?;
    if let Some(object) = value.as_object_mut() {
        object.insert("sandbox".into(), sandbox.to_string().into());
    }
    println!("{}", to_json(&value)?);
    Ok(())
}

fn gallery(config: &Config, width: f64, sizes: &[ImageDimensions]) -> Result<()> {
    let params = GalleryLayoutParams::from(config.gallery);
    let dims: Vec<Option<ImageDimensions>> = sizes.iter().copied().map(Some).collect();
    let layout = compute_layout(&dims, width, &params)
        .ok_or_else(|| {
        miette::miette!("every image needs a non-zero size and the row must fit in {width}px")
    })?;
    println!("{}", to_json(&layout)?);
    Ok(())
}

/// First line of a block's visible text, without inline markers.
fn summary(block: &ContentBlock) -> String {
    let Some(content) = block.content() else {
        return String::new();
    };
    let text = plain_text(&parse_inline(content));
    let first = text.lines().next().unwrap_or_default();
    if first.chars().count() > 60 {
        let cut: String = first.chars().take(59).collect();
        format!("{cut}…")
    } else {
        first.to_string()
    }
}

fn parse_dimensions(value: &str) -> std::result::Result<ImageDimensions, String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {value}"))?;
    let width = width.trim().parse::<u32>().map_err(|e| format!("bad width: {e}"))?;
    let height = height.trim().parse::<u32>().map_err(|e| format!("bad height: {e}"))?;
    Ok(ImageDimensions::new(width, height))
}

fn to_json(value: &impl Serialize) -> Result<String, FolioError> {
    Ok(serde_json::to_string_pretty(value).map_err(SerDeError::from)?)
}

fn read_input(path: Option<&Path>) -> Result<String, FolioError> {
    let source = match path {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut source = String::new();
            std::io::stdin().read_to_string(&mut source)?;
            source
        }
    };
    Ok(source)
}

/// Explicit `--config`, else the user config file when present, else defaults.
fn load_config(path: Option<&Path>) -> Result<Config, FolioError> {
    if let Some(path) = path {
        return Ok(Config::load(&FileStore::new(path))?);
    }
    match default_config_path() {
        Some(path) if path.exists() => Ok(Config::load(&FileStore::new(path))?),
        _ => {
            let mut config = Config::default();
            config.apply_env();
            Ok(config)
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("folio").join("config.toml"))
}

fn init_miette() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .with_cause_chain()
                .color(true)
                .context_lines(5)
                .tab_width(2)
                .break_words(true)
                .build(),
        )
    }))
    .expect("couldn't set the miette hook");
    miette::set_panic_hook();
}
