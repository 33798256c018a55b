//! Command-line interface for inspecting and normalizing documents.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::document::SyndicationResource;
use crate::error::Result;
use crate::http::{fetch, FetchRequest};
use crate::opml::OpmlOutline;
use crate::options::{LoadOptions, SaveOptions};

/// syndication-xml - inspect, normalize and fetch OPML, RSD and BlogML documents.
#[derive(Parser)]
#[command(name = "syndication-xml")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load a file or URL and print a summary.
    Inspect {
        /// File path or http(s) URL
        source: String,
    },

    /// Load a file and save it again in canonical form.
    Normalize {
        /// Input file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write without indentation
        #[arg(long)]
        compact: bool,

        /// Omit the XML declaration
        #[arg(long)]
        no_declaration: bool,

        /// Keep content of unknown extension namespaces
        #[arg(long)]
        preserve_unknown: bool,
    },

    /// Download a document, parse it and save it in canonical form.
    Fetch {
        /// Document URL
        url: String,

        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect { source } => inspect_command(&source),
        Commands::Normalize {
            input,
            output,
            compact,
            no_declaration,
            preserve_unknown,
        } => {
            let load = LoadOptions::from_env().with_preserve_unknown_extensions(preserve_unknown);
            let save = SaveOptions::new()
                .with_minimize(compact)
                .with_declaration(!no_declaration);
            normalize_command(&input, output.as_deref(), &load, &save)
        }
        Commands::Fetch {
            url,
            timeout,
            output,
        } => fetch_command(&url, timeout, output.as_deref()),
    }
}

/// Summary of a loaded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub format: &'static str,
    pub version: &'static str,
    pub title: Option<String>,
    pub counts: Vec<(&'static str, usize)>,
}

impl Summary {
    /// Summarize a loaded resource.
    #[must_use]
    pub fn of(resource: &SyndicationResource) -> Self {
        let format = resource.format();
        let (title, counts) = match resource {
            SyndicationResource::Opml(document) => (
                document.head().title().map(str::to_string),
                vec![("outlines", count_outlines(document.outlines()))],
            ),
            SyndicationResource::Rsd(document) => (
                document.engine_name().map(str::to_string),
                vec![("apis", document.interfaces().len())],
            ),
            SyndicationResource::BlogMl(document) => (
                document.title().map(|t| t.content().to_string()),
                vec![
                    ("authors", document.authors().len()),
                    ("categories", document.categories().len()),
                    ("posts", document.posts().len()),
                ],
            ),
        };
        Self {
            format: format.as_str(),
            version: format.version(),
            title,
            counts,
        }
    }
}

fn count_outlines(outlines: &[OpmlOutline]) -> usize {
    outlines
        .iter()
        .map(|outline| 1 + count_outlines(outline.outlines()))
        .sum()
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Execute the inspect command.
fn inspect_command(source: &str) -> Result<()> {
    let options = LoadOptions::from_env();
    let resource = if is_url(source) {
        let request = FetchRequest::from_options(source, &options)?;
        let bytes = fetch_with_spinner(&request)?;
        SyndicationResource::from_bytes(&bytes, &options)?
    } else {
        SyndicationResource::open(source, &options)?
    };

    let summary = Summary::of(&resource);
    println!(
        "{} {} {}",
        style("Format:").bold(),
        style(summary.format).cyan(),
        summary.version
    );
    if let Some(title) = &summary.title {
        println!("  Title: {}", style(title).green());
    }
    for (label, count) in &summary.counts {
        println!("  {}: {}", label, count);
    }
    Ok(())
}

/// Execute the normalize command.
fn normalize_command(input: &Path, output: Option<&Path>, load: &LoadOptions, save: &SaveOptions) -> Result<()> {
    let resource = SyndicationResource::open(input, load)?;
    tracing::debug!(format = %resource.format(), input = %input.display(), "Normalizing document");
    write_resource(&resource, output, save)
}

/// Execute the fetch command.
fn fetch_command(url: &str, timeout: Option<u64>, output: Option<&Path>) -> Result<()> {
    let options = LoadOptions::from_env();
    let mut request = FetchRequest::from_options(url, &options)?;
    if let Some(secs) = timeout {
        request = request.with_timeout(Duration::from_secs(secs));
    }

    let bytes = fetch_with_spinner(&request)?;
    let resource = SyndicationResource::from_bytes(&bytes, &options)?;
    write_resource(&resource, output, &SaveOptions::new())
}

fn fetch_with_spinner(request: &FetchRequest) -> Result<Vec<u8>> {
    // Create progress spinner
    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message(format!("Fetching {}...", request.url()));
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = fetch(request);
    pb.finish_and_clear();
    result
}

fn write_resource(resource: &SyndicationResource, output: Option<&Path>, options: &SaveOptions) -> Result<()> {
    match output {
        Some(path) => {
            resource.save_file(path, options)?;
            eprintln!("{} {}", style("Saved to:").green().bold(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            resource.save(&mut stdout, options)?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}
