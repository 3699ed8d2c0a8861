use clap::Parser;
use feed_config::FeedConfig;
use feed_generate::{CompletionProvider, OpenAiClient};
use feed_lookup::{CrossrefClient, LinkEnricher, NoLookup, WorkLookup};

mod bootstrap;
mod cli;
mod pipeline;
mod progress;
mod ui;

use pipeline::{Pipeline, RunSummary};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("studyfeed error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;
    ui::init(cli.quiet);

    let config = bootstrap::load_config(&cli)?;

    if cli.print_prompt {
        println!("{}", feed_generate::build_prompt(&config.plan()?));
        return Ok(());
    }

    let api_key = config.generation.require_api_key()?;
    let provider = OpenAiClient::new(&config.generation, api_key)?;
    tracing::debug!(model = provider.model(), "generation client ready");

    let summary = if config.lookup.enabled {
        let crossref = CrossrefClient::new(&config.lookup)?;
        execute(provider, crossref, &config).await?
    } else {
        execute(provider, NoLookup, &config).await?
    };

    println!("{summary}");
    Ok(())
}

async fn execute<P, L>(provider: P, lookup: L, config: &FeedConfig) -> anyhow::Result<RunSummary>
where
    P: CompletionProvider,
    L: WorkLookup,
{
    let enricher = LinkEnricher::from_config(lookup, &config.lookup);
    let pipeline = Pipeline::new(provider, enricher, config)?;
    Ok(pipeline.run().await?)
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("STUDYFEED_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
