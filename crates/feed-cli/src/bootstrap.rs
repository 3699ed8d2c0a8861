use anyhow::Context;
use feed_config::FeedConfig;

use crate::cli::Cli;

/// Load layered configuration (with `.env`) and apply command-line overrides.
pub fn load_config(cli: &Cli) -> anyhow::Result<FeedConfig> {
    let mut config = FeedConfig::load_with_dotenv(cli.config.as_deref())
        .context("failed to load configuration")?;
    apply_overrides(&mut config, cli);
    config
        .validate()
        .context("invalid configuration after command-line overrides")?;
    Ok(config)
}

fn apply_overrides(config: &mut FeedConfig, cli: &Cli) {
    if let Some(preset) = cli.plan {
        config.feed.plan = preset.as_str().to_string();
        config.feed.tracks.clear();
    }
    if let Some(path) = &cli.output {
        config.output.path.clone_from(path);
    }
    if cli.no_lookup {
        config.lookup.enabled = false;
    }
    if cli.no_store {
        config.store.url.clear();
    }
}
