mod args;

use anyhow::Context;
use clap::Parser;
use common::utils::config::get_config;
use rand::{rngs::StdRng, SeedableRng};
use tokio::runtime::Builder;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use xref_pipeline::XrefPipeline;

use crate::args::Args;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout carries only the report
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .try_init()
        .ok();

    // One query is one sequential pipeline
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    runtime.block_on(run(args))
}

async fn run(args: Args) -> anyhow::Result<()> {
    let mut config = get_config().context("loading configuration")?;
    args.apply_overrides(&mut config);
    debug!(?config, "configuration loaded");

    let pipeline = XrefPipeline::new(&config).context("setting up example lookup")?;
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let request = args.request();
    let outcome = pipeline.run(&request, &mut rng).await.with_context(|| {
        format!(
            "looking up examples for {} in {} (cache {})",
            request.class_name,
            request.language,
            pipeline.cache_store().path().display()
        )
    })?;

    println!("{outcome}");
    Ok(())
}
