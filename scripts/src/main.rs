use clap::Parser;
use eyre::Result;
use sarayu::{cli::Cli, commands::Context, constants::LOG_ENV_VAR, starknet_cli::SystemRunner};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().without_time().with_target(false))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var(LOG_ENV_VAR)
                .from_env_lossy(),
        )
        .init();

    let ctx = Context::new(SystemRunner, ".");
    Cli::parse().command.run(&ctx)?;

    Ok(())
}
