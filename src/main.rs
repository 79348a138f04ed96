use clap::Parser;
use tracing_subscriber::EnvFilter;

use proof_cli::cli::Cli;
use proof_cli::commands::{self, Context};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = Context::new(cli.config.clone())?;
    tracing::debug!(store = ctx.store().name(), "Configuration store selected");

    let output = commands::run(cli.command, &ctx).await?;
    let rendered = output.render(cli.raw);
    if !rendered.is_empty() {
        println!("{rendered}");
    }
    Ok(())
}

fn init_tracing(cli: &Cli) {
    // RUST_LOG wins over --verbose
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("proof=debug,proof_cli=debug,proof_client=debug,warn")
        } else {
            EnvFilter::new("warn")
        }
    });

    // Logs go to stderr so stdout stays pipeable.
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false);

    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
