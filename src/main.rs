use clap::Parser;
use csv_path_rewriter::cli::Cli;
use csv_path_rewriter::config::Config;
use csv_path_rewriter::rewrite;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("csv_path_rewriter=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    if cli.print_config {
        print!("{}", Config::generate_default_commented());
        return Ok(());
    }

    let config = Config::load(cli.config.as_deref())?;
    let options = cli.rewrite_options(&config)?;
    let summary = rewrite::run(&options)?;

    if summary.fallbacks > 0 {
        tracing::warn!(
            "{} of {} rows use a best-effort relative_path",
            summary.fallbacks,
            summary.rows
        );
    }
    tracing::info!(
        "Wrote {} rows to {} (base directory {})",
        summary.rows,
        options.output.display(),
        summary.base_dir
    );
    Ok(())
}
