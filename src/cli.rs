use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;
use crate::rewrite::RewriteOptions;

#[derive(Parser, Debug)]
#[command(
    name = "csv-path-rewriter",
    version,
    about = "Rewrite CSV paths: basename file_name + relative_path column"
)]
pub struct Cli {
    /// Path to input CSV (columns: file_name, transcription)
    #[arg(required_unless_present = "print_config")]
    pub input_csv: Option<PathBuf>,

    /// Path to output CSV
    #[arg(required_unless_present = "print_config")]
    pub output_csv: Option<PathBuf>,

    /// Base directory for computing relative_path. If omitted, the longest
    /// common directory prefix of all file paths is used.
    #[arg(long)]
    pub base_dir: Option<PathBuf>,

    /// Fail instead of writing a best-effort path when a file cannot be
    /// expressed relative to the base directory
    #[arg(long)]
    pub strict: bool,

    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print a documented default config file and exit
    #[arg(long)]
    pub print_config: bool,
}

impl Cli {
    /// Merge flags over `config`. Flags win.
    pub fn rewrite_options(&self, config: &Config) -> anyhow::Result<RewriteOptions> {
        let input = self
            .input_csv
            .clone()
            .ok_or_else(|| anyhow::anyhow!("Missing input CSV path"))?;
        let output = self
            .output_csv
            .clone()
            .ok_or_else(|| anyhow::anyhow!("Missing output CSV path"))?;

        Ok(RewriteOptions {
            input,
            output,
            base_dir: self.base_dir.clone().or_else(|| config.paths.base_dir.clone()),
            strict: self.strict || config.paths.strict,
            create_parent_dirs: config.output.create_parent_dirs,
        })
    }
}
