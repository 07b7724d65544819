use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use excel_filter::config::Config;
use excel_filter::config::DEFAULT_INPUT_PATH;
use excel_filter::config::DEFAULT_OUTPUT_PATH;
use std::path::PathBuf;
use tracing_subscriber::fmt;
use tracing_subscriber::EnvFilter;

/// Reshape spreadsheet rows and write them with Code and Month_Year columns
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Spreadsheet to read (.xlsx, .xlsm or .ods)
    #[arg(value_name = "INPUT", default_value = DEFAULT_INPUT_PATH)]
    input: PathBuf,

    /// Workbook to write
    #[arg(value_name = "OUTPUT", default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,
}

fn main() -> Result<()> {
    fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = Config::new(cli.input, cli.output);

    excel_filter::run(&config)
        .with_context(|| format!("failed to convert '{}'", config.input_path.display()))?;

    println!("Файл успешно сохранен как {}", config.output_path.display());
    Ok(())
}
