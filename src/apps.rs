use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, ValueEnum, error::ErrorKind};
use tracing::info;

use crate::config::PrepareConfig;
use crate::constants::sampling::{DEFAULT_SEED, DEFAULT_SHUFFLE_SEED, SAMPLE_SIZE};
use crate::dataset::{Dataset, DatasetBuilder};
use crate::metrics::class_balance;
use crate::transport::fs::{ingest_jsonl_file, read_jsonl_lines, write_csv, write_jsonl};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Csv,
    Jsonl,
}

#[derive(Debug, Parser)]
#[command(
    name = "prepare_dataset",
    version,
    disable_help_subcommand = true,
    about = "Flatten candidate profiles into a seniority-balanced table",
    long_about = "Read newline-delimited JSON candidate profiles, classify each by the seniority of its first job, flatten it into a fixed-width row, and write a per-class capped, deterministically shuffled dataset.",
    after_help = "Malformed lines, unclassifiable profiles and profiles missing a job title or summary are skipped and counted."
)]
struct PrepareDatasetCli {
    #[arg(value_name = "INPUT", help = "Newline-delimited JSON profiles")]
    input: PathBuf,
    #[arg(value_name = "OUTPUT", help = "Destination file for the sampled table")]
    output: PathBuf,
    #[arg(
        long = "sample-size",
        default_value_t = SAMPLE_SIZE,
        value_parser = parse_positive_usize,
        help = "Maximum rows kept per seniority class"
    )]
    sample_size: usize,
    #[arg(long, default_value_t = DEFAULT_SEED, help = "Seed for per-class sampling")]
    seed: u64,
    #[arg(
        long = "shuffle-seed",
        default_value_t = DEFAULT_SHUFFLE_SEED,
        help = "Seed for the final whole-dataset shuffle"
    )]
    shuffle_seed: u64,
    #[arg(long, value_enum, default_value = "csv", help = "Output format")]
    format: OutputFormat,
    #[arg(long, help = "Flatten profiles on the rayon thread pool")]
    parallel: bool,
}

/// Run the dataset preparation pipeline from command-line style arguments
/// (without the program name).
pub fn run_prepare_dataset<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();

    let Some(cli) = parse_cli::<PrepareDatasetCli, _>(
        std::iter::once("prepare_dataset".to_string()).chain(args_iter),
    )?
    else {
        return Ok(());
    };

    let config = PrepareConfig::default()
        .with_sample_size(cli.sample_size)
        .with_seed(cli.seed)
        .with_shuffle_seed(cli.shuffle_seed);

    info!(
        input = %cli.input.display(),
        output = %cli.output.display(),
        sample_size = config.sample_size,
        seed = config.seed,
        shuffle_seed = config.shuffle_seed,
        parallel = cli.parallel,
        "preparing dataset"
    );

    let mut builder = DatasetBuilder::new(config)?;
    if cli.parallel {
        let lines = read_jsonl_lines(&cli.input)?;
        builder.ingest_parallel(&lines);
    } else {
        ingest_jsonl_file(&mut builder, &cli.input)?;
    }
    let dataset = builder.build();
    report_dataset(&dataset);

    match cli.format {
        OutputFormat::Csv => write_csv(&cli.output, &dataset)?,
        OutputFormat::Jsonl => write_jsonl(&cli.output, &dataset)?,
    }
    Ok(())
}

fn report_dataset(dataset: &Dataset) {
    let stats = dataset.stats();
    println!(
        "Processed {} profiles ({} malformed lines, {} without a usable level, {} incomplete).",
        stats.processed, stats.malformed, stats.unclassified, stats.incomplete
    );
    let Some(balance) = class_balance(dataset.rows()) else {
        println!("No profiles survived filtering; writing header only.");
        return;
    };
    println!("Sampled {} rows:", balance.total);
    for entry in &balance.per_class {
        println!(
            "  {:<7} {:>6} ({:.1}%)",
            entry.seniority.as_str(),
            entry.count,
            entry.share * 100.0
        );
    }
    if balance.ratio.is_finite() {
        println!("  max/min class ratio: {:.2}", balance.ratio);
    } else {
        println!("  at least one class is empty");
    }
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}

fn parse_positive_usize(raw: &str) -> Result<usize, String> {
    let value = raw
        .parse::<usize>()
        .map_err(|_| format!("invalid value '{raw}': expected a positive integer"))?;
    if value == 0 {
        return Err("value must be greater than zero".to_string());
    }
    Ok(value)
}
