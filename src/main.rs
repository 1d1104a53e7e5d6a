//! teifix - repair structurally malformed TEI files.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{error, info};
use teifix::batch::{self, BatchOptions, Mode, Outcome};
use teifix::{Category, Config};

#[derive(Parser)]
#[command(
    name = "teifix",
    version,
    about = "Repair structurally malformed TEI files",
    long_about = "Walks TEI files and corrects misplaced headings and wrongly cased header elements. \
                  Files are rewritten in place unless --check or --output-dir is given."
)]
struct Cli {
    /// Files or directories to repair
    paths: Vec<PathBuf>,

    /// Transformations to apply (comma-separated, default: all)
    #[arg(short, long, value_delimiter = ',')]
    transform: Option<Vec<String>>,

    /// Configuration file path (default: .teifix.yaml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Don't write anything; exit with 1 if a file would change
    #[arg(long, conflicts_with = "output_dir")]
    check: bool,

    /// Write repaired files below this directory instead of in place
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Stop at the first file that fails
    #[arg(long)]
    fail_fast: bool,

    /// List available transformations and exit
    #[arg(long)]
    list: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("cannot load configuration {}", path.display()))?,
            None => Config::discover(Path::new("."))?,
        };
        if let Some(transforms) = &self.transform {
            config.transforms = transforms.clone();
        }
        if let Some(jobs) = self.jobs {
            config.jobs = jobs;
        }
        config.fail_fast |= self.fail_fast;
        Ok(config)
    }

    fn mode(&self) -> Mode {
        if self.check {
            Mode::Check
        } else if let Some(dir) = &self.output_dir {
            Mode::OutputDir(dir.clone())
        } else {
            Mode::InPlace
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn list_transforms() {
    for category in Category::ALL {
        let observers = category
            .observers()
            .iter()
            .map(|observer| observer.name())
            .collect::<Vec<_>>()
            .join(", ");
        println!("{:<12} {}", category, observers);
    }
}

/// Everything that can go wrong before any file is touched.
fn prepare(cli: &Cli) -> Result<(Config, teifix::Registry)> {
    let config = cli.load_config()?;
    let registry = config.registry()?;
    if cli.paths.is_empty() {
        bail!("no files or directories given");
    }
    Ok((config, registry))
}

fn run(cli: Cli) -> ExitCode {
    let (config, registry) = match prepare(&cli) {
        Ok(prepared) => prepared,
        Err(err) => {
            error!("{:#}", err);
            eprintln!("error: {:#}", err);
            return ExitCode::from(2);
        }
    };
    info!("enabled observers: {}", registry.names().join(", "));

    let sources = match batch::discover(&cli.paths, &config.extensions) {
        Ok(sources) => sources,
        Err(err) => {
            eprintln!("error: {}", err);
            return ExitCode::from(2);
        }
    };

    let options = BatchOptions {
        mode: cli.mode(),
        jobs: config.jobs,
        fail_fast: config.fail_fast,
    };
    let summary = match batch::run_batch(sources, &registry, &options) {
        Ok(summary) => summary,
        Err(err) => {
            eprintln!("error: {}", err);
            return ExitCode::from(2);
        }
    };

    for file in &summary.files {
        match &file.outcome {
            Outcome::Failed(_) => eprintln!("{}", file),
            Outcome::Repaired(report) if options.mode == Mode::Check => {
                println!("would repair {}", file.source.path.display());
                for fix in &report.fixes {
                    println!("  {}", fix);
                }
            }
            Outcome::Repaired(_) => println!("{}", file),
            Outcome::Unchanged | Outcome::Skipped => {}
        }
    }
    println!("{}", summary);

    ExitCode::from(summary.exit_code(&options.mode) as u8)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.list {
        list_transforms();
        return ExitCode::SUCCESS;
    }
    run(cli)
}
