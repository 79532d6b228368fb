use clap::{CommandFactory, Parser};
use cropper::config::{self, Strategy};
use cropper::{output, process};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cropper")]
#[command(version)]
#[command(about = "Crop images to their most salient region and resize to an exact size")]
#[command(long_about = "\
Crop images to their most salient region and resize to an exact size

Every .jpg and .png among PATHS is cropped to the region that best keeps
its subject at the target aspect ratio, resized to exactly <width>x<height>
with Lanczos3, and written next to the source:

  photos/beach.jpg  →  photos/beach_580x434.jpg

Directories are expanded one level deep; other files are skipped. The
first error stops the batch.

Run 'cropper --print-config' for a documented config file, or
'cropper --completions <SHELL>' for a shell completion script.")]
struct Cli {
    /// Target size as <width>x<height> [default: 580x434]
    #[arg(long, value_name = "WxH")]
    wh: Option<String>,

    /// TOML config file; command-line flags override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum number of files processed at once
    #[arg(short, long, value_name = "N")]
    jobs: Option<usize>,

    /// Crop analyzer
    #[arg(long, value_enum)]
    strategy: Option<Strategy>,

    /// Accept sources smaller than the target (they are upscaled)
    #[arg(long)]
    allow_upscale: bool,

    /// Print a line for every written and skipped file
    #[arg(short, long)]
    verbose: bool,

    /// Print a stock config file with all options documented, then exit
    #[arg(long)]
    print_config: bool,

    /// Print a shell completion script, then exit
    #[arg(long, value_enum, value_name = "SHELL")]
    completions: Option<clap_complete::Shell>,

    /// Image files or directories
    paths: Vec<PathBuf>,
}

impl Cli {
    /// Layer the command-line flags over the file/default config.
    fn apply_overrides(&self, config: &mut config::CropperConfig) {
        if let Some(wh) = &self.wh {
            config.size = wh.clone();
        }
        if let Some(jobs) = self.jobs {
            config.processing.max_processes = Some(jobs);
        }
        if let Some(strategy) = self.strategy {
            config.analysis.strategy = strategy;
        }
        if self.allow_upscale {
            config.analysis.allow_upscale = true;
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.print_config {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }
    if let Some(shell) = cli.completions {
        let mut command = Cli::command();
        clap_complete::generate(shell, &mut command, "cropper", &mut std::io::stdout());
        return Ok(());
    }
    if cli.paths.is_empty() {
        Cli::command().print_help()?;
        return Ok(());
    }

    let mut config = config::load_config(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);

    if !cli.verbose {
        process::run(&cli.paths, &config, None)?;
        return Ok(());
    }

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_process_event(&event) {
                println!("{}", line);
            }
        }
    });
    let result = process::run(&cli.paths, &config, Some(tx));
    printer
        .join()
        .map_err(|_| "progress printer thread panicked")?;
    let summary = result?;
    println!();
    println!("{}", output::format_summary(&summary));

    Ok(())
}
