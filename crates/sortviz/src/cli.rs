use std::io;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use sortviz_core::{Algorithm, ParseAlgorithmError};
use sortviz_runtime::VizConfig;
use web_time::Duration;

use crate::app::{AnimateOptions, animate};
use crate::error::Result;
use crate::logging::init_logging;

#[derive(Debug, Parser)]
#[command(
    name = "sortviz",
    about = "Animate comparison sorts as terminal bar charts",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Shuffle a sequence and animate one sort over it.
    Run(RunArgs),

    /// Print the available algorithm names.
    Algorithms,
}

#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    /// TOML or JSON configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Algorithm name, e.g. "Quick Sort", "quick" or "merge-sort".
    #[arg(long, short, value_parser = parse_algorithm_flag)]
    pub algorithm: Option<Algorithm>,

    #[arg(long = "delay-ms")]
    pub delay_ms: Option<u64>,

    /// Number of bars.
    #[arg(long)]
    pub len: Option<usize>,

    /// Shuffle seed for a reproducible run.
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long = "frame-interval-ms")]
    pub frame_interval_ms: Option<u64>,

    /// Request a stop this many milliseconds after the sort starts.
    #[arg(long = "cancel-after-ms")]
    pub cancel_after_ms: Option<u64>,

    /// Append frames instead of redrawing in place.
    #[arg(long = "no-clear")]
    pub no_clear: bool,
}

impl RunArgs {
    /// Load the config file (or defaults), apply flag overrides, validate.
    pub fn resolve_config(&self) -> Result<VizConfig> {
        let mut config = match &self.config {
            Some(path) => VizConfig::from_file(path)?,
            None => VizConfig::default(),
        };
        if let Some(algorithm) = self.algorithm {
            config.run.algorithm = algorithm.name().to_string();
        }
        if let Some(delay_ms) = self.delay_ms {
            config.run.delay_ms = delay_ms;
        }
        if let Some(len) = self.len {
            config.sequence.len = len;
        }
        if self.seed.is_some() {
            config.sequence.seed = self.seed;
        }
        if let Some(interval) = self.frame_interval_ms {
            config.render.frame_interval_ms = interval;
        }
        if self.no_clear {
            config.render.clear_screen = false;
        }
        Ok(config.validated()?)
    }

    #[must_use]
    pub fn animate_options(&self) -> AnimateOptions {
        AnimateOptions {
            cancel_after: self.cancel_after_ms.map(Duration::from_millis),
            rows: None,
        }
    }
}

/// Accepts a display name or its short form: case-insensitive, `-`/`_` for
/// spaces, optional trailing "sort".
pub fn parse_algorithm_flag(value: &str) -> std::result::Result<Algorithm, ParseAlgorithmError> {
    let trimmed = value.trim();
    if let Some(algorithm) = Algorithm::from_name(trimmed) {
        return Ok(algorithm);
    }
    let short = trimmed.to_ascii_lowercase().replace(['-', '_'], " ");
    let short = short.strip_suffix(" sort").unwrap_or(&short);
    Algorithm::ALL
        .into_iter()
        .find(|algorithm| {
            algorithm
                .name()
                .strip_suffix(" Sort")
                .is_some_and(|stem| stem.eq_ignore_ascii_case(short))
        })
        .ok_or_else(|| ParseAlgorithmError {
            name: value.to_string(),
        })
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run(args) => run_animation(&args),
        Commands::Algorithms => {
            print_algorithms();
            Ok(())
        }
    }
}

fn run_animation(args: &RunArgs) -> Result<()> {
    init_logging()?;
    let config = args.resolve_config()?;
    tracing::debug!(?config, "resolved configuration");
    let summary = animate(&config, args.animate_options(), io::stdout().lock())?;
    println!("{summary}");
    Ok(())
}

fn print_algorithms() {
    for algorithm in Algorithm::ALL {
        println!("{algorithm}");
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use sortviz_runtime::SortvizError;

    use crate::error::CliError;

    use super::*;

    #[test]
    fn algorithms_command_dispatches_successfully() {
        let result = run(Cli {
            command: Commands::Algorithms,
        });
        assert!(result.is_ok());
    }

    #[test]
    fn run_flags_parse() {
        let cli = Cli::try_parse_from([
            "sortviz",
            "run",
            "--algorithm",
            "Merge Sort",
            "--delay-ms",
            "0",
            "--len",
            "12",
            "--seed",
            "5",
            "--cancel-after-ms",
            "250",
            "--no-clear",
        ])
        .unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.algorithm, Some(Algorithm::Merge));
        assert_eq!(args.len, Some(12));
        assert!(args.no_clear);
        assert_eq!(
            args.animate_options().cancel_after,
            Some(Duration::from_millis(250))
        );
    }

    #[test]
    fn flags_override_config_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[run]\nalgorithm = \"Selection Sort\"\ndelay_ms = 40\n\n[sequence]\nlen = 9"
        )
        .unwrap();

        let args = RunArgs {
            config: Some(file.path().to_path_buf()),
            delay_ms: Some(1),
            no_clear: true,
            ..RunArgs::default()
        };
        let config = args.resolve_config().unwrap();
        assert_eq!(config.algorithm(), Some(Algorithm::Selection));
        assert_eq!(config.run.delay_ms, 1);
        assert_eq!(config.sequence.len, 9);
        assert!(!config.render.clear_screen);
    }

    #[test]
    fn algorithm_flag_accepts_short_forms() {
        assert_eq!(parse_algorithm_flag("Quick Sort"), Ok(Algorithm::Quick));
        assert_eq!(parse_algorithm_flag("merge"), Ok(Algorithm::Merge));
        assert_eq!(parse_algorithm_flag("Quick-Sort"), Ok(Algorithm::Quick));
        assert_eq!(parse_algorithm_flag(" insertion_sort "), Ok(Algorithm::Insertion));
        assert_eq!(parse_algorithm_flag("bubble sort"), Ok(Algorithm::Bubble));
    }

    #[test]
    fn unknown_algorithm_flag_is_rejected_by_parser() {
        assert_eq!(
            parse_algorithm_flag("Bogo Sort").unwrap_err().name,
            "Bogo Sort"
        );
        let parsed = Cli::try_parse_from(["sortviz", "run", "--algorithm", "bogo"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn unknown_algorithm_in_config_is_a_usage_error() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[run]\nalgorithm = \"merge\"").unwrap();
        let args = RunArgs {
            config: Some(file.path().to_path_buf()),
            ..RunArgs::default()
        };
        let err = args.resolve_config().unwrap_err();
        assert!(matches!(
            err,
            CliError::Runtime(SortvizError::InvalidConfig { .. })
        ));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn missing_config_file_is_io_error() {
        let args = RunArgs {
            config: Some(PathBuf::from("/nonexistent/sortviz.toml")),
            ..RunArgs::default()
        };
        let err = args.resolve_config().unwrap_err();
        assert!(matches!(err, CliError::Runtime(SortvizError::Io(_))));
        assert_eq!(err.exit_code(), 1);
    }
}
