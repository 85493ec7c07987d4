//! Command-line interface
//!
//! ```text
//! speculate <n> <threshold> <difficulty> <max_primes> <output_file> [OPTIONS]
//! ```

use crate::config::{BenchConfig, Settings};
use crate::error::ConfigError;
use clap::{value_parser, Arg, ArgMatches, Command};
use speculate_core::SpeculationParams;
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

/// Parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    /// Decision matrix dimension
    pub matrix_size: usize,
    /// Decision threshold
    pub threshold: i64,
    /// Proof-of-work difficulty
    pub difficulty: usize,
    /// Exclusive prime search bound
    pub prime_bound: u64,
    /// Report file
    pub output: PathBuf,
    /// `--trials`
    pub trials: Option<usize>,
    /// `--pause-ms`
    pub pause_ms: Option<u64>,
    /// `--seed`
    pub seed: Option<u64>,
    /// `--config`
    pub config: Option<PathBuf>,
    /// `--log-level`
    pub log_level: Option<String>,
}

/// Build the `speculate` command
#[must_use]
pub fn command() -> Command {
    Command::new("speculate")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compare sequential and speculative execution of a decision-dependent computation")
        .arg(
            Arg::new("n")
                .required(true)
                .value_parser(value_parser!(usize))
                .help("Dimension of the decision matrices"),
        )
        .arg(
            Arg::new("threshold")
                .required(true)
                .allow_negative_numbers(true)
                .value_parser(value_parser!(i64))
                .help("Branch A (proof-of-work) runs when the trace exceeds this"),
        )
        .arg(
            Arg::new("difficulty")
                .required(true)
                .value_parser(value_parser!(usize))
                .help("Leading zero hex digits required by the proof-of-work"),
        )
        .arg(
            Arg::new("max_primes")
                .required(true)
                .value_parser(value_parser!(u64))
                .help("Exclusive upper bound of the prime search"),
        )
        .arg(
            Arg::new("output_file")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Report file (overwritten)"),
        )
        .arg(
            Arg::new("trials")
                .long("trials")
                .value_parser(value_parser!(usize))
                .help("Trials per series [default: 30]"),
        )
        .arg(
            Arg::new("pause-ms")
                .long("pause-ms")
                .value_parser(value_parser!(u64))
                .help("Pause between trials in milliseconds [default: 100]"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_parser(value_parser!(u64))
                .help("Seed for reproducible decision matrices"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_parser(value_parser!(PathBuf))
                .help("TOML settings file"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_parser(crate::logging::parse_level)
                .help("Tracing filter, e.g. `debug` or `speculate_core=trace`"),
        )
}

/// Parse arguments (including the program name)
///
/// # Errors
/// Returns the clap error, which renders the usage message, for missing,
/// extra or malformed arguments as well as `--help` and `--version`.
pub fn parse_from<I, T>(args: I) -> Result<CliArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = command().try_get_matches_from(args)?;
    Ok(CliArgs::from_matches(&matches))
}

impl CliArgs {
    fn from_matches(matches: &ArgMatches) -> Self {
        // Required positionals are guaranteed present after a successful parse.
        Self {
            matrix_size: matches.get_one::<usize>("n").copied().unwrap_or_default(),
            threshold: matches.get_one::<i64>("threshold").copied().unwrap_or_default(),
            difficulty: matches.get_one::<usize>("difficulty").copied().unwrap_or_default(),
            prime_bound: matches.get_one::<u64>("max_primes").copied().unwrap_or_default(),
            output: matches.get_one::<PathBuf>("output_file").cloned().unwrap_or_default(),
            trials: matches.get_one::<usize>("trials").copied(),
            pause_ms: matches.get_one::<u64>("pause-ms").copied(),
            seed: matches.get_one::<u64>("seed").copied(),
            config: matches.get_one::<PathBuf>("config").cloned(),
            log_level: matches.get_one::<String>("log-level").cloned(),
        }
    }

    /// Resolve defaults, settings file and flags into a validated config
    ///
    /// # Errors
    /// Returns `ConfigError` if the settings file is unreadable or invalid,
    /// or if the resulting parameters fail validation.
    pub fn into_config(self) -> Result<BenchConfig, ConfigError> {
        let params = SpeculationParams::new(
            self.matrix_size,
            self.threshold,
            self.difficulty,
            self.prime_bound,
        )?;
        let mut config = BenchConfig::new(params, self.output);

        if let Some(path) = &self.config {
            config = config.apply_settings(&Settings::from_file(path)?);
        }
        if let Some(trials) = self.trials {
            config = config.with_trials(trials);
        }
        if let Some(pause_ms) = self.pause_ms {
            config = config.with_pause(Duration::from_millis(pause_ms));
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }

        config.validate()?;
        Ok(config)
    }
}
