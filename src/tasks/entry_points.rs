/* ************************************************************************ **
** This file is part of trajsplit, and is licensed under EITHER the MIT     **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::{FailResult, VersionInfo};
use crate::cmd::split::{Strategy, TrajectorySplitter};
use crate::config::Settings;
use crate::ui::cli_deserialize::{ArgMatchesExt, CliDeserialize};
use crate::ui::logging::GlobalLogger;

use ::clap;
use ::failure::ResultExt;
use ::std::ffi::OsStr;
use ::std::path::PathBuf;

const DEFAULT_LOG_FILE: &str = "trajsplit.log";

fn wrap_result_main<F>(main: F)
where F: FnOnce() -> FailResult<()>,
{
    main().unwrap_or_else(|e| {
        // the logger may not be up yet if the failure happened early
        let logging = ::log::max_level() != ::log::LevelFilter::Off;
        let report = |msg: &dyn ::std::fmt::Display| match logging {
            true => error!("{}", msg),
            false => eprintln!("Error: {}", msg),
        };

        for cause in e.iter_chain() {
            report(cause);
        }

        if ::std::env::var_os("RUST_BACKTRACE") == Some(OsStr::new("1").to_owned()) {
            report(e.backtrace());
        } else {
            report(&"(run again with RUST_BACKTRACE=1 for a backtrace)");
        }
        ::std::process::exit(1);
    });
}

impl CliDeserialize for GlobalLogger {
    fn _augment_clap_app<'a, 'b>(app: clap::App<'a, 'b>) -> clap::App<'a, 'b> {
        app.args(&[
            clap::Arg::with_name("log")
                .long("log")
                .value_name("FILE")
                .takes_value(true)
                .help("file that receives detailed progress messages [default: trajsplit.log]"),
            clap::Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .multiple(true)
                .help("also write trace-level messages to the log file"),
        ])
    }

    fn _resolve_args(m: &clap::ArgMatches<'_>) -> FailResult<Self>
    {
        let mut logger = GlobalLogger::default();
        logger.path(m.value_of("log").unwrap_or(DEFAULT_LOG_FILE));
        logger.verbosity(m.occurrences_of("verbose") as i32);
        Ok(logger)
    }
}

/// Arguments of `trajsplit`.
#[derive(Debug, Clone)]
pub struct SplitArgs {
    pub input: PathBuf,
    pub config: Option<PathBuf>,
    /// Values given on the command line.
    pub overrides: Settings,
}

impl CliDeserialize for SplitArgs {
    fn _augment_clap_app<'a, 'b>(app: clap::App<'a, 'b>) -> clap::App<'a, 'b> {
        app.args(&[
            clap::Arg::with_name("input")
                .value_name("INPUT")
                .required(true)
                .help("trajectory to split (multi-frame XYZ)"),
            clap::Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("YAML")
                .takes_value(true)
                .help("\
                    settings file with any of the keys 'training-fraction', \
                    'strategy' and 'seed'. Command-line arguments take precedence.\
                "),
            clap::Arg::with_name("fraction")
                .short("f")
                .long("fraction")
                .value_name("F")
                .takes_value(true)
                .allow_hyphen_values(true)
                .help("fraction of frames in the training set, strictly between 0 and 1 [default: 0.75]"),
            clap::Arg::with_name("strategy")
                .short("s")
                .long("strategy")
                .value_name("STRATEGY")
                .takes_value(true)
                .possible_values(&["random", "time"])
                .help("\
                    'random' draws the test set at random. \
                    'time' puts the last frames in the test set. [default: random]\
                "),
            clap::Arg::with_name("seed")
                .long("seed")
                .value_name("N")
                .takes_value(true)
                .help("seed for the random strategy. When omitted, a seed is drawn and logged."),
        ])
    }

    fn _resolve_args(m: &clap::ArgMatches<'_>) -> FailResult<Self>
    { Ok(SplitArgs {
        input: m.expect_value_of("input").into(),
        config: m.value_of("config").map(PathBuf::from),
        overrides: Settings {
            training_fraction: m.parse_value_of("fraction")?,
            strategy: m.value_of("strategy").map(String::from),
            seed: m.parse_value_of("seed")?,
        },
    })}
}

// -------------------------------------------------------------------------------------

// %% CRATES: binary: trajsplit %%
pub fn split(version: VersionInfo) {
    wrap_result_main(|| {
        let (app, de) = CliDeserialize::augment_clap_app({
            clap::App::new("trajsplit")
                .version(version.version)
                .about("Split a trajectory into a training set and a test set.")
        });
        let matches = app.get_matches();
        let (mut logger, args): (GlobalLogger, SplitArgs) = de.resolve_args(&matches)?;
        logger.apply()?;
        trace!("trajsplit {}", version.version);

        let SplitArgs { input, config, overrides } = args;
        let settings = match &config {
            None => Settings::default(),
            Some(path) => Settings::load(path)?,
        };
        let settings = settings.merged_with(overrides);

        let seed_was_drawn = settings.seed.is_none();
        let config = {
            settings.into_config(&input, ::rand::random::<u64>)
                .with_context(|_| format!("while splitting '{}'", input.display()))?
        };
        if seed_was_drawn && config.strategy == Strategy::Random {
            info!("Random seed: {} (pass --seed {} to reproduce)", config.seed, config.seed);
        }

        let context = format!(
            "while splitting '{}' (strategy: {}, training fraction: {})",
            config.source.display(), config.strategy, config.training_fraction,
        );

        TrajectorySplitter::new(config)
            .on_timing(|operation, elapsed| {
                let secs = elapsed.as_secs() as f64 + f64::from(elapsed.subsec_nanos()) * 1e-9;
                debug!("`{}` took {:.4} seconds", operation, secs);
            })
            .run()
            .context(context)?;
        Ok(())
    });
}
