/* ************************************************************************ **
** This file is part of trajsplit, and is licensed under EITHER the MIT     **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::FailResult;

use ::std::fmt;
use ::std::path::{Path, PathBuf};
use ::std::time::Instant;
use ::log::{Level, LevelFilter};

/// Crates whose messages are worth showing.
const OUR_CRATES: &[&str] = &[
    "trajsplit",
    "trajsplit_tasks",
    "trajsplit_trajectory_io",
    "trajsplit_soa_ops",
    "trajsplit_fs_util",
];

/// Builder-style setup for logging.
///
/// The terminal always shows `info` and above.  The log file additionally
/// receives `debug` messages, or everything in verbose mode.
#[derive(Debug, Clone, Default)]
pub struct GlobalLogger {
    path: Option<PathBuf>,
    verbosity: Verbosity,
}

impl GlobalLogger {
    /// NOTE: Relative paths will not be resolved until apply() is called.
    pub fn path(&mut self, path: impl AsRef<Path>) -> &mut Self
    { self.path = Some(path.as_ref().to_owned()); self }

    /// Any integer will be accepted; the level will be truncated
    /// to the most extreme value supported.
    pub fn verbosity(&mut self, level: i32) -> &mut Self
    {
        self.verbosity = match level > 0 {
            true => Verbosity::Loud,
            false => Verbosity::Default,
        };
        self
    }

    fn file_level(&self) -> LevelFilter
    {
        match self.verbosity {
            Verbosity::Default => LevelFilter::Debug,
            Verbosity::Loud => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Verbosity { Default, Loud }

impl Default for Verbosity {
    fn default() -> Self { Verbosity::Default }
}

impl GlobalLogger {
    /// Install the logger.  This can only succeed once per process.
    pub fn apply(&mut self) -> FailResult<()>
    {
        let start = Instant::now();
        let mut root = ::fern::Dispatch::new().level(LevelFilter::Warn);
        for &krate in OUR_CRATES {
            root = root.level_for(krate, LevelFilter::Trace);
        }

        let terminal = {
            ::fern::Dispatch::new()
                .format(move |out, message, record| {
                    let t = start.elapsed();
                    out.finish(format_args!("[{:>4}.{:03}s][{}] {}",
                        t.as_secs(),
                        t.subsec_millis(),
                        ColorizedLevel(record.level()),
                        message))
                })
                .level(LevelFilter::Info)
                .chain(::std::io::stdout())
        };
        root = root.chain(terminal);

        if let Some(path) = self.path.as_ref() {
            // a fresh log for every run
            let file = ::trajsplit_fs_util::create(path)?;
            root = root.chain({
                ::fern::Dispatch::new()
                    .format(move |out, message, record| {
                        let t = start.elapsed();
                        out.finish(format_args!("[{:>4}.{:03}s][{}][{}] {}",
                            t.as_secs(),
                            t.subsec_millis(),
                            record.target(),
                            record.level(),
                            message))
                    })
                    .level(self.file_level())
                    .chain(file)
            });
        }

        root.apply().map_err(|e| format_err!("could not install logger: {}", e))?;
        Ok(())
    }
}

#[derive(Debug, Copy, Clone)]
pub struct ColorizedLevel(pub Level);
impl fmt::Display for ColorizedLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let style = match self.0 {
            Level::Error => ::ansi_term::Colour::Red.bold(),
            Level::Warn  => ::ansi_term::Colour::Red.normal(),
            Level::Info  => ::ansi_term::Colour::Cyan.bold(),
            Level::Debug => ::ansi_term::Colour::Yellow.dimmed(),
            Level::Trace => ::ansi_term::Colour::Cyan.normal(),
        };
        write!(f, "{}", style.paint(self.0.to_string()))
    }
}
