/* ************************************************************************ **
** This file is part of trajsplit, and is licensed under EITHER the MIT     **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Settings read from a YAML file.
//!
//! ```yaml
//! training-fraction: 0.8
//! strategy: time
//! seed: 42
//! ```
//!
//! Every key is optional.  Values given on the command line take precedence.

use crate::FailResult;
use crate::cmd::split::{SplitConfig, SplitError, Strategy, DEFAULT_TRAINING_FRACTION};

use ::failure::ResultExt;
use ::std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Fraction of frames in the training set.
    #[serde(default)]
    pub training_fraction: Option<f64>,
    /// `random` or `time`.  Checked by `into_config`.
    #[serde(default)]
    pub strategy: Option<String>,
    /// Seed for the random strategy.  A fresh one is drawn when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Settings {
    pub fn load(path: impl AsRef<Path>) -> FailResult<Settings>
    {
        let path = path.as_ref();
        let file = ::trajsplit_fs_util::open_text(path)?;
        let settings = {
            ::serde_yaml::from_reader(file)
                .with_context(|_| format!("while reading config file '{}'", path.display()))?
        };
        Ok(settings)
    }

    /// Values present in `other` win.
    pub fn merged_with(self, other: Settings) -> Settings
    {
        Settings {
            training_fraction: other.training_fraction.or(self.training_fraction),
            strategy: other.strategy.or(self.strategy),
            seed: other.seed.or(self.seed),
        }
    }

    /// Fill in defaults.  `fresh_seed` is only called when no seed was given.
    pub fn into_config(
        self,
        source: impl Into<PathBuf>,
        fresh_seed: impl FnOnce() -> u64,
    ) -> Result<SplitConfig, SplitError>
    {
        let training_fraction = self.training_fraction.unwrap_or(DEFAULT_TRAINING_FRACTION);
        crate::cmd::split::check_training_fraction(training_fraction)?;

        let strategy = match &self.strategy {
            None => Strategy::default(),
            Some(name) => name.parse::<Strategy>()?,
        };

        let seed = self.seed.unwrap_or_else(fresh_seed);
        Ok({
            SplitConfig::new(source, seed)
                .with_training_fraction(training_fraction)
                .with_strategy(strategy)
        })
    }
}
