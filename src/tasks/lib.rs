/* ************************************************************************ **
** This file is part of trajsplit, and is licensed under EITHER the MIT     **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Train/test splitting of trajectories, and the `trajsplit` entry point.

#[macro_use] extern crate log;
#[macro_use] extern crate failure;
#[macro_use] extern crate serde_derive;

pub type FailResult<T> = Result<T, ::failure::Error>;

mod ui;
mod config;
pub mod cmd;
pub mod entry_points;

pub use crate::config::Settings;
pub use crate::cmd::split::{
    SplitConfig, SplitError, SplitResult, Strategy, TrajectorySplitter,
    LogSink, Sink,
};

/// Build information about the binary.
#[derive(Debug, Copy, Clone)]
pub struct VersionInfo {
    pub version: &'static str,
}
