/* ************************************************************************ **
** This file is part of trajsplit, and is licensed under EITHER the MIT     **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Harness for tests that run the `trajsplit` binary.

// NOTE: This draws heavily off of assert-cli (MIT 2.0/Apache)

use ::trajsplit_fs_util as fsx;

#[cfg(feature = "test-diff")]
#[macro_use]
extern crate pretty_assertions;

mod cli_test;
pub use crate::cli_test::{CliTest, CheckFile, DirChecker, Environment, Result};

pub mod filetypes;
