/* ************************************************************************ **
** This file is part of trajsplit, and is licensed under EITHER the MIT     **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::fsx::{self, TempDir};
use failure::Error;

use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::ffi::{OsStr, OsString};
use std::process::Command;
pub type Result<T> = std::result::Result<T, Error>;

const STDOUT_FILE: &str = "__captured_stdout";
const STDERR_FILE: &str = "__captured_stderr";

/// A single invocation of a binary inside a fresh tempdir.
///
/// The files of `tests/resources` are copied into `resources/` of the tempdir
/// beforehand, and all paths given to `check` closures are relative to it.
#[must_use]
pub struct CliTest {
    cmd: Vec<OsString>,
    expect_success: Option<bool>,
    checkers: Vec<DirChecker>,
}

pub type DirChecker = Box<dyn Fn(&Path) -> Result<()>>;

impl CliTest {
    /// Typically called with `env!("CARGO_BIN_EXE_<name>")`.
    pub fn binary(_env: &Environment, path: impl AsRef<OsStr>) -> Self {
        CliTest {
            cmd: vec![path.as_ref().to_owned()],
            expect_success: Some(true),
            checkers: vec![],
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.cmd.push(arg.as_ref().into());
        self
    }

    pub fn args<S: AsRef<OsStr>>(mut self, args: &[S]) -> Self {
        self.cmd.extend(args.iter().map(|s| s.as_ref().to_owned()));
        self
    }

    /// Require a nonzero exit status instead of success.
    pub fn expect_failure(mut self) -> Self {
        self.expect_success = Some(false);
        self
    }

    pub fn check<F>(mut self, checker: F) -> Self
    where F: Fn(&Path) -> Result<()> + 'static,
    {
        self.checkers.push(Box::new(checker));
        self
    }

    /// `check` with a standard trait-based implementation.
    pub fn check_file<T: CheckFile>(
        self,
        path_in_dir: &Path,
        expected_path: &Path,
        other: T::OtherArgs,
    ) -> Self {
        let path_in_dir = path_in_dir.to_owned();
        let expected_path = expected_path.to_owned();
        let checker = move |dir: &Path| {
            let actual = T::read_file(&dir.join(&path_in_dir))?;
            let expected = T::read_file(&expected_path)?;
            check_against_with_diff(&expected, &actual, other.clone());
            Ok(())
        };
        self.check(checker)
    }

    /// Check the captured standard output of the binary.
    pub fn check_stdout<F>(self, checker: F) -> Self
    where F: Fn(&str) -> Result<()> + 'static,
    {
        self.check(move |dir| checker(&fsx::read_to_string(dir.join(STDOUT_FILE))?))
    }

    /// Check the captured standard error of the binary.
    pub fn check_stderr<F>(self, checker: F) -> Self
    where F: Fn(&str) -> Result<()> + 'static,
    {
        self.check(move |dir| checker(&fsx::read_to_string(dir.join(STDERR_FILE))?))
    }

    pub fn run(self) -> Result<()> {
        let CliTest { cmd, checkers, expect_success } = self;

        let tmp = TempDir::new("trajsplit")?;

        let resources = PathBuf::from("tests/resources");
        if resources.is_dir() {
            fsx::create_dir(tmp.path().join("resources"))?;
            fsx::copy_files(&resources, tmp.path().join("resources"))?;
        }

        let stdout_path = tmp.path().join(STDOUT_FILE);
        let stderr_path = tmp.path().join(STDERR_FILE);
        let status = {
            let mut args = cmd;
            let bin = args.remove(0);

            let mut cmd = Command::new(&bin);
            cmd.args(&args);
            cmd.current_dir(tmp.path());
            // capture for the test harness
            cmd.stdout(fsx::create(&stdout_path)?);
            cmd.stderr(fsx::create(&stderr_path)?);
            println!("Running {:?}", cmd);
            cmd.status()?
        };
        print!("{}", fsx::read_to_string(&stdout_path)?);
        eprint!("{}", fsx::read_to_string(&stderr_path)?);

        if let Some(success) = expect_success {
            assert_eq!(success, status.success(), "{}", status);
        }

        for checker in checkers {
            checker(tmp.path())?;
        }
        Ok(())
    }
}

pub trait CheckFile: Sized + Debug + PartialEq + std::panic::RefUnwindSafe {
    // (Clone because checkers are Fn (can't dynamically call FnOnce) and the
    //  standard checker needs it)
    type OtherArgs: std::panic::UnwindSafe + Clone + 'static;

    fn read_file(path: &Path) -> Result<Self>;
    fn check_against(&self, expected: &Self, other_args: Self::OtherArgs);
}

#[cfg(feature = "test-diff")]
fn check_against_with_diff<T: CheckFile>(old: &T, new: &T, other: T::OtherArgs) {
    let result = std::panic::catch_unwind(move || old.check_against(new, other));

    // If it did panic, throw that panic away and get a colorful diff
    // on the Debug output from pretty_assertions.
    if let Err(_) = result {
        let _guard = DoAfterPanic(|| {
            if std::env::var("TRAJSPLIT_SAVETEMP") == Err(::std::env::VarError::NotPresent) {
                eprintln!();
                eprintln!("               The above panic should have printed a diff.");
                eprintln!("  Use TRAJSPLIT_SAVETEMP=some-location to recover the failed tempdir.");
            }
        });
        // Use pretty_assertions
        assert_eq!(old, new);
    }
}

#[cfg(not(feature = "test-diff"))]
fn check_against_with_diff<T: CheckFile>(old: &T, new: &T, other: T::OtherArgs) {
    let _guard = DoAfterPanic(|| {
        eprintln!();
        eprintln!("  If the above panic occurred while comparing new output to old, ");
        eprintln!("    please try rerunning the test with '--features test-diff'.");
    });
    old.check_against(new, other)
}

// Call a function during unwind, after the panic message was printed.
struct DoAfterPanic<F: FnMut()>(F);

impl<F: FnMut()> Drop for DoAfterPanic<F> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            (self.0)()
        }
    }
}

/// Proof of the global environment for a test case having been set up.
pub struct Environment(());

static ENVIRONMENT_ONCE: std::sync::Once = std::sync::Once::new();

impl Environment {
    /// Set up the global environment for the test case.
    ///
    /// This installs a logger that prints to the captured stderr, which is
    /// where the messages about tempdirs saved through `TRAJSPLIT_SAVETEMP` go.
    pub fn init() -> Self {
        ENVIRONMENT_ONCE.call_once(|| {
            env_logger::Builder::new()
                .is_test(true)
                .filter_level(log::LevelFilter::Info)
                .init();
        });
        Environment(())
    }
}
