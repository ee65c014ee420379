/* ************************************************************************ **
** This file is part of trajsplit, and is licensed under EITHER the MIT     **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */


use ::std::ffi::OsString;
use ::std::io;
use ::std::path::{Path, PathBuf};

/// Names a directory that receives scratch directories kept after a panic.
const SAVETEMP_VAR: &str = "TRAJSPLIT_SAVETEMP";

/// Scratch directory that is deleted on drop, unless the thread is panicking.
///
/// A directory kept this way stays where it is, or is moved into
/// `$TRAJSPLIT_SAVETEMP` when that is set.
#[derive(Debug)]
pub struct TempDir(Option<::tempdir::TempDir>);

impl TempDir {
    pub fn new(prefix: &str) -> io::Result<TempDir>
    { ::tempdir::TempDir::new(prefix).map(|dir| TempDir(Some(dir))) }

    pub fn path(&self) -> &Path
    {
        match &self.0 {
            Some(dir) => dir.path(),
            None => unreachable!("TempDir is only emptied by drop"),
        }
    }
}

impl AsRef<Path> for TempDir {
    fn as_ref(&self) -> &Path { self.path() }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        if !::std::thread::panicking() {
            return;
        }
        if let Some(dir) = self.0.take() {
            keep(dir.into_path());
        }
    }
}

// Runs during a panic, so nothing in here may panic.
fn keep(dir: PathBuf) {
    let dest_parent = match save_location() {
        None => {
            info!("kept scratch directory at '{}'", dir.display());
            return;
        },
        Some(parent) => parent,
    };
    let name = match dir.file_name() {
        Some(name) => name.to_owned(),
        None => return,
    };

    if !dest_parent.is_dir() {
        if let Err(e) = crate::create_dir(&dest_parent) {
            warn!("{}; scratch directory left at '{}'", e, dir.display());
            return;
        }
    }

    let dest = dest_parent.join(name);
    match crate::rename(&dir, &dest) {
        Ok(()) => info!("moved scratch directory to '{}'", dest.display()),
        Err(e) => warn!("{}; scratch directory left at '{}'", e, dir.display()),
    }
}

fn save_location() -> Option<PathBuf> {
    let value: OsString = ::std::env::var_os(SAVETEMP_VAR).filter(|s| !s.is_empty())?;
    let cwd = ::std::env::current_dir().ok()?;
    Some(cwd.join(value))
}
