/* ************************************************************************ **
** This file is part of trajsplit, and is licensed under EITHER the MIT     **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use ::std::path::{Path, PathBuf};
use ::std::fs::{self, File};
use ::std::io::{self, BufReader, BufWriter};

pub use crate::tempdir::TempDir;
mod tempdir;

#[macro_use]
extern crate log;

/// An io error, annotated with what we were doing and to which path.
#[derive(Debug, thiserror::Error)]
#[error("{action}: '{}': {source}", .path.display())]
pub struct Error {
    action: &'static str,
    path: PathBuf,
    #[source]
    source: io::Error,
}

impl Error {
    pub fn path(&self) -> &Path { &self.path }
    pub fn kind(&self) -> io::ErrorKind { self.source.kind() }
}

pub type Result<T> = ::std::result::Result<T, Error>;

fn context<T>(
    result: io::Result<T>,
    action: &'static str,
    path: &Path,
) -> Result<T> {
    result.map_err(|source| Error { action, path: path.to_owned(), source })
}

/// Wrapper around `File::open` that adds context.
pub fn open<P: AsRef<Path>>(path: P) -> Result<File>
{
    let path = path.as_ref();
    context(File::open(path), "while opening file", path)
}

/// Wrapper around `File::open` that adds context and makes a `BufReader`.
pub fn open_text<P: AsRef<Path>>(path: P) -> Result<BufReader<File>>
{ open(path).map(BufReader::new) }

/// Wrapper around `File::create` that adds context.
pub fn create<P: AsRef<Path>>(path: P) -> Result<File>
{
    let path = path.as_ref();
    context(File::create(path), "could not create file", path)
}

/// Wrapper around `File::create` that adds context and makes a `BufWriter`.
pub fn create_text<P: AsRef<Path>>(path: P) -> Result<BufWriter<File>>
{ create(path).map(BufWriter::new) }

/// Wrapper around `std::fs::read_to_string` that adds context.
pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String>
{
    let path = path.as_ref();
    context(fs::read_to_string(path), "could not read file", path)
}

/// Wrapper around `std::fs::copy` that adds context.
pub fn copy<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dest: Q) -> Result<()>
{
    let (src, dest) = (src.as_ref(), dest.as_ref());
    context(fs::copy(src, dest), "could not copy file", src)
        .map(|_| ()) // number of bytes; don't care
}

/// Wrapper around `std::fs::create_dir` that adds context.
pub fn create_dir<P: AsRef<Path>>(dir: P) -> Result<()>
{
    let dir = dir.as_ref();
    context(fs::create_dir(dir), "could not create directory", dir)
}

/// Wrapper around `std::fs::rename` that adds context.
pub fn rename<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dest: Q) -> Result<()>
{
    let (src, dest) = (src.as_ref(), dest.as_ref());
    context(fs::rename(src, dest), "could not move file", src)
}

/// Copy the files (not subdirectories) directly inside `src` into `dest`.
///
/// `dest` must already exist.
pub fn copy_files<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dest: Q) -> Result<()>
{
    let (src, dest) = (src.as_ref(), dest.as_ref());
    for entry in context(fs::read_dir(src), "could not read directory", src)? {
        let entry = context(entry, "could not read directory", src)?;
        let path = entry.path();
        if path.is_file() {
            if let Some(name) = path.file_name() {
                copy(&path, dest.join(name))?;
            }
        }
    }
    Ok(())
}
