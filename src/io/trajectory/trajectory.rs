/* ************************************************************************ **
** This file is part of trajsplit, and is licensed under EITHER the MIT     **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::{FailResult, Frame, xyz};
use ::failure::ResultExt;
use ::std::path::{Path, PathBuf};

/// An ordered sequence of frames, together with the file it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    path: PathBuf,
    frames: Vec<Frame>,
}

impl Trajectory {
    pub fn new(path: impl Into<PathBuf>, frames: Vec<Frame>) -> Self
    { Trajectory { path: path.into(), frames } }

    /// Read every frame of a multi-frame XYZ file into memory.
    pub fn load(path: impl AsRef<Path>) -> FailResult<Self>
    {
        let path = path.as_ref();
        let file = ::trajsplit_fs_util::open_text(path)?;
        let frames = {
            xyz::read_frames(file)
                .with_context(|_| format!("while reading trajectory '{}'", path.display()))?
        };
        trace!("Read {} frames from '{}'", frames.len(), path.display());
        Ok(Trajectory::new(path, frames))
    }

    /// Write all frames to a file, replacing it if it exists.
    pub fn save(&self, path: impl AsRef<Path>) -> FailResult<()>
    { write_frames(path, &self.frames).map(|_| ()) }

    pub fn path(&self) -> &Path
    { &self.path }

    pub fn len(&self) -> usize
    { self.frames.len() }

    pub fn is_empty(&self) -> bool
    { self.frames.is_empty() }

    pub fn get(&self, index: usize) -> Option<&Frame>
    { self.frames.get(index) }

    pub fn frames(&self) -> &[Frame]
    { &self.frames }

    pub fn into_frames(self) -> Vec<Frame>
    { self.frames }
}

/// Write frames to a new file one at a time, returning how many were written.
pub fn write_frames<'a>(
    path: impl AsRef<Path>,
    frames: impl IntoIterator<Item=&'a Frame>,
) -> FailResult<usize>
{
    let path = path.as_ref();
    let file = ::trajsplit_fs_util::create_text(path)?;

    let mut writer = xyz::Writer::new(file);
    for frame in frames {
        writer.write_frame(frame)
            .with_context(|_| format!("while writing trajectory '{}'", path.display()))?;
    }
    let count = writer.frames_written();
    writer.finish()
        .with_context(|_| format!("while writing trajectory '{}'", path.display()))?;

    trace!("Wrote {} frames to '{}'", count, path.display());
    Ok(count)
}
