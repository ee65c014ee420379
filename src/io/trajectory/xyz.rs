/* ************************************************************************ **
** This file is part of trajsplit, and is licensed under EITHER the MIT     **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Multi-frame XYZ files.
//!
//! An XYZ "animation" is simply a concatenation of XYZ frames:
//!
//! ```text
//! 3
//! energy=-14.22
//!  O 0.0 0.0 0.119
//!  H 0.0 0.763 -0.477
//!  H 0.0 -0.763 -0.477
//! ```
//!
//! Columns after the three coordinates are carried through untouched.

use crate::{FailResult, Frame, Atom};
use ::std::io::prelude::*;

//--------------------------------------------------------------------------------------
// public API

#[derive(Debug, Fail)]
#[fail(display = "line {}: {}", line, message)]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

/// Reads frames one at a time from a multi-frame XYZ file.
pub struct Reader<R> {
    lines: ::std::io::Lines<R>,
    line_no: usize,
}

impl<R: BufRead> Reader<R> {
    pub fn new(r: R) -> Self
    { Reader { lines: r.lines(), line_no: 0 } }

    /// Read the next frame, or `None` at the end of the file.
    ///
    /// Blank lines in between frames are skipped.
    pub fn read_frame(&mut self) -> FailResult<Option<Frame>>
    {
        let count_line = loop {
            match self.next_line()? {
                None => return Ok(None),
                Some(line) => if !line.trim().is_empty() { break line },
            }
        };
        let count: usize = match count_line.split_whitespace().next().map(str::parse::<usize>) {
            Some(Ok(count)) => count,
            _ => return Err(self.error(format!("expected an atom count, got {:?}", count_line))),
        };

        let title = self.expect_line("title")?;
        let mut atoms = Vec::with_capacity(count);
        for _ in 0..count {
            let line = self.expect_line("atom")?;
            atoms.push(self.parse_atom(&line)?);
        }
        Ok(Some(Frame { title, atoms }))
    }

    fn next_line(&mut self) -> FailResult<Option<String>>
    {
        match self.lines.next() {
            None => Ok(None),
            Some(line) => {
                self.line_no += 1;
                Ok(Some(line?))
            },
        }
    }

    fn expect_line(&mut self, what: &str) -> FailResult<String>
    {
        match self.next_line()? {
            Some(line) => Ok(line),
            None => Err(self.error(format!("unexpected end of file; expected {} line", what))),
        }
    }

    fn parse_atom(&self, line: &str) -> FailResult<Atom>
    {
        let mut words = line.split_whitespace();
        let symbol = match words.next() {
            Some(symbol) => symbol.to_string(),
            None => return Err(self.error("expected an atom, got a blank line")),
        };

        let mut cart = [0.0; 3];
        for x in &mut cart {
            *x = match words.next().map(str::parse::<f64>) {
                Some(Ok(x)) => x,
                Some(Err(_)) | None => {
                    return Err(self.error(format!("could not read position from {:?}", line)));
                },
            };
        }

        let extra = words.map(str::to_string).collect();
        Ok(Atom { symbol, cart, extra })
    }

    fn error(&self, message: impl Into<String>) -> ::failure::Error
    { ParseError { line: self.line_no, message: message.into() }.into() }
}

impl<R: BufRead> Iterator for Reader<R> {
    type Item = FailResult<Frame>;

    fn next(&mut self) -> Option<Self::Item>
    { self.read_frame().transpose() }
}

/// Read every frame of a multi-frame XYZ file.
pub fn read_frames(r: impl BufRead) -> FailResult<Vec<Frame>>
{ Reader::new(r).collect() }

/// Appends frames to an open file.
///
/// Nothing is buffered here; wrap the file in a `BufWriter` if necessary.
pub struct Writer<W> {
    w: W,
    frames_written: usize,
}

impl<W: Write> Writer<W> {
    pub fn new(w: W) -> Self
    { Writer { w, frames_written: 0 } }

    pub fn write_frame(&mut self, frame: &Frame) -> FailResult<()>
    {
        dump(&mut self.w, frame)?;
        self.frames_written += 1;
        Ok(())
    }

    pub fn frames_written(&self) -> usize
    { self.frames_written }

    /// Flush and recover the underlying writer.
    pub fn finish(mut self) -> FailResult<W>
    {
        self.w.flush()?;
        Ok(self.w)
    }
}

//--------------------------------------------------------------------------------------
// implementation

fn dump(w: &mut dyn Write, frame: &Frame) -> FailResult<()>
{
    ensure!(
        !frame.title.contains('\n') && !frame.title.contains('\r'),
        "frame title cannot contain a line break: {:?}", frame.title,
    );

    writeln!(w, "{}", frame.atoms.len())?;
    writeln!(w, "{}", frame.title)?;
    for Atom { symbol, cart: [x, y, z], extra } in &frame.atoms {
        write!(w, " {:>2} {} {} {}", symbol, x, y, z)?;
        for word in extra {
            write!(w, " {}", word)?;
        }
        writeln!(w)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const WATER: &str = "\
3
energy=-14.22 step=0
O 0.0 0.0 0.119 0.01 0.0 -0.2
H 0.0 0.763 -0.477 0.0 0.1 0.1
H 0.0 -0.763 -0.477 0.0 -0.1 0.1
2
energy=-1.5
H 0.0 0.0 0.0
H 0.0 0.0 0.74

";

    fn parse_error(text: &str) -> ParseError {
        let err = read_frames(text.as_bytes()).unwrap_err();
        match err.downcast::<ParseError>() {
            Ok(e) => e,
            Err(e) => panic!("wrong error: {}", e),
        }
    }

    #[test]
    fn reads_frames() {
        let frames = read_frames(WATER.as_bytes()).unwrap();
        assert_eq!(frames.len(), 2);

        assert_eq!(frames[0].title, "energy=-14.22 step=0");
        assert_eq!(frames[0].symbols().collect::<Vec<_>>(), vec!["O", "H", "H"]);
        assert_eq!(frames[0].atoms[1].cart, [0.0, 0.763, -0.477]);
        assert_eq!(frames[0].atoms[0].extra, vec!["0.01", "0.0", "-0.2"]);
        assert_eq!(frames[0].energy(), Some(-14.22));

        assert_eq!(frames[1].num_atoms(), 2);
        assert!(frames[1].atoms[1].extra.is_empty());
    }

    #[test]
    fn written_frames_read_back_equal() {
        let frames = read_frames(WATER.as_bytes()).unwrap();

        let mut writer = Writer::new(vec![]);
        for frame in &frames {
            writer.write_frame(frame).unwrap();
        }
        assert_eq!(writer.frames_written(), 2);
        let bytes = writer.finish().unwrap();

        assert_eq!(read_frames(&bytes[..]).unwrap(), frames);
    }

    #[test]
    fn empty_input() {
        assert_eq!(read_frames("".as_bytes()).unwrap(), Vec::<Frame>::new());
        assert_eq!(read_frames("\n  \n".as_bytes()).unwrap(), Vec::<Frame>::new());
    }

    #[test]
    fn empty_title_is_kept() {
        let frames = read_frames("1\n\nAr 0 0 0\n".as_bytes()).unwrap();
        assert_eq!(frames, vec![Frame::new("", vec![Atom::new("Ar", [0.0; 3])])]);
    }

    #[test]
    fn errors() {
        let e = parse_error("two\ntitle\n");
        assert_eq!(e.line, 1);

        let e = parse_error("2\ntitle\nH 0 0 0\n");
        assert_eq!(e.line, 3);
        assert!(e.message.contains("end of file"), "{}", e);

        let e = parse_error("1\ntitle\nH 0 zero 0\n");
        assert_eq!(e.line, 3);

        let e = parse_error("1\ntitle\nH 0 0\n");
        assert_eq!(e.line, 3);
    }

    #[test]
    fn title_with_newline_is_rejected() {
        let frame = Frame::new("a\nb", vec![]);
        assert!(Writer::new(vec![]).write_frame(&frame).is_err());
    }
}
