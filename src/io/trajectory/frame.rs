/* ************************************************************************ **
** This file is part of trajsplit, and is licensed under EITHER the MIT     **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

/// One atom of a frame, as it appears on its line of an XYZ file.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub symbol: String,
    pub cart: [f64; 3],
    /// Any columns after the position (e.g. forces), kept verbatim.
    pub extra: Vec<String>,
}

impl Atom {
    pub fn new(symbol: impl Into<String>, cart: [f64; 3]) -> Self
    { Atom { symbol: symbol.into(), cart, extra: vec![] } }

    pub fn with_extra<S: Into<String>>(mut self, extra: impl IntoIterator<Item=S>) -> Self
    { self.extra = extra.into_iter().map(Into::into).collect(); self }
}

/// A single snapshot of a trajectory.
///
/// The title is usually an extended-XYZ comment of `key=value` pairs,
/// carrying e.g. the reference energy.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub title: String,
    pub atoms: Vec<Atom>,
}

impl Frame {
    pub fn new(title: impl Into<String>, atoms: Vec<Atom>) -> Self
    { Frame { title: title.into(), atoms } }

    pub fn num_atoms(&self) -> usize
    { self.atoms.len() }

    pub fn symbols(&self) -> impl ExactSizeIterator<Item=&str>
    { self.atoms.iter().map(|atom| &atom.symbol[..]) }

    /// The `energy=` entry of the title, if there is one and it is a number.
    pub fn energy(&self) -> Option<f64>
    {
        self.title.split_whitespace()
            .filter_map(|word| {
                let mut kv = word.splitn(2, '=');
                match (kv.next(), kv.next()) {
                    (Some(key), Some(value)) => Some((key, value)),
                    _ => None,
                }
            })
            .find(|(key, _)| key.eq_ignore_ascii_case("energy"))
            .and_then(|(_, value)| value.trim_matches('"').parse().ok())
    }
}
