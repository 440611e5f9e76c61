use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::VecDeque;
use std::fmt;
use std::iter::{Enumerate, Fuse};

/// A single atomic text unit: either a byte value or a `char` scalar value
pub type Unit = u32;

/// Inline storage for one window; covers the common n-gram sizes without allocating
type UnitBuf = SmallVec<[Unit; 4]>;

/// The atomic unit n-grams are cut from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextUnit {
    /// Raw UTF-8 bytes
    Byte,

    /// Unicode scalar values
    #[default]
    Char,
}

impl TextUnit {
    /// Lazily iterate over the units of `text`
    pub fn units(self, text: &str) -> Units<'_> {
        match self {
            TextUnit::Byte => Units::Bytes(text.bytes()),
            TextUnit::Char => Units::Chars(text.chars()),
        }
    }

    /// Number of units in `text`
    pub fn count(self, text: &str) -> usize {
        match self {
            TextUnit::Byte => text.len(),
            TextUnit::Char => text.chars().count(),
        }
    }

    /// Translate a unit offset into a byte offset within `text`.
    ///
    /// Returns `None` when the offset lies past the end of the text, or, for
    /// byte units, when it does not fall on a UTF-8 boundary.
    pub fn byte_offset(self, text: &str, offset: usize) -> Option<usize> {
        match self {
            TextUnit::Byte => text.is_char_boundary(offset).then_some(offset),
            TextUnit::Char => text
                .char_indices()
                .map(|(idx, _)| idx)
                .chain(std::iter::once(text.len()))
                .nth(offset),
        }
    }
}

/// Iterator over the units of a string
#[derive(Debug, Clone)]
pub enum Units<'a> {
    Bytes(std::str::Bytes<'a>),
    Chars(std::str::Chars<'a>),
}

impl Iterator for Units<'_> {
    type Item = Unit;

    fn next(&mut self) -> Option<Unit> {
        match self {
            Units::Bytes(bytes) => bytes.next().map(Unit::from),
            Units::Chars(chars) => chars.next().map(Unit::from),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Units::Bytes(bytes) => bytes.size_hint(),
            Units::Chars(chars) => chars.size_hint(),
        }
    }
}

/// Lazy sliding-window adapter producing overlapping windows of a fixed size.
///
/// Yields nothing when the window size is zero or the source is shorter than
/// the window.
pub struct Windows<I: Iterator> {
    iter: Fuse<I>,
    size: usize,
    window: VecDeque<I::Item>,
}

impl<I> Clone for Windows<I>
where
    I: Iterator + Clone,
    I::Item: Clone,
{
    fn clone(&self) -> Self {
        Self {
            iter: self.iter.clone(),
            size: self.size,
            window: self.window.clone(),
        }
    }
}

impl<I> Iterator for Windows<I>
where
    I: Iterator,
    I::Item: Clone,
{
    type Item = SmallVec<[I::Item; 4]>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.size == 0 {
            return None;
        }

        if self.window.len() == self.size {
            self.window.pop_front();
        }

        while self.window.len() < self.size {
            let item = self.iter.next()?;
            self.window.push_back(item);
        }

        Some(self.window.iter().cloned().collect())
    }
}

/// Extension trait adding [`Windows`] to every iterator
pub trait WindowsExt: Iterator + Sized {
    /// Overlapping windows of `size` consecutive items
    fn sliding_windows(self, size: usize) -> Windows<Self> {
        Windows {
            iter: self.fuse(),
            size,
            window: VecDeque::with_capacity(size),
        }
    }
}

impl<I: Iterator> WindowsExt for I {}

/// A fixed-length run of text units, compared by value
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NGram(UnitBuf);

impl NGram {
    /// Build an n-gram from every unit of `text`
    pub fn of(text: &str, unit: TextUnit) -> Self {
        Self(unit.units(text).collect())
    }

    /// The units making up this n-gram
    pub fn units(&self) -> &[Unit] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<UnitBuf> for NGram {
    fn from(units: UnitBuf) -> Self {
        Self(units)
    }
}

impl fmt::Display for NGram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &unit in self.units() {
            let c = char::from_u32(unit).unwrap_or(char::REPLACEMENT_CHARACTER);
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

/// How text is cut into n-grams: the window size and the unit it counts in.
///
/// The same scheme decomposes both document content and queries, so offsets
/// produced on either side are directly comparable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NGramScheme {
    /// Window size `k`
    pub size: usize,

    /// Unit the window counts in
    pub unit: TextUnit,
}

impl NGramScheme {
    pub const fn new(size: usize, unit: TextUnit) -> Self {
        Self { size, unit }
    }

    /// Decompose `text` into `(offset, n-gram)` pairs in increasing offset order
    pub fn decompose<'a>(&self, text: &'a str) -> NGrams<'a> {
        NGrams {
            inner: self.unit.units(text).sliding_windows(self.size).enumerate(),
        }
    }

    /// Length of `text` measured in this scheme's units
    pub fn len_of(&self, text: &str) -> usize {
        self.unit.count(text)
    }
}

impl Default for NGramScheme {
    fn default() -> Self {
        Self::new(3, TextUnit::Char)
    }
}

/// Lazy `(offset, n-gram)` sequence returned by [`NGramScheme::decompose`].
///
/// Cloning forks the sequence at its current position.
#[derive(Clone)]
pub struct NGrams<'a> {
    inner: Enumerate<Windows<Units<'a>>>,
}

impl Iterator for NGrams<'_> {
    type Item = (usize, NGram);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(offset, window)| (offset, NGram(window)))
    }
}
