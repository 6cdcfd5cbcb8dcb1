use serde::{Deserialize, Serialize};

/// A position in the text, measured in characters (not bytes).
///
/// This is the canonical coordinate space for documents and annotations.
pub type CharIdx = usize;

/// A length or count in the text, measured in characters (not bytes).
///
/// This is distinct from CharIdx to avoid accidentally passing an index
/// where a length is expected or vice versa.
pub type CharLen = usize;

/// Selection direction (anchor to head).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
	/// Head is after anchor (normal selection).
	Forward,
	/// Head is before anchor (reverse selection).
	Backward,
}

/// A text range defined by anchor and head positions.
///
/// The anchor is the fixed end, and the head moves during selection extension.
/// For a forward selection, head > anchor. For backward, head < anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
	/// The fixed end of the range.
	pub anchor: CharIdx,
	/// The moving end of the range (cursor position).
	pub head: CharIdx,
}

impl Range {
	/// Creates a new range from anchor to head.
	pub fn new(anchor: CharIdx, head: CharIdx) -> Self {
		Self { anchor, head }
	}

	/// Creates a zero-width range (cursor) at the given position.
	pub fn point(pos: CharIdx) -> Self {
		Self::new(pos, pos)
	}

	/// Returns the start of the selected extent.
	#[inline]
	pub fn from(&self) -> CharIdx {
		std::cmp::min(self.anchor, self.head)
	}

	/// Returns the end of the selected extent (exclusive).
	#[inline]
	pub fn to(&self) -> CharIdx {
		std::cmp::max(self.anchor, self.head)
	}

	/// Returns the length of the range in characters.
	#[inline]
	pub fn len(&self) -> CharLen {
		self.to() - self.from()
	}

	/// Returns true if anchor equals head (zero-width cursor).
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.anchor == self.head
	}

	/// Returns the direction of this range.
	#[inline]
	pub fn direction(&self) -> Direction {
		if self.head < self.anchor {
			Direction::Backward
		} else {
			Direction::Forward
		}
	}

	/// Returns the extent of this range as a [`Span`].
	#[inline]
	pub fn span(&self) -> Span {
		Span::new(self.from(), self.to())
	}

	/// Applies a function to both anchor and head.
	pub fn map(self, mut f: impl FnMut(CharIdx) -> CharIdx) -> Self {
		Self {
			anchor: f(self.anchor),
			head: f(self.head),
		}
	}

	/// Returns true if this range overlaps with another.
	pub fn overlaps(&self, other: &Range) -> bool {
		if self.from() < other.to() && other.from() < self.to() {
			return true;
		}

		self.is_empty() && other.is_empty() && self.from() == other.from()
	}

	/// Merges two ranges, preserving direction of self.
	pub fn merge(&self, other: &Range) -> Self {
		let from = std::cmp::min(self.from(), other.from());
		let to = std::cmp::max(self.to(), other.to());

		if self.direction() == Direction::Forward {
			Self::new(from, to)
		} else {
			Self::new(to, from)
		}
	}

	/// Clamps anchor and head to `[0, max_char]`.
	pub fn clamp(&self, max_char: CharIdx) -> Self {
		Self {
			anchor: self.anchor.min(max_char),
			head: self.head.min(max_char),
		}
	}
}

impl Default for Range {
	fn default() -> Self {
		Self::point(0)
	}
}

/// A directionless half-open extent `[from, to)`.
///
/// Spans describe document regions (annotation extents, inserted text,
/// changed regions). Callers are expected to keep `from <= to`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
	/// Inclusive start.
	pub from: CharIdx,
	/// Exclusive end.
	pub to: CharIdx,
}

impl Span {
	/// Creates a span covering `[from, to)`.
	pub const fn new(from: CharIdx, to: CharIdx) -> Self {
		Self { from, to }
	}

	/// Returns the number of characters covered.
	#[inline]
	pub fn len(&self) -> CharLen {
		self.to.saturating_sub(self.from)
	}

	/// Returns true if the span covers no characters.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.from >= self.to
	}

	/// Returns true if the spans share at least one position, edges included.
	#[inline]
	pub fn touches(&self, other: &Span) -> bool {
		self.from <= other.to && self.to >= other.from
	}

	/// Returns the smallest span covering both.
	pub fn union(&self, other: &Span) -> Span {
		Span::new(self.from.min(other.from), self.to.max(other.to))
	}
}

impl From<std::ops::Range<CharIdx>> for Span {
	fn from(r: std::ops::Range<CharIdx>) -> Self {
		Self::new(r.start, r.end)
	}
}
