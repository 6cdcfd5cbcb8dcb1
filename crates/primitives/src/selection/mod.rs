use smallvec::{SmallVec, smallvec};

use crate::range::{CharIdx, Direction, Range};
use crate::transaction::{Bias, ChangeSet};


/// A set of non-overlapping ranges with a designated primary.
///
/// A selection always contains at least one range. The primary range
/// is the one annotation logic reads the cursor from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
	/// The collection of selection ranges (always non-empty).
	ranges: SmallVec<[Range; 1]>,
	/// Index of the primary range within `ranges`.
	primary_index: usize,
}

impl Selection {
	/// Create a new selection with at least one range.
	///
	/// Additional ranges can be provided via the `others` iterator.
	pub fn new(primary: Range, others: impl IntoIterator<Item = Range>) -> Self {
		let mut ranges: SmallVec<[Range; 1]> = smallvec![primary];
		ranges.extend(others);

		let mut sel = Self { ranges, primary_index: 0 };
		sel.normalize();
		sel
	}

	/// Creates a single-range selection.
	pub fn single(anchor: CharIdx, head: CharIdx) -> Self {
		Self {
			ranges: smallvec![Range::new(anchor, head)],
			primary_index: 0,
		}
	}

	/// Creates a point selection (zero-width cursor).
	pub fn point(pos: CharIdx) -> Self {
		Self::single(pos, pos)
	}

	/// Returns the primary range.
	pub fn primary(&self) -> Range {
		self.ranges[self.primary_index]
	}

	/// Returns the cursor position when the primary range is collapsed.
	pub fn cursor(&self) -> Option<CharIdx> {
		let primary = self.primary();
		primary.is_empty().then_some(primary.head)
	}

	/// Returns all ranges as a slice.
	pub fn ranges(&self) -> &[Range] {
		&self.ranges
	}

	/// Returns the number of ranges in this selection.
	#[allow(clippy::len_without_is_empty, reason = "Selection is never empty by design")]
	pub fn len(&self) -> usize {
		self.ranges.len()
	}

	/// Iterates over all ranges.
	pub fn iter(&self) -> impl Iterator<Item = &Range> {
		self.ranges.iter()
	}

	/// Returns the direction of the primary range.
	pub fn direction(&self) -> Direction {
		self.primary().direction()
	}

	/// Transforms all ranges using the given function, returning a new selection.
	pub fn transform<F>(&self, mut f: F) -> Self
	where
		F: FnMut(&Range) -> Range,
	{
		let primary = f(&self.primary());
		let others = self.ranges.iter().enumerate().filter(|&(i, _)| i != self.primary_index).map(|(_, r)| f(r));

		Self::new(primary, others)
	}

	/// Maps every range through a changeset.
	///
	/// Collapsed ranges follow insertions at their position so a cursor ends
	/// up after typed text. Extended ranges keep their extent tight, and a
	/// range whose text was replaced entirely collapses after the new text.
	pub fn map(&self, changes: &ChangeSet) -> Self {
		self.transform(|r| {
			if r.is_empty() {
				return r.map(|pos| changes.map_pos(pos, Bias::Right));
			}
			let (from, to) = (changes.map_pos(r.from(), Bias::Right), changes.map_pos(r.to(), Bias::Left));
			if from > to {
				return Range::point(from);
			}
			match r.direction() {
				Direction::Forward => Range::new(from, to),
				Direction::Backward => Range::new(to, from),
			}
		})
	}

	/// Clamps all ranges to `[0, max_char]`.
	pub fn clamp(&mut self, max_char: CharIdx) {
		for range in &mut self.ranges {
			*range = range.clamp(max_char);
		}
		self.normalize();
	}

	/// Normalize the selection by sorting ranges and merging overlaps.
	///
	/// Adjacent ranges stay separate: `[0, 5)` and `[5, 10)` are kept apart.
	fn normalize(&mut self) {
		if self.ranges.len() <= 1 {
			return;
		}

		let primary = self.ranges[self.primary_index];

		self.ranges.sort_by_key(|r: &Range| r.from());

		let mut merged: SmallVec<[Range; 1]> = SmallVec::new();
		let mut primary_index = 0;

		for range in &self.ranges {
			if let Some(last) = merged.last_mut()
				&& last.overlaps(range)
			{
				let old_last = *last;
				*last = last.merge(range);
				if *range == primary || old_last == primary {
					primary_index = merged.len() - 1;
				}
				continue;
			}

			if *range == primary {
				primary_index = merged.len();
			}
			merged.push(*range);
		}

		self.ranges = merged;
		self.primary_index = primary_index.min(self.ranges.len().saturating_sub(1));
	}
}

impl Default for Selection {
	fn default() -> Self {
		Self::point(0)
	}
}

impl From<Range> for Selection {
	fn from(range: Range) -> Self {
		Self {
			ranges: smallvec![range],
			primary_index: 0,
		}
	}
}
