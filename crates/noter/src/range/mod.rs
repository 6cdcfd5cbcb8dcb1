//! Span arithmetic shared by the tracker and the transaction controller.


use noter_primitives::transaction::Operation;
use noter_primitives::{ChangeSet, ChannelKey, Document, Span};

/// Returns the index of the first span in `ranges` overlapping or touching `range`.
pub fn find_overlapping_range_index(range: Span, ranges: &[Span]) -> Option<usize> {
	ranges.iter().position(|r| r.touches(&range))
}

/// Merges overlapping and touching spans.
///
/// The result is sorted and pairwise disjoint with gaps between neighbours.
pub fn merge_ranges(ranges: impl IntoIterator<Item = Span>) -> Vec<Span> {
	let mut sorted: Vec<Span> = ranges.into_iter().collect();
	sorted.sort_by_key(|r| (r.from, r.to));

	let mut merged: Vec<Span> = Vec::with_capacity(sorted.len());
	for range in sorted {
		match merged.last_mut() {
			Some(last) if last.touches(&range) => *last = last.union(&range),
			_ => merged.push(range),
		}
	}
	merged
}

/// Subtracts every span of `second` from the spans of `first`.
///
/// Both inputs are merged first; empty leftovers are dropped.
pub fn diff_ranges(first: impl IntoIterator<Item = Span>, second: impl IntoIterator<Item = Span>) -> Vec<Span> {
	let cuts = merge_ranges(second);
	let mut out = Vec::new();

	for range in merge_ranges(first) {
		let mut from = range.from;
		for cut in &cuts {
			if cut.to <= from || cut.from >= range.to {
				continue;
			}
			if cut.from > from {
				out.push(Span::new(from, cut.from));
			}
			from = from.max(cut.to);
		}
		if from < range.to {
			out.push(Span::new(from, range.to));
		}
	}
	out
}

/// Returns the smallest post-edit span covering all text inserted by `changes`.
pub fn inserted_range(changes: &ChangeSet) -> Option<Span> {
	changes.insertions().reduce(|acc, span| acc.union(&span))
}

/// Returns the smallest post-edit span covering every position `changes`
/// touched, deletions included.
///
/// A pure deletion yields the empty span where the text was removed.
pub fn changed_range(changes: &ChangeSet) -> Option<Span> {
	let mut new_pos = 0;
	let mut out: Option<Span> = None;
	for op in changes.changes() {
		let span = match op {
			Operation::Retain(n) => {
				new_pos += n;
				continue;
			}
			Operation::Delete(_) => Span::new(new_pos, new_pos),
			Operation::Insert(ins) => {
				let span = Span::new(new_pos, new_pos + ins.char_len());
				new_pos = span.to;
				span
			}
		};
		out = Some(out.map_or(span, |acc| acc.union(&span)));
	}
	out
}

/// Returns the smallest span of `new` where text or `channel`'s tags differ from `old`.
///
/// The span is found by trimming the common prefix and common suffix. When
/// the two trims overlap (repeated content) and the document grew, the span
/// covers the growth right after the prefix. Pure deletions yield `None`;
/// position mapping already accounts for them.
pub fn diff_range(old: &Document, new: &Document, channel: &ChannelKey) -> Option<Span> {
	let old_text: Vec<char> = old.text().chars().collect();
	let new_text: Vec<char> = new.text().chars().collect();
	let old_attrs = old.attrs_per_char(channel);
	let new_attrs = new.attrs_per_char(channel);
	let same = |a: usize, b: usize| old_text[a] == new_text[b] && old_attrs[a] == new_attrs[b];

	let (old_len, new_len) = (old_text.len(), new_text.len());
	let shortest = old_len.min(new_len);

	let start = (0..shortest).find(|&i| !same(i, i)).unwrap_or(shortest);
	if start == shortest && old_len == new_len {
		return None;
	}

	let mut suffix = 0;
	while suffix < shortest && same(old_len - 1 - suffix, new_len - 1 - suffix) {
		suffix += 1;
	}
	let end = new_len - suffix;

	if start < end {
		Some(Span::new(start, end))
	} else if new_len > old_len {
		Some(Span::new(start, start + (new_len - old_len)))
	} else {
		None
	}
}
