use super::types::{Bias, Change, Insertion, Operation, Tendril};
use crate::Rope;
use crate::range::{CharIdx, CharLen, Span};

/// A sequence of operations representing a set of changes to a document.
///
/// ChangeSet represents document changes as a sequence of retain, delete, and
/// insert operations. This representation enables composition, inversion, and
/// position mapping.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChangeSet {
	/// Sequence of retain/delete/insert operations.
	pub(super) changes: Vec<Operation>,
	/// Length of the source document before changes.
	pub(super) len: usize,
	/// Length of the document after applying changes.
	pub(super) len_after: usize,
}

impl ChangeSet {
	/// Creates a new empty changeset builder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a changeset that leaves a document of `len` characters untouched.
	pub fn identity(len: CharLen) -> Self {
		let mut cs = Self::new();
		cs.retain(len);
		cs
	}

	/// Builds a changeset from sorted, non-overlapping changes.
	///
	/// Changes that overlap a previous one or fall outside the document are
	/// clamped to the remaining text.
	pub fn from_changes(len: CharLen, changes: impl IntoIterator<Item = Change>) -> Self {
		let mut cs = Self::new();
		let mut pos = 0;

		for change in changes {
			let start = change.start.clamp(pos, len);
			let end = change.end.clamp(start, len);
			cs.retain(start - pos);
			if let Some(text) = change.replacement {
				cs.insert(text);
			}
			cs.delete(end - start);
			pos = end;
		}

		cs.retain(len - pos);
		cs
	}

	/// Builds a changeset replacing `[from, to)` with `text`.
	pub fn replace(len: CharLen, from: CharIdx, to: CharIdx, text: &str) -> Self {
		Self::from_changes(
			len,
			[Change {
				start: from,
				end: to,
				replacement: (!text.is_empty()).then(|| text.to_string()),
			}],
		)
	}

	/// Returns the length of the source document (before changes).
	pub fn len(&self) -> usize {
		self.len
	}

	/// Returns the length of the document after applying changes.
	pub fn len_after(&self) -> usize {
		self.len_after
	}

	/// Returns true if this changeset contains no operations.
	pub fn is_empty(&self) -> bool {
		self.changes.is_empty()
	}

	/// Returns true if applying this changeset leaves the text untouched.
	pub fn is_identity(&self) -> bool {
		self.changes.iter().all(|op| matches!(op, Operation::Retain(_)))
	}

	/// Returns a slice of all operations in this changeset.
	pub fn changes(&self) -> &[Operation] {
		&self.changes
	}

	/// Adds a retain operation, preserving N characters from the source.
	///
	/// Consecutive retain operations are automatically merged.
	pub(crate) fn retain(&mut self, n: CharLen) {
		if n == 0 {
			return;
		}

		self.len += n;
		self.len_after += n;

		if let Some(Operation::Retain(count)) = self.changes.last_mut() {
			*count += n;
		} else {
			self.changes.push(Operation::Retain(n));
		}
	}

	/// Adds a delete operation, removing N characters from the source.
	///
	/// Consecutive delete operations are automatically merged.
	pub(crate) fn delete(&mut self, n: CharLen) {
		if n == 0 {
			return;
		}

		self.len += n;

		if let Some(Operation::Delete(count)) = self.changes.last_mut() {
			*count += n;
		} else {
			self.changes.push(Operation::Delete(n));
		}
	}

	/// Adds an insert operation, inserting text at the current position.
	///
	/// Inserts are merged with adjacent inserts and always ordered before a
	/// delete at the same position.
	pub(crate) fn insert(&mut self, text: Tendril) {
		if text.is_empty() {
			return;
		}

		let ins = Insertion::new(text);
		self.len_after += ins.char_len();

		match self.changes.as_mut_slice() {
			[.., Operation::Insert(prev)] | [.., Operation::Insert(prev), Operation::Delete(_)] => {
				prev.push(ins);
			}
			[.., last @ Operation::Delete(_)] => {
				let del = std::mem::replace(last, Operation::Insert(ins));
				self.changes.push(del);
			}
			_ => {
				self.changes.push(Operation::Insert(ins));
			}
		}
	}

	/// Applies this changeset to a text, modifying it in place.
	pub fn apply(&self, doc: &mut Rope) {
		if self.changes.is_empty() {
			return;
		}

		let mut pos = 0;
		for op in &self.changes {
			match op {
				Operation::Retain(n) => {
					pos += n;
				}
				Operation::Delete(n) => {
					doc.remove(pos..pos + n);
				}
				Operation::Insert(ins) => {
					doc.insert(pos, ins.text());
					pos += ins.char_len();
				}
			}
		}
	}

	/// Inverts this changeset to create one that undoes its effects.
	///
	/// `doc` is the original text (before changes were applied).
	pub fn invert(&self, doc: &Rope) -> ChangeSet {
		let mut result = ChangeSet::new();

		let mut pos = 0;
		for op in &self.changes {
			match op {
				Operation::Retain(n) => {
					result.retain(*n);
					pos += n;
				}
				Operation::Delete(n) => {
					let deleted_text: String = doc.slice(pos..pos + n).chars().collect();
					result.insert(deleted_text);
					pos += n;
				}
				Operation::Insert(ins) => {
					result.delete(ins.char_len());
				}
			}
		}

		debug_assert_eq!(result.len, self.len_after);
		result
	}

	/// Maps a position through this changeset using the specified bias.
	///
	/// Positions inside deleted text collapse to the deletion point. Text
	/// inserted in place of a deletion counts as inserted at the deletion
	/// point, so every position from the start to the end of the replaced text
	/// lands before it with [`Bias::Left`] and after it with [`Bias::Right`].
	pub fn map_pos(&self, pos: CharIdx, bias: Bias) -> CharIdx {
		let mut old_pos = 0;
		let mut new_pos = 0;
		let mut ops = self.changes.iter().peekable();

		while let Some(op) = ops.next() {
			if old_pos > pos {
				break;
			}

			match op {
				Operation::Retain(n) => {
					if old_pos + n > pos {
						return new_pos + (pos - old_pos);
					}
					old_pos += n;
					new_pos += n;
				}
				Operation::Delete(n) => {
					if old_pos + n > pos {
						return new_pos;
					}
					old_pos += n;
				}
				Operation::Insert(ins) => {
					let replaced = match ops.peek() {
						Some(Operation::Delete(n)) => *n,
						_ => 0,
					};
					let at_insertion = pos <= old_pos + replaced;
					if !(at_insertion && bias == Bias::Left) {
						new_pos += ins.char_len();
					}
				}
			}
		}

		new_pos + (pos - old_pos)
	}

	/// Returns the post-change spans of every inserted run, in order.
	pub fn insertions(&self) -> impl Iterator<Item = Span> + '_ {
		let mut new_pos = 0;
		self.changes.iter().filter_map(move |op| match op {
			Operation::Retain(n) => {
				new_pos += n;
				None
			}
			Operation::Delete(_) => None,
			Operation::Insert(ins) => {
				let span = Span::new(new_pos, new_pos + ins.char_len());
				new_pos = span.to;
				Some(span)
			}
		})
	}

	/// Composes two changesets into a single equivalent changeset.
	///
	/// The result is equivalent to applying `self` then `other`. The changesets
	/// must be compatible (`self.len_after() == other.len()`).
	pub fn compose(self, other: ChangeSet) -> ChangeSet {
		debug_assert_eq!(self.len_after, other.len);

		let mut result = ChangeSet::new();
		let mut a_iter = self.changes.into_iter();
		let mut b_iter = other.changes.into_iter();
		let mut a = a_iter.next();
		let mut b = b_iter.next();

		loop {
			match (a.take(), b.take()) {
				(None, None) => break,
				(Some(Operation::Delete(n)), rest) => {
					result.delete(n);
					a = a_iter.next();
					b = rest;
				}
				(rest, Some(Operation::Insert(ins))) => {
					result.insert(ins.into_text());
					a = rest;
					b = b_iter.next();
				}
				(Some(Operation::Retain(n)), Some(Operation::Retain(m))) => {
					let len = n.min(m);
					result.retain(len);
					a = if n > len { Some(Operation::Retain(n - len)) } else { a_iter.next() };
					b = if m > len { Some(Operation::Retain(m - len)) } else { b_iter.next() };
				}
				(Some(Operation::Retain(n)), Some(Operation::Delete(m))) => {
					let len = n.min(m);
					result.delete(len);
					a = if n > len { Some(Operation::Retain(n - len)) } else { a_iter.next() };
					b = if m > len { Some(Operation::Delete(m - len)) } else { b_iter.next() };
				}
				(Some(Operation::Insert(ins)), Some(Operation::Retain(m))) => {
					let len = ins.char_len().min(m);
					let (kept, rest) = ins.split_at(len);
					result.insert(kept.into_text());
					a = if rest.is_empty() { a_iter.next() } else { Some(Operation::Insert(rest)) };
					b = if m > len { Some(Operation::Retain(m - len)) } else { b_iter.next() };
				}
				(Some(Operation::Insert(ins)), Some(Operation::Delete(m))) => {
					let len = ins.char_len().min(m);
					let (_, rest) = ins.split_at(len);
					a = if rest.is_empty() { a_iter.next() } else { Some(Operation::Insert(rest)) };
					b = if m > len { Some(Operation::Delete(m - len)) } else { b_iter.next() };
				}
				(Some(_), None) | (None, Some(_)) => {
					debug_assert!(false, "composed changesets have mismatched lengths");
					break;
				}
			}
		}

		result
	}
}
