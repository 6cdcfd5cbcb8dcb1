//! A single annotation span.


use noter_primitives::{CharIdx, NoteId, NoteMeta, Span, TagAttrs};
use serde_json::{Map, Value};

/// One annotation: a half-open span `[start, end)` with an id and metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
	/// Inclusive start.
	pub start: CharIdx,
	/// Exclusive end.
	pub end: CharIdx,
	/// Unique id within its channel.
	pub id: NoteId,
	/// Metadata; carries a `type` once normalized.
	pub meta: NoteMeta,
}

impl Note {
	/// Creates a note.
	pub fn new(start: CharIdx, end: CharIdx, id: NoteId, meta: NoteMeta) -> Self {
		Self { start, end, id, meta }
	}

	/// Returns the note's type, defaulting to `"note"`.
	pub fn note_type(&self) -> &str {
		self.meta.type_or_default()
	}

	/// Returns the covered span.
	pub fn span(&self) -> Span {
		Span::new(self.start, self.end)
	}

	/// Returns the attributes tags of this note carry.
	pub fn attrs(&self) -> TagAttrs {
		TagAttrs::new(self.id, self.meta.clone())
	}

	/// Returns a copy with both edges remapped.
	///
	/// Both functions receive the old position and the note id, so callers can
	/// map one note differently from the rest.
	pub fn map_positions(
		&self,
		mut start_fn: impl FnMut(CharIdx, NoteId) -> CharIdx,
		mut end_fn: impl FnMut(CharIdx, NoteId) -> CharIdx,
	) -> Note {
		Note {
			start: start_fn(self.start, self.id),
			end: end_fn(self.end, self.id),
			id: self.id,
			meta: self.meta.clone(),
		}
	}

	/// Shallow-merges `partial` into the metadata.
	pub fn update_meta(&mut self, partial: &Map<String, Value>) {
		self.meta.merge(partial);
	}

	/// Returns the parts of this note left and right of `[from, to)`.
	///
	/// Both parts are clamped to the note and may be empty.
	pub fn ranges_around(&self, from: CharIdx, to: CharIdx) -> [Span; 2] {
		[
			Span::new(self.start, from.clamp(self.start, self.end)),
			Span::new(to.clamp(self.start, self.end), self.end),
		]
	}

	/// Returns true if `pos` lies in the note.
	///
	/// With `inside` the edges count; without it only interior positions do.
	pub fn contains_position(&self, pos: CharIdx, inside: bool) -> bool {
		self.covers_range(pos, pos, inside)
	}

	/// Returns true if `[from, to]` lies in the note.
	///
	/// With `inside` the edges count; without it the range must be strictly
	/// interior.
	pub fn covers_range(&self, from: CharIdx, to: CharIdx, inside: bool) -> bool {
		if inside {
			self.start <= from && self.end >= to
		} else {
			self.start < from && self.end > to
		}
	}

	/// Returns true if the note overlaps or touches `[from, to]`.
	pub fn touches_range(&self, from: CharIdx, to: CharIdx) -> bool {
		self.start <= to && self.end >= from
	}

	/// Returns true if the note covers no characters.
	pub fn is_empty(&self) -> bool {
		self.start >= self.end
	}
}
