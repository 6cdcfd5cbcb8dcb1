//! The per-channel note container.
//!
//! A [`NoteTracker`] holds the notes of one channel ordered by start and
//! keeps them consistent under the operations the transaction controller
//! performs:
//!
//! - Notes of one type never overlap or touch; adding a note swallows every
//!   touching note of its type.
//! - Notes of different types may touch but never overlap; adding a note
//!   cuts whatever was there before.
//! - Ids are unique. Cutting a note in two keeps the id on the left piece
//!   and issues a fresh id for the right piece.


use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use noter_primitives::{Bias, ChangeSet, ChannelKey, CharIdx, Document, NoteId, NoteMeta, Span};

use crate::note::Note;
use crate::range;
use crate::shared::SharedNoteState;

/// Hook run on every note created with a freshly minted id.
///
/// The hook may adjust the note's metadata (stamp a creation time, an
/// author) before the note is stored.
pub type CreateCallback = Box<dyn FnMut(&mut Note)>;

/// Ordered, non-overlapping notes of one channel.
pub struct NoteTracker {
	notes: Vec<Note>,
	on_create: Option<CreateCallback>,
	shared: Rc<SharedNoteState>,
	reissued: Vec<NoteId>,
}

impl NoteTracker {
	/// Creates an empty tracker registered with `shared`.
	pub fn new(shared: &Rc<SharedNoteState>, on_create: Option<CreateCallback>) -> Rc<RefCell<Self>> {
		let tracker = Rc::new(RefCell::new(Self {
			notes: Vec::new(),
			on_create,
			shared: Rc::clone(shared),
			reissued: Vec::new(),
		}));
		shared.add_tracker(&tracker);
		tracker
	}

	/// Returns the shared state this tracker is registered with.
	pub fn shared(&self) -> &Rc<SharedNoteState> {
		&self.shared
	}

	/// Returns all notes ordered by start.
	pub fn notes(&self) -> &[Note] {
		&self.notes
	}

	/// Returns the number of notes.
	pub fn len(&self) -> usize {
		self.notes.len()
	}

	/// Returns true if the tracker holds no notes.
	pub fn is_empty(&self) -> bool {
		self.notes.is_empty()
	}

	/// Drops every note.
	pub fn reset(&mut self) {
		self.notes.clear();
		self.reissued.clear();
	}

	/// Mints a fresh id.
	pub fn next_id(&self) -> NoteId {
		NoteId::new()
	}

	/// Returns true if a note with `id` exists.
	pub fn has_note_id(&self, id: NoteId) -> bool {
		self.get_note(id).is_some()
	}

	/// Returns the note with `id`.
	pub fn get_note(&self, id: NoteId) -> Option<&Note> {
		self.notes.iter().find(|n| n.id == id)
	}

	pub(crate) fn get_note_mut(&mut self, id: NoteId) -> Option<&mut Note> {
		self.notes.iter_mut().find(|n| n.id == id)
	}

	/// Adds a note over `[from, to)`, merged with touching notes of its type.
	///
	/// Anything else in the merged range is cut away first. `id` is kept when
	/// it is free and not the placeholder; otherwise a fresh id is minted and
	/// the creation callback runs. Returns `None` without touching anything
	/// when `from >= to`.
	pub fn add_note(&mut self, from: CharIdx, to: CharIdx, meta: NoteMeta, id: Option<NoteId>) -> Option<Note> {
		self.insert_note(from, to, meta, id, true)
	}

	/// Like [`add_note`](Self::add_note) but never runs the creation callback.
	///
	/// Used to adopt notes that already exist in a loaded document.
	pub fn adopt_note(&mut self, from: CharIdx, to: CharIdx, meta: NoteMeta, id: Option<NoteId>) -> Option<Note> {
		self.insert_note(from, to, meta, id, false)
	}

	fn insert_note(&mut self, from: CharIdx, to: CharIdx, meta: NoteMeta, id: Option<NoteId>, notify: bool) -> Option<Note> {
		if from >= to {
			return None;
		}

		let meta = meta.ensure_type();
		let span = self.mergeable_range(from, to, Some(meta.type_or_default()));
		self.remove_range(span.from, span.to);

		let reused = id.filter(|id| !id.is_placeholder() && !self.has_note_id(*id));
		let mut note = Note::new(span.from, span.to, reused.unwrap_or_else(|| self.next_id()), meta);
		if reused.is_none()
			&& notify
			&& let Some(on_create) = self.on_create.as_mut()
		{
			on_create(&mut note);
		}

		let idx = self.notes.partition_point(|n| n.start <= note.start);
		self.notes.insert(idx, note.clone());
		tracing::trace!(id = %note.id, start = note.start, end = note.end, note_type = note.note_type(), "Added note");
		Some(note)
	}

	/// Cuts `[from, to)` out of every note.
	///
	/// Notes inside the range disappear. A note sticking out on both sides
	/// splits: the left piece keeps the id, the right piece gets a fresh id
	/// and its own copy of the metadata (see [`take_reissued`](Self::take_reissued)).
	pub fn remove_range(&mut self, from: CharIdx, to: CharIdx) {
		if from >= to {
			return;
		}

		let mut kept = Vec::with_capacity(self.notes.len() + 1);

		for note in self.notes.drain(..) {
			let [left, right] = note.ranges_around(from, to);
			match (left.is_empty(), right.is_empty()) {
				(true, true) => {
					tracing::trace!(id = %note.id, "Removed note");
				}
				(false, true) => kept.push(Note::new(left.from, left.to, note.id, note.meta)),
				(true, false) => kept.push(Note::new(right.from, right.to, note.id, note.meta)),
				(false, false) => {
					let fresh = NoteId::new();
					self.reissued.push(fresh);
					let copied = note.meta.clone();
					kept.push(Note::new(left.from, left.to, note.id, note.meta));
					kept.push(Note::new(right.from, right.to, fresh, copied));
				}
			}
		}

		self.notes = kept;
	}

	/// Drains the notes that received a fresh id by being split, as they are now.
	pub fn take_reissued(&mut self) -> Vec<Note> {
		let ids = std::mem::take(&mut self.reissued);
		ids.into_iter().filter_map(|id| self.get_note(id).cloned()).collect()
	}

	/// Remaps every note and drops those that became empty.
	pub fn map_positions(
		&mut self,
		mut start_fn: impl FnMut(CharIdx, NoteId) -> CharIdx,
		mut end_fn: impl FnMut(CharIdx, NoteId) -> CharIdx,
	) {
		self.notes = self
			.notes
			.iter()
			.map(|note| note.map_positions(&mut start_fn, &mut end_fn))
			.filter(|note| !note.is_empty())
			.collect();
		self.notes.sort_by_key(|n| n.start);
	}

	/// Remaps every note through `changes`.
	///
	/// The `active` note grows with text typed at its edges; all other notes
	/// keep such text outside.
	pub fn map_through(&mut self, changes: &ChangeSet, active: Option<NoteId>) {
		if changes.is_identity() {
			return;
		}
		self.map_positions(
			|pos, id| changes.map_pos(pos, if Some(id) == active { Bias::Left } else { Bias::Right }),
			|pos, id| changes.map_pos(pos, if Some(id) == active { Bias::Right } else { Bias::Left }),
		);
	}

	/// Returns the note at `pos`.
	///
	/// `bias` is reduced to its sign. With 0 the position must lie strictly
	/// inside a note. Otherwise the one-character step `[pos, pos + bias]`
	/// must be covered, edges included.
	pub fn note_at(&self, pos: CharIdx, bias: i32) -> Option<&Note> {
		match bias.signum() {
			0 => self.notes.iter().find(|n| n.contains_position(pos, false)),
			1 => self.note_covering_range(pos, pos + 1, true),
			_ => {
				let from = pos.checked_sub(1)?;
				self.note_covering_range(from, pos, true)
			}
		}
	}

	/// Returns the first note covering `[from, to]`.
	pub fn note_covering_range(&self, from: CharIdx, to: CharIdx, inside: bool) -> Option<&Note> {
		self.notes.iter().find(|n| n.covers_range(from, to, inside))
	}

	/// Returns the notes overlapping or touching `[from, to]`, optionally of one type.
	pub fn notes_touching_range<'a>(
		&'a self,
		from: CharIdx,
		to: CharIdx,
		note_type: Option<&'a str>,
	) -> impl Iterator<Item = &'a Note> + 'a {
		self.notes
			.iter()
			.filter(move |n| n.touches_range(from, to) && note_type.is_none_or(|t| n.note_type() == t))
	}

	/// Returns `[from, to)` grown to cover every touching note of `note_type`
	/// (of any type when `None`).
	pub fn mergeable_range(&self, from: CharIdx, to: CharIdx, note_type: Option<&str>) -> Span {
		self.notes_touching_range(from, to, note_type)
			.fold(Span::new(from, to), |acc, n| acc.union(&n.span()))
	}

	/// Returns the span inserted by `changes`, grown over touching notes.
	pub fn inserted_range(&self, changes: &ChangeSet) -> Option<Span> {
		range::inserted_range(changes).map(|span| self.mergeable_range(span.from, span.to, None))
	}

	/// Returns the span where `new` differs from `old`, grown over touching notes.
	pub fn diff_range(&self, old: &Document, new: &Document, channel: &ChannelKey) -> Option<Span> {
		range::diff_range(old, new, channel).map(|span| self.mergeable_range(span.from, span.to, None))
	}
}

impl fmt::Debug for NoteTracker {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("NoteTracker")
			.field("notes", &self.notes)
			.field("on_create", &self.on_create.is_some())
			.finish_non_exhaustive()
	}
}
