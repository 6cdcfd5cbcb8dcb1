//! Per-channel transaction controller.
//!
//! A [`NoteTransaction`] looks at every edit before it is committed, keeps
//! its channel's [`NoteTracker`] in step with the document, and rewrites the
//! edit where needed: it tags new and changed notes, holds the cursor at note
//! edges, and sets the pending formatting so typed text joins the note the
//! cursor is in.


use std::cell::RefCell;
use std::rc::Rc;

use noter_primitives::{
	ChannelKey, CharIdx, EditOrigin, EditorState, NoteId, NoteMeta, Selection, Span, TagAttrs, Transaction,
};
use serde_json::{Map, Value};

use crate::command::NoteCommand;
use crate::note::Note;
use crate::shared::SharedNoteState;
use crate::tracker::NoteTracker;
use crate::{range, scan};

/// Where the cursor stands relative to the channel's notes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CursorState {
	/// Typed text stays unannotated.
	#[default]
	Outside,
	/// Typed text extends the note.
	Inside(NoteId),
	/// A note of this type is created from the next typed text.
	Pending(String),
}

/// A note to (re)create while rebuilding a range.
#[derive(Debug, Clone)]
struct Fragment {
	span: Span,
	meta: NoteMeta,
	id: Option<NoteId>,
}

impl Fragment {
	fn new(span: Span, meta: NoteMeta, id: Option<NoteId>) -> Self {
		Self { span, meta, id }
	}
}

/// Keeps one channel's notes and its document tags in agreement.
#[derive(Debug)]
pub struct NoteTransaction {
	key: ChannelKey,
	tracker: Rc<RefCell<NoteTracker>>,
	shared: Rc<SharedNoteState>,
	state: CursorState,
	last_created: Option<NoteId>,
}

impl NoteTransaction {
	/// Creates a controller for the channel `key`.
	pub fn new(key: ChannelKey, tracker: Rc<RefCell<NoteTracker>>) -> Self {
		let shared = Rc::clone(tracker.borrow().shared());
		Self {
			key,
			tracker,
			shared,
			state: CursorState::Outside,
			last_created: None,
		}
	}

	/// Returns the channel key.
	pub fn key(&self) -> &ChannelKey {
		&self.key
	}

	/// Returns the tracker this controller edits.
	pub fn tracker(&self) -> &Rc<RefCell<NoteTracker>> {
		&self.tracker
	}

	/// Returns where the cursor stands relative to the notes.
	pub fn cursor_state(&self) -> &CursorState {
		&self.state
	}

	/// Returns the note the cursor is in.
	pub fn current_note_id(&self) -> Option<NoteId> {
		match self.state {
			CursorState::Inside(id) => Some(id),
			_ => None,
		}
	}

	/// Returns the note most recently created from typed text.
	pub fn last_created(&self) -> Option<NoteId> {
		self.last_created
	}

	/// Forgets the current note and any pending type.
	pub fn clear_current_note(&mut self) {
		self.state = CursorState::Outside;
	}

	/// Runs the channel's part of an edit of `old` by `tr`.
	///
	/// Formatting is left for [`apply_pending_formatting`](Self::apply_pending_formatting),
	/// which must run after every other step of the edit.
	pub fn filter_transaction(&mut self, tr: &mut Transaction, old: &EditorState) {
		self.init(tr, old);

		match NoteCommand::read(tr, &self.key) {
			Some(NoteCommand::SetNotesMeta(cmd)) => {
				for spec in cmd.specs {
					self.update_meta(tr, spec.id, &spec.meta);
				}
			}
			Some(NoteCommand::ToggleNote(cmd)) => self.toggle(tr, &cmd.note_type, cmd.cursor_to_end),
			None if tr.origin().restores_content() => self.restore(tr, old),
			None => self.handle_input(tr, old),
		}
	}

	/// Sets the pending formatting matching the cursor state.
	pub fn apply_pending_formatting(&mut self, tr: &mut Transaction) {
		let Some(pos) = tr.cursor() else {
			return;
		};

		self.revalidate(pos);
		let wanted = match &self.state {
			CursorState::Inside(id) => self.tracker.borrow().get_note(*id).map(Note::attrs),
			CursorState::Pending(note_type) => Some(TagAttrs::new(NoteId::PLACEHOLDER, NoteMeta::of_type(note_type))),
			CursorState::Outside => None,
		};

		match wanted {
			Some(attrs) => {
				if tr.stored_tag(&self.key) != Some(&attrs) {
					tr.add_stored_tag(&self.key, attrs);
				}
			}
			None => {
				let inherited = match tr.stored_tags() {
					Some(stored) => stored.contains_key(&self.key),
					None => tr.doc().tag_at(&self.key, pos).is_some(),
				};
				if inherited {
					tr.remove_stored_tag(&self.key);
				}
			}
		}
	}

	fn init(&mut self, tr: &mut Transaction, old: &EditorState) {
		let active = self.current_note_id();
		self.tracker.borrow_mut().map_through(tr.changes(), active);
		if let Some(id) = active
			&& !self.tracker.borrow().has_note_id(id)
		{
			tracing::trace!(channel = %self.key, %id, "Current note vanished");
			self.state = CursorState::Outside;
		}

		let Some(new_pos) = tr.cursor() else {
			// A range selection is never inside a note.
			self.state = CursorState::Outside;
			return;
		};
		if tr.doc_changed() {
			return;
		}
		let Some(old_pos) = old.selection.cursor() else {
			// A selection collapsed somewhere: treat it as a jump.
			self.state = self.note_state_at(new_pos).unwrap_or_default();
			return;
		};

		if !self.shared.has_old_cursor_position() {
			self.shared.set_old_cursor_position(old_pos);
			self.shared.set_attempted_cursor_position(new_pos);
		}
		let old_pos = self.shared.old_cursor_position().unwrap_or(old_pos);
		let new_pos = self.shared.attempted_cursor_position().unwrap_or(new_pos);
		self.state = self.classify(tr, old_pos, new_pos);
	}

	/// Makes the state agree with the cursor at `pos`: strictly inside a note
	/// means inside that note, and the current note must still contain the
	/// cursor.
	fn revalidate(&mut self, pos: CharIdx) {
		let state = match (self.note_state_at(pos), &self.state) {
			(Some(inner), current) if &inner != current => inner,
			(None, CursorState::Inside(id))
				if !self
					.tracker
					.borrow()
					.get_note(*id)
					.is_some_and(|n| n.contains_position(pos, true)) =>
			{
				CursorState::Outside
			}
			_ => return,
		};
		tracing::trace!(channel = %self.key, ?state, pos, "Cursor state corrected");
		self.state = state;
	}

	fn note_state_at(&self, pos: CharIdx) -> Option<CursorState> {
		self.tracker.borrow().note_at(pos, 0).map(|n| CursorState::Inside(n.id))
	}

	/// Works out the cursor state after the cursor moved from `old_pos` to
	/// `new_pos` without any change to the document.
	fn classify(&self, tr: &mut Transaction, old_pos: CharIdx, new_pos: CharIdx) -> CursorState {
		let movement = new_pos as isize - old_pos as isize;

		if movement == 0 {
			return match &self.state {
				CursorState::Outside => self.note_state_at(new_pos).unwrap_or_default(),
				kept => kept.clone(),
			};
		}
		if movement.abs() != 1 {
			return self.note_state_at(new_pos).unwrap_or_default();
		}

		let tracker = self.tracker.borrow();
		let probe = tracker.note_at(old_pos, movement.signum() as i32).map(|n| n.id);

		match self.state {
			CursorState::Inside(id) if tracker.note_at(old_pos, 0).is_none() && probe != Some(id) => {
				tracing::debug!(channel = %self.key, %id, pos = old_pos, "Leaving note");
				self.stall(tr, old_pos);
				return CursorState::Outside;
			}
			CursorState::Outside | CursorState::Pending(_) => {
				if let Some(id) = probe {
					tracing::debug!(channel = %self.key, %id, pos = old_pos, "Entering note");
					self.stall(tr, old_pos);
					return CursorState::Inside(id);
				}
			}
			CursorState::Inside(_) => {}
		}

		if let Some(note) = tracker.note_at(new_pos, 0) {
			return CursorState::Inside(note.id);
		}
		match self.state {
			CursorState::Inside(id) if tracker.get_note(id).is_some_and(|n| n.contains_position(new_pos, true)) => {
				CursorState::Inside(id)
			}
			_ => CursorState::Outside,
		}
	}

	fn stall(&self, tr: &mut Transaction, pos: CharIdx) {
		self.shared.request_cursor_stall();
		tr.set_selection(Selection::point(pos));
	}

	fn toggle(&mut self, tr: &mut Transaction, note_type: &str, cursor_to_end: bool) {
		let range = tr.selection().primary();

		if range.is_empty() {
			match self.state.clone() {
				CursorState::Inside(id) => {
					let span = self.tracker.borrow().get_note(id).map(Note::span);
					if let Some(span) = span {
						self.remove_ranges(tr, &[span]);
					}
					self.state = CursorState::Outside;
				}
				CursorState::Pending(_) => self.state = CursorState::Outside,
				CursorState::Outside => self.state = CursorState::Pending(note_type.to_string()),
			}
			tracing::debug!(channel = %self.key, state = ?self.state, "Toggled note at cursor");
			return;
		}

		let (from, to) = (range.from(), range.to());
		let covering = self.tracker.borrow().note_covering_range(from, to, true).cloned();
		let Some(note) = covering else {
			let fragment = Fragment::new(Span::new(from, to), NoteMeta::of_type(note_type), None);
			self.add_notes(tr, vec![fragment], cursor_to_end);
			return;
		};

		// The first remaining piece of the old note keeps its id.
		let left = Span::new(note.start, from);
		let right = Span::new(to, note.end);
		let mut fragments = vec![Fragment::new(left, note.meta.clone(), (!left.is_empty()).then_some(note.id))];
		if note.note_type() != note_type {
			fragments.push(Fragment::new(Span::new(from, to), NoteMeta::of_type(note_type), None));
		}
		fragments.push(Fragment::new(right, note.meta.clone(), left.is_empty().then_some(note.id)));
		self.rebuild(tr, note.span(), fragments, cursor_to_end);
	}

	fn update_meta(&mut self, tr: &mut Transaction, id: NoteId, partial: &Map<String, Value>) {
		let note = {
			let mut tracker = self.tracker.borrow_mut();
			let Some(note) = tracker.get_note_mut(id) else {
				tracing::trace!(channel = %self.key, %id, "No note to update");
				return;
			};
			note.update_meta(partial);
			note.clone()
		};
		let span = note.span();
		let fragment = Fragment::new(span, note.meta, Some(note.id));
		self.rebuild(tr, span, vec![fragment], false);
	}

	/// Re-adopts notes from content that was pasted or restored from history.
	fn restore(&mut self, tr: &mut Transaction, old: &EditorState) {
		let span = {
			let tracker = self.tracker.borrow();
			match tr.origin() {
				EditOrigin::Paste => tracker.inserted_range(tr.changes()),
				_ => {
					// A snapshot may differ in tags where the text did not change,
					// and in text where the tags did not.
					let diff = tracker.diff_range(&old.doc, tr.doc(), &self.key);
					let changed =
						range::changed_range(tr.changes()).map(|s| tracker.mergeable_range(s.from, s.to, None));
					match (diff, changed) {
						(Some(a), Some(b)) => Some(a.union(&b)),
						(a, b) => a.or(b),
					}
				}
			}
		};
		let Some(span) = span else {
			return;
		};

		let fragments: Vec<Fragment> = scan::notes_from_doc(tr.doc(), &self.key, Some(span))
			.into_iter()
			.map(|n| Fragment::new(n.span(), n.meta, Some(n.id)))
			.collect();
		tracing::debug!(channel = %self.key, from = span.from, to = span.to, found = fragments.len(), origin = ?tr.origin(), "Rebuilding notes");
		self.rebuild(tr, span, fragments, false);
	}

	/// Turns text typed while a type is pending into a note.
	fn handle_input(&mut self, tr: &mut Transaction, old: &EditorState) {
		let CursorState::Pending(note_type) = &self.state else {
			return;
		};
		let Some(pos) = tr.cursor() else {
			return;
		};
		if self.tracker.borrow().note_at(pos, 0).is_some() {
			return;
		}
		let added = tr.doc().len_chars() as isize - old.doc.len_chars() as isize;
		if added <= 0 || added as usize > pos {
			return;
		}

		let fragment = Fragment::new(Span::new(pos - added as usize, pos), NoteMeta::of_type(note_type), None);
		if let Some(note) = self.add_notes(tr, vec![fragment], false).pop() {
			tracing::debug!(channel = %self.key, id = %note.id, "Created note from typed text");
			self.state = CursorState::Inside(note.id);
			self.last_created = Some(note.id);
		}
	}

	fn rebuild(&mut self, tr: &mut Transaction, span: Span, fragments: Vec<Fragment>, cursor_to_end: bool) {
		self.remove_ranges(tr, &[span]);
		self.add_notes(tr, fragments, cursor_to_end);
	}

	fn add_notes(&mut self, tr: &mut Transaction, fragments: Vec<Fragment>, cursor_to_end: bool) -> Vec<Note> {
		let last_end = fragments.last().map(|f| f.span.to);
		let mut added = Vec::with_capacity(fragments.len());

		for fragment in fragments {
			let note =
				self.tracker
					.borrow_mut()
					.add_note(fragment.span.from, fragment.span.to, fragment.meta, fragment.id);
			if let Some(note) = note {
				tr.add_tag(&self.key, note.span(), note.attrs());
				added.push(note);
			}
			self.sync_reissued(tr);
		}

		if cursor_to_end && let Some(end) = last_end {
			let note_end = self
				.tracker
				.borrow()
				.notes()
				.iter()
				.find(|n| n.contains_position(end, true))
				.map(|n| n.end);
			if let Some(note_end) = note_end {
				tr.set_selection(Selection::point(note_end));
			}
		}
		added
	}

	fn remove_ranges(&mut self, tr: &mut Transaction, spans: &[Span]) {
		for span in spans {
			self.tracker.borrow_mut().remove_range(span.from, span.to);
			tr.remove_tag(&self.key, *span);
			self.sync_reissued(tr);
		}
	}

	/// Writes the fresh ids of split notes back into the document.
	fn sync_reissued(&mut self, tr: &mut Transaction) {
		let reissued = self.tracker.borrow_mut().take_reissued();
		for note in reissued {
			tr.add_tag(&self.key, note.span(), note.attrs());
		}
	}
}
