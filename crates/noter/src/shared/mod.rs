//! Cross-channel cursor coordination.
//!
//! Every channel owns a [`NoteTracker`] and runs its own controller, but a
//! cursor step can cross annotations of several channels at once. The
//! shared state collects what the channels observe during one edit and lets
//! the pipeline decide, once, whether the cursor must be held back.
//!
//! ```text
//!  edit ──► channel A ──► channel B ──► ... ──► reconcile ──► completed × N
//!              │              │                     │
//!              └── stall? ────┴──── stall? ────────►│ boundary test
//!                                                   ▼
//!                                      hold cursor / keep formatting
//! ```
//!
//! Counters live for exactly one edit: they reset once every registered
//! tracker has reported completion.


use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use noter_primitives::CharIdx;

use crate::note::Note;
use crate::tracker::NoteTracker;

/// Per-edit cursor state shared by all channels of a pipeline.
#[derive(Default)]
pub struct SharedNoteState {
	trackers: RefCell<Vec<Weak<RefCell<NoteTracker>>>>,
	stall_requests: Cell<usize>,
	completed: Cell<usize>,
	old_cursor: Cell<Option<CharIdx>>,
	attempted_cursor: Cell<Option<CharIdx>>,
	corrected: Cell<bool>,
}

impl SharedNoteState {
	/// Creates a shared state handle.
	pub fn new() -> Rc<Self> {
		Rc::new(Self::default())
	}

	/// Registers a tracker. Only a weak reference is kept.
	pub fn add_tracker(&self, tracker: &Rc<RefCell<NoteTracker>>) {
		self.trackers.borrow_mut().push(Rc::downgrade(tracker));
	}

	/// Returns the number of live registered trackers.
	pub fn tracker_count(&self) -> usize {
		let mut trackers = self.trackers.borrow_mut();
		trackers.retain(|t| t.strong_count() > 0);
		trackers.len()
	}

	/// Registers a request to hold the cursor for this edit.
	pub fn request_cursor_stall(&self) {
		self.stall_requests.set(self.stall_requests.get() + 1);
		tracing::debug!(requests = self.stall_requests.get(), "Cursor stall requested");
	}

	/// Returns the number of stall requests made during this edit.
	pub fn stall_requests(&self) -> usize {
		self.stall_requests.get()
	}

	/// Records the cursor position before the edit.
	pub fn set_old_cursor_position(&self, pos: CharIdx) {
		self.old_cursor.set(Some(pos));
	}

	/// Records the cursor position the edit tried to reach.
	pub fn set_attempted_cursor_position(&self, pos: CharIdx) {
		self.attempted_cursor.set(Some(pos));
	}

	/// Returns true once a channel recorded the pre-edit cursor.
	pub fn has_old_cursor_position(&self) -> bool {
		self.old_cursor.get().is_some()
	}

	/// Returns the recorded pre-edit cursor.
	pub fn old_cursor_position(&self) -> Option<CharIdx> {
		self.old_cursor.get()
	}

	/// Returns the recorded attempted cursor.
	pub fn attempted_cursor_position(&self) -> Option<CharIdx> {
		self.attempted_cursor.get()
	}

	/// Returns `attempted - old`, or 0 when either is unknown.
	pub fn last_attempted_movement(&self) -> isize {
		match (self.old_cursor.get(), self.attempted_cursor.get()) {
			(Some(old), Some(attempted)) => attempted as isize - old as isize,
			_ => 0,
		}
	}

	/// Returns the notes of every tracker at `pos` (see [`NoteTracker::note_at`]).
	pub fn notes_at(&self, pos: CharIdx, bias: i32) -> Vec<Note> {
		self.trackers
			.borrow()
			.iter()
			.filter_map(Weak::upgrade)
			.filter_map(|tracker| tracker.borrow().note_at(pos, bias).cloned())
			.collect()
	}

	/// Returns true when the cursor sits between two touching notes of
	/// different channels.
	///
	/// That is the case when more than one channel asked to stall but fewer
	/// than two channels have a note where the cursor tried to go. Two notes
	/// there means two notes start together, and holding the cursor would
	/// trap it.
	pub fn is_at_boundary_between_touching_notes(&self) -> bool {
		let Some(attempted) = self.attempted_cursor.get() else {
			return false;
		};
		let back = -(self.last_attempted_movement().signum() as i32);
		self.stall_requests.get() > 1 && self.notes_at(attempted, back).len() < 2
	}

	/// Marks the cross-channel correction as applied.
	///
	/// Returns false if it was already applied during this edit.
	pub fn begin_correction(&self) -> bool {
		!self.corrected.replace(true)
	}

	/// Reports that one channel finished the current edit.
	///
	/// Once every registered tracker has reported, all counters reset.
	pub fn transaction_completed(&self) {
		self.completed.set(self.completed.get() + 1);
		if self.completed.get() >= self.tracker_count() {
			self.reset_counters();
		}
	}

	/// Clears all per-edit state.
	pub fn reset_counters(&self) {
		self.stall_requests.set(0);
		self.completed.set(0);
		self.old_cursor.set(None);
		self.attempted_cursor.set(None);
		self.corrected.set(false);
	}
}

impl fmt::Debug for SharedNoteState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SharedNoteState")
			.field("trackers", &self.trackers.borrow().len())
			.field("stall_requests", &self.stall_requests.get())
			.field("completed", &self.completed.get())
			.field("old_cursor", &self.old_cursor.get())
			.field("attempted_cursor", &self.attempted_cursor.get())
			.field("corrected", &self.corrected.get())
			.finish()
	}
}
