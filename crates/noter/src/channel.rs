//! One annotation channel: its configuration, tracker and controller.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use noter_primitives::{ChannelKey, CharIdx, Document, NoteId};

use crate::config::ChannelConfig;
use crate::error::{NoterError, Result};
use crate::note::Note;
use crate::scan;
use crate::shared::SharedNoteState;
use crate::tracker::{CreateCallback, NoteTracker};
use crate::transaction::{CursorState, NoteTransaction};

/// Builder for a [`NoteChannel`].
pub struct ChannelBuilder {
	config: ChannelConfig,
	shared: Option<Rc<SharedNoteState>>,
	on_create: Option<CreateCallback>,
}

impl ChannelBuilder {
	/// Starts a builder for the configured channel.
	pub fn new(config: impl Into<ChannelConfig>) -> Self {
		Self {
			config: config.into(),
			shared: None,
			on_create: None,
		}
	}

	/// Registers the channel with `shared`. Required.
	pub fn shared(mut self, shared: &Rc<SharedNoteState>) -> Self {
		self.shared = Some(Rc::clone(shared));
		self
	}

	/// Runs `f` on every note created with a fresh id.
	pub fn on_create(mut self, f: impl FnMut(&mut Note) + 'static) -> Self {
		self.on_create = Some(Box::new(f));
		self
	}

	/// Builds the channel and adopts the notes already tagged in `doc`.
	///
	/// Adopted notes keep their ids and do not trigger the creation hook.
	pub fn build(self, doc: &Document) -> Result<NoteChannel> {
		let shared = self
			.shared
			.ok_or_else(|| NoterError::MissingCoordinator(self.config.key.clone()))?;
		let tracker = NoteTracker::new(&shared, self.on_create);
		let channel = NoteChannel {
			controller: NoteTransaction::new(self.config.key.clone(), Rc::clone(&tracker)),
			config: self.config,
			tracker,
		};
		channel.load(doc);
		Ok(channel)
	}
}

/// A named annotation channel over a shared document.
#[derive(Debug)]
pub struct NoteChannel {
	config: ChannelConfig,
	tracker: Rc<RefCell<NoteTracker>>,
	controller: NoteTransaction,
}

impl NoteChannel {
	/// Starts a [`ChannelBuilder`].
	pub fn builder(config: impl Into<ChannelConfig>) -> ChannelBuilder {
		ChannelBuilder::new(config)
	}

	/// Returns the channel key.
	pub fn key(&self) -> &ChannelKey {
		&self.config.key
	}

	/// Returns the channel configuration.
	pub fn config(&self) -> &ChannelConfig {
		&self.config
	}

	/// Borrows the channel's tracker.
	pub fn tracker(&self) -> Ref<'_, NoteTracker> {
		self.tracker.borrow()
	}

	/// Returns a copy of the channel's notes, ordered by start.
	pub fn notes(&self) -> Vec<Note> {
		self.tracker.borrow().notes().to_vec()
	}

	/// Returns a copy of the note with `id`.
	pub fn get_note(&self, id: NoteId) -> Option<Note> {
		self.tracker.borrow().get_note(id).cloned()
	}

	/// See [`NoteTracker::note_at`].
	pub fn note_at(&self, pos: CharIdx, bias: i32) -> Option<Note> {
		self.tracker.borrow().note_at(pos, bias).cloned()
	}

	/// Returns where the cursor stands relative to the notes.
	pub fn cursor_state(&self) -> &CursorState {
		self.controller.cursor_state()
	}

	/// Returns the note the cursor is in.
	pub fn current_note_id(&self) -> Option<NoteId> {
		self.controller.current_note_id()
	}

	/// Returns the note most recently created from typed text.
	pub fn last_created(&self) -> Option<NoteId> {
		self.controller.last_created()
	}

	/// Renders the tag name of a note type, if configured.
	pub fn tag_for(&self, note_type: &str) -> Option<&str> {
		self.config.tag_for(note_type)
	}

	pub(crate) fn controller_mut(&mut self) -> &mut NoteTransaction {
		&mut self.controller
	}

	pub(crate) fn shared(&self) -> Rc<SharedNoteState> {
		Rc::clone(self.tracker.borrow().shared())
	}

	/// Replaces the tracked notes with the ones tagged in `doc`.
	pub fn load(&self, doc: &Document) {
		let mut tracker = self.tracker.borrow_mut();
		tracker.reset();
		for note in scan::notes_from_doc(doc, self.key(), None) {
			tracker.adopt_note(note.start, note.end, note.meta, Some(note.id));
		}
		tracing::debug!(channel = %self.key(), notes = tracker.len(), "Loaded notes");
	}
}
