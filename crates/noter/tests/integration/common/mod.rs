//! Common utilities for noter integration tests.

use std::collections::HashSet;

use noter::{ChannelConfig, CursorState, NoterConfig, NoterSession, toggle_note};
use noter_primitives::{ChannelKey, CharIdx, Document, NoteId, NoteMeta, Span, Tag, TagAttrs};

/// Key of the default single channel.
pub const KEY: &str = "noter";

pub fn init_tracing() {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Builds a tag for fixture documents.
pub fn tag(key: &str, from: CharIdx, to: CharIdx, id: u128, note_type: &str) -> Tag {
	tag_with(key, from, to, id, NoteMeta::of_type(note_type))
}

pub fn tag_with(key: &str, from: CharIdx, to: CharIdx, id: u128, meta: NoteMeta) -> Tag {
	Tag::new(ChannelKey::from(key), Span::new(from, to), TagAttrs::new(NoteId::from_u128(id), meta))
}

/// A session driven the way a user would drive it.
pub struct Editor {
	pub session: NoterSession,
}

impl Editor {
	/// One channel over untagged text.
	pub fn new(text: &str) -> Self {
		Self::with_channels(Document::new(text), &[KEY])
	}

	pub fn with_channels(doc: Document, keys: &[&str]) -> Self {
		init_tracing();
		let config = NoterConfig {
			channels: keys.iter().map(|k| ChannelConfig::new(*k)).collect(),
		};
		Self {
			session: NoterSession::from_config(&config, doc).expect("valid config"),
		}
	}

	pub fn text(&self) -> String {
		self.session.state().doc.text().to_string()
	}

	pub fn cursor(&self) -> Option<CharIdx> {
		self.session.state().selection.cursor()
	}

	pub fn set_cursor(&mut self, pos: CharIdx) {
		self.session.set_cursor(pos);
	}

	pub fn select(&mut self, from: CharIdx, to: CharIdx) {
		self.session.select(from, to);
	}

	pub fn right(&mut self) {
		let pos = self.cursor().expect("collapsed cursor");
		self.session.set_cursor(pos + 1);
	}

	pub fn left(&mut self) {
		let pos = self.cursor().expect("collapsed cursor");
		self.session.set_cursor(pos - 1);
	}

	pub fn type_text(&mut self, text: &str) {
		self.session.type_text(text);
	}

	pub fn backspace(&mut self, times: usize) {
		for _ in 0..times {
			self.session.delete_backward();
		}
	}

	pub fn delete(&mut self, times: usize) {
		for _ in 0..times {
			self.session.delete_forward();
		}
	}

	pub fn toggle(&mut self, key: &str, note_type: &str) {
		self.toggle_with(key, note_type, false);
	}

	pub fn toggle_with(&mut self, key: &str, note_type: &str, cursor_to_end: bool) {
		let key = ChannelKey::from(key);
		self.session
			.exec(|state| Some(toggle_note(state, &key, note_type, cursor_to_end)));
	}

	/// `(start, end, type)` of every note of a channel.
	pub fn notes(&self, key: &str) -> Vec<(CharIdx, CharIdx, String)> {
		self.channel_notes(key)
			.iter()
			.map(|n| (n.start, n.end, n.note_type().to_string()))
			.collect()
	}

	pub fn channel_notes(&self, key: &str) -> Vec<noter::Note> {
		self.session.noter().channel(key).expect("known channel").notes()
	}

	pub fn ids(&self, key: &str) -> Vec<NoteId> {
		self.channel_notes(key).iter().map(|n| n.id).collect()
	}

	pub fn cursor_state(&self, key: &str) -> CursorState {
		self.session
			.noter()
			.channel(key)
			.expect("known channel")
			.cursor_state()
			.clone()
	}

	/// Every channel's tags mirror its notes, and the notes are well formed.
	pub fn assert_consistent(&self) {
		for channel in self.session.noter().channels() {
			let notes = channel.notes();
			let tags: Vec<(Span, TagAttrs)> = self
				.session
				.state()
				.doc
				.channel_tags(channel.key())
				.map(|t| (t.span, t.attrs.clone()))
				.collect();
			let expected: Vec<(Span, TagAttrs)> = notes.iter().map(|n| (n.span(), n.attrs())).collect();
			assert_eq!(tags, expected, "channel {} out of sync", channel.key());

			let mut seen = HashSet::new();
			for pair in notes.windows(2) {
				assert!(pair[0].end <= pair[1].start, "overlapping notes: {pair:?}");
			}
			for note in &notes {
				assert!(note.start < note.end, "empty note: {note:?}");
				assert!(!note.id.is_placeholder(), "placeholder id: {note:?}");
				assert!(seen.insert(note.id), "duplicate id: {note:?}");
			}
		}
	}
}
