//! A minimal editor session: state, pipeline and history wired together.

use noter_primitives::{
	CharIdx, Document, EditOrigin, EditorState, History, Selection, Slice, Span, Transaction,
};

use crate::config::NoterConfig;
use crate::error::Result;
use crate::pipeline::Noter;

/// Owns the editor state and runs every edit through the [`Noter`].
#[derive(Debug)]
pub struct NoterSession {
	state: EditorState,
	noter: Noter,
	history: History,
}

impl NoterSession {
	/// Wraps an existing pipeline. The channels must already know `state.doc`.
	pub fn new(noter: Noter, state: EditorState) -> Self {
		Self {
			state,
			noter,
			history: History::new(),
		}
	}

	/// Creates a session over `doc` with the configured channels.
	pub fn from_config(config: &NoterConfig, doc: Document) -> Result<Self> {
		let noter = Noter::from_config(config, &doc)?;
		Ok(Self::new(noter, EditorState::new(doc)))
	}

	/// Returns the committed editor state.
	pub fn state(&self) -> &EditorState {
		&self.state
	}

	/// Returns the annotation pipeline.
	pub fn noter(&self) -> &Noter {
		&self.noter
	}

	/// Returns the annotation pipeline for adding channels.
	pub fn noter_mut(&mut self) -> &mut Noter {
		&mut self.noter
	}

	/// Returns the undo history.
	pub fn history(&self) -> &History {
		&self.history
	}

	/// Starts a transaction against the current state.
	pub fn tr(&self) -> Transaction {
		self.state.tr()
	}

	/// Filters and commits `tr`, recording it in history unless it is itself
	/// an undo or redo.
	pub fn dispatch(&mut self, mut tr: Transaction) {
		self.noter.filter_transaction(&mut tr, &self.state);
		if !matches!(tr.origin(), EditOrigin::Undo | EditOrigin::Redo) {
			self.history.record(&self.state, &tr);
		}
		tracing::trace!(origin = ?tr.origin(), changed = tr.doc_changed(), "Dispatching transaction");
		self.state = self.state.apply(tr);
	}

	/// Builds a transaction from the current state and dispatches it.
	///
	/// Returns false when `command` declines to produce one.
	pub fn exec(&mut self, command: impl FnOnce(&EditorState) -> Option<Transaction>) -> bool {
		match command(&self.state) {
			Some(tr) => {
				self.dispatch(tr);
				true
			}
			None => false,
		}
	}

	/// Undoes the last recorded edit. Returns false when there is none.
	pub fn undo(&mut self) -> bool {
		match self.history.undo(&self.state) {
			Some(tr) => {
				self.dispatch(tr);
				true
			}
			None => false,
		}
	}

	/// Redoes the last undone edit. Returns false when there is none.
	pub fn redo(&mut self) -> bool {
		match self.history.redo(&self.state) {
			Some(tr) => {
				self.dispatch(tr);
				true
			}
			None => false,
		}
	}

	/// Moves the cursor to `pos`.
	pub fn set_cursor(&mut self, pos: CharIdx) {
		self.select(pos, pos);
	}

	/// Selects from `anchor` to `head`.
	pub fn select(&mut self, anchor: CharIdx, head: CharIdx) {
		let mut tr = self.tr();
		tr.set_selection(Selection::single(anchor, head));
		self.dispatch(tr);
	}

	/// Types `text`, one transaction per character.
	pub fn type_text(&mut self, text: &str) {
		for ch in text.chars() {
			let mut tr = self.tr();
			tr.insert_text(ch.encode_utf8(&mut [0; 4]));
			self.dispatch(tr);
		}
	}

	/// Deletes the selection, or the character before the cursor.
	pub fn delete_backward(&mut self) {
		let range = self.state.selection.primary();
		let span = if range.is_empty() {
			Span::new(range.head.saturating_sub(1), range.head)
		} else {
			range.span()
		};
		self.delete_span(span);
	}

	/// Deletes the selection, or the character after the cursor.
	pub fn delete_forward(&mut self) {
		let range = self.state.selection.primary();
		let span = if range.is_empty() {
			Span::new(range.head, (range.head + 1).min(self.state.doc.len_chars()))
		} else {
			range.span()
		};
		self.delete_span(span);
	}

	fn delete_span(&mut self, span: Span) {
		if span.is_empty() {
			return;
		}
		let mut tr = self.tr();
		tr.delete(span.from, span.to);
		self.dispatch(tr);
	}

	/// Copies the selection with its tags.
	pub fn copy(&self) -> Slice {
		self.state.doc.slice(self.state.selection.primary().span())
	}

	/// Copies and deletes the selection.
	pub fn cut(&mut self) -> Slice {
		let slice = self.copy();
		let mut tr = self.tr();
		tr.delete_selection();
		self.dispatch(tr);
		slice
	}

	/// Replaces the selection with `slice`, tags included.
	pub fn paste(&mut self, slice: &Slice) {
		let range = self.state.selection.primary();
		let mut tr = self.tr();
		tr.replace_with_slice(range.from(), range.to(), slice)
			.set_origin(EditOrigin::Paste);
		self.dispatch(tr);
	}
}
