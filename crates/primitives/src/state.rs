use crate::document::{Document, StoredTags};
use crate::selection::Selection;
use crate::transaction::Transaction;

/// Immutable editor state: a document, a selection and pending formatting.
///
/// States are replaced wholesale by [`EditorState::apply`]; nothing mutates
/// a committed state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorState {
	/// Current document.
	pub doc: Document,
	/// Current selection.
	pub selection: Selection,
	/// Pending formatting, if any. `None` means typed text inherits the
	/// tags around the cursor.
	pub stored: Option<StoredTags>,
}

impl EditorState {
	/// Creates a state with the cursor at the start of `doc`.
	pub fn new(doc: Document) -> Self {
		Self {
			doc,
			selection: Selection::point(0),
			stored: None,
		}
	}

	/// Replaces the selection, returning the state for chaining.
	pub fn with_selection(mut self, selection: Selection) -> Self {
		let len = self.doc.len_chars();
		self.selection = selection;
		self.selection.clamp(len);
		self
	}

	/// Starts a transaction against this state.
	pub fn tr(&self) -> Transaction {
		Transaction::new(self)
	}

	/// Commits a transaction, producing the next state.
	pub fn apply(&self, tr: Transaction) -> EditorState {
		let (doc, selection, stored) = tr.into_parts();
		EditorState { doc, selection, stored }
	}
}
