//! Snapshot undo history.
//!
//! Each step stores the complete pre-edit document (tags included) and
//! selection, plus the forward and inverted changesets. Restoring a snapshot
//! brings tags back exactly; the changesets only serve position mapping for
//! whoever observes the restoring transaction.

use crate::document::Document;
use crate::edit::EditOrigin;
use crate::selection::Selection;
use crate::state::EditorState;
use crate::transaction::{ChangeSet, Transaction};

/// Maximum undo history size.
pub const MAX_UNDO: usize = 100;

/// One recorded edit.
#[derive(Debug, Clone)]
struct HistoryStep {
	/// Document on the other side of the edit.
	doc: Document,
	/// Selection on the other side of the edit.
	selection: Selection,
	/// Changes that undo the edit.
	undo: ChangeSet,
	/// Changes that redo the edit.
	redo: ChangeSet,
}

/// Snapshot-based undo/redo stacks.
#[derive(Debug, Default)]
pub struct History {
	undo_stack: Vec<HistoryStep>,
	redo_stack: Vec<HistoryStep>,
}

impl History {
	/// Creates an empty history.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns whether undo is available.
	pub fn can_undo(&self) -> bool {
		!self.undo_stack.is_empty()
	}

	/// Returns whether redo is available.
	pub fn can_redo(&self) -> bool {
		!self.redo_stack.is_empty()
	}

	/// Returns the undo stack length.
	pub fn undo_len(&self) -> usize {
		self.undo_stack.len()
	}

	/// Records a committed transaction.
	///
	/// `before` is the state the transaction was built against. Transactions
	/// that leave the document untouched are ignored. Enforces [`MAX_UNDO`]
	/// by dropping the oldest entry.
	pub fn record(&mut self, before: &EditorState, tr: &Transaction) {
		if !tr.doc_changed() {
			return;
		}

		self.undo_stack.push(HistoryStep {
			doc: before.doc.clone(),
			selection: before.selection.clone(),
			undo: tr.changes().invert(before.doc.text()),
			redo: tr.changes().clone(),
		});
		self.redo_stack.clear();

		if self.undo_stack.len() > MAX_UNDO {
			self.undo_stack.remove(0);
		}
		tracing::trace!(depth = self.undo_stack.len(), "Recorded history step");
	}

	/// Builds the transaction undoing the last recorded edit.
	///
	/// The current state moves to the redo stack. Returns `None` if there is
	/// nothing to undo.
	pub fn undo(&mut self, current: &EditorState) -> Option<Transaction> {
		let step = self.undo_stack.pop()?;
		let tr = Transaction::restore(current, step.doc, step.selection, step.undo.clone(), EditOrigin::Undo);

		self.redo_stack.push(HistoryStep {
			doc: current.doc.clone(),
			selection: current.selection.clone(),
			undo: step.undo,
			redo: step.redo,
		});
		Some(tr)
	}

	/// Builds the transaction redoing the last undone edit.
	pub fn redo(&mut self, current: &EditorState) -> Option<Transaction> {
		let step = self.redo_stack.pop()?;
		let tr = Transaction::restore(current, step.doc, step.selection, step.redo.clone(), EditOrigin::Redo);

		self.undo_stack.push(HistoryStep {
			doc: current.doc.clone(),
			selection: current.selection.clone(),
			undo: step.undo,
			redo: step.redo,
		});
		Some(tr)
	}
}
