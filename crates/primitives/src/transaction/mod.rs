//! Edit transactions over annotated documents.
//!
//! A [`Transaction`] is built against an [`EditorState`] and accumulates
//! text changes, tag changes, selection updates and metadata. Text changes
//! are recorded in a composed [`ChangeSet`] so positions from the old state
//! can be mapped into the new one.
//!
//! # Pending formatting
//!
//! Stored tags survive only while nothing else happens: any document step or
//! explicit selection change drops them, exactly like the state they were
//! read from. Set them last.

mod changeset;
mod types;

use std::collections::BTreeMap;

pub use changeset::ChangeSet;
use serde_json::Value;
pub use types::{Bias, Change, Insertion, Operation, Tendril};

use crate::document::{Document, Slice, StoredTags, Tag, TagAttrs};
use crate::edit::EditOrigin;
use crate::ids::ChannelKey;
use crate::range::{CharIdx, Span};
use crate::selection::Selection;
use crate::state::EditorState;

/// A pending edit of an [`EditorState`].
#[derive(Debug, Clone)]
pub struct Transaction {
	changes: ChangeSet,
	doc: Document,
	selection: Selection,
	selection_set: bool,
	tags_changed: bool,
	stored: Option<StoredTags>,
	stored_set: bool,
	origin: EditOrigin,
	meta: BTreeMap<String, Value>,
}

impl Transaction {
	/// Starts an empty transaction against `state`.
	pub fn new(state: &EditorState) -> Self {
		Self {
			changes: ChangeSet::identity(state.doc.len_chars()),
			doc: state.doc.clone(),
			selection: state.selection.clone(),
			selection_set: false,
			tags_changed: false,
			stored: state.stored.clone(),
			stored_set: false,
			origin: EditOrigin::Input,
			meta: BTreeMap::new(),
		}
	}

	/// Builds a transaction that swaps in a whole snapshot.
	///
	/// `changes` maps positions from `state` into `doc` and must describe the
	/// text difference between them. Used by history.
	pub fn restore(state: &EditorState, doc: Document, selection: Selection, changes: ChangeSet, origin: EditOrigin) -> Self {
		debug_assert_eq!(changes.len(), state.doc.len_chars());
		debug_assert_eq!(changes.len_after(), doc.len_chars());
		let tags_changed = doc.tags() != state.doc.tags();
		Self {
			changes,
			doc,
			selection,
			selection_set: true,
			tags_changed,
			stored: None,
			stored_set: false,
			origin,
			meta: BTreeMap::new(),
		}
	}

	/// Returns the composed text changes.
	pub fn changes(&self) -> &ChangeSet {
		&self.changes
	}

	/// Returns the document as it will be after this transaction.
	pub fn doc(&self) -> &Document {
		&self.doc
	}

	/// Returns the selection as it will be after this transaction.
	pub fn selection(&self) -> &Selection {
		&self.selection
	}

	/// Returns the collapsed cursor after this transaction, if any.
	pub fn cursor(&self) -> Option<CharIdx> {
		self.selection.cursor()
	}

	/// Returns where this edit came from.
	pub fn origin(&self) -> EditOrigin {
		self.origin
	}

	/// Sets the edit origin.
	pub fn set_origin(&mut self, origin: EditOrigin) -> &mut Self {
		self.origin = origin;
		self
	}

	/// Returns true if text or tags changed.
	pub fn doc_changed(&self) -> bool {
		self.tags_changed || !self.changes.is_identity()
	}

	/// Returns true if the selection was set explicitly.
	pub fn selection_set(&self) -> bool {
		self.selection_set
	}

	/// Returns true if pending formatting was set explicitly.
	pub fn stored_set(&self) -> bool {
		self.stored_set
	}

	/// Returns a metadata value.
	pub fn meta(&self, key: &str) -> Option<&Value> {
		self.meta.get(key)
	}

	/// Attaches a metadata value.
	pub fn set_meta(&mut self, key: impl Into<String>, value: Value) -> &mut Self {
		self.meta.insert(key.into(), value);
		self
	}

	/// Returns the pending formatting that will be committed.
	pub fn stored_tags(&self) -> Option<&StoredTags> {
		self.stored.as_ref()
	}

	/// Returns the pending formatting of one channel.
	pub fn stored_tag(&self, channel: &ChannelKey) -> Option<&TagAttrs> {
		self.stored.as_ref()?.get(channel)
	}

	/// Replaces the selection. Drops pending formatting.
	pub fn set_selection(&mut self, selection: Selection) -> &mut Self {
		let len = self.doc.len_chars();
		self.selection = selection;
		self.selection.clamp(len);
		self.selection_set = true;
		self.stored = None;
		self.stored_set = false;
		self
	}

	/// Replaces `[from, to)` with `text`, tagging the new text with `tags`.
	///
	/// Tag spans are relative to the start of `text`.
	pub fn replace(&mut self, from: CharIdx, to: CharIdx, text: &str, tags: &[Tag]) -> &mut Self {
		let cs = ChangeSet::replace(self.doc.len_chars(), from, to, text);
		if cs.is_identity() {
			return self;
		}

		self.doc.apply(&cs);
		let start = from.min(to);
		for tag in tags {
			let span = Span::new(start + tag.span.from, start + tag.span.to);
			self.doc.add_tag(&tag.channel, span, tag.attrs.clone());
		}
		self.selection = self.selection.map(&cs);
		self.changes = std::mem::take(&mut self.changes).compose(cs);
		self.stored = None;
		self.stored_set = false;
		self
	}

	/// Replaces the primary selection with typed text.
	///
	/// The selection is deleted first. The text then receives the pending
	/// formatting, or the tags surrounding the insertion point when there is
	/// none.
	pub fn insert_text(&mut self, text: &str) -> &mut Self {
		let range = self.selection.primary();
		let stored = self.stored.clone();
		if !range.is_empty() {
			self.delete(range.from(), range.to());
		}

		let at = range.from();
		let len = text.chars().count();
		let inherited = stored.unwrap_or_else(|| self.doc.tags_at(at));
		let tags: Vec<Tag> = inherited
			.into_iter()
			.map(|(channel, attrs)| Tag::new(channel, Span::new(0, len), attrs))
			.collect();
		self.replace(at, at, text, &tags)
	}

	/// Deletes `[from, to)`.
	pub fn delete(&mut self, from: CharIdx, to: CharIdx) -> &mut Self {
		self.replace(from, to, "", &[])
	}

	/// Deletes the primary selection.
	pub fn delete_selection(&mut self) -> &mut Self {
		let range = self.selection.primary();
		self.delete(range.from(), range.to())
	}

	/// Replaces `[from, to)` with a clipboard slice, tags included.
	pub fn replace_with_slice(&mut self, from: CharIdx, to: CharIdx, slice: &Slice) -> &mut Self {
		self.replace(from, to, &slice.text, &slice.tags)
	}

	/// Tags `span` for a channel, replacing whatever the channel had there.
	pub fn add_tag(&mut self, channel: &ChannelKey, span: Span, attrs: TagAttrs) -> &mut Self {
		self.doc.add_tag(channel, span, attrs);
		self.tag_step()
	}

	/// Removes a channel's tags from `span`.
	pub fn remove_tag(&mut self, channel: &ChannelKey, span: Span) -> &mut Self {
		self.doc.remove_tags(channel, span);
		self.tag_step()
	}

	/// Sets the pending formatting of one channel.
	pub fn add_stored_tag(&mut self, channel: &ChannelKey, attrs: TagAttrs) -> &mut Self {
		let mut stored = self.current_stored();
		stored.insert(channel.clone(), attrs);
		self.stored = Some(stored);
		self.stored_set = true;
		self
	}

	/// Clears the pending formatting of one channel.
	pub fn remove_stored_tag(&mut self, channel: &ChannelKey) -> &mut Self {
		let mut stored = self.current_stored();
		stored.remove(channel);
		self.stored = Some(stored);
		self.stored_set = true;
		self
	}

	/// Consumes the transaction into the next state's parts.
	pub(crate) fn into_parts(self) -> (Document, Selection, Option<StoredTags>) {
		(self.doc, self.selection, self.stored)
	}

	fn current_stored(&self) -> StoredTags {
		match &self.stored {
			Some(stored) => stored.clone(),
			None => self.doc.tags_at(self.selection.primary().head),
		}
	}

	fn tag_step(&mut self) -> &mut Self {
		self.tags_changed = true;
		self.stored = None;
		self.stored_set = false;
		self
	}
}
