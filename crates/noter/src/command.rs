//! Note commands carried in transaction metadata.
//!
//! Commands are addressed to one channel by key; every other channel ignores
//! them. The helpers below build ready-to-dispatch transactions.

use noter_primitives::{ChannelKey, EditOrigin, EditorState, NoteId, Transaction};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::scan::{self, ScannedNote};

/// Metadata key of the toggle command.
pub const TOGGLE_NOTE: &str = "toggle-note";
/// Metadata key of the metadata update command.
pub const SET_NOTES_META: &str = "set-notes-meta";
/// Metadata field used to collapse notes.
pub const HIDDEN_KEY: &str = "hidden";

/// Payload of [`TOGGLE_NOTE`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleNote {
	pub key: ChannelKey,
	#[serde(rename = "type")]
	pub note_type: String,
	#[serde(default)]
	pub cursor_to_end: bool,
}

/// One entry of [`SetNotesMeta`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaUpdate {
	pub id: NoteId,
	pub meta: Map<String, Value>,
}

impl MetaUpdate {
	pub fn new(id: NoteId, meta: Map<String, Value>) -> Self {
		Self { id, meta }
	}
}

/// Payload of [`SET_NOTES_META`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetNotesMeta {
	pub key: ChannelKey,
	pub specs: Vec<MetaUpdate>,
}

/// A command addressed to one channel.
#[derive(Debug, Clone, PartialEq)]
pub enum NoteCommand {
	SetNotesMeta(SetNotesMeta),
	ToggleNote(ToggleNote),
}

impl NoteCommand {
	/// Reads the command addressed to `key` from `tr`, if any.
	///
	/// Metadata updates take precedence over toggles. Payloads that fail to
	/// parse are logged and ignored.
	pub fn read(tr: &Transaction, key: &ChannelKey) -> Option<Self> {
		if let Some(cmd) = parse::<SetNotesMeta>(tr, SET_NOTES_META)
			&& &cmd.key == key
		{
			return Some(Self::SetNotesMeta(cmd));
		}
		if let Some(cmd) = parse::<ToggleNote>(tr, TOGGLE_NOTE)
			&& &cmd.key == key
		{
			return Some(Self::ToggleNote(cmd));
		}
		None
	}
}

fn parse<T: serde::de::DeserializeOwned>(tr: &Transaction, name: &str) -> Option<T> {
	let value = tr.meta(name)?;
	match serde_json::from_value(value.clone()) {
		Ok(cmd) => Some(cmd),
		Err(error) => {
			tracing::warn!(command = name, %error, "Ignoring malformed note command");
			None
		}
	}
}

fn command_tr(state: &EditorState, name: &str, payload: Value) -> Transaction {
	let mut tr = state.tr();
	tr.set_origin(EditOrigin::Command).set_meta(name, payload);
	tr
}

/// Toggles a note of `note_type` over the selection, or the pending state at
/// a cursor.
pub fn toggle_note(state: &EditorState, key: &ChannelKey, note_type: &str, cursor_to_end: bool) -> Transaction {
	command_tr(
		state,
		TOGGLE_NOTE,
		json!({ "key": key, "type": note_type, "cursorToEnd": cursor_to_end }),
	)
}

/// Merges `meta` into the note `id`.
pub fn set_note_meta(state: &EditorState, key: &ChannelKey, id: NoteId, meta: Map<String, Value>) -> Transaction {
	set_notes_meta(state, key, vec![MetaUpdate::new(id, meta)])
}

/// Merges metadata into several notes at once.
pub fn set_notes_meta(state: &EditorState, key: &ChannelKey, specs: Vec<MetaUpdate>) -> Transaction {
	command_tr(state, SET_NOTES_META, json!({ "key": key, "specs": specs }))
}

fn is_hidden(note: &ScannedNote) -> bool {
	note.meta.get(HIDDEN_KEY).and_then(Value::as_bool).unwrap_or(false)
}

fn set_hidden(state: &EditorState, key: &ChannelKey, notes: &[ScannedNote], hidden: bool) -> Transaction {
	let specs = notes
		.iter()
		.map(|note| {
			let mut meta = Map::new();
			meta.insert(HIDDEN_KEY.to_string(), Value::Bool(hidden));
			MetaUpdate::new(note.id, meta)
		})
		.collect();
	set_notes_meta(state, key, specs)
}

/// Hides every note of the channel.
///
/// Returns `None` when there is nothing to hide.
pub fn collapse_all_notes(state: &EditorState, key: &ChannelKey) -> Option<Transaction> {
	let notes = scan::notes_from_doc(&state.doc, key, None);
	if notes.iter().all(is_hidden) {
		return None;
	}
	Some(set_hidden(state, key, &notes, true))
}

/// Shows every note of the channel, but only when all of them are hidden.
pub fn show_all_notes(state: &EditorState, key: &ChannelKey) -> Option<Transaction> {
	let notes = scan::notes_from_doc(&state.doc, key, None);
	if notes.is_empty() || !notes.iter().all(is_hidden) {
		return None;
	}
	Some(set_hidden(state, key, &notes, false))
}

/// Collapses all notes, or shows them if they are all collapsed already.
pub fn toggle_all_notes(state: &EditorState, key: &ChannelKey) -> Option<Transaction> {
	collapse_all_notes(state, key).or_else(|| show_all_notes(state, key))
}
