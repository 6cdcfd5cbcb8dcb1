//! Typed annotation ranges ("notes") that follow an editable document.
//!
//! Notes live in named channels. Each channel keeps a [`NoteTracker`] in
//! step with the document's embedded tags: typing at a note's edge extends
//! it only while the cursor is inside, notes of one type merge when they
//! touch, pasted and restored content is re-adopted with unique ids, and the
//! cursor pauses once at every note edge so the user can choose which side
//! to type on. The [`Noter`] pipeline runs all channels over every edit and
//! settles cursor moves that cross notes of several channels at once.
//!
//! ```text
//! NoterSession ── dispatch ──► Noter ──► NoteChannel × N ──► NoteTransaction
//!                                 │                              │
//!                                 └──── SharedNoteState ◄── NoteTracker
//! ```

#[cfg(test)]
use tracing_subscriber as _;

/// Per-channel handle and builder.
pub mod channel;
/// Note commands and their transaction builders.
pub mod command;
/// Channel configuration.
pub mod config;
/// Error types.
pub mod error;
/// The note value type.
pub mod note;
/// Multi-channel edit pipeline.
pub mod pipeline;
/// Span arithmetic.
pub mod range;
/// Reading notes from document tags.
pub mod scan;
/// Editor session glue.
pub mod session;
/// Cross-channel cursor coordination.
pub mod shared;
/// Per-channel note container.
pub mod tracker;
/// Per-channel transaction controller.
pub mod transaction;

pub use channel::{ChannelBuilder, NoteChannel};
pub use command::{
	MetaUpdate, NoteCommand, SET_NOTES_META, TOGGLE_NOTE, collapse_all_notes, set_note_meta, set_notes_meta,
	show_all_notes, toggle_all_notes, toggle_note,
};
pub use config::{ChannelConfig, NoterConfig};
pub use error::{NoterError, Result};
pub use note::Note;
pub use pipeline::Noter;
pub use scan::{ScannedNote, notes_from_doc, sanitize_doc};
pub use session::NoterSession;
pub use shared::SharedNoteState;
pub use tracker::{CreateCallback, NoteTracker};
pub use transaction::{CursorState, NoteTransaction};
