//! Core types for editing annotated text: ranges, selections, tagged
//! documents, transactions and history.

/// Tagged documents and clipboard slices.
pub mod document;
/// Edit origin classification.
pub mod edit;
/// Snapshot undo/redo history.
pub mod history;
/// Identifier types for annotations and channels.
pub mod ids;
/// Annotation metadata.
pub mod meta;
/// Text range types measured in characters.
pub mod range;
/// Selection types for single and multi-cursor editing.
pub mod selection;
/// Committed editor state.
pub mod state;
/// Changesets and edit transactions.
pub mod transaction;

pub use document::{Document, Slice, StoredTags, Tag, TagAttrs};
pub use edit::EditOrigin;
pub use history::History;
pub use ids::{ChannelKey, NoteId};
pub use meta::{DEFAULT_NOTE_TYPE, NoteMeta, TYPE_KEY};
pub use range::{CharIdx, CharLen, Range, Span};
pub use ropey::{Rope, RopeSlice};
pub use selection::Selection;
pub use state::EditorState;
pub use transaction::{Bias, ChangeSet, Transaction};
