use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of one annotation.
///
/// Ids are random (v4) and unique within a channel. The nil id is reserved
/// as [`NoteId::PLACEHOLDER`], carried by pending formatting before the
/// annotation it announces exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(Uuid);

impl NoteId {
	/// Reserved id for a not-yet-created annotation.
	pub const PLACEHOLDER: NoteId = NoteId(Uuid::nil());

	/// Mints a fresh random id.
	pub fn new() -> Self {
		Self(Uuid::new_v4())
	}

	/// Builds a deterministic id, mostly useful for fixtures.
	pub const fn from_u128(v: u128) -> Self {
		Self(Uuid::from_u128(v))
	}

	/// Returns true for the reserved placeholder id.
	pub fn is_placeholder(&self) -> bool {
		self.0.is_nil()
	}
}

impl Default for NoteId {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Display for NoteId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.0.fmt(f)
	}
}

/// Name of an independent annotation channel sharing a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelKey(String);

impl ChannelKey {
	/// Creates a channel key.
	pub fn new(key: impl Into<String>) -> Self {
		Self(key.into())
	}

	/// Returns the key as a string slice.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl From<&str> for ChannelKey {
	fn from(key: &str) -> Self {
		Self::new(key)
	}
}

impl fmt::Display for ChannelKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}
