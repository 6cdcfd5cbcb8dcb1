//! Channel configuration.
//!
//! ```toml
//! [[channels]]
//! key = "noter"
//! tags = { note = "gu-note", flag = "gu-flag" }
//!
//! [[channels]]
//! key = "comments"
//! ```

use std::collections::BTreeMap;

use noter_primitives::ChannelKey;
use serde::Deserialize;

use crate::error::{NoterError, Result};

/// Configuration for a whole annotation pipeline.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoterConfig {
	/// Channels, in processing order.
	#[serde(default)]
	pub channels: Vec<ChannelConfig>,
}

impl NoterConfig {
	/// Parses and validates a TOML configuration.
	pub fn from_toml(src: &str) -> Result<Self> {
		let config: Self = toml::from_str(src)?;
		config.validate()?;
		Ok(config)
	}

	/// Checks channel keys and every channel's tag mapping.
	pub fn validate(&self) -> Result<()> {
		let mut seen = Vec::with_capacity(self.channels.len());
		for channel in &self.channels {
			if seen.contains(&&channel.key) {
				return Err(NoterError::DuplicateChannel(channel.key.clone()));
			}
			seen.push(&channel.key);
			channel.validate()?;
		}
		Ok(())
	}
}

/// Configuration of one annotation channel.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChannelConfig {
	/// Channel key; commands addressed to other keys are ignored.
	pub key: ChannelKey,
	/// Note type to rendered tag name.
	#[serde(default)]
	pub tags: BTreeMap<String, String>,
}

impl ChannelConfig {
	/// Creates a channel configuration without tag names.
	pub fn new(key: impl Into<ChannelKey>) -> Self {
		Self {
			key: key.into(),
			tags: BTreeMap::new(),
		}
	}

	/// Maps a note type to a tag name.
	pub fn with_tag(mut self, note_type: &str, tag: &str) -> Self {
		self.tags.insert(note_type.to_string(), tag.to_string());
		self
	}

	/// Returns the tag name rendering a note type.
	pub fn tag_for(&self, note_type: &str) -> Option<&str> {
		self.tags.get(note_type).map(String::as_str)
	}

	/// Fails when two types map to one tag, which would make tags ambiguous
	/// to read back.
	pub fn validate(&self) -> Result<()> {
		let mut by_tag: BTreeMap<&str, &str> = BTreeMap::new();
		for (note_type, tag) in &self.tags {
			if let Some(first) = by_tag.insert(tag, note_type) {
				return Err(NoterError::DuplicateTag {
					channel: self.key.clone(),
					tag: tag.clone(),
					first: first.to_string(),
					second: note_type.clone(),
				});
			}
		}
		Ok(())
	}
}

impl From<ChannelKey> for ChannelConfig {
	fn from(key: ChannelKey) -> Self {
		Self::new(key)
	}
}

impl From<&str> for ChannelConfig {
	fn from(key: &str) -> Self {
		Self::new(key)
	}
}
