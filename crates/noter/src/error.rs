use noter_primitives::ChannelKey;

/// Errors raised while assembling channels.
///
/// Everything that can go wrong while editing is expressed as a return value
/// (`None`, unchanged state); only construction can fail.
#[derive(Debug, thiserror::Error)]
pub enum NoterError {
	/// A channel was built without the shared state it must register with.
	#[error("channel '{0}' was built without shared note state")]
	MissingCoordinator(ChannelKey),

	/// A channel registered with a different shared state than its pipeline.
	#[error("channel '{0}' belongs to another shared note state")]
	ForeignCoordinator(ChannelKey),

	/// Two channels use the same key.
	#[error("duplicate channel key: {0}")]
	DuplicateChannel(ChannelKey),

	/// Two note types of one channel render to the same tag.
	#[error("channel '{channel}': note types '{first}' and '{second}' both map to tag '{tag}'")]
	DuplicateTag {
		/// Channel declaring the mapping.
		channel: ChannelKey,
		/// The shared tag name.
		tag: String,
		/// First type using the tag.
		first: String,
		/// Second type using the tag.
		second: String,
	},

	/// The configuration text could not be parsed.
	#[error("invalid configuration: {0}")]
	Parse(#[from] toml::de::Error),
}

/// Result alias for channel construction.
pub type Result<T> = std::result::Result<T, NoterError>;
