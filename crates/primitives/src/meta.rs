use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metadata key holding the annotation type.
pub const TYPE_KEY: &str = "type";

/// Annotation type used when metadata names none.
pub const DEFAULT_NOTE_TYPE: &str = "note";

/// Open metadata attached to an annotation.
///
/// `fields` is the public key/value map (always carrying a `type` once
/// normalized). `revision` has no meaning beyond making two otherwise equal
/// metadata values compare unequal, which forces embedded tags to be
/// rewritten after an in-place update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteMeta {
	/// Public metadata fields.
	#[serde(flatten)]
	pub fields: Map<String, Value>,
	/// Bumped on every in-place update.
	#[serde(skip)]
	pub revision: u32,
}

impl NoteMeta {
	/// Creates metadata with only a type.
	pub fn of_type(note_type: &str) -> Self {
		let mut fields = Map::new();
		fields.insert(TYPE_KEY.to_string(), Value::String(note_type.to_string()));
		Self { fields, revision: 0 }
	}

	/// Wraps an existing field map.
	pub fn from_fields(fields: Map<String, Value>) -> Self {
		Self { fields, revision: 0 }
	}

	/// Returns the annotation type, if the metadata names one.
	pub fn note_type(&self) -> Option<&str> {
		self.fields.get(TYPE_KEY).and_then(Value::as_str)
	}

	/// Returns the type, falling back to [`DEFAULT_NOTE_TYPE`].
	pub fn type_or_default(&self) -> &str {
		self.note_type().unwrap_or(DEFAULT_NOTE_TYPE)
	}

	/// Fills in the default type when none is present.
	pub fn ensure_type(mut self) -> Self {
		if self.note_type().is_none() {
			self.fields.insert(TYPE_KEY.to_string(), Value::String(DEFAULT_NOTE_TYPE.to_string()));
		}
		self
	}

	/// Returns a field value.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.fields.get(key)
	}

	/// Sets a field value, returning the metadata for chaining.
	pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
		self.fields.insert(key.to_string(), value.into());
		self
	}

	/// Shallow-merges `partial` into these fields and bumps the revision.
	pub fn merge(&mut self, partial: &Map<String, Value>) {
		for (key, value) in partial {
			self.fields.insert(key.clone(), value.clone());
		}
		self.revision = self.revision.wrapping_add(1);
	}
}
