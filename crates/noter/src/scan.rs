//! Reading notes back out of document tags.

use std::collections::HashMap;

use noter_primitives::{ChannelKey, CharIdx, Document, NoteId, NoteMeta, Span, TagAttrs};

/// A note as found in a document's tags.
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedNote {
	/// Id carried by the tags.
	pub id: NoteId,
	/// Metadata of the first tag seen.
	pub meta: NoteMeta,
	/// Smallest start of all tags with this id.
	pub start: CharIdx,
	/// Largest end of all tags with this id.
	pub end: CharIdx,
}

impl ScannedNote {
	/// Returns the covered span.
	pub fn span(&self) -> Span {
		Span::new(self.start, self.end)
	}
}

/// Groups a channel's tags by id, optionally only those overlapping `within`.
///
/// Tags sharing an id form one note from the smallest start to the largest
/// end, even when other text lies between them. Notes come out in order of
/// first appearance.
pub fn notes_from_doc(doc: &Document, channel: &ChannelKey, within: Option<Span>) -> Vec<ScannedNote> {
	let mut notes: Vec<ScannedNote> = Vec::new();
	let tags = doc
		.channel_tags(channel)
		.filter(|t| within.is_none_or(|span| t.span.from < span.to && t.span.to > span.from));

	for tag in tags {
		match notes.iter_mut().find(|n| n.id == tag.attrs.id) {
			Some(note) => {
				note.start = note.start.min(tag.span.from);
				note.end = note.end.max(tag.span.to);
			}
			None => notes.push(ScannedNote {
				id: tag.attrs.id,
				meta: tag.attrs.meta.clone(),
				start: tag.span.from,
				end: tag.span.to,
			}),
		}
	}
	notes
}

/// Gives every separated run of an id its own id.
///
/// The first run keeps the id; any later run of the same id that is not
/// contiguous with the previous one gets a fresh id. Runs separated only by
/// line breaks count as contiguous.
pub fn sanitize_doc(doc: &Document, channel: &ChannelKey) -> Document {
	let mut out = doc.clone();
	// original id -> (end of its last run, id that run was given)
	let mut runs: HashMap<NoteId, (CharIdx, NoteId)> = HashMap::new();

	for tag in doc.channel_tags(channel) {
		let original = tag.attrs.id;
		let assigned = match runs.get(&original) {
			None => original,
			Some(&(end, current)) => {
				let gap = doc.text_of(Span::new(end, tag.span.from.max(end)));
				if gap.chars().all(|c| c == '\n') { current } else { NoteId::new() }
			}
		};
		if assigned != original {
			tracing::trace!(%original, %assigned, "Reassigned separated note run");
			out.add_tag(channel, tag.span, TagAttrs::new(assigned, tag.attrs.meta.clone()));
		}
		runs.insert(original, (tag.span.to, assigned));
	}
	out
}
