//! Text with embedded annotation tags.
//!
//! A [`Document`] is a rope plus a flat list of [`Tag`]s. Each tag marks a
//! half-open span of characters as belonging to one annotation of one
//! channel. Tags are the persistent form of annotations: they travel with
//! the text through edits, clipboard slices and history snapshots.
//!
//! # Tag invariants
//!
//! - Spans are non-empty and inside the text.
//! - Within a channel, tags never overlap.
//! - Touching tags of one channel with equal attributes are coalesced.
//!
//! Tags are non-inclusive: text inserted exactly at either edge of a tag is
//! not covered by it unless the inserting edit tags it explicitly.


use std::collections::BTreeMap;

use crate::ids::{ChannelKey, NoteId};
use crate::meta::NoteMeta;
use crate::range::{CharIdx, Span};
use crate::transaction::{Bias, ChangeSet};
use crate::Rope;

/// Attributes carried by a tag: the annotation it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct TagAttrs {
	/// Annotation id.
	pub id: NoteId,
	/// Annotation metadata at the time the tag was written.
	pub meta: NoteMeta,
}

impl TagAttrs {
	/// Creates tag attributes.
	pub fn new(id: NoteId, meta: NoteMeta) -> Self {
		Self { id, meta }
	}
}

/// Pending formatting: the tags that the next typed text receives, per channel.
pub type StoredTags = BTreeMap<ChannelKey, TagAttrs>;

/// A tagged span of a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
	/// Channel the tag belongs to.
	pub channel: ChannelKey,
	/// Covered characters.
	pub span: Span,
	/// Annotation attributes.
	pub attrs: TagAttrs,
}

impl Tag {
	/// Creates a tag.
	pub fn new(channel: ChannelKey, span: Span, attrs: TagAttrs) -> Self {
		Self { channel, span, attrs }
	}
}

/// A piece of a document lifted out for the clipboard.
///
/// Tag spans are relative to the start of `text`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Slice {
	/// Copied text.
	pub text: String,
	/// Tags clipped to the copied text.
	pub tags: Vec<Tag>,
}

/// Text with embedded annotation tags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
	text: Rope,
	tags: Vec<Tag>,
}

impl Document {
	/// Creates an untagged document.
	pub fn new(text: &str) -> Self {
		Self {
			text: Rope::from(text),
			tags: Vec::new(),
		}
	}

	/// Creates a document with initial tags.
	///
	/// Tags are clamped to the text. Later tags win where two tags of one
	/// channel overlap.
	pub fn with_tags(text: &str, tags: impl IntoIterator<Item = Tag>) -> Self {
		let mut doc = Self::new(text);
		for tag in tags {
			doc.add_tag(&tag.channel, tag.span, tag.attrs);
		}
		doc
	}

	/// Returns the text.
	pub fn text(&self) -> &Rope {
		&self.text
	}

	/// Returns the text length in characters.
	pub fn len_chars(&self) -> usize {
		self.text.len_chars()
	}

	/// Returns every tag, ordered by channel then start.
	pub fn tags(&self) -> &[Tag] {
		&self.tags
	}

	/// Iterates over one channel's tags in document order.
	pub fn channel_tags<'a, 'k>(&'a self, channel: &'k ChannelKey) -> impl Iterator<Item = &'a Tag> + use<'a, 'k> {
		self.tags.iter().filter(move |t| &t.channel == channel)
	}

	/// Iterates over one channel's tags sharing at least one character with `span`.
	pub fn tags_in<'a, 'k>(&'a self, channel: &'k ChannelKey, span: Span) -> impl Iterator<Item = &'a Tag> + use<'a, 'k> {
		self.channel_tags(channel)
			.filter(move |t| t.span.from < span.to && t.span.to > span.from)
	}

	/// Returns the channel's tag strictly surrounding `pos`.
	pub fn tag_at(&self, channel: &ChannelKey, pos: CharIdx) -> Option<&Tag> {
		self.channel_tags(channel)
			.find(|t| t.span.from < pos && t.span.to > pos)
	}

	/// Returns the tags a cursor at `pos` inherits, one per channel.
	///
	/// Only tags strictly surrounding the position count; a cursor on a tag
	/// edge inherits nothing from it.
	pub fn tags_at(&self, pos: CharIdx) -> StoredTags {
		self.tags
			.iter()
			.filter(|t| t.span.from < pos && t.span.to > pos)
			.map(|t| (t.channel.clone(), t.attrs.clone()))
			.collect()
	}

	/// Returns the channel's attributes for every character.
	pub fn attrs_per_char(&self, channel: &ChannelKey) -> Vec<Option<&TagAttrs>> {
		let mut out = vec![None; self.len_chars()];
		for tag in self.channel_tags(channel) {
			for slot in &mut out[tag.span.from..tag.span.to] {
				*slot = Some(&tag.attrs);
			}
		}
		out
	}

	/// Tags `span` for a channel, replacing whatever the channel had there.
	pub fn add_tag(&mut self, channel: &ChannelKey, span: Span, attrs: TagAttrs) {
		let span = Span::new(span.from.min(self.len_chars()), span.to.min(self.len_chars()));
		if span.is_empty() {
			return;
		}
		self.remove_tags(channel, span);
		self.tags.push(Tag::new(channel.clone(), span, attrs));
		self.normalize();
	}

	/// Removes a channel's tags from `span`, splitting tags that stick out.
	pub fn remove_tags(&mut self, channel: &ChannelKey, span: Span) {
		if span.is_empty() {
			return;
		}

		let mut kept = Vec::with_capacity(self.tags.len() + 1);
		for tag in self.tags.drain(..) {
			if &tag.channel != channel || tag.span.to <= span.from || tag.span.from >= span.to {
				kept.push(tag);
				continue;
			}
			if tag.span.from < span.from {
				kept.push(Tag::new(tag.channel.clone(), Span::new(tag.span.from, span.from), tag.attrs.clone()));
			}
			if tag.span.to > span.to {
				kept.push(Tag::new(tag.channel, Span::new(span.to, tag.span.to), tag.attrs));
			}
		}
		self.tags = kept;
		self.normalize();
	}

	/// Applies a text changeset, carrying tags along.
	///
	/// Tag starts map with right bias and ends with left bias, so text
	/// inserted at a tag edge stays outside the tag. Tags whose text was
	/// deleted entirely disappear.
	pub fn apply(&mut self, changes: &ChangeSet) {
		if changes.is_identity() {
			return;
		}
		for tag in &mut self.tags {
			let from = changes.map_pos(tag.span.from, Bias::Right);
			let to = changes.map_pos(tag.span.to, Bias::Left);
			tag.span = Span::new(from, to.max(from));
		}
		self.tags.retain(|t| !t.span.is_empty());
		changes.apply(&mut self.text);
		self.normalize();
	}

	/// Copies `span` with its tags.
	pub fn slice(&self, span: Span) -> Slice {
		let span = Span::new(span.from.min(self.len_chars()), span.to.min(self.len_chars()));
		let text = self.text.slice(span.from..span.to.max(span.from)).to_string();
		let tags = self
			.tags
			.iter()
			.filter(|t| t.span.from < span.to && t.span.to > span.from)
			.map(|t| {
				let from = t.span.from.max(span.from) - span.from;
				let to = t.span.to.min(span.to) - span.from;
				Tag::new(t.channel.clone(), Span::new(from, to), t.attrs.clone())
			})
			.collect();
		Slice { text, tags }
	}

	/// Returns the text of `span`.
	pub fn text_of(&self, span: Span) -> String {
		let to = span.to.min(self.len_chars());
		self.text.slice(span.from.min(to)..to).to_string()
	}

	/// Sorts tags and coalesces touching tags with equal attributes.
	fn normalize(&mut self) {
		self.tags.sort_by(|a, b| a.channel.cmp(&b.channel).then(a.span.from.cmp(&b.span.from)));

		let mut merged: Vec<Tag> = Vec::with_capacity(self.tags.len());
		for tag in self.tags.drain(..) {
			if let Some(last) = merged.last_mut()
				&& last.channel == tag.channel
				&& last.span.to >= tag.span.from
				&& last.attrs == tag.attrs
			{
				last.span = last.span.union(&tag.span);
				continue;
			}
			merged.push(tag);
		}
		self.tags = merged;
	}
}
