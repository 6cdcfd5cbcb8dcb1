//! The multi-channel edit pipeline.

use std::rc::Rc;

use noter_primitives::{Document, EditorState, Selection, Transaction};

use crate::channel::{ChannelBuilder, NoteChannel};
use crate::config::{ChannelConfig, NoterConfig};
use crate::error::{NoterError, Result};
use crate::shared::SharedNoteState;

/// Runs every channel over each edit and reconciles their cursor requests.
///
/// For every transaction:
///
/// 1. each channel updates its notes and handles commands, pasted content
///    and typed text, asking for a cursor stall where it crossed a note edge;
/// 2. the cursor is put back and every channel forgets its note if the
///    cursor sits between touching notes of different channels;
/// 3. each channel sets its pending formatting.
#[derive(Debug, Default)]
pub struct Noter {
	shared: Rc<SharedNoteState>,
	channels: Vec<NoteChannel>,
}

impl Noter {
	/// Creates a pipeline without channels.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a pipeline with the configured channels over `doc`.
	pub fn from_config(config: &NoterConfig, doc: &Document) -> Result<Self> {
		config.validate()?;
		let mut noter = Self::new();
		for channel in &config.channels {
			let channel = noter.channel_builder(channel.clone()).build(doc)?;
			noter.add_channel(channel)?;
		}
		Ok(noter)
	}

	/// Returns the shared state every channel registers with.
	pub fn shared(&self) -> &Rc<SharedNoteState> {
		&self.shared
	}

	/// Returns a builder already registered with this pipeline's shared state.
	pub fn channel_builder(&self, config: impl Into<ChannelConfig>) -> ChannelBuilder {
		ChannelBuilder::new(config).shared(&self.shared)
	}

	/// Appends a channel. Channels run in the order they were added.
	pub fn add_channel(&mut self, channel: NoteChannel) -> Result<()> {
		if self.channels.iter().any(|c| c.key() == channel.key()) {
			return Err(NoterError::DuplicateChannel(channel.key().clone()));
		}
		if !Rc::ptr_eq(&channel.shared(), &self.shared) {
			return Err(NoterError::ForeignCoordinator(channel.key().clone()));
		}
		tracing::debug!(channel = %channel.key(), "Added channel");
		self.channels.push(channel);
		Ok(())
	}

	/// Returns the channel with `key`.
	pub fn channel(&self, key: &str) -> Option<&NoteChannel> {
		self.channels.iter().find(|c| c.key().as_str() == key)
	}

	/// Returns all channels in processing order.
	pub fn channels(&self) -> &[NoteChannel] {
		&self.channels
	}

	/// Reloads every channel's notes from `doc`.
	pub fn load(&mut self, doc: &Document) {
		for channel in &self.channels {
			channel.load(doc);
		}
	}

	/// Runs the pipeline over an edit of `old`.
	pub fn filter_transaction(&mut self, tr: &mut Transaction, old: &EditorState) {
		for channel in &mut self.channels {
			channel.controller_mut().filter_transaction(tr, old);
		}

		self.reconcile(tr);

		for channel in &mut self.channels {
			channel.controller_mut().apply_pending_formatting(tr);
		}
		for _ in &self.channels {
			self.shared.transaction_completed();
		}
	}

	fn reconcile(&mut self, tr: &mut Transaction) {
		if self.shared.stall_requests() == 0 || !self.shared.begin_correction() {
			return;
		}
		if !self.shared.is_at_boundary_between_touching_notes() {
			return;
		}

		if let Some(pos) = self.shared.old_cursor_position() {
			tr.set_selection(Selection::point(pos));
		}
		for channel in &mut self.channels {
			channel.controller_mut().clear_current_note();
		}
		tracing::debug!(
			pos = ?self.shared.old_cursor_position(),
			stalls = self.shared.stall_requests(),
			"Cursor held between touching notes"
		);
	}
}
