/// Where an edit came from.
///
/// Annotation logic treats pasted and history-restored content differently
/// from typed input: such content may carry embedded tags that must be
/// re-adopted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditOrigin {
	/// Typing, deletion and cursor movement.
	#[default]
	Input,
	/// Clipboard paste.
	Paste,
	/// History undo.
	Undo,
	/// History redo.
	Redo,
	/// Programmatic edit issued by a command.
	Command,
}

impl EditOrigin {
	/// Returns true for edits whose content was not typed by the user.
	pub fn restores_content(self) -> bool {
		matches!(self, EditOrigin::Paste | EditOrigin::Undo | EditOrigin::Redo)
	}
}
