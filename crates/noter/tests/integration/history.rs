use noter_primitives::{Document, NoteId};
use pretty_assertions::assert_eq;

use crate::common::{Editor, KEY, tag};

#[test]
fn undo_and_redo_toggle() {
	let mut ed = Editor::new("foo bar baz");
	ed.select(4, 7);
	ed.toggle(KEY, "note");
	let id = ed.ids(KEY)[0];

	assert!(ed.session.undo());
	assert!(ed.notes(KEY).is_empty());
	ed.assert_consistent();

	assert!(ed.session.redo());
	assert_eq!(ed.ids(KEY), vec![id]);
	assert_eq!(ed.notes(KEY), vec![(4, 7, "note".to_string())]);
	ed.assert_consistent();
}

#[test]
fn undo_typing_restores_note_bounds() {
	let mut ed = Editor::with_channels(Document::with_tags("foo bar baz", [tag(KEY, 4, 7, 1, "note")]), &[KEY]);
	ed.set_cursor(5);
	ed.type_text("!");
	assert_eq!(ed.notes(KEY), vec![(4, 8, "note".to_string())]);

	assert!(ed.session.undo());
	assert_eq!(ed.text(), "foo bar baz");
	assert_eq!(ed.notes(KEY), vec![(4, 7, "note".to_string())]);
	assert_eq!(ed.ids(KEY), vec![NoteId::from_u128(1)]);
	ed.assert_consistent();

	assert!(ed.session.redo());
	assert_eq!(ed.text(), "foo b!ar baz");
	assert_eq!(ed.notes(KEY), vec![(4, 8, "note".to_string())]);
	ed.assert_consistent();
}

#[test]
fn undo_deletion_brings_note_back() {
	let mut ed = Editor::with_channels(Document::with_tags("foo bar baz", [tag(KEY, 4, 7, 1, "note")]), &[KEY]);
	ed.select(3, 8);
	ed.session.delete_backward();
	assert_eq!(ed.text(), "foobaz");
	assert!(ed.notes(KEY).is_empty());

	assert!(ed.session.undo());
	assert_eq!(ed.text(), "foo bar baz");
	assert_eq!(ed.ids(KEY), vec![NoteId::from_u128(1)]);
	assert_eq!(ed.notes(KEY), vec![(4, 7, "note".to_string())]);
	ed.assert_consistent();
}

#[test]
fn cursor_moves_are_not_recorded() {
	let mut ed = Editor::new("foo bar");
	ed.set_cursor(3);
	ed.set_cursor(5);
	assert!(!ed.session.history().can_undo());
	assert!(!ed.session.undo());
}
