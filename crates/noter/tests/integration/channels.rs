use noter::CursorState;
use noter_primitives::{Document, NoteId};
use pretty_assertions::assert_eq;

use crate::common::{Editor, tag};

const A: &str = "a";
const B: &str = "b";

/// "xxAAAABBBByy": channel a annotates [2,6), channel b annotates [6,10).
fn touching() -> Editor {
	let doc = Document::with_tags("xxaaaabbbbyy", [tag(A, 2, 6, 1, "alpha"), tag(B, 6, 10, 2, "beta")]);
	Editor::with_channels(doc, &[A, B])
}

#[test]
fn crossing_touching_notes_of_two_channels() {
	let mut ed = touching();
	ed.set_cursor(4);
	assert_eq!(ed.cursor_state(A), CursorState::Inside(NoteId::from_u128(1)));
	ed.right();
	ed.right();
	assert_eq!(ed.cursor(), Some(6));
	assert_eq!(ed.cursor_state(A), CursorState::Inside(NoteId::from_u128(1)));
	assert_eq!(ed.cursor_state(B), CursorState::Outside);

	// Both channels ask to stall; the cursor sits between their notes.
	ed.right();
	assert_eq!(ed.cursor(), Some(6));
	assert_eq!(ed.cursor_state(A), CursorState::Outside);
	assert_eq!(ed.cursor_state(B), CursorState::Outside);

	ed.right();
	assert_eq!(ed.cursor(), Some(6));
	assert_eq!(ed.cursor_state(B), CursorState::Inside(NoteId::from_u128(2)));

	ed.right();
	assert_eq!(ed.cursor(), Some(7));
	assert_eq!(ed.cursor_state(B), CursorState::Inside(NoteId::from_u128(2)));
	ed.assert_consistent();
}

#[test]
fn typing_at_boundary_joins_entered_note() {
	let mut ed = touching();
	ed.set_cursor(5);
	ed.right();
	ed.right();
	ed.right();
	assert_eq!(ed.cursor_state(B), CursorState::Inside(NoteId::from_u128(2)));

	ed.type_text("z");
	assert_eq!(ed.text(), "xxaaaazbbbbyy");
	assert_eq!(ed.notes(A), vec![(2, 6, "alpha".to_string())]);
	assert_eq!(ed.notes(B), vec![(6, 11, "beta".to_string())]);
	ed.assert_consistent();
}

#[test]
fn typing_between_notes_after_stall_stays_plain() {
	let mut ed = touching();
	ed.set_cursor(5);
	ed.right();
	ed.right();
	assert_eq!(ed.cursor(), Some(6));

	ed.type_text("z");
	assert_eq!(ed.notes(A), vec![(2, 6, "alpha".to_string())]);
	assert_eq!(ed.notes(B), vec![(7, 11, "beta".to_string())]);
	ed.assert_consistent();
}

#[test]
fn notes_starting_together_are_entered_together() {
	let doc = Document::with_tags("xxaaaabbbbyy", [tag(A, 6, 10, 1, "alpha"), tag(B, 6, 8, 2, "beta")]);
	let mut ed = Editor::with_channels(doc, &[A, B]);
	ed.set_cursor(5);
	ed.right();
	assert_eq!(ed.cursor(), Some(6));

	ed.right();
	assert_eq!(ed.cursor(), Some(6));
	assert_eq!(ed.cursor_state(A), CursorState::Inside(NoteId::from_u128(1)));
	assert_eq!(ed.cursor_state(B), CursorState::Inside(NoteId::from_u128(2)));

	ed.right();
	assert_eq!(ed.cursor(), Some(7));
}

#[test]
fn commands_only_reach_their_channel() {
	let mut ed = touching();
	ed.select(0, 2);
	ed.toggle(B, "beta");

	assert_eq!(ed.notes(A), vec![(2, 6, "alpha".to_string())]);
	assert_eq!(ed.notes(B), vec![(0, 2, "beta".to_string()), (6, 10, "beta".to_string())]);
	ed.assert_consistent();
}

#[test]
fn deleting_across_channels_trims_both() {
	let mut ed = touching();
	ed.select(4, 8);
	ed.session.delete_backward();

	assert_eq!(ed.text(), "xxaabbyy");
	assert_eq!(ed.notes(A), vec![(2, 4, "alpha".to_string())]);
	assert_eq!(ed.notes(B), vec![(4, 6, "beta".to_string())]);
	ed.assert_consistent();
}
