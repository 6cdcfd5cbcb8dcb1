use noter::{CursorState, collapse_all_notes, sanitize_doc, show_all_notes, toggle_all_notes};
use noter_primitives::{ChannelKey, Document, NoteMeta};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{Editor, KEY, tag, tag_with};

fn n(start: usize, end: usize, note_type: &str) -> (usize, usize, String) {
	(start, end, note_type.to_string())
}

#[test]
fn toggle_selection_on_and_off() {
	let mut ed = Editor::new("foo bar baz");
	ed.select(4, 7);
	ed.toggle(KEY, "note");
	assert_eq!(ed.notes(KEY), vec![n(4, 7, "note")]);

	ed.toggle(KEY, "note");
	assert!(ed.notes(KEY).is_empty());
	ed.assert_consistent();
}

#[test]
fn toggle_at_cursor_removes_surrounding_note() {
	let mut ed = Editor::with_channels(Document::with_tags("foo bar baz", [tag(KEY, 4, 7, 1, "note")]), &[KEY]);
	ed.set_cursor(5);
	assert!(matches!(ed.cursor_state(KEY), CursorState::Inside(_)));

	ed.toggle(KEY, "note");
	assert!(ed.notes(KEY).is_empty());
	let channel = ed.session.noter().channel(KEY).unwrap();
	assert!(!channel.tracker().has_note_id(noter_primitives::NoteId::from_u128(1)));
	ed.assert_consistent();
}

#[test]
fn typing_after_toggle_creates_note() {
	let mut ed = Editor::new("foo bar");
	ed.set_cursor(3);
	ed.toggle(KEY, "note");
	assert_eq!(ed.cursor_state(KEY), CursorState::Pending("note".into()));

	ed.type_text("abc");
	assert_eq!(ed.text(), "fooabc bar");
	assert_eq!(ed.notes(KEY), vec![n(3, 6, "note")]);
	let created = ed.session.noter().channel(KEY).unwrap().last_created();
	assert_eq!(created, Some(ed.ids(KEY)[0]));
	ed.assert_consistent();
}

#[test]
fn moving_cursor_drops_pending_type() {
	let mut ed = Editor::new("foo bar");
	ed.set_cursor(3);
	ed.toggle(KEY, "note");
	ed.right();
	assert_eq!(ed.cursor_state(KEY), CursorState::Outside);

	ed.type_text("x");
	assert!(ed.notes(KEY).is_empty());
	ed.assert_consistent();
}

#[test]
fn touching_notes_of_one_type_merge() {
	let mut ed = Editor::new("foo bar baz");
	ed.select(0, 3);
	ed.toggle(KEY, "note");
	ed.select(3, 7);
	ed.toggle(KEY, "note");

	assert_eq!(ed.notes(KEY), vec![n(0, 7, "note")]);
	ed.assert_consistent();
}

#[test]
fn touching_notes_of_different_types_stay_apart() {
	let mut ed = Editor::new("foo bar baz");
	ed.select(0, 3);
	ed.toggle(KEY, "a");
	ed.select(3, 7);
	ed.toggle(KEY, "b");

	assert_eq!(ed.notes(KEY), vec![n(0, 3, "a"), n(3, 7, "b")]);
	ed.assert_consistent();
}

#[test]
fn toggling_other_type_inside_note_slices_it() {
	let meta = NoteMeta::of_type("note").with("author", "ann");
	let doc = Document::with_tags("foo bar baz", [tag_with(KEY, 0, 11, 1, meta)]);
	let mut ed = Editor::with_channels(doc, &[KEY]);

	ed.select(4, 7);
	ed.toggle(KEY, "comment");

	assert_eq!(ed.notes(KEY), vec![n(0, 4, "note"), n(4, 7, "comment"), n(7, 11, "note")]);
	let notes = ed.channel_notes(KEY);
	assert_eq!(notes[0].id, noter_primitives::NoteId::from_u128(1));
	assert_eq!(notes[0].meta.get("author"), Some(&json!("ann")));
	assert_eq!(notes[2].meta.get("author"), Some(&json!("ann")));
	assert_eq!(notes[1].meta.get("author"), None);
	ed.assert_consistent();
}

#[test]
fn typing_inside_note_extends_it() {
	let mut ed = Editor::with_channels(Document::with_tags("foo bar baz", [tag(KEY, 4, 7, 1, "note")]), &[KEY]);
	ed.set_cursor(5);
	ed.type_text("xx");

	assert_eq!(ed.text(), "foo bxxar baz");
	assert_eq!(ed.notes(KEY), vec![n(4, 9, "note")]);
	ed.assert_consistent();
}

#[test]
fn typing_after_note_needs_an_extra_step_out() {
	let mut ed = Editor::with_channels(Document::with_tags("foo bar baz", [tag(KEY, 4, 7, 1, "note")]), &[KEY]);
	ed.set_cursor(6);
	ed.right();
	assert_eq!(ed.cursor(), Some(7));
	ed.type_text("s");
	assert_eq!(ed.notes(KEY), vec![n(4, 8, "note")]);

	ed.right();
	assert_eq!(ed.cursor(), Some(8));
	assert_eq!(ed.cursor_state(KEY), CursorState::Outside);
	ed.type_text("!");
	assert_eq!(ed.text(), "foo bars! baz");
	assert_eq!(ed.notes(KEY), vec![n(4, 8, "note")]);
	ed.assert_consistent();
}

#[test]
fn typing_over_selection_ending_at_note_end_leaves_note_short() {
	let mut ed = Editor::with_channels(Document::with_tags("foo bar baz", [tag(KEY, 2, 7, 1, "note")]), &[KEY]);
	ed.select(4, 7);
	ed.type_text("x");

	assert_eq!(ed.text(), "foo x baz");
	assert_eq!(ed.notes(KEY), vec![n(2, 4, "note")]);
	ed.assert_consistent();
}

#[test]
fn typing_over_selection_ending_at_note_start_leaves_note_short() {
	let mut ed = Editor::with_channels(Document::with_tags("foo bar baz", [tag(KEY, 4, 9, 1, "note")]), &[KEY]);
	ed.select(2, 4);
	ed.type_text("x");

	assert_eq!(ed.text(), "foxbar baz");
	assert_eq!(ed.notes(KEY), vec![n(3, 8, "note")]);
	ed.assert_consistent();
}

#[test]
fn backspace_shrinks_and_finally_removes_note() {
	let mut ed = Editor::with_channels(Document::with_tags("foo bar baz", [tag(KEY, 4, 7, 1, "note")]), &[KEY]);
	ed.set_cursor(7);
	ed.backspace(1);
	assert_eq!(ed.notes(KEY), vec![n(4, 6, "note")]);

	ed.backspace(2);
	assert_eq!(ed.text(), "foo  baz");
	assert!(ed.notes(KEY).is_empty());
	ed.assert_consistent();
}

#[test]
fn delete_forward_shifts_note() {
	let mut ed = Editor::with_channels(Document::with_tags("foo bar baz", [tag(KEY, 4, 7, 1, "note")]), &[KEY]);
	ed.set_cursor(2);
	ed.delete(2);

	assert_eq!(ed.text(), "fobar baz");
	assert_eq!(ed.notes(KEY), vec![n(2, 5, "note")]);
	ed.assert_consistent();
}

#[test]
fn cut_and_paste_keeps_note_id() {
	let mut ed = Editor::with_channels(Document::with_tags("foo bar baz", [tag(KEY, 4, 7, 1, "note")]), &[KEY]);
	ed.select(4, 7);
	let slice = ed.session.cut();
	assert!(ed.notes(KEY).is_empty());

	ed.set_cursor(0);
	ed.session.paste(&slice);
	assert_eq!(ed.text(), "barfoo  baz");
	assert_eq!(ed.notes(KEY), vec![n(0, 3, "note")]);
	assert_eq!(ed.ids(KEY), vec![noter_primitives::NoteId::from_u128(1)]);
	ed.assert_consistent();
}

#[test]
fn pasting_a_copy_issues_fresh_id() {
	let mut ed = Editor::with_channels(Document::with_tags("foo bar baz", [tag(KEY, 4, 7, 1, "note")]), &[KEY]);
	ed.select(4, 7);
	let slice = ed.session.copy();
	ed.set_cursor(0);
	ed.session.paste(&slice);

	assert_eq!(ed.notes(KEY), vec![n(0, 3, "note"), n(7, 10, "note")]);
	let ids = ed.ids(KEY);
	assert_ne!(ids[0], ids[1]);
	assert!(ids.contains(&noter_primitives::NoteId::from_u128(1)));
	ed.assert_consistent();
}

#[test]
fn cursor_to_end_moves_after_new_note() {
	let mut ed = Editor::new("foo bar baz");
	ed.select(4, 7);
	ed.toggle_with(KEY, "note", true);
	assert_eq!(ed.cursor(), Some(7));
}

#[test]
fn collapse_and_show_all_notes() {
	let doc = Document::with_tags("foo bar baz", [tag(KEY, 0, 3, 1, "note"), tag(KEY, 8, 11, 2, "note")]);
	let mut ed = Editor::with_channels(doc, &[KEY]);
	let key = ChannelKey::from(KEY);

	assert!(ed.session.exec(|s| collapse_all_notes(s, &key)));
	let hidden = |ed: &Editor| {
		ed.channel_notes(KEY)
			.iter()
			.map(|n| n.meta.get("hidden").cloned())
			.collect::<Vec<_>>()
	};
	assert_eq!(hidden(&ed), vec![Some(json!(true)), Some(json!(true))]);
	assert_eq!(ed.ids(KEY), vec![noter_primitives::NoteId::from_u128(1), noter_primitives::NoteId::from_u128(2)]);
	assert!(!ed.session.exec(|s| collapse_all_notes(s, &key)));

	assert!(ed.session.exec(|s| show_all_notes(s, &key)));
	assert_eq!(hidden(&ed), vec![Some(json!(false)), Some(json!(false))]);

	assert!(ed.session.exec(|s| toggle_all_notes(s, &key)));
	assert_eq!(hidden(&ed), vec![Some(json!(true)), Some(json!(true))]);
	ed.assert_consistent();
}

#[test]
fn sanitized_document_loads_separate_runs() {
	let doc = Document::with_tags("foo bar baz", [tag(KEY, 0, 3, 1, "note"), tag(KEY, 8, 11, 1, "note")]);
	let ed = Editor::with_channels(sanitize_doc(&doc, &ChannelKey::from(KEY)), &[KEY]);

	assert_eq!(ed.notes(KEY), vec![n(0, 3, "note"), n(8, 11, "note")]);
	let ids = ed.ids(KEY);
	assert_eq!(ids[0], noter_primitives::NoteId::from_u128(1));
	assert_ne!(ids[1], ids[0]);
	ed.assert_consistent();
}

#[test]
fn creation_hook_runs_for_new_notes_only() {
	use std::cell::Cell;
	use std::rc::Rc;

	let doc = Document::with_tags("foo bar baz", [tag(KEY, 0, 3, 1, "note")]);
	let mut noter = noter::Noter::new();
	let created = Rc::new(Cell::new(0));
	let counter = Rc::clone(&created);
	let channel = noter
		.channel_builder(KEY)
		.on_create(move |note| {
			counter.set(counter.get() + 1);
			note.meta.fields.insert("author".into(), json!("me"));
		})
		.build(&doc)
		.unwrap();
	noter.add_channel(channel).unwrap();
	assert_eq!(created.get(), 0);

	let mut session = noter::NoterSession::new(noter, noter_primitives::EditorState::new(doc));
	session.select(4, 7);
	let key = ChannelKey::from(KEY);
	session.exec(|s| Some(noter::toggle_note(s, &key, "note", false)));

	assert_eq!(created.get(), 1);
	let notes = session.noter().channel(KEY).unwrap().notes();
	assert_eq!(notes[1].meta.get("author"), Some(&json!("me")));
	let tag_meta = session.state().doc.channel_tags(&key).nth(1).map(|t| t.attrs.meta.clone());
	assert_eq!(tag_meta, Some(notes[1].meta.clone()));
}
