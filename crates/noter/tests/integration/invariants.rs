//! Random editing sessions must keep every channel well formed and its
//! document tags in agreement with its notes.

use noter::toggle_all_notes;
use noter_primitives::{ChannelKey, Document, Slice};
use proptest::prelude::*;

use crate::common::{Editor, tag};

const CHANNELS: [&str; 2] = ["a", "b"];
const TYPES: [&str; 2] = ["note", "flag"];

#[derive(Debug, Clone)]
enum Op {
	Cursor(usize),
	Select(usize, usize),
	Left,
	Right,
	Type(char),
	Backspace,
	Delete,
	Toggle(usize, usize),
	ToggleAll(usize),
	Cut,
	Paste,
	Undo,
	Redo,
}

fn op() -> impl Strategy<Value = Op> {
	prop_oneof![
		(0usize..64).prop_map(Op::Cursor),
		(0usize..64, 0usize..64).prop_map(|(a, b)| Op::Select(a, b)),
		Just(Op::Left),
		Just(Op::Right),
		Just(Op::Right),
		prop::sample::select(vec!['a', 'b', ' ', '\n']).prop_map(Op::Type),
		Just(Op::Backspace),
		Just(Op::Delete),
		(0usize..2, 0usize..2).prop_map(|(c, t)| Op::Toggle(c, t)),
		(0usize..2).prop_map(Op::ToggleAll),
		Just(Op::Cut),
		Just(Op::Paste),
		Just(Op::Undo),
		Just(Op::Redo),
	]
}

fn run(ed: &mut Editor, clipboard: &mut Slice, op: &Op) {
	let len = ed.session.state().doc.len_chars();
	match *op {
		Op::Cursor(pos) => ed.set_cursor(pos % (len + 1)),
		Op::Select(a, b) => ed.select(a % (len + 1), b % (len + 1)),
		Op::Left => {
			if let Some(pos) = ed.cursor()
				&& pos > 0
			{
				ed.left();
			}
		}
		Op::Right => {
			if let Some(pos) = ed.cursor()
				&& pos < len
			{
				ed.right();
			}
		}
		Op::Type(ch) => ed.type_text(&ch.to_string()),
		Op::Backspace => ed.backspace(1),
		Op::Delete => ed.delete(1),
		Op::Toggle(channel, note_type) => ed.toggle(CHANNELS[channel], TYPES[note_type]),
		Op::ToggleAll(channel) => {
			let key = ChannelKey::from(CHANNELS[channel]);
			ed.session.exec(|s| toggle_all_notes(s, &key));
		}
		Op::Cut => {
			if ed.cursor().is_none() {
				*clipboard = ed.session.cut();
			}
		}
		Op::Paste => ed.session.paste(clipboard),
		Op::Undo => {
			ed.session.undo();
		}
		Op::Redo => {
			ed.session.redo();
		}
	}
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(64))]

	#[test]
	fn random_sessions_stay_consistent(ops in prop::collection::vec(op(), 1..40)) {
		let doc = Document::with_tags(
			"foo bar baz qux",
			[tag("a", 0, 3, 1, "note"), tag("a", 8, 11, 2, "flag"), tag("b", 2, 9, 3, "note")],
		);
		let mut ed = Editor::with_channels(doc, &CHANNELS);
		let mut clipboard = Slice::default();

		for op in &ops {
			run(&mut ed, &mut clipboard, op);
			ed.assert_consistent();
		}
	}
}
