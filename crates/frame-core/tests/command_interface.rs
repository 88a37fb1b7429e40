use frame_core::{
    Axis, Command, CommandResult, Confirmed, CursorCommand, EditCommand, FrameCommand, FrameId,
    Motion, PromptTag, Rect, Registry, SearchMatch, SearchStatus, TextDelta,
};
use pretty_assertions::assert_eq;

fn open(text: &str) -> (Registry, FrameId) {
    let mut registry = Registry::new();
    let buffer = registry.open_buffer(text).unwrap();
    let frame = registry
        .open_frame(buffer, Rect::new(0.0, 0.0, 80.0, 24.0))
        .unwrap();
    (registry, frame)
}

fn insert(text: &str) -> Command {
    Command::Edit(EditCommand::InsertText {
        text: text.to_string(),
    })
}

fn text_of(registry: &Registry, frame: FrameId) -> String {
    registry.buffer_of(frame).unwrap().as_str().to_string()
}

#[test]
fn test_insert_reports_delta() {
    let (mut registry, frame) = open("world");

    let result = registry.execute(frame, insert("hello ")).unwrap();

    assert_eq!(result, CommandResult::Edited(Some(TextDelta::insertion(0, 6))));
    assert_eq!(text_of(&registry, frame), "hello world");
}

#[test]
fn test_empty_insert_is_a_noop() {
    let (mut registry, frame) = open("abc");

    let result = registry.execute(frame, insert("")).unwrap();

    assert_eq!(result, CommandResult::Edited(None));
    assert!(!registry.buffer_of(frame).unwrap().can_undo());
}

#[test]
fn test_delete_range_accepts_reversed_bounds() {
    let (mut registry, frame) = open("0123456789");

    registry
        .execute(frame, Command::Edit(EditCommand::DeleteRange { from: 7, to: 2 }))
        .unwrap();

    assert_eq!(text_of(&registry, frame), "01789");
    assert_eq!(registry.frame(frame).unwrap().cursor(), 2);
}

#[test]
fn test_copy_cut_and_paste_selection() {
    let (mut registry, frame) = open("copy this text");
    let results = registry
        .execute_batch(
            frame,
            vec![
                Command::Cursor(CursorCommand::Move(Motion::To(5))),
                Command::Cursor(CursorCommand::SetSelectionAnchor),
                Command::Cursor(CursorCommand::Move(Motion::To(9))),
                Command::Cursor(CursorCommand::Copy),
            ],
        )
        .unwrap();
    assert_eq!(
        results.last(),
        Some(&CommandResult::Bytes(Some(b"this".to_vec())))
    );

    let cut = registry
        .execute(frame, Command::Edit(EditCommand::Cut))
        .unwrap();
    assert_eq!(cut, CommandResult::Bytes(Some(b"this".to_vec())));
    assert_eq!(text_of(&registry, frame), "copy  text");
    assert_eq!(registry.frame(frame).unwrap().selection(), None);

    registry
        .execute(
            frame,
            Command::Edit(EditCommand::Paste {
                bytes: b"that".to_vec(),
            }),
        )
        .unwrap();
    assert_eq!(text_of(&registry, frame), "copy that text");

    assert_eq!(
        registry
            .execute(frame, Command::Cursor(CursorCommand::Copy))
            .unwrap(),
        CommandResult::Bytes(None)
    );
}

#[test]
fn test_typing_replaces_selection() {
    let (mut registry, frame) = open("pick one");
    registry.move_cursor(frame, Motion::To(5)).unwrap();
    registry.set_selection_anchor(frame).unwrap();
    registry.move_cursor(frame, Motion::BufferEnd).unwrap();

    registry.execute(frame, insert("two")).unwrap();

    assert_eq!(text_of(&registry, frame), "pick two");
    assert_eq!(registry.frame(frame).unwrap().cursor(), 8);

    registry.undo(frame).unwrap();
    assert_eq!(text_of(&registry, frame), "pick ");
    registry.undo(frame).unwrap();
    assert_eq!(text_of(&registry, frame), "pick one");
}

#[test]
fn test_paste_replaces_invalid_utf8() {
    let (mut registry, frame) = open("");

    registry.paste(frame, &[b'o', 0xff, b'k']).unwrap();

    assert_eq!(text_of(&registry, frame), "o\u{fffd}k");
}

#[test]
fn test_non_edit_commands_close_the_typing_run() {
    let (mut registry, frame) = open("");

    registry.execute(frame, insert("ab")).unwrap();
    registry
        .execute(
            frame,
            Command::Frame(FrameCommand::SetGeometry(Rect::new(0.0, 0.0, 40.0, 24.0))),
        )
        .unwrap();
    registry.execute(frame, insert("cd")).unwrap();

    assert_eq!(registry.buffer_of(frame).unwrap().undo_log().len(), 2);
}

#[test]
fn test_frame_commands_open_split_focus_close() {
    let (mut registry, frame) = open("shared");
    let buffer = registry.frame(frame).unwrap().buffer();

    let CommandResult::Frame(second) = registry
        .execute(
            frame,
            Command::Frame(FrameCommand::Open {
                buffer,
                geometry: Rect::new(0.0, 0.0, 80.0, 24.0),
            }),
        )
        .unwrap()
    else {
        panic!("expected a frame");
    };
    let CommandResult::Frame(third) = registry
        .execute(second, Command::Frame(FrameCommand::Split(Axis::Horizontal)))
        .unwrap()
    else {
        panic!("expected a frame");
    };
    assert_eq!(registry.buffer_refcount(buffer).unwrap(), 3);
    assert_eq!(registry.focused(), Some(third));

    registry
        .execute(frame, Command::Frame(FrameCommand::Focus))
        .unwrap();
    assert_eq!(registry.focused(), Some(frame));

    registry
        .execute(third, Command::Frame(FrameCommand::Close))
        .unwrap();
    assert_eq!(registry.buffer_refcount(buffer).unwrap(), 2);
    assert!(
        registry
            .execute(third, Command::Frame(FrameCommand::Focus))
            .is_err()
    );
}

#[test]
fn test_search_and_prompt_through_commands() {
    let (mut registry, frame) = open("one two one two");

    let CommandResult::Frame(search) = registry
        .execute(frame, Command::Frame(FrameCommand::OpenSearch))
        .unwrap()
    else {
        panic!("expected a frame");
    };
    registry.execute(search, insert("two")).unwrap();
    assert_eq!(
        registry
            .execute(search, Command::Frame(FrameCommand::AdvanceSearch))
            .unwrap(),
        CommandResult::Search(SearchStatus::Found)
    );
    assert_eq!(
        registry
            .execute(search, Command::Frame(FrameCommand::Confirm))
            .unwrap(),
        CommandResult::Confirmed(Confirmed::Search {
            parent: frame,
            found: Some(SearchMatch { start: 12, end: 15 }),
        })
    );
    assert_eq!(registry.frame(frame).unwrap().cursor(), 12);

    let CommandResult::Frame(prompt) = registry
        .execute(
            frame,
            Command::Frame(FrameCommand::OpenPrompt(PromptTag::new("goto-line"))),
        )
        .unwrap()
    else {
        panic!("expected a frame");
    };
    registry.execute(prompt, insert("3")).unwrap();
    registry
        .execute(prompt, Command::Frame(FrameCommand::Cancel))
        .unwrap();
    assert_eq!(registry.focused(), Some(frame));
    assert_eq!(registry.frame_count(), 1);
}

#[test]
fn test_scroll_command_reports_clamped_line() {
    let text: String = (0..10).map(|i| format!("{i}\n")).collect();
    let (mut registry, frame) = open(&text);

    assert_eq!(
        registry
            .execute(frame, Command::Frame(FrameCommand::Scroll(50)))
            .unwrap(),
        CommandResult::Offset(10)
    );
    assert_eq!(
        registry
            .execute(frame, Command::Frame(FrameCommand::Scroll(-4)))
            .unwrap(),
        CommandResult::Offset(6)
    );
}

#[test]
fn test_delete_forward_and_clear_selection() {
    let (mut registry, frame) = open("héllo");
    registry
        .execute(frame, Command::Cursor(CursorCommand::Move(Motion::Right)))
        .unwrap();

    let result = registry
        .execute(frame, Command::Edit(EditCommand::DeleteForward))
        .unwrap();
    assert_eq!(
        result,
        CommandResult::Edited(Some(TextDelta::deletion(1..3)))
    );
    assert_eq!(text_of(&registry, frame), "hllo");

    registry
        .execute_batch(
            frame,
            vec![
                Command::Cursor(CursorCommand::SetSelectionAnchor),
                Command::Cursor(CursorCommand::Move(Motion::LineEnd)),
                Command::Cursor(CursorCommand::ClearSelection),
            ],
        )
        .unwrap();
    assert_eq!(registry.frame(frame).unwrap().selection(), None);
    assert_eq!(
        registry
            .execute(frame, Command::Cursor(CursorCommand::Copy))
            .unwrap(),
        CommandResult::Bytes(None)
    );

    // Without a selection, delete-forward at the end is a no-op.
    assert_eq!(
        registry
            .execute(frame, Command::Edit(EditCommand::DeleteForward))
            .unwrap(),
        CommandResult::Edited(None)
    );
}
