use richtext_core::{
    Align, BlockKind, Command, DEFAULT_TEXT, Document, InputOutcome, KeyChord, Mark,
    MemoryStorage, Node, Point, Selection, Session, SessionConfig, ToolbarButton,
};

fn chord(s: &str) -> KeyChord {
    s.parse().unwrap()
}

fn select_word(session: &mut Session<MemoryStorage>, from: usize, to: usize) {
    session
        .set_selection(Selection::new(
            Point::new(vec![0, 0], from),
            Point::new(vec![0, 0], to),
        ))
        .unwrap();
}

#[test]
fn empty_storage_opens_default_document() {
    let session = Session::open(MemoryStorage::new(), SessionConfig::default());
    assert_eq!(session.doc(), &Document::with_text(DEFAULT_TEXT));
    assert!(session.editor().selection().is_none());
    // Opening never writes.
    assert!(session.storage().contents().is_none());
}

#[test]
fn configured_default_text_is_used() {
    let config = SessionConfig {
        default_text: "start here".to_string(),
        ..SessionConfig::default()
    };
    let session = Session::open(MemoryStorage::new(), config);
    assert_eq!(session.doc(), &Document::with_text("start here"));
}

#[test]
fn bold_whole_word_saves_exact_json() {
    let storage = MemoryStorage::with_contents(
        r#"[{"type":"paragraph","children":[{"text":"hello"}]}]"#,
    );
    let mut session = Session::open(storage, SessionConfig::default());
    select_word(&mut session, 0, 5);

    let outcome = session.handle_key(&chord("ctrl-b")).unwrap();
    assert_eq!(outcome, InputOutcome::Handled(Command::ToggleMark(Mark::Bold)));

    assert_eq!(
        session.storage().contents().as_deref(),
        Some(r#"[{"type":"paragraph","children":[{"text":"hello","bold":true}]}]"#)
    );
}

#[test]
fn bold_partial_word_splits_and_saves() {
    let storage = MemoryStorage::with_contents(
        r#"[{"type":"paragraph","children":[{"text":"hello"}]}]"#,
    );
    let mut session = Session::open(storage, SessionConfig::default());
    select_word(&mut session, 0, 2);

    session.handle_key(&chord("ctrl-b")).unwrap();

    assert_eq!(
        session.storage().contents().as_deref(),
        Some(
            r#"[{"type":"paragraph","children":[{"text":"he","bold":true},{"text":"llo"}]}]"#
        )
    );
}

#[test]
fn key_bindings_dispatch_each_command() {
    let mut session = Session::open(MemoryStorage::new(), SessionConfig::default());
    session.select_all();

    session.handle_key(&chord("ctrl-i")).unwrap();
    session.handle_key(&chord("ctrl-u")).unwrap();
    session.handle_key(&chord("ctrl-`")).unwrap();

    let Some(Node::Block(block)) = session.doc().children.first() else {
        panic!("expected block");
    };
    assert_eq!(block.kind, Some(BlockKind::Code));
    let Some(Node::Text(leaf)) = block.children.first() else {
        panic!("expected leaf");
    };
    assert_eq!(leaf.italics, Some(true));
    assert_eq!(leaf.underline, Some(true));
    assert_eq!(leaf.bold, None);
}

#[test]
fn unbound_keys_fall_through_without_saving() {
    let mut session = Session::open(MemoryStorage::new(), SessionConfig::default());
    session.select_all();

    assert_eq!(session.handle_key(&chord("b")).unwrap(), InputOutcome::Ignored);
    assert_eq!(
        session.handle_key(&chord("ctrl-q")).unwrap(),
        InputOutcome::Ignored
    );
    assert!(session.storage().contents().is_none());
}

#[test]
fn selection_changes_do_not_save() {
    let mut session = Session::open(MemoryStorage::new(), SessionConfig::default());
    session.select_all();
    session.deselect();
    session.select_all();
    assert!(session.storage().contents().is_none());
}

#[test]
fn commands_without_selection_do_not_save() {
    let mut session = Session::open(MemoryStorage::new(), SessionConfig::default());
    assert!(!session.run(Command::ToggleMark(Mark::Bold)).unwrap());
    assert!(!session.run(Command::SetAlign(Align::Right)).unwrap());
    assert!(session.storage().contents().is_none());
}

#[test]
fn toolbar_activation_preserves_selection() {
    let mut session = Session::open(
        MemoryStorage::with_contents(
            r#"[{"type":"paragraph","children":[{"text":"one"}]},{"type":"paragraph","children":[{"text":"two"}]}]"#,
        ),
        SessionConfig::default(),
    );
    let selection = Selection::new(Point::new(vec![0, 0], 0), Point::new(vec![1, 0], 3));
    session.set_selection(selection.clone()).unwrap();

    for button in [
        ToolbarButton::AlignCenter,
        ToolbarButton::CodeBlock,
        ToolbarButton::AlignRight,
    ] {
        let outcome = session.activate(button).unwrap();
        assert_eq!(outcome, InputOutcome::Handled(button.command()));
        assert_eq!(session.editor().selection(), Some(&selection));
    }

    let saved = Document::from_json(&session.storage().contents().unwrap()).unwrap();
    assert_eq!(&saved, session.doc());
    for node in &saved.children {
        let Node::Block(block) = node else {
            panic!("expected block");
        };
        assert_eq!(block.align, Some(Align::Right));
        assert_eq!(block.kind, Some(BlockKind::Code));
    }
}

#[test]
fn clear_key_removes_saved_document_and_reload_uses_default() {
    let storage = MemoryStorage::new();
    let mut session = Session::open(&storage, SessionConfig::default());
    session.select_all();
    session.insert_text("my notes").unwrap();
    assert!(storage.contents().is_some());

    let outcome = session.handle_key(&chord("ctrl-delete")).unwrap();
    assert_eq!(outcome, InputOutcome::Handled(Command::ClearStorage));
    assert!(storage.contents().is_none());
    // The open document is untouched.
    assert_eq!(session.doc(), &Document::with_text("my notes"));

    let reopened = Session::open(&storage, SessionConfig::default());
    assert_eq!(reopened.doc(), &Document::with_text(DEFAULT_TEXT));
}

#[test]
fn saved_document_is_restored_on_open() {
    let storage = MemoryStorage::new();
    {
        let mut session = Session::open(&storage, SessionConfig::default());
        session.select_all();
        session.run(Command::ToggleMark(Mark::Underline)).unwrap();
    }

    let session = Session::open(&storage, SessionConfig::default());
    let Some(leaf) = session.doc().text(&[0, 0]) else {
        panic!("expected leaf");
    };
    assert_eq!(leaf.text, DEFAULT_TEXT);
    assert_eq!(leaf.underline, Some(true));
}

#[test]
fn typing_replaces_selection_and_saves() {
    let storage = MemoryStorage::with_contents(
        r#"[{"type":"paragraph","children":[{"text":"hello world"}]}]"#,
    );
    let mut session = Session::open(storage, SessionConfig::default());
    select_word(&mut session, 6, 11);

    assert!(session.insert_text("there").unwrap());
    assert_eq!(session.doc(), &Document::with_text("hello there"));
    assert_eq!(
        session.editor().selection(),
        Some(&Selection::collapsed(Point::new(vec![0, 0], 11)))
    );
    assert_eq!(
        session.storage().contents().as_deref(),
        Some(r#"[{"type":"paragraph","children":[{"text":"hello there"}]}]"#)
    );
}

#[test]
fn normalizing_session_merges_cleared_runs() {
    let storage = MemoryStorage::with_contents(
        r#"[{"type":"paragraph","children":[{"text":"hello"}]}]"#,
    );
    let config = SessionConfig {
        normalize_text_runs: true,
        ..SessionConfig::default()
    };
    let mut session = Session::open(storage, config);
    select_word(&mut session, 0, 2);

    session.run(Command::ToggleMark(Mark::Bold)).unwrap();
    assert_eq!(session.doc().leaves().len(), 2);

    session.run(Command::ToggleMark(Mark::Bold)).unwrap();
    assert_eq!(session.doc(), &Document::with_text("hello"));
    assert_eq!(
        session.editor().selection(),
        Some(&Selection::new(
            Point::new(vec![0, 0], 0),
            Point::new(vec![0, 0], 2)
        ))
    );
}
