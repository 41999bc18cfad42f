use richtext_core::{
    Align, BlockKind, BlockNode, Document, Mark, MemoryStorage, Node, TextNode, load_document,
    save_document,
};
use serde_json::json;

fn sample() -> Document {
    Document::new(vec![
        Node::Block(BlockNode {
            kind: Some(BlockKind::Paragraph),
            align: Some(Align::Center),
            children: vec![
                Node::Text(TextNode::new("plain ")),
                Node::Text(
                    TextNode::new("bold italic")
                        .with_mark(Mark::Bold, true)
                        .with_mark(Mark::Italics, true),
                ),
                Node::Text(TextNode::new(" not underlined").with_mark(Mark::Underline, false)),
            ],
        }),
        Node::Block(BlockNode {
            kind: Some(BlockKind::Code),
            align: None,
            children: vec![Node::Text(TextNode::new("fn main() {}\n"))],
        }),
        Node::Block(BlockNode {
            kind: None,
            align: Some(Align::Left),
            children: vec![Node::Text(TextNode::new("üñíçødé"))],
        }),
    ])
}

#[test]
fn save_then_load_yields_equal_tree() {
    let storage = MemoryStorage::new();
    let doc = sample();

    save_document(&storage, &doc).unwrap();
    let loaded = load_document(&storage, Document::default);
    assert_eq!(loaded, doc);
}

#[test]
fn json_layout_matches_documented_shape() {
    let value: serde_json::Value = serde_json::from_str(&sample().to_json().unwrap()).unwrap();
    assert_eq!(
        value,
        json!([
            {
                "type": "paragraph",
                "align": "center",
                "children": [
                    { "text": "plain " },
                    { "text": "bold italic", "bold": true, "italics": true },
                    { "text": " not underlined", "underline": false },
                ],
            },
            { "type": "code", "children": [{ "text": "fn main() {}\n" }] },
            { "align": "left", "children": [{ "text": "üñíçødé" }] },
        ])
    );
}

#[test]
fn null_attributes_read_as_absent() {
    let doc = Document::from_json(
        r#"[{"type":null,"align":null,"children":[{"text":"x","bold":null}]}]"#,
    )
    .unwrap();
    assert_eq!(
        doc,
        Document::new(vec![Node::Block(BlockNode {
            kind: None,
            align: None,
            children: vec![Node::Text(TextNode::new("x"))],
        })])
    );
    assert_eq!(doc.to_json().unwrap(), r#"[{"children":[{"text":"x"}]}]"#);
}

#[test]
fn nested_blocks_round_trip() {
    let doc = Document::new(vec![Node::Block(BlockNode {
        kind: None,
        align: None,
        children: vec![Node::paragraph("inner"), Node::code_block("code")],
    })]);
    let json = doc.to_json().unwrap();
    assert_eq!(Document::from_json(&json).unwrap(), doc);
}

#[test]
fn unreadable_storage_falls_back_to_default() {
    for contents in ["", "{}", "[{\"text\":", "[{\"type\":\"quote\",\"children\":[]}]"] {
        let storage = MemoryStorage::with_contents(contents);
        let doc = load_document(&storage, || Document::with_text("default"));
        assert_eq!(doc, Document::with_text("default"), "contents: {contents:?}");
    }
}

#[test]
fn empty_array_is_a_valid_document() {
    let storage = MemoryStorage::with_contents("[]");
    let doc = load_document(&storage, || Document::with_text("default"));
    assert!(doc.children.is_empty());
}
