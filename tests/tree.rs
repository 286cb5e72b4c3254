use indoc::indoc;
use yaml_registry::{Location, Node, NodeKind, Options, parse_stream};

fn body(yaml: &str) -> Node {
    let stream = parse_stream(yaml, &Options::default()).expect("valid YAML");
    assert_eq!(stream.documents.len(), 1);
    stream.documents[0].body.clone().expect("document body")
}

fn entries(node: &Node) -> &[Node] {
    match &node.kind {
        NodeKind::Mapping(entries) => entries,
        other => panic!("expected a mapping, got {other:?}"),
    }
}

fn value(entry: &Node) -> &Node {
    match &entry.kind {
        NodeKind::MappingEntry { value, .. } => value,
        other => panic!("expected an entry, got {other:?}"),
    }
}

#[test]
fn scalars_are_typed_and_keep_their_text() {
    let yaml = indoc! {"
        int: 0x1F
        float: 1e3
        quoted: '30'
        bool: True
        null: ~
        inf: -.inf
        nan: .NaN
    "};
    let root = body(yaml);
    let kinds: Vec<&NodeKind> = entries(&root).iter().map(|e| &value(e).kind).collect();
    assert_eq!(
        kinds,
        [
            &NodeKind::Integer("0x1F".into()),
            &NodeKind::Float("1e3".into()),
            &NodeKind::String("30".into()),
            &NodeKind::Boolean(true),
            &NodeKind::Null,
            &NodeKind::Infinity { negative: true },
            &NodeKind::NaN,
        ]
    );
}

#[test]
fn block_scalars_become_literal_blocks() {
    let root = body("text: |\n  one\n  two\n");
    match &value(&entries(&root)[0]).kind {
        NodeKind::LiteralBlock(inner) => {
            assert_eq!(inner.kind, NodeKind::String("one\ntwo".into()))
        }
        other => panic!("expected a literal block, got {other:?}"),
    }
}

#[test]
fn node_locations() {
    let yaml = indoc! {"
        outer:
          inner: value
    "};
    let root = body(yaml);
    let outer = &entries(&root)[0];
    assert_eq!(outer.location, Location::new(1, 6));

    let inner = &entries(value(outer))[0];
    assert_eq!(inner.location, Location::new(2, 8));
    assert_eq!(value(inner).location, Location::new(2, 10));
}

#[test]
fn documents_and_directives() {
    let yaml = "%YAML 1.2\n---\na: 1\n...\n---\nb: 2\n";
    let stream = parse_stream(yaml, &Options::default()).unwrap();
    assert_eq!(stream.documents.len(), 2);
    assert_eq!(
        stream.documents[0].directives,
        [Node::new(NodeKind::Directive("%YAML 1.2".into()), Location::new(1, 1))]
    );
    assert!(stream.documents[1].directives.is_empty());
}

#[test]
fn empty_input_has_no_documents() {
    let stream = parse_stream("", &Options::default()).unwrap();
    assert!(stream.documents.is_empty());
    let stream = parse_stream("# only a comment\n", &Options::default()).unwrap();
    assert!(stream.documents.is_empty());
}

#[test]
fn unsupported_constructs_stay_visible() {
    let root = body("a: &x 1\nb: *x\nc: !t v\n");
    let kinds: Vec<&NodeKind> = entries(&root).iter().map(|e| &value(e).kind).collect();
    assert!(matches!(kinds[0], NodeKind::Anchor { .. }));
    assert!(matches!(kinds[1], NodeKind::Alias { .. }));
    assert!(matches!(kinds[2], NodeKind::Tag { .. }));
}
