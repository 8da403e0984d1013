use platynui_locpath::simple::{SimpleNode, attr, attr_ns, comment, elem, elem_ns, ns, pi, text};
use platynui_locpath::{ErrorCode, NodeKind, NodeTest};
use rstest::rstest;

const URN: &str = "urn:one";

#[rstest]
#[case(NodeKind::Document)]
#[case(NodeKind::Text)]
#[case(NodeKind::Comment)]
fn name_test_on_unnamed_kind_is_rejected(#[case] kind: NodeKind) {
    let err = NodeTest::name(kind, None, Some("x")).unwrap_err();
    assert_eq!(err.code, ErrorCode::XPST0003);
}

#[rstest]
#[case(Some(URN), Some("target"))]
#[case(Some(URN), None)]
fn namespaced_processing_instruction_test_is_rejected(#[case] ns_uri: Option<&str>, #[case] local: Option<&str>) {
    let err = NodeTest::name(NodeKind::ProcessingInstruction, ns_uri, local).unwrap_err();
    assert!(err.is_construction_error());
}

#[rstest]
fn processing_instruction_target_test() {
    let test = NodeTest::name(NodeKind::ProcessingInstruction, None, Some("xml-stylesheet")).unwrap();
    assert!(test.matches(&pi("xml-stylesheet", "href='a.css'")));
    assert!(!test.matches(&pi("other", "")));
    assert!(!test.matches(&elem("xml-stylesheet").build()));
}

#[rstest]
fn type_only_matches_every_node_of_the_kind() {
    let test = NodeTest::kind(NodeKind::Element);
    assert!(test.is_type_only());
    assert!(test.matches(&elem("a").build()));
    assert!(test.matches(&elem_ns(URN, "a").build()));
    assert!(!test.matches(&text("a")));
    assert!(!test.matches(&attr("a", "1")));

    let texts = NodeTest::kind(NodeKind::Text);
    assert!(texts.matches(&text("hi")));
    assert!(!texts.matches(&comment("hi")));
}

fn candidates() -> Vec<SimpleNode> {
    vec![
        elem("b").build(),
        elem_ns(URN, "b").build(),
        elem("c").build(),
        attr("b", "1"),
        attr_ns(URN, "b", "1"),
        text("b"),
        ns("b", URN),
    ]
}

#[rstest]
#[case(NodeKind::Element, None, Some("b"), vec![0])]
#[case(NodeKind::Element, Some(URN), Some("b"), vec![1])]
#[case(NodeKind::Element, None, None, vec![0, 2])]
#[case(NodeKind::Element, Some(URN), None, vec![1])]
#[case(NodeKind::Attribute, None, Some("b"), vec![3])]
#[case(NodeKind::Attribute, Some(URN), Some("b"), vec![4])]
#[case(NodeKind::Namespace, None, Some("b"), vec![6])]
#[case(NodeKind::Namespace, Some(URN), Some("b"), vec![])]
fn name_test_truth_table(
    #[case] kind: NodeKind,
    #[case] ns_uri: Option<&str>,
    #[case] local: Option<&str>,
    #[case] expected: Vec<usize>,
) {
    let test = NodeTest::name(kind, ns_uri, local).unwrap();
    let matched: Vec<usize> =
        candidates().iter().enumerate().filter(|(_, n)| test.matches(*n)).map(|(i, _)| i).collect();
    assert_eq!(matched, expected);
}

#[rstest]
fn shorthand_constructors_match_name_tests() {
    assert_eq!(NodeTest::element("b"), NodeTest::name(NodeKind::Element, None, Some("b")).unwrap());
    assert_eq!(NodeTest::element_ns(URN, "b"), NodeTest::name(NodeKind::Element, Some(URN), Some("b")).unwrap());
    assert_eq!(NodeTest::attribute("id"), NodeTest::name(NodeKind::Attribute, None, Some("id")).unwrap());
    let t = NodeTest::processing_instruction("go");
    assert_eq!(t.node_kind(), NodeKind::ProcessingInstruction);
    assert_eq!(t.local(), Some("go"));
    assert_eq!(t.ns_uri(), None);
}
