use core::cmp::Ordering;

use platynui_locpath::sequence::{self, collect_nodes};
use platynui_locpath::simple::{SimpleNode, doc, elem};
use platynui_locpath::{
    Axis, Context, Error, ErrorCode, NodeKind, NodeTest, Path, QName, Step, TreeNode, Union, XdmNode, sort_distinct,
    union,
};
use rstest::{fixture, rstest};

type N = SimpleNode;

// <doc><lib><book><t/></book><book><t/><t/></book><mag><t/></mag></lib></doc>
#[fixture]
fn library() -> N {
    doc()
        .child(
            elem("lib")
                .child(elem("book").child(elem("t")))
                .child(elem("book").child(elem("t")).child(elem("t")))
                .child(elem("mag").child(elem("t"))),
        )
        .build()
}

fn child(name: &str) -> Step<N> {
    Step::along(Axis::Child).test(NodeTest::element(name)).build().unwrap()
}

#[rstest]
fn path_threads_each_step_output_into_the_next(library: N) {
    let path = Path::new([child("lib"), child("book"), child("t")]);
    let out = collect_nodes(path.evaluate(&Context::new(library.clone()), None)).unwrap();
    let lib = library.children()[0].clone();
    let books = lib.children();
    let mut expected = books[0].children();
    expected.extend(books[1].children());
    assert_eq!(out, expected);
}

#[rstest]
fn path_equals_nested_step_evaluation(library: N) {
    let s1 = Step::along(Axis::Descendant).test(NodeTest::element("book")).build().unwrap();
    let s2 = Step::along(Axis::Child).position(2).build().unwrap();
    let ctx = Context::new(library.clone());
    let via_path = collect_nodes(Path::new([s1.clone(), s2.clone()]).evaluate(&ctx, None)).unwrap();
    let nested = collect_nodes(s2.evaluate(&ctx, Some(Box::new(s1.evaluate(&ctx, None))))).unwrap();
    assert_eq!(via_path, nested);
    assert_eq!(via_path.len(), 1);
}

#[rstest]
fn empty_path_yields_its_input(library: N) {
    let path: Path<N> = Path::new([]);
    assert!(path.is_empty());
    let out = collect_nodes(path.evaluate(&Context::new(library.clone()), None)).unwrap();
    assert_eq!(out, vec![library]);
}

#[rstest]
fn path_is_lazy(library: N) {
    let pulled = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let seen = pulled.clone();
    let counting = Step::builder()
        .axis_fn(move |n: &N| {
            seen.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Box::new(Axis::Child.cursor(n))
        })
        .build()
        .unwrap();
    let path = Path::new([child("lib")]).then(counting).then(child("t"));
    let mut it = path.evaluate(&Context::new(library), None);
    assert_eq!(pulled.load(std::sync::atomic::Ordering::SeqCst), 0);
    assert!(it.next().is_some());
    assert_eq!(pulled.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[rstest]
fn union_deduplicates_by_identity_and_sorts(library: N) {
    let lib = library.children()[0].clone();
    let [a, b, c] = <[N; 3]>::try_from(lib.children()).unwrap();
    let d = c.children()[0].clone();
    let s1 = sequence::from_nodes(vec![c.clone(), a.clone(), b.clone(), a.clone()]);
    let s2 = sequence::from_nodes(vec![d.clone(), c.clone()]);
    let out = union([s1, s2]).unwrap();
    assert_eq!(out, vec![a, b, c, d]);
}

#[rstest]
fn union_of_paths(library: N) {
    let books = Path::new([child("lib"), child("book")]);
    let mags_and_books = Path::new([
        child("lib"),
        Step::along(Axis::Child).test(NodeTest::kind(NodeKind::Element)).build().unwrap(),
    ]);
    let u = Union::new([mags_and_books, books]);
    let ctx = Context::new(library.clone());
    let out = u.evaluate(&ctx, None).unwrap();
    assert_eq!(out, library.children()[0].children());

    let streamed = collect_nodes(u.stream(&ctx, None)).unwrap();
    assert_eq!(streamed, out);
}

#[rstest]
fn union_stream_waits_for_the_first_pull(library: N) {
    let pulled = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let seen = pulled.clone();
    let counting = Step::builder()
        .axis_fn(move |n: &N| {
            seen.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Box::new(Axis::Child.cursor(n))
        })
        .build()
        .unwrap();
    let everything = Path::new([child("lib"), counting]);
    let books = Path::new([child("lib"), child("book")]);
    let mut stream = Union::new([books, everything]).stream(&Context::new(library.clone()), None);
    assert_eq!(pulled.load(std::sync::atomic::Ordering::SeqCst), 0);

    let lib = library.children()[0].clone();
    let expected = lib.children();
    assert_eq!(stream.next().transpose().unwrap(), Some(expected[0].clone()));
    assert_eq!(pulled.load(std::sync::atomic::Ordering::SeqCst), 1);
    assert_eq!(stream.next().transpose().unwrap(), Some(expected[1].clone()));
    assert_eq!(stream.next().transpose().unwrap(), Some(expected[2].clone()));
    assert!(stream.next().is_none());
    assert!(stream.next().is_none());
    assert_eq!(pulled.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[rstest]
fn union_stream_reports_a_failed_merge_once() {
    let one = elem("one").build();
    let other = elem("other").build();
    let stray = Step::builder().axis_fn(move |_: &N| sequence::once(other.clone())).build().unwrap();
    let u = Union::new([Path::new([]), Path::new([stray])]);
    let mut stream = u.stream(&Context::new(one), None);
    assert_eq!(stream.next().unwrap().unwrap_err().code, ErrorCode::FOER0000);
    assert!(stream.next().is_none());
}

#[rstest]
fn sort_distinct_of_empty_is_empty() {
    assert!(sort_distinct::<N>(Vec::new()).unwrap().is_empty());
}

#[rstest]
fn nodes_of_different_trees_cannot_be_ordered() {
    let one = elem("one").build();
    let two = elem("two").build();
    let err = union([sequence::once(one), sequence::once(two)]).unwrap_err();
    assert_eq!(err.code, ErrorCode::FOER0000);
}

#[rstest]
fn operand_failure_aborts_union(library: N) {
    let err = union([sequence::once(library), sequence::failed(Error::dynamic("operand"))]).unwrap_err();
    assert_eq!(err.message, "operand");
}

// Flat adapter with precomputed pre-order keys, as a database-backed tree would provide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Row {
    id: u64,
    tree: u8,
}

impl XdmNode for Row {
    fn kind(&self) -> NodeKind {
        NodeKind::Element
    }
    fn name(&self) -> Option<QName> {
        Some(QName::local(format!("row{}", self.id)))
    }
    fn compare_document_order(&self, other: &Self) -> Result<Ordering, Error> {
        if self.tree != other.tree {
            return Err(Error::dynamic("rows of different tables"));
        }
        Ok(self.id.cmp(&other.id))
    }
    fn doc_order_key(&self) -> Option<u64> {
        Some(self.id)
    }
}

#[rstest]
fn doc_order_keys_are_preferred_over_the_comparator() {
    // keys never fail, even across "tables"
    let rows = vec![Row { id: 9, tree: 1 }, Row { id: 2, tree: 2 }, Row { id: 9, tree: 1 }, Row { id: 5, tree: 1 }];
    let out = sort_distinct(rows).unwrap();
    let ids: Vec<u64> = out.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![2, 5, 9]);
}

#[rstest]
fn steps_work_over_any_adapter() {
    let rows: Vec<Row> = (1..=5).map(|id| Row { id, tree: 0 }).collect();
    let all = rows.clone();
    let step = Step::builder()
        .axis_fn(move |_: &Row| sequence::from_nodes(all.clone()))
        .test(NodeTest::element("row4"))
        .build()
        .unwrap();
    let out = collect_nodes(step.evaluate(&Context::new(rows[0].clone()), None)).unwrap();
    assert_eq!(out, vec![rows[3].clone()]);
}
