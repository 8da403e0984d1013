//! Lazy evaluation of XPath location paths.
//!
//! The crate evaluates already-resolved location paths: every [`Step`] combines an axis
//! function, an optional node test or position filter and an ordered list of predicates.
//! Steps chain into a [`Path`]; paths combine into a [`Union`]. Results are pulled one node
//! at a time and only the operations that need the whole sequence (reversal, `[last()]`,
//! union sorting) buffer.
//!
//! ```
//! use platynui_locpath::simple::{elem, SimpleNode};
//! use platynui_locpath::{Axis, Context, NodeTest, Path, Step};
//!
//! // <a><b/><c/><b/></a>
//! let a = elem("a").child(elem("b")).child(elem("c")).child(elem("b")).build();
//!
//! let second_b = Step::along(Axis::Child).test(NodeTest::element("b")).position(2).build().unwrap();
//! let path: Path<SimpleNode> = Path::new([second_b]);
//! let out: Vec<SimpleNode> = path.evaluate(&Context::new(a.clone()), None).collect::<Result<_, _>>().unwrap();
//! assert_eq!(out.len(), 1);
//! ```

pub mod axes;
pub mod context;
pub mod error;
pub mod filter;
pub mod model;
pub mod path;
pub mod position;
pub mod predicate;
pub mod reverse;
pub mod sequence;
pub mod simple;
pub mod step;
pub mod union;

pub use axes::Axis;
pub use context::Context;
pub use error::{Error, ErrorCode};
pub use filter::{Filter, NodeTest};
pub use model::{NodeKind, QName, TreeNode, XdmNode, compare_by_ancestry};
pub use path::{Path, PathIter};
pub use position::PositionFilter;
pub use predicate::Predicate;
pub use reverse::{ReverseSequence, reverse};
pub use sequence::{NodeResult, NodeSeq};
pub use step::{AxisFn, Step, StepBuilder, StepIter, StepPhase};
pub use union::{Union, sort_distinct, union};
