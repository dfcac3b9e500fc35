//! Concrete XML trees the builder can walk.
//!
//! - [`dom`]: a small arena tree read with quick-xml. It keeps raw text and
//!   CDATA runs apart, so each run is trimmed on its own when text is composed.
//! - [`tree`]: [`NodeAccess`](crate::node::NodeAccess) for `roxmltree` nodes.
//!   roxmltree merges adjacent text and CDATA into one node; everything else
//!   behaves the same.

pub mod dom;
pub mod tree;

pub use dom::{Document, Node};
pub use tree::{find_by_path, find_child, get_tag_name};
