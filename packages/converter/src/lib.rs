//! Jaxine - spec driven conversion of XML elements into native object trees.
//!
//! An element is built from its attributes, its child elements and its
//! text, shaped by a declarative [`Spec`]. Elements can inherit from
//! sibling elements named in a recurse attribute, attribute values can be
//! coerced into typed [`Value`]s, and children can be aggregated into a
//! list, an index or groups.
//!
//! # Example
//!
//! ```
//! use jaxine::xml::Document;
//! use jaxine::{build_element, default_options, presets, select_element_node_by_id, Value};
//!
//! let doc = Document::parse(r#"<Commands>
//!     <Command name="base" verbose="true"><Arg name="path"/></Command>
//!     <Command name="list" inherits="base"><Arg name="all"/></Command>
//! </Commands>"#).unwrap();
//! let root = doc.root_element();
//! let list = select_element_node_by_id(&root, "Command", "name", "list").unwrap();
//!
//! let element = build_element(&list, &root, &presets::default_spec(), &|_: &str| {
//!     default_options()
//! })
//! .unwrap();
//!
//! assert_eq!(element.get("verbose"), Some(&Value::Bool(true)));
//! assert_eq!(element.get("_children").unwrap().as_array().unwrap().len(), 2);
//! ```
//!
//! # Architecture
//!
//! - [`spec`]: the spec, its validator, element options and presets
//! - [`coercion`]: the matcher chain turning raw strings into values
//! - [`builder`]: element building, inheritance and descendant aggregation
//! - [`node`]: the node access trait the builder works against
//! - [`xml`]: node access for quick-xml and roxmltree trees
//! - [`value`]: built elements and values
//! - [`converter`]: validating entry point
//! - [`cli`]: command-line interface

pub mod builder;
pub mod cli;
pub mod coercion;
pub mod config;
pub mod converter;
pub mod error;
pub mod node;
pub mod spec;
pub mod value;
pub mod xml;

// Re-export main functions
pub use builder::{build_element, build_local_attributes, compose_text};
pub use converter::Converter;
pub use node::{select_element_node_by_id, NodeAccess};

// Re-export commonly used items
pub use coercion::{Coercer, CoercionContext};
pub use error::{ConverterError, Result};
pub use spec::{
    default_options, presets, validate_spec, ElementOptions, OptionsLookup, OptionsRegistry, Spec,
};
pub use value::{BuiltElement, Symbol, Value};
