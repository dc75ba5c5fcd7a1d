//! Loading and searching TR-181 device data-model definitions
//!
//! A data-model definition file is an XML document made of `object` elements, each holding zero
//! or more `parameter` elements. This crate flattens such a document into an ordered list of
//! fully-qualified parameter names ([`model::DataModel`]), and filters that list against a text
//! query with optional case sensitivity and access constraint ([`filter::Query`]).
//!
//! Applications drive both steps through a [`session::Session`], which owns the loaded model and
//! re-runs the filter whenever the query changes.
//!
//! ```
//! use tr181_common::{AccessFilter, DataModel, Query};
//!
//! let xml = r#"<model>
//!     <object name="Device.WiFi.">
//!         <parameter name="Enable" access="readWrite"/>
//!         <parameter name="Status" access="readOnly"/>
//!     </object>
//! </model>"#;
//! let model = DataModel::load_from_str(xml).unwrap();
//! let query = Query::new("enable").with_access_filter(AccessFilter::ReadWriteOnly);
//! assert_eq!(query.apply(model.entries()), vec!["Device.WiFi.Enable"]);
//! ```
#![warn(missing_docs, missing_copy_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod access;
pub mod config;
pub mod filter;
pub mod model;
pub mod session;

pub use access::{AccessFilter, AccessKind};
pub use filter::{filter, Query};
pub use model::{DataModel, LoadError, NameJoin, ParameterEntry};
pub use session::Session;
