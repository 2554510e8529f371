//! Core types shared across cadforge facilities
//!
//! This crate provides foundational types used by the domain model, the
//! geometry backends, and the export pipeline:
//!
//! - **Identifiers**: DocumentId, ObjectId
//! - **Parameter values**: ParamValue, Params, Axis
//! - **Derived geometry**: DerivedProps, Bbox
//! - **Backend mode**: BackendMode flag stamped into history records
//! - **Schema constants**: canonical field keys for history export

pub mod ids;
pub mod mode;
pub mod props;
pub mod schema;
pub mod value;

pub use ids::{DocumentId, ObjectId};
pub use mode::BackendMode;
pub use props::{Bbox, DerivedProps};
pub use value::{Axis, ParamValue, Params};
