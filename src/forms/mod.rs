//! Dynamic form engine (server side)
//!
//! Visibility evaluation, submission validation and public field
//! descriptors for the form builder.

pub mod visibility;

pub use visibility::{FieldDescriptor, describe_fields, validate_submission, visible_fields};
