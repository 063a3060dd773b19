//! Output table types and schemas.
//!
//! Both the writer and the reader work from these definitions, so a table
//! written by one run can always be read back with the same types.
//!
//! # Module Organization
//!
//! - [`models`]: Row structs for the ancestry table
//! - [`schema`]: Arrow schema matching the row structs

pub mod models;
pub mod schema;

pub use models::*;
pub use schema::*;
