//! Record materialization strategies shipped with linkage.
//!
//! Applications that want their own record types implement
//! [`linkage_api::RecordStrategy`] directly.

mod plain;

pub use plain::{Field, PlainRecord, PlainStrategy};
