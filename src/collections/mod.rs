//! In-memory record containers

pub mod record_list;

pub use record_list::{Changeset, Iter, RecordList};
