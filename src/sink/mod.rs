//! Durable stage outputs
//!
//! Both stores are append-only CSV files. Deduplication happens only when
//! the link store is loaded for extraction; the record store keeps every row.

pub mod csv_sink;
pub mod errors;
pub mod link_store;

pub use csv_sink::{CsvSink, SinkHandle, SinkStats, SinkTask, finish};
pub use errors::{SinkError, SinkResult};
pub use link_store::{LinkRow, load_distinct, truncate};
