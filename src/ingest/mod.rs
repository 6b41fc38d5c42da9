//! Reading and writing the flat record format.
//!
//! ```text
//! <node-id>;[<class>;][<name>;]<feature_0>;...;<feature_n-1>
//! ```

pub mod options;
pub mod reader;
pub mod writer;

pub use options::{LoadOptions, DEFAULT_DELIMITER};
pub use reader::read_records;
pub use writer::{write_records, WriteOptions};
