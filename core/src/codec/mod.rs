//! Line-oriented text persistence for paths and chapter stats.

mod error;
pub mod path_file;
pub mod room_line;
pub mod stats_file;

pub use error::CodecError;
