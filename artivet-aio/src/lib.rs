// artivet-aio/src/lib.rs
//! Blocking filesystem operations for artivet (metadata, removal, atomic
//! writes, json documents)

pub mod fs;
pub mod json_io;

pub use fs::*;
pub use json_io::{read_json, write_json};
