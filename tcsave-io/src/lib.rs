//! # tcsave I/O
//!
//! A JSON reference implementation of the save codec seam, and discovery of
//! the game's save directory with helpers to read and write schematic
//! circuit files.

pub mod json;
pub mod save_dir;

pub use json::{JsonCodec, JsonCodecError};
pub use save_dir::{read_circuit, write_circuit, SaveDirectory, SaveIoError};
