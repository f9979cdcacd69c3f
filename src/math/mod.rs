//! Mathematical utilities and data structures

pub mod block_box;

pub use block_box::BlockBox;
