pub mod header;
pub mod indicators;
