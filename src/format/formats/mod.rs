//! Record format implementations.

mod frame_table;
mod legacy_sparse;

#[cfg(test)]
mod tests;

pub use frame_table::{FRAME_TABLE_HEADER, FrameTableFormat};
pub use legacy_sparse::LegacySparseFormat;
