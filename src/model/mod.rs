//! Data models for the frametag engine.

mod label;
mod span;

pub use label::{LabelDef, LabelSchema};
pub use span::Span;
