//! Label record import/export system.
//!
//! A record is the on-disk label table for one video. It is written next to
//! the video as `<stem>_labels.csv` and is always saved in the canonical
//! frame table format. Older sparse records are still readable.
//!
//! ## Supported Formats
//!
//! - **Frame table**: Native format, one row per frame (`frame_index,label`)
//! - **Legacy sparse**: Import only, one row per labeled frame (`frame,mode,group`)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use frametag::format::{FormatRegistry, LoadOptions, RecordFormat, record_path};
//!
//! let registry = FormatRegistry::new();
//! let path = record_path(video);
//! let result = registry.native().load(&path, &schema, frame_count, &LoadOptions::default())?;
//! registry.native().save(&result.store, &path)?;
//! ```

mod auto_save;
mod error;
pub mod formats;
mod registry;
mod traits;

pub use auto_save::AutoSaveManager;
pub use error::FormatError;
pub use registry::{FormatRegistry, record_path};
pub use traits::{
    FormatWarning, LoadOptions, LoadResult, RecordFormat, SaveResult, UnknownLabelPolicy,
    WarningSeverity,
};
