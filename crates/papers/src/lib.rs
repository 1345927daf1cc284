//! Exam paper shelf core.
//!
//! This crate organizes a tree of exam paper files into logical records and
//! tracks per-record completion:
//! - Path codec between file paths and record identity
//! - Record indexer grouping files into records with variant slots
//! - Persisted completion sidecar with reconciliation
//! - Multi-dimensional incremental filter engine

pub mod codec;
pub mod error;
pub mod filter;
pub mod indexer;
pub mod open;
pub mod status;
pub mod types;

pub use codec::{decode_path, encode_path, extension_for, RawPaper};
pub use error::{PapersError, Result};
pub use filter::{FilterDimension, FilterEngine, FilterValue, FilteredView};
pub use indexer::index_records;
pub use open::open_external;
pub use status::{reconcile, StatusEntry, StatusStore};
pub use types::{
    subject_name, Aggregate, PaperId, PaperRecord, Series, Variant, VariantSlots, SUBJECTS,
};
