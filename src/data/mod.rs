//! Data module - CSV loading, normalization and selection

mod loader;
mod normalizer;
mod selection;
mod table;

pub use loader::{DataLoader, LoaderError};
pub use normalizer::{parse_period, NormalizeError, NormalizeReport, Normalizer};
pub use selection::{FilteredSubset, PeriodRange, Selection};
pub use table::{CanonicalTable, TableSchema};
