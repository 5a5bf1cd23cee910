use crate::error::ModelError;
use crate::traits::SeriesProvider;
use ahash::AHashMap;
use ndarray::Array1;

/// Series provider backed by an in-memory map
pub mod in_memory_provider;
/// Averaging several dated series into one sector series
pub mod sector_merge;

pub use in_memory_provider::*;
pub use sector_merge::*;
