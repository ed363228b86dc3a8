//! BLE advertisement scanning
//!
//! Walks the AD structure sequence of a raw advertisement and extracts the
//! GAP Service Data (16-bit UUID) element carrying a vendor sensor payload.

pub mod advertisement;

pub use advertisement::{extract_service_data16, AdStructure, AdStructures, ServiceData16};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BleAdError {
    #[error("AD structure {index} malformed: length={length} at offset {offset} of {total} bytes")]
    Malformed {
        index: usize,
        offset: usize,
        length: usize,
        total: usize,
    },

    #[error("no Service Data (16-bit UUID) structure in advertisement ({structures} structures scanned)")]
    ServiceDataNotFound { structures: usize },
}
