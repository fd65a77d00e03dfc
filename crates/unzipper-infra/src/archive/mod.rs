//! Archive extraction
//!
//! This module unpacks uploaded ZIP archives into an upload directory.

pub use extract::{extract_zip, ExtractError, ExtractLimits, ExtractSummary};

mod extract;
