//! Data quality flagging module.
//!
//! This module annotates each row with the quality checks it fails, such as
//! a missing customer name, an invalid email or a non-positive purchase
//! amount.

mod flagger;

pub use flagger::{QualityCheck, QualityCounts, QualityFlagger, annotate_row};
