//! Analysis payload schema
//!
//! This module defines the input boundary (the backend's analysis payload)
//! and one typed record shape per metric stream.

mod raw_payload;
mod streams;

pub use raw_payload::*;
pub use streams::*;
