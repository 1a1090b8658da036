//! Wind flow viewer pipeline.
//!
//! One run per invocation: fetch the [U, V] grid payload from the configured
//! endpoint, validate its shape and invariants, and hand the tagged result
//! to the flow renderer attached to the map surface.

pub mod config;
pub mod fetch;
pub mod layer;
pub mod notify;
pub mod present;
