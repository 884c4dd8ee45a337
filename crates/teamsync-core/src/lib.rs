//! Cross-cutting service plumbing: health handlers, tracing setup,
//! request-id layers, and serde helpers.

pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
