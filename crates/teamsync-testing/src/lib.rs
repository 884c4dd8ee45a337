//! Test utilities for the TeamSync backend.
//!
//! Provides `TestAuth` for minting real signed bearer tokens in tests.
//! Import in `#[cfg(test)]` blocks and `tests/` targets only — never in
//! production code.

pub mod auth;
