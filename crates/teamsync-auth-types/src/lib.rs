//! Session-claim types shared between the API service and test helpers.
//!
//! Provides JWT claim layout, issuance, and validation.

pub mod token;
