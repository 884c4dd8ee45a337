//! Domain types shared across the TeamSync backend.
//!
//! This crate contains only pure types and validation rules with no
//! framework dependencies. Import in `usecase/` and `domain/` layers;
//! never in `infra/` or `handlers/`.

pub mod user;
pub mod validate;
