//! Configuration building blocks: loose and normalized compilation flags, and
//! the `defines` normalizer. Consumed by the high-level `api` module.
pub mod defines;
pub mod params;
