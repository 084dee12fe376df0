//! Integration test crate for clipforge.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on every clipforge crate to verify they work together.

#[cfg(test)]
mod dispatch;

#[cfg(test)]
mod media;

#[cfg(test)]
mod properties;
