//! Testing utilities and fixtures
//!
//! Shared event builders and proptest strategies used by the engine unit
//! and property tests.

pub mod fixtures;
