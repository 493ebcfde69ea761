//! Common test utilities for query API testing.
//!
//! - [`harness`] - Test servers and stub executors
//! - [`fixtures`] - Test records
//! - [`assertions`] - Error envelope and content type assertions

#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;
pub mod harness;
