//! Shared fixtures for the integration tests.

#![allow(dead_code)]

pub mod source_fixtures;
pub mod workspace;

pub use workspace::TestWorkspace;
