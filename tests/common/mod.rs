//! Common test utilities shared across integration tests

pub mod fixture;
pub mod helpers;

pub use fixture::{BASE, TestFixture};
pub use helpers::{git_command, git_in};
