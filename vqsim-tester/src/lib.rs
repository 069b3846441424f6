//! Scenario harness library: the six concrete end-to-end scenarios and
//! the testable-properties invariants, shared between the
//! `vqsim-tester` report binary and this crate's integration tests.

pub mod common;
pub mod properties;
pub mod scenarios;
pub mod support;
