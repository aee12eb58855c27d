//! Integration tests for url-sweep
//!
//! These tests use wiremock to stand in for the probed sites and run
//! classifiers, the worker pool, and full sweeps end-to-end.

mod probe_tests;
