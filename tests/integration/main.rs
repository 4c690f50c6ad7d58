//! Integration tests for Paper-Harvest
//!
//! These tests use wiremock to serve abstract pages and run the full
//! fetch, extract and write cycle end-to-end.

mod common;

mod analysis_tests;
mod failure_tests;
mod harvest_tests;
