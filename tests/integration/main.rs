//! Integration tests for the scrape pipeline
//!
//! These tests use wiremock to stand in for a coach directory and run the
//! full fetch-extract-load cycle against a temporary cache and database.

mod common;
mod scrape_tests;
