//! Unit tests for record format implementations.
//!
//! These tests cover parsing, validation of malformed records, and
//! save/load round trips through the file system.

mod frame_table_tests;
mod roundtrip_tests;
