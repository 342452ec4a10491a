//! Internal test modules - whitebox tests with crate access
//!
//! Acceptance scenarios drive a hosted `ListContext` through the test
//! harness and check the engine's observable state after each step.

mod paged_scrolling;
