//! Cross-module tests.
//!
//! These drive several views over one shared tab storage, the way the
//! browser client wires them together.

mod listing_tests;
