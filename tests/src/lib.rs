//! # StateHub Test Suite
//!
//! Unified test crate for cross-crate scenarios and benchmarks.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Shared state shapes, recording plugins, registry lock
//! └── integration/      # Cross-crate scenarios
//!     ├── registry_flows.rs
//!     └── devtools_flow.rs
//! tests/benches/
//! └── statehub_benchmarks.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p statehub-tests
//!
//! # By category
//! cargo test -p statehub-tests integration::registry_flows
//!
//! # Benchmarks
//! cargo bench -p statehub-tests
//! ```

#![allow(dead_code)]

pub mod fixtures;
pub mod integration;
