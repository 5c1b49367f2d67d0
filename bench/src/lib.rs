//! Benchmark utilities for Kestrel.
//!
//! - **Components**: representative component types, including marker types for wide
//!   signatures
//! - **Workloads**: seeded world builders so runs are reproducible
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench -p kestrel_bench
//!
//! # Run specific benchmark group
//! cargo bench -p kestrel_bench -- create
//! ```
//!
//! Results are written to `target/criterion/` with HTML reports for visualization.

pub mod components;
pub mod workload;
