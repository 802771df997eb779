//! Record loading module
//!
//! This module provides functionality for loading result records from disk.

mod jsonl;

pub use jsonl::JsonlLoader;
