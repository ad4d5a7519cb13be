//! Prompt module for LLM-based operations.
//!
//! This module provides the system instruction templates the prompt proxy
//! prepends to every conversation.

pub mod assistant;

pub use assistant::*;
