//! Test utilities for unit and HTTP-level testing.
//!
//! This module provides:
//! - Test data factories for creating valid test fixtures
//! - In-memory repository implementations for mocking persistence
//! - `TestAppStateBuilder` for wiring an `AppState` around those mocks

mod app_state_builder;
mod factories;
mod in_memory;

pub use app_state_builder::*;
pub use factories::*;
pub use in_memory::*;
