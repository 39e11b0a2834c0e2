//! Forest Bear library crate: re-exports all modules for integration testing.
//!
//! The binary crate (`main.rs`) is the actual game entry point.
//! This library crate exposes the same modules so that `tests/` integration
//! tests can drive the patrol, detection and dialogue systems without a
//! window, a GPU, or a network connection.

pub mod shared;
pub mod config;
pub mod player;
pub mod world;
pub mod npcs;
pub mod ai;
pub mod ui;
