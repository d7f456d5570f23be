//! Client application admin console library
//!
//! This module exposes the console's building blocks so the binary and the
//! integration tests share one router.

pub mod cache;
pub mod cli;
pub mod data;
pub mod ui;
pub mod web;
