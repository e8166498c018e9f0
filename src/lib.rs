// ABOUTME: Library root for supportchat. Re-exports all modules for integration testing.
// ABOUTME: The binary entry point is in main.rs, which uses this crate as a library.

pub mod app;
pub mod channel;
pub mod config;
pub mod controller;
pub mod linkify;
pub mod session;
pub mod tui;
