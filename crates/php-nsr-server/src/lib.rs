//! PHP namespace resolver language server.
//!
//! Imports, expands and sorts class references and generates namespace
//! statements, driven by `workspace/executeCommand`.

pub mod commands;
pub mod editor;
pub mod host;
pub mod server;

pub use server::NamespaceResolverBackend;
