//! CDDL Language Server Protocol implementation for IDE integration.
//!
//! Provides parse diagnostics on open/change, prelude and control
//! operator completion with lazy resolve, hover reference cards, and
//! go-to-definition over the last clean parse. Connects to editors via
//! the `cddl lsp` CLI subcommand over stdio.

pub mod completion;
pub mod config;
pub mod definition;
pub mod diagnostics;
pub mod document;
pub mod hover;
pub mod ident;
pub mod position;
pub mod reference;
pub mod server;

/// Run the LSP server over stdio. This is the public entry point
/// called by `cddl lsp`.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    server::run()
}
