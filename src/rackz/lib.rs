//! # Rackz Architecture
//!
//! Rackz is a **UI-agnostic records-room inventory library**. It tracks physical
//! storage of paper records: racks hold up to 15 numbered boxes, boxes hold up
//! to 100 filed documents. The CLI is one client of the library, not the other
//! way round.
//!
//! ## The Four Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Owns the working Inventory and the NavigationContext     │
//! │  - Thin facade over commands                                │
//! │  - Applies authoritative updates after every mutation       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Pure business logic: capacity, validation, numbering     │
//! │  - Operates on Rust types, returns Rust types               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Abstract InventoryStore trait                            │
//! │  - SnapshotStore, RemoteStore (production)                  │
//! │  - InMemoryStore (testing)                                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Addressing
//!
//! Racks are addressed by identifier (`SSS-RACK-<n>`) or by 1-based display
//! position; boxes by their id within the rack; documents by 1-based position
//! within a box. The [`navigation::NavigationContext`] remembers what is open
//! by identifier, so a remote update that reorders or removes racks never
//! points an open view at the wrong rack.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward (API, commands, storage), code:
//! - Takes regular Rust function arguments
//! - Returns regular Rust types (`Result<CmdResult>`)
//! - **Never** writes to stdout/stderr (diagnostics go through `tracing`)
//! - **Never** calls `std::process::exit`
//! - **Never** prompts; destructive operations take a [`commands::Confirm`]
//!
//! ## Testing Strategy
//!
//! 1. **Commands** (`commands/*.rs`): Thorough unit tests of business logic
//!    against `InMemoryStore` and its fixtures.
//! 2. **Stores** (`store/`): snapshot files in temp dirs; the remote adapter
//!    against `MemoryDatabase`, including two clients sharing one hub.
//! 3. **API** (`api.rs`): dispatch, synchronization and navigation reconciling.
//! 4. **CLI** (`tests/`): end-to-end runs of the binary with `assert_cmd`.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each operation
//! - [`store`]: Persistence port and its backends
//! - [`model`]: Core data types (`Inventory`, `Rack`, `FileBox`, `FiledDocument`)
//! - [`navigation`]: Which rack and box a client has open
//! - [`config`]: Configuration management
//! - [`error`]: Error types
//! - `cli`: Argument parsing, logging setup and printing for the binary (not part of the lib API)

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod navigation;
pub mod store;
