//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Build document source → Start settings store
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Broadcast → Refresher exits at its next wait → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then backend, then the store
//! - A refresh in flight is allowed to finish before the loop exits

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
