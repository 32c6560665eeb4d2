//! Resilience subsystem.
//!
//! # Responsibilities
//! - Keep upstream redirects from turning into client-visible loops
//!
//! # Design Decisions
//! - No retries or circuit breaking: upstream failures surface
//!   directly to the client
//! - Per-fetch timeouts live on the upstream client (see `upstream`)

pub mod redirect_guard;

pub use redirect_guard::{GuardVerdict, RedirectLoopGuard};
