//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, timeout)
//!     → request.rs (origin, hostname, path, query)
//!     → routing::RouteResolver (decision)
//!     → proxy.rs (redirect / fetch / object lookup)
//!     → link_rewriter.rs (virtual-origin HTML only)
//!     → response.rs (relay, strip hop-by-hop headers)
//!     → Send to client
//! ```

pub mod link_rewriter;
pub mod proxy;
pub mod request;
pub mod response;
pub mod server;

pub use link_rewriter::LinkRewriter;
pub use request::RequestTarget;
pub use server::{AppState, HttpServer};
