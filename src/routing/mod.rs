//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (origin, hostname, path, query)
//!     → router.rs (ordered rule chain)
//!     → matcher.rs (host label / path prefix ↔ section)
//!     → url.rs (target URL construction)
//!     → Return: exactly one RouteDecision
//!
//! Construction (at startup):
//!     SiteConfig
//!     → Parse comma-separated section list
//!     → Freeze as immutable RouteResolver
//! ```
//!
//! # Design Decisions
//! - Resolver built at startup, immutable at runtime
//! - No regex in hot path (set lookups and string comparisons only)
//! - Deterministic: same input always yields the same decision
//! - First match wins (rule order is fixed)

pub mod matcher;
pub mod router;
pub mod url;

pub use matcher::{MatchResult, SubdomainPathMatcher, SubdomainSet};
pub use router::{BucketKind, RouteDecision, RouteRequest, RouteResolver, REDIRECT_STATUS};
