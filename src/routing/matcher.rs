//! Subdomain ↔ path prefix matching.
//!
//! # Responsibilities
//! - Hold the set of known section names
//! - Map a host's left-most label to a section
//! - Map a path's first segment to a section plus the remaining segments
//!
//! # Design Decisions
//! - Membership is an exact, case-sensitive set lookup (no prefix matching)
//! - Immutable after construction; shared across requests without locks
//! - Knows nothing about bucket sections or the canonical domain

use std::collections::HashSet;

/// Known section names, parsed from a comma-separated list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubdomainSet {
    names: HashSet<String>,
}

impl SubdomainSet {
    /// Build from a comma-separated list. Entries are trimmed and empty
    /// entries are dropped.
    pub fn parse(list: &str) -> Self {
        let names = list
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
        Self { names }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// A path whose first segment names a known section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub subdomain: String,
    /// Segments after the section prefix, in original order.
    pub wildcard_paths: Vec<String>,
}

/// Bidirectional mapping between section subdomains and path prefixes.
#[derive(Debug, Clone, Default)]
pub struct SubdomainPathMatcher {
    subdomains: SubdomainSet,
}

impl SubdomainPathMatcher {
    pub fn new(subdomains: SubdomainSet) -> Self {
        Self { subdomains }
    }

    pub fn subdomains(&self) -> &SubdomainSet {
        &self.subdomains
    }

    /// The left-most label of `hostname` if it names a known section.
    pub fn subdomain_to_path<'a>(&self, hostname: &'a str) -> Option<&'a str> {
        let label = hostname.split('.').next().unwrap_or(hostname);
        self.subdomains.contains(label).then_some(label)
    }

    /// Split off a leading section segment.
    pub fn path_to_subdomain<S: AsRef<str>>(&self, segments: &[S]) -> Option<MatchResult> {
        let (first, rest) = segments.split_first()?;
        let first = first.as_ref();
        if !self.subdomains.contains(first) {
            return None;
        }

        Some(MatchResult {
            subdomain: first.to_string(),
            wildcard_paths: rest.iter().map(|s| s.as_ref().to_string()).collect(),
        })
    }
}
