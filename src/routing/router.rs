//! Route resolution.
//!
//! # Responsibilities
//! - Apply the ordered rule chain to one request
//! - Return exactly one `RouteDecision`
//!
//! # Rule Order (first match wins)
//! 1. `www.<domain>` → redirect to the bare domain
//! 2. Foreign host: section subdomain → redirect to `/<section>/...`;
//!    marketing host → redirect to the same path on the domain;
//!    anything else falls through
//! 3. Trailing slash → redirect to the stripped path
//! 4. Section path prefix → bucket proxy or virtual-origin proxy
//! 5. Last path segment → static object lookup
//! 6. Marketing platform fallback
//!
//! # Design Decisions
//! - Pure: no I/O, decisions are executed by the HTTP layer
//! - Immutable after construction (thread-safe without locks)
//! - Bucket sections are a closed enum, matched exhaustively

use std::fmt;

use crate::config::SiteConfig;
use crate::routing::matcher::{SubdomainPathMatcher, SubdomainSet};
use crate::routing::url::{build_url, https_origin, path_segments};

/// Status code used for every redirect the router issues.
pub const REDIRECT_STATUS: u16 = 301;

/// The parts of an inbound request the rule chain looks at.
#[derive(Debug, Clone, Copy)]
pub struct RouteRequest<'a> {
    /// `scheme://authority` the client used.
    pub origin: &'a str,
    /// Host without port.
    pub hostname: &'a str,
    /// Raw request path.
    pub path: &'a str,
    /// Raw query including the leading `?`, or empty.
    pub search: &'a str,
}

/// What to do with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Answer with a 301 to `target_url`.
    Redirect { target_url: String },
    /// Fetch from a bucket section verbatim.
    ProxyBucket {
        target_url: String,
        bucket: BucketKind,
    },
    /// Fetch from a virtual origin, then guard redirects and rewrite links.
    ProxyOrigin {
        target_url: String,
        subdomain: String,
        wildcard_paths: Vec<String>,
    },
    /// Look `key` up in the object store, proxying to `fallback_url` on a miss.
    ServeObject { key: String, fallback_url: String },
    /// Fetch from the marketing platform.
    ProxyFallback { target_url: String },
}

impl RouteDecision {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            RouteDecision::Redirect { .. } => "redirect",
            RouteDecision::ProxyBucket { .. } => "proxy_bucket",
            RouteDecision::ProxyOrigin { .. } => "proxy_origin",
            RouteDecision::ServeObject { .. } => "serve_object",
            RouteDecision::ProxyFallback { .. } => "proxy_fallback",
        }
    }
}

impl fmt::Display for RouteDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteDecision::Redirect { target_url } => {
                write!(f, "redirect {REDIRECT_STATUS} -> {target_url}")
            }
            RouteDecision::ProxyBucket { target_url, bucket } => {
                write!(f, "proxy bucket '{}' -> {target_url}", bucket.name())
            }
            RouteDecision::ProxyOrigin {
                target_url,
                subdomain,
                ..
            } => write!(f, "proxy virtual origin '{subdomain}' -> {target_url}"),
            RouteDecision::ServeObject { key, fallback_url } => {
                write!(f, "serve object '{key}' (on miss -> {fallback_url})")
            }
            RouteDecision::ProxyFallback { target_url } => {
                write!(f, "proxy marketing platform -> {target_url}")
            }
        }
    }
}

/// Sections served straight from object storage or the compute platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BucketKind {
    StaticMaps,
    Establishments,
    Resources,
    Seo,
}

impl BucketKind {
    pub const ALL: [BucketKind; 4] = [
        BucketKind::StaticMaps,
        BucketKind::Establishments,
        BucketKind::Resources,
        BucketKind::Seo,
    ];

    pub fn from_subdomain(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            BucketKind::StaticMaps => "static-maps",
            BucketKind::Establishments => "establishments",
            BucketKind::Resources => "resources",
            BucketKind::Seo => "seo",
        }
    }

    /// Base URL the wildcard path is appended to.
    pub fn origin(self, site: &SiteConfig) -> String {
        match self {
            BucketKind::StaticMaps | BucketKind::Establishments => format!(
                "https://{}/{}/{}",
                site.bucket_host,
                site.bucket_app_root,
                self.name()
            ),
            BucketKind::Resources => format!("https://{}/{}", site.bucket_host, self.name()),
            BucketKind::Seo => format!("http://{}/{}", site.compute_base_url, self.name()),
        }
    }
}

/// The ordered decision engine.
#[derive(Debug, Clone)]
pub struct RouteResolver {
    site: SiteConfig,
    matcher: SubdomainPathMatcher,
    main_origin: String,
    www_host: String,
    marketing_origin: String,
}

impl RouteResolver {
    pub fn new(site: SiteConfig) -> Self {
        let matcher = SubdomainPathMatcher::new(SubdomainSet::parse(&site.subdomains));
        Self {
            main_origin: https_origin(&site.domain),
            www_host: format!("www.{}", site.domain),
            marketing_origin: https_origin(&format!(
                "{}.{}",
                site.marketing_subdomain, site.domain
            )),
            matcher,
            site,
        }
    }

    pub fn site(&self) -> &SiteConfig {
        &self.site
    }

    pub fn matcher(&self) -> &SubdomainPathMatcher {
        &self.matcher
    }

    /// Decide what to do with `request`.
    pub fn resolve(&self, request: &RouteRequest<'_>) -> RouteDecision {
        let paths = path_segments(request.path);
        let segments = || paths.iter().map(String::as_str);

        if request.hostname == self.www_host {
            return RouteDecision::Redirect {
                target_url: build_url(&self.main_origin, segments(), request.search),
            };
        }

        if request.hostname != self.site.domain {
            if let Some(subdomain) = self.matcher.subdomain_to_path(request.hostname) {
                tracing::debug!(
                    hostname = %request.hostname,
                    subdomain = %subdomain,
                    "Redirecting from subdomain to path"
                );
                return RouteDecision::Redirect {
                    target_url: build_url(
                        &self.main_origin,
                        std::iter::once(subdomain).chain(segments()),
                        request.search,
                    ),
                };
            }

            if request
                .hostname
                .starts_with(&self.site.marketing_subdomain)
            {
                tracing::debug!(
                    hostname = %request.hostname,
                    "Redirecting from marketing subdomain to path"
                );
                return RouteDecision::Redirect {
                    target_url: build_url(&self.main_origin, segments(), request.search),
                };
            }

            // Unrecognized hosts are routed by path as if they were the domain.
            tracing::debug!(hostname = %request.hostname, "Unrecognized host, routing by path");
        }

        if !paths.is_empty() && request.path.ends_with('/') {
            return RouteDecision::Redirect {
                target_url: build_url(request.origin, segments(), request.search),
            };
        }

        if let Some(found) = self.matcher.path_to_subdomain(paths.as_slice()) {
            let wildcard = found.wildcard_paths.iter().map(String::as_str);

            if let Some(bucket) = BucketKind::from_subdomain(&found.subdomain) {
                return RouteDecision::ProxyBucket {
                    target_url: build_url(&bucket.origin(&self.site), wildcard, request.search),
                    bucket,
                };
            }

            let origin = https_origin(&format!("{}.{}", found.subdomain, self.site.domain));
            return RouteDecision::ProxyOrigin {
                target_url: build_url(&origin, wildcard, request.search),
                subdomain: found.subdomain,
                wildcard_paths: found.wildcard_paths,
            };
        }

        let fallback_url = build_url(&self.marketing_origin, segments(), request.search);
        match paths.last() {
            Some(key) => RouteDecision::ServeObject {
                key: key.clone(),
                fallback_url,
            },
            None => RouteDecision::ProxyFallback {
                target_url: fallback_url,
            },
        }
    }
}
