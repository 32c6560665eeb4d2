//! Redirect loop protection for virtual-origin fetches.
//!
//! A virtual origin that redirects is either normalising the same resource
//! (e.g. adding a locale segment in front) or sending the client somewhere
//! else. Only the last two path segments are compared: equal tails mean the
//! same resource, so the body is fetched once more and served; different
//! tails are handed to the client as a 301 so its next request re-enters the
//! router with a clean URL.

use url::Url;

use crate::routing::url::{path_segments, tail};

/// Number of trailing path segments compared.
pub const COMPARED_SEGMENTS: usize = 2;

/// What to do with a virtual-origin response that was reached via redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardVerdict {
    /// Same resource: fetch the final URL once more and serve it with 200.
    Refetch(Url),
    /// Different resource: answer the client with a 301 to the final URL.
    Redirect(Url),
}

/// Compares the requested wildcard tail with the tail of the final URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedirectLoopGuard;

impl RedirectLoopGuard {
    pub fn inspect(&self, wildcard_paths: &[String], final_url: &Url) -> GuardVerdict {
        let redirected = path_segments(final_url.path());
        let requested_tail = tail(wildcard_paths, COMPARED_SEGMENTS);
        let redirected_tail = tail(&redirected, COMPARED_SEGMENTS);

        if requested_tail == redirected_tail {
            GuardVerdict::Refetch(final_url.clone())
        } else {
            GuardVerdict::Redirect(final_url.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wildcard(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_same_tail_refetches() {
        let url = Url::parse("https://blog.example.com/en/x/y?utm=1").unwrap();
        let verdict = RedirectLoopGuard.inspect(&wildcard(&["x", "y"]), &url);
        assert_eq!(verdict, GuardVerdict::Refetch(url));
    }

    #[test]
    fn test_longer_request_compares_tail_only() {
        let url = Url::parse("https://blog.example.com/x/y").unwrap();
        let verdict = RedirectLoopGuard.inspect(&wildcard(&["a", "b", "x", "y"]), &url);
        assert!(matches!(verdict, GuardVerdict::Refetch(_)));
    }

    #[test]
    fn test_different_tail_redirects() {
        let url = Url::parse("https://blog.example.com/login").unwrap();
        let verdict = RedirectLoopGuard.inspect(&wildcard(&["x", "y"]), &url);
        assert_eq!(verdict, GuardVerdict::Redirect(url));
    }

    #[test]
    fn test_order_matters() {
        let url = Url::parse("https://blog.example.com/y/x").unwrap();
        let verdict = RedirectLoopGuard.inspect(&wildcard(&["x", "y"]), &url);
        assert!(matches!(verdict, GuardVerdict::Redirect(_)));
    }

    #[test]
    fn test_trailing_slash_normalisation_refetches() {
        let url = Url::parse("https://blog.example.com/posts/").unwrap();
        let verdict = RedirectLoopGuard.inspect(&wildcard(&["posts"]), &url);
        assert!(matches!(verdict, GuardVerdict::Refetch(_)));
    }

    #[test]
    fn test_empty_wildcard_against_root() {
        let url = Url::parse("https://blog.example.com/").unwrap();
        assert!(matches!(
            RedirectLoopGuard.inspect(&[], &url),
            GuardVerdict::Refetch(_)
        ));

        let elsewhere = Url::parse("https://blog.example.com/home").unwrap();
        assert!(matches!(
            RedirectLoopGuard.inspect(&[], &elsewhere),
            GuardVerdict::Redirect(_)
        ));
    }
}
