//! Root-relative link rewriting for virtual-origin HTML.
//!
//! # Responsibilities
//! - Prefix root-relative `href` values with `/<subdomain>`
//! - Leave already-prefixed, absolute and protocol-relative links alone
//!
//! # Design Decisions
//! - Single left-to-right pass over the raw bytes; no regex, no rescans
//! - No UTF-8 decoding, so non-ASCII content is copied byte for byte
//! - Idempotent: every value it produces starts with `/<subdomain>/` or
//!   `/<subdomain>#`, both of which it skips

const HREF: &[u8] = b"href";

/// Whether a `Content-Type` value denotes HTML.
pub fn is_html(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|value| value.to_ascii_lowercase().contains("text/html"))
}

/// Rewrites `href` values for one section.
#[derive(Debug, Clone)]
pub struct LinkRewriter {
    /// `/<subdomain>/`
    prefix: Vec<u8>,
    /// `/<subdomain>#`
    fragment_prefix: Vec<u8>,
}

impl LinkRewriter {
    pub fn new(subdomain: &str) -> Self {
        Self {
            prefix: format!("/{subdomain}/").into_bytes(),
            fragment_prefix: format!("/{subdomain}#").into_bytes(),
        }
    }

    /// Rewrite every quoted `href` value in `html`.
    pub fn rewrite(&self, html: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(html.len());
        let mut copied = 0;
        let mut pos = 0;

        while let Some((start, end)) = next_href_value(html, pos) {
            if let Some(rewritten) = self.rewrite_value(&html[start..end]) {
                out.extend_from_slice(&html[copied..start]);
                out.extend_from_slice(&rewritten);
                copied = end;
            }
            pos = end + 1;
        }

        out.extend_from_slice(&html[copied..]);
        out
    }

    fn rewrite_value(&self, value: &[u8]) -> Option<Vec<u8>> {
        let rest = value.strip_prefix(b"/")?;
        if rest.starts_with(b"/")
            || value.starts_with(&self.prefix)
            || value.starts_with(&self.fragment_prefix)
        {
            return None;
        }

        let mut out = Vec::with_capacity(self.prefix.len() + rest.len());
        if rest.starts_with(b"#") {
            // "/#top" becomes "/<subdomain>#top", not "/<subdomain>/#top".
            out.extend_from_slice(&self.fragment_prefix[..self.fragment_prefix.len() - 1]);
        } else {
            out.extend_from_slice(&self.prefix);
        }
        out.extend_from_slice(rest);
        Some(out)
    }
}

/// Byte range of the next quoted `href` value at or after `from`.
fn next_href_value(html: &[u8], mut from: usize) -> Option<(usize, usize)> {
    while from < html.len() {
        let name_start = from + find_ignore_case(&html[from..], HREF)?;
        let mut i = name_start + HREF.len();
        from = i;

        if name_start > 0 && !is_attribute_boundary(html[name_start - 1]) {
            continue;
        }

        i = skip_whitespace(html, i);
        if html.get(i) != Some(&b'=') {
            continue;
        }
        i = skip_whitespace(html, i + 1);

        let quote = match html.get(i) {
            Some(&q) if q == b'"' || q == b'\'' => q,
            _ => continue,
        };

        let start = i + 1;
        // Unterminated value: nothing after it can be a well-formed attribute.
        let len = html[start..].iter().position(|&b| b == quote)?;
        return Some((start, start + len));
    }
    None
}

fn find_ignore_case(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
}

fn is_attribute_boundary(byte: u8) -> bool {
    byte.is_ascii_whitespace() || byte == b'"' || byte == b'\''
}

fn skip_whitespace(html: &[u8], mut i: usize) -> usize {
    while html.get(i).is_some_and(u8::is_ascii_whitespace) {
        i += 1;
    }
    i
}
