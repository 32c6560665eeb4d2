//! URL construction helpers shared by the resolver and the guard.

/// Split a URL path on `/`, dropping empty components.
pub fn path_segments(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// `https://` origin for a host.
pub fn https_origin(host: &str) -> String {
    format!("https://{host}")
}

/// Join `origin` and `segments` with `/`, skipping empty segments, then append
/// `search` verbatim (it carries its own leading `?` when non-empty).
pub fn build_url<'a, I>(origin: &str, segments: I, search: &str) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut url = origin.to_string();
    for segment in segments.into_iter().filter(|s| !s.is_empty()) {
        url.push('/');
        url.push_str(segment);
    }
    url.push_str(search);
    url
}

/// The last `n` elements of `segments`, or all of them if there are fewer.
pub fn tail<T>(segments: &[T], n: usize) -> &[T] {
    &segments[segments.len().saturating_sub(n)..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_segments_drop_empty() {
        assert_eq!(path_segments("/a//b/"), vec!["a", "b"]);
        assert!(path_segments("/").is_empty());
        assert!(path_segments("").is_empty());
    }

    #[test]
    fn test_build_url() {
        let url = build_url("https://example.com", ["blog", "", "posts"], "?x=1");
        assert_eq!(url, "https://example.com/blog/posts?x=1");

        let bare = build_url("https://example.com", std::iter::empty(), "");
        assert_eq!(bare, "https://example.com");
    }

    #[test]
    fn test_tail() {
        let segments = ["a", "b", "c"];
        assert_eq!(tail(&segments, 2), &["b", "c"]);
        assert_eq!(tail(&segments[..1], 2), &["a"]);
        assert!(tail::<&str>(&[], 2).is_empty());
    }
}
