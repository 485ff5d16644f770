//! Pattern classifier and literal fast-path matchers

use crate::pattern::glob::glob_match;

/// Compiled matcher for a `KEYS` pattern.
///
/// Patterns whose only metacharacter is a `*` at the very first or last
/// position compile to one of four literal fast paths; everything else is
/// handled by the glob engine. Anchored literal queries dominate real
/// workloads, and the fast paths skip the glob engine's branching and
/// backtracking entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyMatcher {
    /// `X` - whole-key equality
    Equals(Vec<u8>),
    /// `X*` - anchored prefix
    Prefix(Vec<u8>),
    /// `*X` - anchored suffix
    Suffix(Vec<u8>),
    /// `*X*` - substring
    Substring(Vec<u8>),
    /// Anything else, matched by the glob engine
    Glob(Vec<u8>),
}

impl KeyMatcher {
    /// Classify `pattern` and build the matcher for it.
    pub fn compile(pattern: &[u8]) -> Self {
        if !is_literal_anchored(pattern) {
            return KeyMatcher::Glob(pattern.to_vec());
        }
        let len = pattern.len();
        if len > 1 && pattern[0] == b'*' && pattern[len - 1] == b'*' {
            KeyMatcher::Substring(pattern[1..len - 1].to_vec())
        } else if pattern.first() == Some(&b'*') {
            KeyMatcher::Suffix(pattern[1..].to_vec())
        } else if pattern.last() == Some(&b'*') {
            KeyMatcher::Prefix(pattern[..len - 1].to_vec())
        } else {
            KeyMatcher::Equals(pattern.to_vec())
        }
    }

    /// Test `key` against the compiled pattern.
    pub fn matches(&self, key: &[u8]) -> bool {
        match self {
            KeyMatcher::Equals(literal) => key == literal.as_slice(),
            KeyMatcher::Prefix(prefix) => key.starts_with(prefix),
            KeyMatcher::Suffix(suffix) => key.ends_with(suffix),
            KeyMatcher::Substring(needle) => contains_subslice(key, needle),
            KeyMatcher::Glob(pattern) => glob_match(pattern, key),
        }
    }
}

/// True when the only glob metacharacter in `pattern` is a `*` at the very
/// first or last position, so a literal fast path applies.
fn is_literal_anchored(pattern: &[u8]) -> bool {
    let len = pattern.len();
    for i in 1..len.saturating_sub(1) {
        if matches!(pattern[i], b'*' | b'?' | b'[' | b'\\') {
            return false;
        }
    }
    if matches!(pattern.first(), Some(&(b'?' | b'[' | b'\\'))) {
        return false;
    }
    if matches!(pattern.last(), Some(&(b'?' | b'[' | b'\\'))) {
        return false;
    }
    true
}

fn contains_subslice(haystack: &[u8], needle: &[u8]) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack.windows(needle.len()).any(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert_eq!(
            KeyMatcher::compile(b"abc"),
            KeyMatcher::Equals(b"abc".to_vec())
        );
        assert_eq!(
            KeyMatcher::compile(b"abc*"),
            KeyMatcher::Prefix(b"abc".to_vec())
        );
        assert_eq!(
            KeyMatcher::compile(b"*abc"),
            KeyMatcher::Suffix(b"abc".to_vec())
        );
        assert_eq!(
            KeyMatcher::compile(b"*abc*"),
            KeyMatcher::Substring(b"abc".to_vec())
        );
        assert_eq!(KeyMatcher::compile(b"*"), KeyMatcher::Suffix(Vec::new()));
        assert_eq!(KeyMatcher::compile(b""), KeyMatcher::Equals(Vec::new()));
    }

    #[test]
    fn test_metacharacters_route_to_glob() {
        assert!(matches!(KeyMatcher::compile(b"a?c"), KeyMatcher::Glob(_)));
        assert!(matches!(KeyMatcher::compile(b"?bc"), KeyMatcher::Glob(_)));
        assert!(matches!(KeyMatcher::compile(b"ab?"), KeyMatcher::Glob(_)));
        assert!(matches!(KeyMatcher::compile(b"a*c"), KeyMatcher::Glob(_)));
        assert!(matches!(KeyMatcher::compile(b"[ab]"), KeyMatcher::Glob(_)));
        assert!(matches!(KeyMatcher::compile(b"a[b]c"), KeyMatcher::Glob(_)));
        assert!(matches!(KeyMatcher::compile(b"a\\bc"), KeyMatcher::Glob(_)));
        assert!(matches!(KeyMatcher::compile(b"\\ab"), KeyMatcher::Glob(_)));
        assert!(matches!(KeyMatcher::compile(b"ab\\"), KeyMatcher::Glob(_)));
    }

    #[test]
    fn test_fast_path_semantics() {
        let prefix = KeyMatcher::compile(b"user:*");
        assert!(prefix.matches(b"user:1"));
        assert!(prefix.matches(b"user:"));
        assert!(!prefix.matches(b"use"));

        let suffix = KeyMatcher::compile(b"*:meta");
        assert!(suffix.matches(b"user:meta"));
        assert!(!suffix.matches(b"meta:user"));

        let substring = KeyMatcher::compile(b"*lol*");
        assert!(substring.matches(b"lol333"));
        assert!(substring.matches(b"fdkfdjklol"));
        assert!(!substring.matches(b"l-o-l"));

        let equals = KeyMatcher::compile(b"exact");
        assert!(equals.matches(b"exact"));
        assert!(!equals.matches(b"exactly"));
    }

    #[test]
    fn test_empty_needle_fast_paths() {
        // "*" and "**" reduce to empty suffix / substring and match all keys
        assert!(KeyMatcher::compile(b"*").matches(b""));
        assert!(KeyMatcher::compile(b"*").matches(b"anything"));
        assert!(KeyMatcher::compile(b"**").matches(b""));
        assert!(KeyMatcher::compile(b"**").matches(b"anything"));
    }

    #[test]
    fn test_fast_paths_agree_with_glob() {
        let patterns: &[&[u8]] = &[
            b"", b"*", b"**", b"a", b"abc", b"abc*", b"*abc", b"*abc*", b"*a", b"a*", b"aa",
        ];
        let keys: &[&[u8]] = &[
            b"",
            b"a",
            b"aa",
            b"ab",
            b"abc",
            b"abcd",
            b"xabc",
            b"xabcy",
            b"aabc",
            b"cba",
        ];
        for pattern in patterns {
            let matcher = KeyMatcher::compile(pattern);
            assert!(
                !matches!(matcher, KeyMatcher::Glob(_)),
                "expected fast path for {:?}",
                pattern
            );
            for key in keys {
                assert_eq!(
                    matcher.matches(key),
                    glob_match(pattern, key),
                    "pattern {:?} key {:?}",
                    String::from_utf8_lossy(pattern),
                    String::from_utf8_lossy(key)
                );
            }
        }
    }
}
