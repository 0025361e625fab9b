// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! Package version strings and the ecosystem's comparison rule.
//!
//! spec.md §3 delegates the *correctness* of version comparison to the
//! external solver, but requires that any reimplementation preserve a
//! round-trip with a canonical string form (L1 in spec.md §8). The rule
//! implemented here is the common "Debian-style" segmenting comparison:
//! split each version into runs of digits and runs of non-digits, compare
//! digit runs numerically and non-digit runs lexicographically, and treat
//! `~` as sorting before the empty suffix (so `1.0~beta < 1.0`).

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PkgVersion(String);

impl PkgVersion {
    pub fn new<S: Into<String>>(s: S) -> Result<Self> {
        let s = s.into();
        if s.is_empty() {
            return Err(Error::InvalidVersion(s, "must not be empty".into()));
        }
        if s.chars().any(char::is_whitespace) {
            return Err(Error::InvalidVersion(s, "must not contain whitespace".into()));
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn segments(&self) -> Vec<Segment<'_>> {
        segment(&self.0)
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Num(u64),
    Text(&'a str),
    Tilde,
}

/// Split a version string into alternating digit/non-digit runs, treating
/// every `~` as its own ordering-significant segment.
fn segment(s: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'~' {
            out.push(Segment::Tilde);
            i += 1;
            continue;
        }
        let start = i;
        if bytes[i].is_ascii_digit() {
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            let n: u64 = s[start..i].parse().unwrap_or(u64::MAX);
            out.push(Segment::Num(n));
        } else {
            while i < bytes.len() && !bytes[i].is_ascii_digit() && bytes[i] != b'~' {
                i += 1;
            }
            out.push(Segment::Text(&s[start..i]));
        }
    }
    out
}

impl Ord for PkgVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let a = self.segments();
        let b = other.segments();
        for pair in a.iter().zip(b.iter()) {
            let ord = match pair {
                (Segment::Tilde, Segment::Tilde) => Ordering::Equal,
                (Segment::Tilde, _) => Ordering::Less,
                (_, Segment::Tilde) => Ordering::Greater,
                (Segment::Num(x), Segment::Num(y)) => x.cmp(y),
                (Segment::Num(_), Segment::Text(_)) => Ordering::Greater,
                (Segment::Text(_), Segment::Num(_)) => Ordering::Less,
                (Segment::Text(x), Segment::Text(y)) => x.cmp(y),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        a.len().cmp(&b.len())
    }
}

impl PartialOrd for PkgVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PkgVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PkgVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for PkgVersion {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::new(s)
    }
}

impl From<PkgVersion> for String {
    fn from(v: PkgVersion) -> String {
        v.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> PkgVersion {
        PkgVersion::new(s).unwrap()
    }

    #[test]
    fn numeric_segments_compare_numerically() {
        assert!(v("1.9") < v("1.10"));
    }

    #[test]
    fn tilde_sorts_before_release() {
        assert!(v("1.0~beta") < v("1.0"));
        assert!(v("1.0~beta2") < v("1.0~beta10"));
    }

    #[test]
    fn round_trip() {
        let s = "1.2.3-rc1".to_string();
        assert_eq!(String::from(v(&s)), s);
    }

    #[test]
    fn equal_versions_are_equal() {
        assert_eq!(v("1.0.0").cmp(&v("1.0.0")), Ordering::Equal);
    }

    proptest::proptest! {
        #[test]
        fn doesnt_panic_on_arbitrary_ascii(s in "[a-zA-Z0-9.~_-]{1,40}") {
            let _ = PkgVersion::new(s);
        }
    }
}
