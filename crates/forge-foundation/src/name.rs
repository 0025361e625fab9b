// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! Validated, ordered identifier newtypes.
//!
//! Every identifier in the data model (spec.md §3) is an opaque string with
//! a total ordering and a restricted character set. `name!` generates the
//! boilerplate (`Display`, `FromStr`, `Deref<Target = str>`, serde) once per
//! identifier kind so each kind only has to supply its validation rule.

use std::fmt;
use std::str::FromStr;

use paste::paste;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Generate a validated, string-backed identifier type.
macro_rules! name {
    ($typ:ident, $kind:literal, $validate:path) => {
        paste! {
            #[doc = "A validated " $kind " identifier."]
            #[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
            #[serde(try_from = "String", into = "String")]
            pub struct $typ(String);
        }

        impl $typ {
            /// Validate and wrap `s` as a new identifier.
            pub fn new<S: Into<String>>(s: S) -> Result<Self> {
                let s = s.into();
                $validate($kind, &s)?;
                Ok(Self(s))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $typ {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $typ {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $typ {
            type Error = Error;

            fn try_from(s: String) -> Result<Self> {
                Self::new(s)
            }
        }

        impl From<$typ> for String {
            fn from(v: $typ) -> String {
                v.0
            }
        }

        impl std::ops::Deref for $typ {
            type Target = str;

            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $typ {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::borrow::Borrow<str> for $typ {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

/// `[A-Za-z0-9_-]+`, matching spec.md §3's `PkgName` grammar.
fn validate_pkg_like(kind: &'static str, s: &str) -> Result<()> {
    if s.is_empty() {
        return Err(Error::InvalidName {
            kind,
            name: s.to_owned(),
            reason: "must not be empty".into(),
        });
    }
    if !s
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(Error::InvalidName {
            kind,
            name: s.to_owned(),
            reason: "must match [A-Za-z0-9_-]+".into(),
        });
    }
    Ok(())
}

/// Aliases are free-form but must not contain path separators or `.` (which
/// would make `<alias>/installed`-style paths and the `name.version` NV
/// convention ambiguous).
fn validate_alias(kind: &'static str, s: &str) -> Result<()> {
    if s.is_empty() || s.contains(['/', '.']) {
        return Err(Error::InvalidName {
            kind,
            name: s.to_owned(),
            reason: "must be non-empty and contain no '/' or '.'".into(),
        });
    }
    Ok(())
}

name!(PkgName, "package", validate_pkg_like);
name!(RepoName, "repository", validate_pkg_like);
name!(Alias, "switch alias", validate_alias);
name!(Section, "section", validate_pkg_like);
name!(CompilerVersion, "compiler version", validate_pkg_like);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pkg_name_accepts_valid() {
        assert!(PkgName::new("foo-bar_1").is_ok());
    }

    #[test]
    fn pkg_name_rejects_dot() {
        assert!(PkgName::new("foo.bar").is_err());
    }

    #[test]
    fn alias_rejects_slash_and_dot() {
        assert!(Alias::new("sys/4.14").is_err());
        assert!(Alias::new("sys.4.14").is_err());
        assert!(Alias::new("sys").is_ok());
    }

    #[test]
    fn round_trips_through_string() {
        let n = PkgName::new("zlib").unwrap();
        let s: String = n.clone().into();
        assert_eq!(s, "zlib");
        assert_eq!(s.parse::<PkgName>().unwrap(), n);
    }
}
