// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! `NV` — a package name paired with a version, printed as `name.version`.
//!
//! spec.md §8 flags the `name.version` split as ambiguous when `name`
//! itself contains a dot ("Open Question" #1). This implementation
//! resolves it by construction: [`PkgName`](crate::name::PkgName) forbids
//! embedded dots (spec.md §3's grammar, `[A-Za-z0-9_-]+`, already excludes
//! `.`), so splitting on the *last* dot — as spec.md §3 literally
//! specifies — and splitting on the first dot always agree. See
//! DESIGN.md for the recorded decision.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::name::PkgName;
use crate::version::PkgVersion;

#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Nv {
    name: PkgName,
    version: PkgVersion,
}

impl Nv {
    pub fn new(name: PkgName, version: PkgVersion) -> Self {
        Self { name, version }
    }

    pub fn name(&self) -> &PkgName {
        &self.name
    }

    pub fn version(&self) -> &PkgVersion {
        &self.version
    }
}

impl fmt::Display for Nv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.name, self.version)
    }
}

impl FromStr for Nv {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let idx = s.rfind('.').ok_or_else(|| Error::InvalidNv(s.to_owned()))?;
        let (name, version) = (&s[..idx], &s[idx + 1..]);
        if name.is_empty() || version.is_empty() {
            return Err(Error::InvalidNv(s.to_owned()));
        }
        let name = PkgName::new(name).map_err(|_| Error::InvalidNv(s.to_owned()))?;
        let version = PkgVersion::new(version).map_err(|_| Error::InvalidNv(s.to_owned()))?;
        Ok(Self { name, version })
    }
}

impl TryFrom<String> for Nv {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Nv> for String {
    fn from(nv: Nv) -> String {
        nv.to_string()
    }
}

/// A user-supplied package reference: either a bare name or a full `NV`.
///
/// Used when parsing CLI arguments like `install foo` vs `install foo.1.2`.
/// If the portion before the last dot isn't a valid [`PkgName`] (e.g. it
/// contains another dot), the whole string is treated as a literal package
/// name instead of erroring out — spec.md §8's "install of a name with an
/// embedded dot falls back to literal NV parsing".
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PkgSpec {
    Name(PkgName),
    Versioned(Nv),
}

impl PkgSpec {
    pub fn name(&self) -> &PkgName {
        match self {
            PkgSpec::Name(n) => n,
            PkgSpec::Versioned(nv) => nv.name(),
        }
    }
}

pub fn parse_pkg_spec(s: &str) -> Result<PkgSpec> {
    if let Ok(nv) = s.parse::<Nv>() {
        return Ok(PkgSpec::Versioned(nv));
    }
    PkgName::new(s).map(PkgSpec::Name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_name_and_version() {
        let nv: Nv = "foo.1.2.3".parse().unwrap();
        assert_eq!(nv.name().as_str(), "foo.1.2");
        assert_eq!(nv.version().as_str(), "3");
    }

    #[test]
    fn round_trips_display() {
        let nv: Nv = "zlib.1.2.11".parse().unwrap();
        assert_eq!(nv.to_string(), "zlib.1.2.11");
    }

    #[test]
    fn bare_name_falls_back_to_literal() {
        // No dot at all: never parses as Nv.
        match parse_pkg_spec("ocaml-base-compiler").unwrap() {
            PkgSpec::Name(n) => assert_eq!(n.as_str(), "ocaml-base-compiler"),
            PkgSpec::Versioned(_) => panic!("expected a bare name"),
        }
    }

    #[test]
    fn dotted_name_with_version_splits_on_last_dot() {
        match parse_pkg_spec("foo.1").unwrap() {
            PkgSpec::Versioned(nv) => {
                assert_eq!(nv.name().as_str(), "foo");
                assert_eq!(nv.version().as_str(), "1");
            }
            PkgSpec::Name(_) => panic!("expected a versioned spec"),
        }
    }
}
