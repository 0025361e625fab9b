// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! `FullVariable` and `VariableValue` (spec.md §3, §4.2).

use nom::branch::alt;
use nom::bytes::complete::take_while1;
use nom::character::complete::char as nom_char;
use nom::combinator::{all_consuming, map};
use nom::sequence::{separated_pair, tuple};
use nom::IResult;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::name::{PkgName, Section};

/// Either `pkg:var` (global to the package) or `pkg:section:var` (scoped to
/// one of the package's declared library/syntax sections).
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum FullVariable {
    Global { pkg: PkgName, var: String },
    Local { pkg: PkgName, section: Section, var: String },
}

impl FullVariable {
    pub fn pkg(&self) -> &PkgName {
        match self {
            FullVariable::Global { pkg, .. } => pkg,
            FullVariable::Local { pkg, .. } => pkg,
        }
    }

    pub fn var(&self) -> &str {
        match self {
            FullVariable::Global { var, .. } => var,
            FullVariable::Local { var, .. } => var,
        }
    }

    pub fn section(&self) -> Option<&Section> {
        match self {
            FullVariable::Global { .. } => None,
            FullVariable::Local { section, .. } => Some(section),
        }
    }
}

impl std::fmt::Display for FullVariable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FullVariable::Global { pkg, var } => write!(f, "{pkg}:{var}"),
            FullVariable::Local { pkg, section, var } => write!(f, "{pkg}:{section}:{var}"),
        }
    }
}

fn ident(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-')(input)
}

fn global(input: &str) -> IResult<&str, FullVariable> {
    map(separated_pair(ident, nom_char(':'), ident), |(pkg, var)| {
        FullVariable::Global {
            pkg: PkgName::new(pkg).expect("ident charset is a subset of PkgName's"),
            var: var.to_owned(),
        }
    })(input)
}

fn local(input: &str) -> IResult<&str, FullVariable> {
    map(
        tuple((ident, nom_char(':'), ident, nom_char(':'), ident)),
        |(pkg, _, section, _, var)| FullVariable::Local {
            pkg: PkgName::new(pkg).expect("ident charset is a subset of PkgName's"),
            section: Section::new(section).expect("ident charset is a subset of Section's"),
            var: var.to_owned(),
        },
    )(input)
}

impl std::str::FromStr for FullVariable {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        all_consuming(alt((local, global)))(s)
            .map(|(_, v)| v)
            .map_err(|_| Error::InvalidVariable(s.to_owned()))
    }
}

/// Attempt to parse `f` as a [`FullVariable`], returning `None` if it is
/// not well-formed — used by the substitution engine to decide whether a
/// `%{f}%` marker is a variable reference at all (spec.md §4.2).
pub fn try_parse_variable(f: &str) -> Option<FullVariable> {
    f.parse().ok()
}

/// The value a [`FullVariable`] evaluates to (spec.md §3).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariableValue {
    Bool(bool),
    String(String),
}

impl VariableValue {
    /// String form used for substitution: `true`/`false` for booleans, the
    /// raw string otherwise (spec.md §4.2).
    pub fn to_subst_string(&self) -> String {
        match self {
            VariableValue::Bool(b) => b.to_string(),
            VariableValue::String(s) => s.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global() {
        let v: FullVariable = "foo:enable".parse().unwrap();
        assert_eq!(v.pkg().as_str(), "foo");
        assert_eq!(v.var(), "enable");
        assert!(v.section().is_none());
    }

    #[test]
    fn parses_local() {
        let v: FullVariable = "foo:lib-bar:include".parse().unwrap();
        assert_eq!(v.pkg().as_str(), "foo");
        assert_eq!(v.section().unwrap().as_str(), "lib-bar");
        assert_eq!(v.var(), "include");
    }

    #[test]
    fn rejects_malformed() {
        assert!("not-a-variable".parse::<FullVariable>().is_err());
        assert!("foo:".parse::<FullVariable>().is_err());
        assert!("foo:a:b:c".parse::<FullVariable>().is_err());
    }

    #[test]
    fn display_round_trips() {
        let v: FullVariable = "foo:bar:baz".parse().unwrap();
        assert_eq!(v.to_string(), "foo:bar:baz");
    }

    #[test]
    fn bool_subst_string() {
        assert_eq!(VariableValue::Bool(true).to_subst_string(), "true");
        assert_eq!(VariableValue::Bool(false).to_subst_string(), "false");
        assert_eq!(VariableValue::String("x".into()).to_subst_string(), "x");
    }
}
