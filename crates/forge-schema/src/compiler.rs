// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! The compiler description (spec.md §3 `CompilerDescr`): how to bootstrap
//! a compiler distribution, or that one is already preinstalled.

use std::collections::BTreeMap;

use forge_foundation::{CompilerVersion, PkgName, Section};
use serde::{Deserialize, Serialize};

/// One environment operation from a compiler description's `env` block
/// (spec.md §4.5(d)): `NAME op VALUE`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct EnvOp {
    pub name: String,
    pub op: EnvOpKind,
    pub value: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvOpKind {
    /// `=` — replace.
    Set,
    /// `+=` — prepend, colon-joined.
    Prepend,
    /// `=+` — append, colon-joined.
    Append,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerDescr {
    pub version: CompilerVersion,
    pub source_url: Option<String>,
    pub patches: Vec<String>,
    pub configure_args: Vec<String>,
    pub make_args: Vec<String>,
    pub env: Vec<EnvOp>,
    pub required_sections: Vec<Section>,
    pub packages: Vec<PkgName>,
    pub preinstalled: bool,
    /// Flags contributed directly by the compiler itself, keyed by
    /// category (`byte`/`asm`/`compile`/`link`), for `config compil`
    /// (spec.md §4.7).
    pub flags: BTreeMap<String, Vec<String>>,
}

impl Default for CompilerDescr {
    fn default() -> Self {
        Self {
            version: CompilerVersion::new("0").expect("\"0\" is a valid compiler version"),
            source_url: None,
            patches: Vec::new(),
            configure_args: Vec::new(),
            make_args: Vec::new(),
            env: Vec::new(),
            required_sections: Vec::new(),
            packages: Vec::new(),
            preinstalled: false,
            flags: BTreeMap::new(),
        }
    }
}
