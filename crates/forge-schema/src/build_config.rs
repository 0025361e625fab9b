// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! The per-NV build config (spec.md §3 `BuildConfig`): the runtime-
//! queryable variables and sections installed alongside a package.

use std::collections::BTreeMap;

use forge_foundation::{Section, VariableValue};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionConfig {
    /// Other sections (local or from a direct dependency) this section's
    /// artifacts require at link/use time (spec.md §4.5's
    /// `UnresolvedRequire` check).
    pub requires: Vec<Section>,
    pub variables: BTreeMap<String, VariableValue>,
    /// This section's own contribution to `config compil`'s per-category
    /// flag lists (spec.md §4.7), keyed by `byte`/`asm`/`compile`/`link`.
    pub flags: BTreeMap<String, Vec<String>>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub variables: BTreeMap<String, VariableValue>,
    pub sections: BTreeMap<Section, SectionConfig>,
    pub libraries: Vec<Section>,
    pub syntax: Vec<Section>,
}

impl BuildConfig {
    /// Look up `var` globally, or within `section` if given (spec.md §4.2).
    pub fn lookup(&self, section: Option<&Section>, var: &str) -> Option<&VariableValue> {
        match section {
            None => self.variables.get(var),
            Some(s) => self.sections.get(s).and_then(|sc| sc.variables.get(var)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_up_global_and_local_variables() {
        let mut cfg = BuildConfig::default();
        cfg.variables.insert("prefix".into(), VariableValue::String("/a".into()));
        let sect = Section::new("lib-foo").unwrap();
        let mut sc = SectionConfig::default();
        sc.variables.insert("include".into(), VariableValue::Bool(true));
        cfg.sections.insert(sect.clone(), sc);

        assert_eq!(
            cfg.lookup(None, "prefix"),
            Some(&VariableValue::String("/a".into()))
        );
        assert_eq!(
            cfg.lookup(Some(&sect), "include"),
            Some(&VariableValue::Bool(true))
        );
        assert_eq!(cfg.lookup(Some(&sect), "missing"), None);
    }
}
