// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! The persisted global config and alias map (spec.md §3
//! `GlobalConfig`/`AliasMap`), owned by the global root.

use forge_foundation::{Alias, CompilerVersion, Repository};
use serde::{Deserialize, Serialize};

pub const FORMAT_VERSION: &str = "1.0";

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GlobalConfig {
    pub format_version: String,
    /// Ordered by declared priority; see [`forge_foundation::Repository`].
    pub repos: Vec<Repository>,
    pub current_alias: Alias,
    pub workers: usize,
}

/// An ordered, key-unique list of `(alias, compiler)` pairs (spec.md §3
/// `AliasMap`: "keys unique; insertion order = lookup order").
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct AliasMap(Vec<(Alias, CompilerVersion)>);

impl AliasMap {
    pub fn get(&self, alias: &Alias) -> Option<&CompilerVersion> {
        self.0.iter().find(|(a, _)| a == alias).map(|(_, c)| c)
    }

    pub fn contains(&self, alias: &Alias) -> bool {
        self.get(alias).is_some()
    }

    /// Append `(alias, compiler)`. No-op if `alias` is already present, to
    /// keep "keys unique" — callers that need to detect this should check
    /// [`Self::contains`] first.
    pub fn insert(&mut self, alias: Alias, compiler: CompilerVersion) {
        if !self.contains(&alias) {
            self.0.push((alias, compiler));
        }
    }

    pub fn remove(&mut self, alias: &Alias) {
        self.0.retain(|(a, _)| a != alias);
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Alias, CompilerVersion)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alias(s: &str) -> Alias {
        Alias::new(s).unwrap()
    }
    fn compiler(s: &str) -> CompilerVersion {
        CompilerVersion::new(s).unwrap()
    }

    #[test]
    fn insertion_order_is_lookup_order() {
        let mut m = AliasMap::default();
        m.insert(alias("sys"), compiler("4.14"));
        m.insert(alias("dev"), compiler("5.1"));
        let keys: Vec<_> = m.iter().map(|(a, _)| a.as_str()).collect();
        assert_eq!(keys, vec!["sys", "dev"]);
    }

    #[test]
    fn duplicate_alias_is_ignored() {
        let mut m = AliasMap::default();
        m.insert(alias("sys"), compiler("4.14"));
        m.insert(alias("sys"), compiler("5.1"));
        assert_eq!(m.get(&alias("sys")).unwrap().as_str(), "4.14");
        assert_eq!(m.iter().count(), 1);
    }

    #[test]
    fn remove_drops_entry() {
        let mut m = AliasMap::default();
        m.insert(alias("sys"), compiler("4.14"));
        m.remove(&alias("sys"));
        assert!(!m.contains(&alias("sys")));
    }
}
