// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! `PkgName -> RepoName` binding (spec.md §3 `RepoIndex`), rebuilt by
//! `update` (spec.md §4.3).

use std::collections::BTreeMap;

use forge_foundation::{PkgName, RepoName};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct RepoIndex(BTreeMap<PkgName, RepoName>);

impl RepoIndex {
    pub fn get(&self, pkg: &PkgName) -> Option<&RepoName> {
        self.0.get(pkg)
    }

    /// First-bind-wins insert, used while walking repositories in priority
    /// order (spec.md §4.3 step 2's "first bind wins").
    pub fn bind_if_absent(&mut self, pkg: PkgName, repo: RepoName) {
        self.0.entry(pkg).or_insert(repo);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PkgName, &RepoName)> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_bind_wins() {
        let mut idx = RepoIndex::default();
        let pkg = PkgName::new("foo").unwrap();
        idx.bind_if_absent(pkg.clone(), RepoName::new("upstream").unwrap());
        idx.bind_if_absent(pkg.clone(), RepoName::new("mirror").unwrap());
        assert_eq!(idx.get(&pkg).unwrap().as_str(), "upstream");
    }
}
