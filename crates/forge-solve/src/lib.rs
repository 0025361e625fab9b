// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! The solver adapter: universe construction, request shapes, the DAG
//! solution type, and the solver backend contract (spec.md §2 component
//! 6, §4.4, §6 "Solver interface").

mod error;
mod request;
mod solution;
mod solver;
mod universe;

pub use error::{Error, Result};
pub use request::{Request, SwitchTarget};
pub use solution::{Action, ActionNode, Solution};
pub use solver::{
    filter_backward_dependencies,
    filter_forward_dependencies,
    ReferenceSolver,
    SolverBackend,
    SolverImpl,
};
pub use universe::{build_universe, PkgDesc};

#[cfg(test)]
mod tests {
    use super::*;
    use forge_foundation::{Nv, PkgName};
    use forge_schema::{Dependency, VersionConstraint};
    use std::collections::BTreeSet;

    fn desc(nv: &str, depends: &[&str], installed: bool) -> PkgDesc {
        PkgDesc {
            nv: nv.parse().unwrap(),
            depends: depends
                .iter()
                .map(|d| Dependency::unconstrained(PkgName::new(*d).unwrap()))
                .collect(),
            depopts: Vec::new(),
            conflicts: Vec::new(),
            installed,
        }
    }

    #[tokio::test]
    async fn install_pulls_in_dependency() {
        let universe = vec![desc("foo.1", &["bar"], false), desc("bar.1", &[], false)];
        let request = Request {
            wish_install: vec![(PkgName::new("foo").unwrap(), VersionConstraint::Any)],
            ..Default::default()
        };
        let solver = ReferenceSolver;
        let solution = solver
            .resolve(&universe, &request, &BTreeSet::new())
            .await
            .unwrap()
            .unwrap();
        let targets: Vec<Nv> = solution.to_add.iter().map(|n| n.action.target().clone()).collect();
        assert!(targets.contains(&"foo.1".parse().unwrap()));
        assert!(targets.contains(&"bar.1".parse().unwrap()));
    }

    #[tokio::test]
    async fn install_dependency_runs_before_dependent() {
        let universe = vec![desc("foo.1", &["bar"], false), desc("bar.1", &[], false)];
        let request = Request {
            wish_install: vec![(PkgName::new("foo").unwrap(), VersionConstraint::Any)],
            ..Default::default()
        };
        let solver = ReferenceSolver;
        let solution = solver
            .resolve(&universe, &request, &BTreeSet::new())
            .await
            .unwrap()
            .unwrap();
        let order = solution.linearize();
        let foo_pos = order
            .iter()
            .position(|&i| solution.to_add[i].action.target() == &"foo.1".parse::<Nv>().unwrap())
            .unwrap();
        let bar_pos = order
            .iter()
            .position(|&i| solution.to_add[i].action.target() == &"bar.1".parse::<Nv>().unwrap())
            .unwrap();
        assert!(bar_pos < foo_pos, "bar must be installed before foo depends on it");
    }

    #[tokio::test]
    async fn missing_dependency_yields_no_solution() {
        let universe = vec![desc("foo.1", &["missing"], false)];
        let request = Request {
            wish_install: vec![(PkgName::new("foo").unwrap(), VersionConstraint::Any)],
            ..Default::default()
        };
        let solver = ReferenceSolver;
        let solution = solver.resolve(&universe, &request, &BTreeSet::new()).await.unwrap();
        assert!(solution.is_none());
    }

    #[tokio::test]
    async fn remove_orders_dependent_before_dependency() {
        let universe = vec![desc("foo.1", &[], true), desc("bar.1", &["foo"], true)];
        let request = Request {
            wish_remove: vec![PkgName::new("foo").unwrap()],
            ..Default::default()
        };
        let solver = ReferenceSolver;
        let solution = solver
            .resolve(&universe, &request, &BTreeSet::new())
            .await
            .unwrap()
            .unwrap();
        let bar_pos = solution.to_remove.iter().position(|nv| nv.name().as_str() == "bar").unwrap();
        let foo_pos = solution.to_remove.iter().position(|nv| nv.name().as_str() == "foo").unwrap();
        assert!(bar_pos < foo_pos, "bar depends on foo, so bar must be removed first");
    }
}
