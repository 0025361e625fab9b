// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! The solver's reply: an ordered removal list plus a DAG of add/recompile
//! actions (spec.md §4.4).

use forge_foundation::Nv;

/// One node of the `to_add` DAG. `Delete` is valid only in a node's
/// lifecycle after it completes and is folded into the Installed set by
/// the executor — it is never constructed inside `to_add` itself (spec.md
/// §4.4: "`Delete(NV)` (illegal inside `to_add`)").
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Action {
    Change { from: Option<Nv>, to: Nv },
    Recompile(Nv),
}

impl Action {
    pub fn target(&self) -> &Nv {
        match self {
            Action::Change { to, .. } => to,
            Action::Recompile(nv) => nv,
        }
    }
}

/// A node in the add/recompile DAG, plus the indices of the nodes it
/// depends on (spec.md §4.5 "a node becomes runnable when all
/// predecessors have completed successfully").
#[derive(Clone, Debug)]
pub struct ActionNode {
    pub action: Action,
    pub depends_on: Vec<usize>,
}

/// The solver's output for a single command (spec.md §4.4). `None` from
/// the adapter means no solution was found (`SolverNoSolution`, spec.md
/// §7) — that case is represented by `Option<Solution>` at the call site,
/// not inside this type.
#[derive(Clone, Debug, Default)]
pub struct Solution {
    /// Leaves-first: a dependent always precedes what it depends on.
    pub to_remove: Vec<Nv>,
    pub to_add: Vec<ActionNode>,
}

impl Solution {
    /// Topologically sort `to_add` into one valid execution order. Used by
    /// tests and by any caller that wants a single-threaded linearization;
    /// the executor itself schedules directly off `depends_on`.
    pub fn linearize(&self) -> Vec<usize> {
        let mut remaining: Vec<usize> = (0..self.to_add.len()).collect();
        let mut done = vec![false; self.to_add.len()];
        let mut order = Vec::with_capacity(self.to_add.len());

        while !remaining.is_empty() {
            let mut progressed = false;
            remaining.retain(|&idx| {
                let ready = self.to_add[idx].depends_on.iter().all(|&dep| done[dep]);
                if ready {
                    order.push(idx);
                    done[idx] = true;
                    progressed = true;
                }
                !ready
            });
            if !progressed {
                // A cycle would violate the DAG contract; bail out rather
                // than loop forever. Callers that construct Solutions are
                // expected to uphold acyclicity.
                break;
            }
        }
        order
    }
}
