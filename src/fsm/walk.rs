// Copyright 2024 Cornell University
// released under BSD 3-Clause License
// author: Kevin Laeufer <laeufer@cornell.edu>

use super::{describe, Action, TransactionState};
use rand::{Rng, SeedableRng};

/// Picks `steps` actions starting from `Idle`, each one allowed in the state reached by the
/// actions before it. The same seed always yields the same walk.
pub fn random_walk(seed: u64, steps: usize) -> Vec<Action> {
    let mut rng = rand_xoshiro::Xoshiro256PlusPlus::seed_from_u64(seed);
    let mut state = TransactionState::Idle;
    let mut out = Vec::with_capacity(steps);
    for _ in 0..steps {
        let edges = &describe(state).allowed_actions;
        let edge = edges[rng.gen_range(0..edges.len())];
        out.push(edge.action);
        state = edge.next;
    }
    out
}
