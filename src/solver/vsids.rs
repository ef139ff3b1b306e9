//! Variable State Independent Decaying Sum: a max-heap over unassigned
//! variables keyed by an activity that is bumped on conflict involvement and
//! uniformly decayed between conflicts. `priority_queue::PriorityQueue`
//! supplies the reverse index (variable -> heap position) needed to sift a
//! bumped entry in logarithmic time without a hand-rolled heap.

use ordered_float::NotNan;
use priority_queue::PriorityQueue;

use crate::cnf::VarId;

const DECAY_FACTOR: f64 = 0.95;
const RESCALE_THRESHOLD: f64 = 1e100;

pub struct VariableOrder {
    heap: PriorityQueue<VarId, NotNan<f64>>,
    activity: Vec<f64>,
    increment: f64,
}

impl VariableOrder {
    pub fn new(num_vars: usize) -> Self {
        let mut heap = PriorityQueue::with_capacity(num_vars);
        for var in 1..=num_vars {
            heap.push(var, NotNan::new(0.0).unwrap());
        }
        VariableOrder {
            heap,
            activity: vec![0.0; num_vars + 1],
            increment: 1.0,
        }
    }

    /// Removes and returns the unassigned variable with highest activity, or
    /// `None` if every variable is already assigned.
    pub fn pop_max(&mut self, vars: &[Option<bool>]) -> Option<VarId> {
        loop {
            let (var, _) = self.heap.pop()?;
            if vars[var].is_none() {
                return Some(var);
            }
            // stale entry for an already-assigned variable: discard and retry
        }
    }

    pub fn insert(&mut self, var: VarId) {
        self.heap.push(var, NotNan::new(self.activity[var]).unwrap());
    }

    pub fn bump(&mut self, var: VarId) {
        self.activity[var] += self.increment;
        if self.activity[var] > RESCALE_THRESHOLD {
            self.rescale();
        }
        self.heap
            .change_priority(&var, NotNan::new(self.activity[var]).unwrap());
    }

    pub fn decay(&mut self) {
        self.increment /= DECAY_FACTOR;
    }

    fn rescale(&mut self) {
        for activity in &mut self.activity {
            *activity *= 1e-100;
        }
        self.increment *= 1e-100;
        let rescaled: Vec<(VarId, NotNan<f64>)> = self
            .heap
            .iter()
            .map(|(&var, _)| (var, NotNan::new(self.activity[var]).unwrap()))
            .collect();
        self.heap = rescaled.into_iter().collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bumped_variable_surfaces_first() {
        let mut order = VariableOrder::new(3);
        let vars = vec![None; 4];
        order.bump(2);
        order.bump(2);
        order.bump(1);
        assert_eq!(order.pop_max(&vars), Some(2));
    }

    #[test]
    fn already_assigned_variables_are_skipped() {
        let mut order = VariableOrder::new(2);
        let mut vars = vec![None; 3];
        order.bump(1);
        vars[1] = Some(true);
        assert_eq!(order.pop_max(&vars), Some(2));
    }

    #[test]
    fn rescale_preserves_relative_order() {
        let mut order = VariableOrder::new(2);
        order.activity[1] = RESCALE_THRESHOLD / 2.0;
        order.bump(1);
        let vars = vec![None; 3];
        assert_eq!(order.pop_max(&vars), Some(1));
    }
}
