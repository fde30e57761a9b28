//! Test pattern generation with the D-Algorithm
//!
//! Given a combinational [`Network`] and a single stuck-at fault on one of
//! its lines, [`run`] searches for a primary-input assignment that makes
//! the fault observable at a primary output. The search alternates between
//! deterministic implication and guided choice: the D-frontier tracks the
//! gates that can move the fault effect one gate closer to an output, and
//! the J-frontier tracks the gates whose already-known output still needs
//! its inputs justified.

use std::collections::BTreeSet;
use std::fmt;

use log::{debug, trace};

use crate::error::Error;
use crate::logic::FiveValue;
use crate::network::{GateId, LineId, Network};

/// Which neighbors of a line to revisit after it received a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    /// Revisit the driving gate
    Backward,
    /// Revisit the consuming gates
    Forward,
    /// Revisit both
    Both,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Direction::Backward => '←',
            Direction::Forward => '→',
            Direction::Both => '↔',
        };
        write!(f, "{c}")
    }
}

/// A pending unit of work: assign a value to a line, then propagate
#[derive(Debug, Clone, Copy)]
struct Assignment {
    line: LineId,
    value: FiveValue,
    direction: Direction,
}

/// A single stuck-at fault site
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fault {
    /// The faulty line
    pub line: LineId,
    /// True for stuck-at-1, false for stuck-at-0
    pub stuck_at_one: bool,
}

impl Fault {
    /// Enumerate every possible stuck-at fault in a network
    pub fn all(net: &Network) -> Vec<Fault> {
        let mut ret = Vec::new();
        for line in net.line_ids() {
            for stuck_at_one in [false, true] {
                ret.push(Fault { line, stuck_at_one });
            }
        }
        ret
    }

    /// Search for a test vector exposing this fault
    pub fn detect(&self, net: &mut Network) -> Result<bool, Error> {
        run(net, self.line, self.stuck_at_one)
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} stuck-at-{}", self.line, u8::from(self.stuck_at_one))
    }
}

/// The branch-local search state, copied for every recursive choice
///
/// Line values are not part of this state: they live on the shared
/// network and are undone through the journal.
#[derive(Clone, Default)]
struct SearchState {
    d_frontier: BTreeSet<GateId>,
    j_frontier: BTreeSet<GateId>,
    queue: Vec<Assignment>,
    visited_outputs: BTreeSet<LineId>,
}

/// The search engine: the network under test plus the undo journal
///
/// The journal records the prior value of every line mutation across the
/// whole search. A mark taken at branch entry delimits everything the
/// branch assigned, so a failed branch rolls back completely and sibling
/// branches never observe its dead assignments.
struct Search<'a> {
    net: &'a mut Network,
    journal: Vec<(LineId, FiveValue)>,
}

impl Search<'_> {
    /// Revert every mutation recorded after the mark, newest first
    fn rollback(&mut self, mark: usize) {
        for (line, value) in self.journal.split_off(mark).into_iter().rev() {
            self.net.set_value(line, value);
        }
    }

    /// Run the assignment queue to exhaustion
    ///
    /// Returns false on contradiction, after reverting everything this
    /// pass assigned. Frontier memberships of the gates around each
    /// assigned line are recomputed on the way.
    fn imply(&mut self, state: &mut SearchState) -> bool {
        let mark = self.journal.len();
        while let Some(Assignment { line, value, direction }) = state.queue.pop() {
            if self.net.line(line).is_primary_output() {
                state.visited_outputs.insert(line);
            }
            let current = self.net.value(line);
            if current == FiveValue::UNKNOWN {
                trace!("assign {} = {} {}", self.net.line(line).name(), value, direction);
                self.journal.push((line, current));
                self.net.set_value(line, value);
            } else if current == value {
                continue;
            } else {
                debug!(
                    "contradiction on {}: {} vs {}",
                    self.net.line(line).name(),
                    current,
                    value
                );
                self.rollback(mark);
                return false;
            }
            if matches!(direction, Direction::Backward | Direction::Both) {
                if let Some(gate) = self.net.line(line).driver() {
                    self.deduce(gate, state);
                }
            }
            if matches!(direction, Direction::Forward | Direction::Both) {
                for gate in self.net.line(line).sinks().to_vec() {
                    self.deduce(gate, state);
                }
            }
        }
        true
    }

    /// Recompute a gate's deduction and frontier memberships
    fn deduce(&mut self, gate: GateId, state: &mut SearchState) {
        let deduction = self.net.forward(gate);
        let output = self.net.gate(gate).output();
        if deduction != FiveValue::UNKNOWN {
            state.queue.push(Assignment {
                line: output,
                value: deduction,
                direction: Direction::Forward,
            });
        }
        if self.net.has_sensitized_input(gate) && self.net.value(output) == FiveValue::UNKNOWN {
            state.d_frontier.insert(gate);
        } else {
            state.d_frontier.remove(&gate);
        }
        if self.net.value(output) != FiveValue::UNKNOWN && !self.net.can_imply_output(gate) {
            state.j_frontier.insert(gate);
        } else {
            state.j_frontier.remove(&gate);
        }
    }

    /// Returns whether a fault effect has reached a visited primary output
    fn fault_observed(&self, state: &SearchState) -> bool {
        state
            .visited_outputs
            .iter()
            .any(|&l| self.net.value(l).is_sensitized())
    }

    /// One recursion level: implication, then choice with full rollback
    fn recurse(&mut self, mut state: SearchState) -> bool {
        let mark = self.journal.len();
        if self.step(&mut state) {
            true
        } else {
            self.rollback(mark);
            false
        }
    }

    fn step(&mut self, state: &mut SearchState) -> bool {
        if !self.imply(state) {
            return false;
        }

        if !self.fault_observed(state) {
            // Propagation: move the fault effect one gate closer to an
            // output by setting the gate's other inputs non-controlling.
            // A single frontier gate is tried per level; the lowest id
            // keeps the choice deterministic.
            let gate = match state.d_frontier.iter().next() {
                Some(&g) => g,
                None => {
                    debug!("dead end: no propagation candidate left");
                    return false;
                }
            };
            state.d_frontier.remove(&gate);
            let value = !self.net.gate(gate).kind().controlling();
            debug!("propagating through {}", self.net.gate(gate).name());
            for line in self.net.unknown_inputs(gate) {
                state.queue.push(Assignment {
                    line,
                    value,
                    direction: Direction::Both,
                });
            }
            return self.recurse(state.clone());
        }

        // Justification: pick an unjustified gate and decide its first
        // unknown input, controlling value first.
        let gate = match state.j_frontier.iter().next() {
            Some(&g) => g,
            None => return true,
        };
        state.j_frontier.remove(&gate);
        let controlling = self.net.gate(gate).kind().controlling();
        debug!("justifying {}", self.net.gate(gate).name());
        // Deciding one input either way covers the whole choice space at
        // this node; a gate with no unknown input left cannot be justified
        let line = match self.net.unknown_inputs(gate).first() {
            Some(&l) => l,
            None => return false,
        };
        for value in [controlling, !controlling] {
            let mut branch = state.clone();
            branch.queue.push(Assignment {
                line,
                value,
                direction: Direction::Both,
            });
            if self.recurse(branch) {
                return true;
            }
        }
        false
    }
}

/// Search for a test vector exposing a stuck-at fault
///
/// The network is reset, a synthetic line is temporarily spliced between
/// the fault line and its driver so the driver's good-circuit value can
/// be justified independently of the fault effect, and the recursive
/// search is seeded with the fault effect at the fault site. The splice
/// is undone before returning, whatever the outcome.
///
/// On `Ok(true)` the non-X primary input values form the test vector and
/// the primary output values show the expected divergence. `Ok(false)`
/// means no test was found; a structurally undetectable fault and one
/// missed by the single-candidate frontier exploration are
/// indistinguishable in the result.
pub fn run(net: &mut Network, fault_line: LineId, stuck_at_one: bool) -> Result<bool, Error> {
    if fault_line.index() >= net.nb_lines() {
        return Err(Error::Config(format!(
            "fault line {fault_line} is not part of the network"
        )));
    }
    net.reset();
    debug!(
        "searching test for {} stuck-at-{}",
        net.line(fault_line).name(),
        u8::from(stuck_at_one)
    );
    let (synthetic, driver) = net.detach_fault_line(fault_line);
    // The driver must justify the value the fault overrides, while the
    // fault site carries the divergence toward the outputs.
    let (drive, effect) = if stuck_at_one {
        (FiveValue::OFF, FiveValue::OFF_IS_ON)
    } else {
        (FiveValue::ON, FiveValue::ON_IS_OFF)
    };
    let mut state = SearchState::default();
    state.queue.push(Assignment {
        line: synthetic,
        value: drive,
        direction: Direction::Backward,
    });
    state.queue.push(Assignment {
        line: fault_line,
        value: effect,
        direction: Direction::Forward,
    });
    let detected = {
        let mut search = Search {
            net: &mut *net,
            journal: Vec::new(),
        };
        search.recurse(state)
    };
    net.reattach_fault_line(fault_line, synthetic, driver);
    debug!(
        "fault {}: {}",
        net.line(fault_line).name(),
        if detected { "detected" } else { "no test found" }
    );
    Ok(detected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::FiveValue;
    use crate::network::Network;

    fn single_and() -> (Network, LineId, LineId, LineId) {
        let mut net = Network::new();
        let a = net.add_line("a");
        let b = net.add_line("b");
        let o = net.add_line("o");
        net.and(&[a, b], o).unwrap();
        (net, a, b, o)
    }

    #[test_log::test]
    fn test_and_output_stuck_at_0() {
        let (mut net, a, b, o) = single_and();
        assert!(run(&mut net, o, false).unwrap());
        // Only a=1, b=1 drives the good output to 1 against the forced 0
        assert!(net.value(a).same_pair(&FiveValue::ON));
        assert!(net.value(b).same_pair(&FiveValue::ON));
        assert!(net.value(o).same_pair(&FiveValue::ON_IS_OFF));
    }

    #[test_log::test]
    fn test_and_output_stuck_at_1() {
        let (mut net, a, b, o) = single_and();
        assert!(run(&mut net, o, true).unwrap());
        // Either input at 0 suffices; the search settles on the first
        assert!(net.value(a).same_pair(&FiveValue::OFF));
        assert!(net.value(b).same_pair(&FiveValue::UNKNOWN));
        assert!(net.value(o).same_pair(&FiveValue::OFF_IS_ON));
    }

    #[test_log::test]
    fn test_xor_tied_inputs_stuck_at_0_undetectable() {
        // y = x ^ x is constantly 0, so the good value 1 required by a
        // stuck-at-0 test cannot be justified
        let mut net = Network::new();
        let x = net.add_line("x");
        let y = net.add_line("y");
        net.xor(&[x, x], y).unwrap();
        assert!(!run(&mut net, y, false).unwrap());
        // The failed search leaves no values behind
        assert!(net.value(x).same_pair(&FiveValue::UNKNOWN));
        assert!(net.value(y).same_pair(&FiveValue::UNKNOWN));
    }

    #[test_log::test]
    fn test_xor_tied_inputs_stuck_at_1_detected() {
        // The same structure makes stuck-at-1 observable with any input
        let mut net = Network::new();
        let x = net.add_line("x");
        let y = net.add_line("y");
        net.xor(&[x, x], y).unwrap();
        assert!(run(&mut net, y, true).unwrap());
        assert!(net.value(y).same_pair(&FiveValue::OFF_IS_ON));
    }

    #[test_log::test]
    fn test_two_level_propagation() {
        // o = or(and(a, b), c) with the And output stuck at 0: c must be
        // 0 or the fault effect is masked at the Or gate
        let mut net = Network::new();
        let a = net.add_line("a");
        let b = net.add_line("b");
        let c = net.add_line("c");
        let m = net.add_line("m");
        let o = net.add_line("o");
        net.and(&[a, b], m).unwrap();
        net.or(&[m, c], o).unwrap();
        assert!(run(&mut net, m, false).unwrap());
        assert!(net.value(a).same_pair(&FiveValue::ON));
        assert!(net.value(b).same_pair(&FiveValue::ON));
        assert!(net.value(c).same_pair(&FiveValue::OFF));
        assert!(net.value(m).same_pair(&FiveValue::ON_IS_OFF));
        assert!(net.value(o).same_pair(&FiveValue::ON_IS_OFF));
    }

    #[test_log::test]
    fn test_run_is_idempotent() {
        let (mut net, _a, _b, o) = single_and();
        assert!(run(&mut net, o, false).unwrap());
        let first: Vec<_> = net.line_ids().map(|l| net.value(l)).collect();
        assert!(run(&mut net, o, false).unwrap());
        let second: Vec<_> = net.line_ids().map(|l| net.value(l)).collect();
        assert_eq!(first.len(), second.len());
        for (x, y) in first.iter().zip(second.iter()) {
            assert!(x.same_pair(y));
        }
    }

    #[test_log::test]
    fn test_structure_restored_after_run() {
        let (mut net, _, _, o) = single_and();
        let g = net.line(o).driver().unwrap();
        for stuck_at_one in [false, true] {
            run(&mut net, o, stuck_at_one).unwrap();
            assert_eq!(net.nb_lines(), 3);
            assert_eq!(net.line(o).driver(), Some(g));
            assert_eq!(net.gate(g).output(), o);
        }
    }

    #[test]
    fn test_fault_on_unknown_line() {
        let (mut net, ..) = single_and();
        let mut other = Network::new();
        for name in ["p", "q", "r", "s"] {
            other.add_line(name);
        }
        // An id from a larger network lands outside the 3-line net
        let bogus = other.add_line("bogus");
        assert!(matches!(run(&mut net, bogus, false), Err(Error::Config(_))));
    }

    #[test]
    fn test_fault_enumeration() {
        let (net, ..) = single_and();
        let faults = Fault::all(&net);
        assert_eq!(faults.len(), 2 * net.nb_lines());
        assert_eq!(format!("{}", faults[1]), "l0 stuck-at-1");
    }

    #[test_log::test]
    fn test_fault_on_primary_input() {
        // A stuck-at-0 on input a of an And gate needs a=1, b=1
        let (mut net, a, b, o) = single_and();
        assert!(run(&mut net, a, false).unwrap());
        assert!(net.value(a).same_pair(&FiveValue::ON_IS_OFF));
        assert!(net.value(b).same_pair(&FiveValue::ON));
        assert!(net.value(o).same_pair(&FiveValue::ON_IS_OFF));
    }

    /// The exercise network from the original driver program
    fn demo_network() -> (Network, [LineId; 7]) {
        let mut net = Network::new();
        let a = net.add_line("a");
        let b = net.add_line("b");
        let c = net.add_line("c");
        let d = net.add_line("d");
        let e = net.add_line("e");
        let f = net.add_line("f");
        let o = net.add_line("o");
        let g = net.add_line("g");
        let h = net.add_line("h");
        let i = net.add_line("i");
        let j = net.add_line("j");
        let k = net.add_line("k");
        let l = net.add_line("l");
        let m = net.add_line("m");
        let n = net.add_line("n");
        net.and(&[e, f], k).unwrap();
        net.xor(&[a, b], g).unwrap();
        net.xor(&[c, d], h).unwrap();
        net.xor(&[g, h], l).unwrap();
        net.xnor(&[a, b], i).unwrap();
        net.xnor(&[c, d], j).unwrap();
        net.xnor(&[i, j], m).unwrap();
        net.or(&[k, l], n).unwrap();
        net.or(&[m, n], o).unwrap();
        (net, [a, b, c, d, e, f, o])
    }

    #[test_log::test]
    fn test_demo_network_output_stuck_at_0() {
        let (mut net, [a, b, c, d, e, f, o]) = demo_network();
        assert!(run(&mut net, o, false).unwrap());
        assert!(net.value(o).same_pair(&FiveValue::ON_IS_OFF));
        // The justification settles on m = 1 through the xnor tree
        assert!(net.value(a).same_pair(&FiveValue::OFF));
        assert!(net.value(b).same_pair(&FiveValue::ON));
        assert!(net.value(c).same_pair(&FiveValue::OFF));
        assert!(net.value(d).same_pair(&FiveValue::ON));
        assert!(net.value(e).same_pair(&FiveValue::UNKNOWN));
        assert!(net.value(f).same_pair(&FiveValue::UNKNOWN));
    }

    #[test_log::test]
    fn test_demo_network_fault_enumeration_runs() {
        let (mut net, _) = demo_network();
        for fault in Fault::all(&net) {
            // Every search must terminate and restore the structure
            fault.detect(&mut net).unwrap();
            assert_eq!(net.nb_lines(), 15);
        }
    }
}
