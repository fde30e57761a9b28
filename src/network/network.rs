use std::fmt;

use fxhash::FxHashMap;
use itertools::Itertools;

use crate::error::Error;
use crate::logic::FiveValue;
use crate::network::gates::{Gate, GateKind};

/// Identifier of a [`Line`] within its [`Network`]
///
/// Ordered by creation order.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct LineId(u32);

/// Identifier of a [`Gate`] within its [`Network`]
///
/// Ordered by creation order.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct GateId(u32);

impl LineId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl GateId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "l{}", self.0)
    }
}

impl fmt::Debug for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

impl fmt::Debug for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// A wire carrying a five-valued signal
///
/// A line has at most one driving gate (none makes it a primary input)
/// and any number of consuming gates (none makes it a primary output).
/// Structure is fixed after construction; only the value changes during
/// a search, and is restored to X by [`Network::reset`].
#[derive(Debug, Clone)]
pub struct Line {
    pub(crate) name: String,
    pub(crate) value: FiveValue,
    pub(crate) driver: Option<GateId>,
    pub(crate) sinks: Vec<GateId>,
}

impl Line {
    /// The line's display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The line's current value
    pub fn value(&self) -> FiveValue {
        self.value
    }

    /// The gate driving this line, if any
    pub fn driver(&self) -> Option<GateId> {
        self.driver
    }

    /// The gates consuming this line
    pub fn sinks(&self) -> &[GateId] {
        &self.sinks
    }

    /// Returns whether the line is a primary input (no driver)
    pub fn is_primary_input(&self) -> bool {
        self.driver.is_none()
    }

    /// Returns whether the line is a primary output (no consumers)
    pub fn is_primary_output(&self) -> bool {
        self.sinks.is_empty()
    }
}

/// A combinational gate-level network
///
/// The network owns all its gates and lines and doubles as the builder:
/// lines and gates are created through `&mut` methods, so there is no
/// ambient construction context and no global state. Display names are
/// deduplicated by a counter owned by the network.
#[derive(Debug, Clone, Default)]
pub struct Network {
    lines: Vec<Line>,
    gates: Vec<Gate>,
    names: FxHashMap<String, usize>,
}

impl Network {
    /// Create a new, empty network
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the number of lines
    pub fn nb_lines(&self) -> usize {
        self.lines.len()
    }

    /// Return the number of gates
    pub fn nb_gates(&self) -> usize {
        self.gates.len()
    }

    /// Get the line with the given id
    pub fn line(&self, l: LineId) -> &Line {
        &self.lines[l.index()]
    }

    /// Get the gate with the given id
    pub fn gate(&self, g: GateId) -> &Gate {
        &self.gates[g.index()]
    }

    /// Iterate over all line ids in creation order
    pub fn line_ids(&self) -> impl Iterator<Item = LineId> {
        (0..self.lines.len() as u32).map(LineId)
    }

    /// Iterate over all gate ids in creation order
    pub fn gate_ids(&self) -> impl Iterator<Item = GateId> {
        (0..self.gates.len() as u32).map(GateId)
    }

    /// Get the current value of a line
    pub fn value(&self, l: LineId) -> FiveValue {
        self.lines[l.index()].value
    }

    pub(crate) fn set_value(&mut self, l: LineId, value: FiveValue) {
        self.lines[l.index()].value = value;
    }

    /// Create a new line with value X
    ///
    /// The display name is deduplicated: reusing a name yields `name_1`,
    /// `name_2` and so on.
    pub fn add_line(&mut self, name: &str) -> LineId {
        let name = self.unique_name(name);
        let id = LineId(self.lines.len() as u32);
        self.lines.push(Line {
            name,
            value: FiveValue::UNKNOWN,
            driver: None,
            sinks: Vec::new(),
        });
        id
    }

    fn unique_name(&mut self, base: &str) -> String {
        let count = self.names.entry(base.to_string()).or_insert(0);
        let name = if *count == 0 {
            base.to_string()
        } else {
            format!("{}_{}", base, *count)
        };
        *count += 1;
        name
    }

    /// Create a new gate driving an existing line
    ///
    /// Fails with a configuration error if the gate has no inputs, if a
    /// Not gate does not have exactly one input, or if the output line
    /// already has a driver.
    pub fn add_gate(&mut self, kind: GateKind, inputs: &[LineId], output: LineId) -> Result<GateId, Error> {
        if inputs.is_empty() {
            return Err(Error::Config(format!("{kind} gate must have at least one input")));
        }
        if kind == GateKind::Not && inputs.len() != 1 {
            return Err(Error::Config("not gate must have exactly one input".to_string()));
        }
        if self.lines[output.index()].driver.is_some() {
            return Err(Error::Config(format!(
                "line {} already has a driver",
                self.lines[output.index()].name
            )));
        }
        let id = GateId(self.gates.len() as u32);
        for &l in inputs {
            self.lines[l.index()].sinks.push(id);
        }
        self.lines[output.index()].driver = Some(id);
        let name = self.unique_name(kind.name());
        self.gates.push(Gate {
            kind,
            inputs: inputs.to_vec(),
            output,
            name,
        });
        Ok(id)
    }

    /// Create an And gate
    pub fn and(&mut self, inputs: &[LineId], output: LineId) -> Result<GateId, Error> {
        self.add_gate(GateKind::And, inputs, output)
    }

    /// Create a Nand gate
    pub fn nand(&mut self, inputs: &[LineId], output: LineId) -> Result<GateId, Error> {
        self.add_gate(GateKind::Nand, inputs, output)
    }

    /// Create an Or gate
    pub fn or(&mut self, inputs: &[LineId], output: LineId) -> Result<GateId, Error> {
        self.add_gate(GateKind::Or, inputs, output)
    }

    /// Create a Nor gate
    pub fn nor(&mut self, inputs: &[LineId], output: LineId) -> Result<GateId, Error> {
        self.add_gate(GateKind::Nor, inputs, output)
    }

    /// Create a Xor gate
    pub fn xor(&mut self, inputs: &[LineId], output: LineId) -> Result<GateId, Error> {
        self.add_gate(GateKind::Xor, inputs, output)
    }

    /// Create a Xnor gate
    pub fn xnor(&mut self, inputs: &[LineId], output: LineId) -> Result<GateId, Error> {
        self.add_gate(GateKind::Xnor, inputs, output)
    }

    /// Create an inverter
    pub fn not(&mut self, input: LineId, output: LineId) -> Result<GateId, Error> {
        self.add_gate(GateKind::Not, &[input], output)
    }

    /// The primary inputs (lines with no driver), in creation order
    pub fn primary_inputs(&self) -> Vec<LineId> {
        self.line_ids().filter(|&l| self.line(l).is_primary_input()).collect()
    }

    /// The primary outputs (lines with no consumers), in creation order
    pub fn primary_outputs(&self) -> Vec<LineId> {
        self.line_ids().filter(|&l| self.line(l).is_primary_output()).collect()
    }

    /// Restore every line to X; idempotent
    pub fn reset(&mut self) {
        for line in &mut self.lines {
            line.value = FiveValue::UNKNOWN;
        }
    }

    /// Evaluate a gate's function over the current values of its inputs
    ///
    /// Pure with respect to the network: no values are written, so the
    /// evaluation is safe to repeat at any time.
    pub fn forward(&self, g: GateId) -> FiveValue {
        let gate = &self.gates[g.index()];
        let fold = |init: FiveValue, op: fn(FiveValue, FiveValue) -> FiveValue| {
            gate.inputs.iter().map(|&l| self.value(l)).fold(init, op)
        };
        match gate.kind {
            GateKind::And => fold(FiveValue::ON, |a, b| a & b),
            GateKind::Nand => !fold(FiveValue::ON, |a, b| a & b),
            GateKind::Or => fold(FiveValue::OFF, |a, b| a | b),
            GateKind::Nor => !fold(FiveValue::OFF, |a, b| a | b),
            GateKind::Xor => fold(FiveValue::OFF, |a, b| a ^ b),
            GateKind::Xnor => !fold(FiveValue::OFF, |a, b| a ^ b),
            GateKind::Not => !self.value(gate.inputs[0]),
        }
    }

    /// Returns whether any input of the gate carries a fault effect
    ///
    /// Recomputed from current values on every call; neighboring
    /// assignments change the answer between calls.
    pub fn has_sensitized_input(&self, g: GateId) -> bool {
        self.gates[g.index()].inputs.iter().any(|&l| self.value(l).is_sensitized())
    }

    /// Returns whether the gate's current inputs imply its output value
    ///
    /// Uses the five-valued narrowed equality, so a fault effect on the
    /// output counts as implied by a matching good-circuit deduction.
    pub fn can_imply_output(&self, g: GateId) -> bool {
        self.value(self.gates[g.index()].output) == self.forward(g)
    }

    /// The gate's input lines whose value is still X, in input order
    ///
    /// A line wired to several input positions of the gate appears once
    /// per position.
    pub fn unknown_inputs(&self, g: GateId) -> Vec<LineId> {
        self.gates[g.index()]
            .inputs
            .iter()
            .copied()
            .filter(|&l| self.value(l) == FiveValue::UNKNOWN)
            .collect()
    }

    /// Render the boolean expression rooted at a line
    pub fn equation(&self, l: LineId) -> String {
        match self.lines[l.index()].driver {
            None => self.lines[l.index()].name.clone(),
            Some(g) => {
                let gate = &self.gates[g.index()];
                format!(
                    "{}({})",
                    gate.name,
                    gate.inputs.iter().map(|&i| self.equation(i)).join(", ")
                )
            }
        }
    }

    /// Detach the fault line from its driver, splicing in a synthetic line
    ///
    /// The synthetic line becomes the driver's output so the driver's
    /// good-circuit value can still be implied independently of the fault
    /// effect. Returns the synthetic line and the original driver for
    /// [`Network::reattach_fault_line`].
    pub(crate) fn detach_fault_line(&mut self, fault: LineId) -> (LineId, Option<GateId>) {
        let driver = self.lines[fault.index()].driver.take();
        let name = format!("{}_in", self.lines[fault.index()].name);
        let synthetic = self.add_line(&name);
        self.lines[synthetic.index()].driver = driver;
        if let Some(g) = driver {
            self.gates[g.index()].output = synthetic;
        }
        (synthetic, driver)
    }

    /// Undo [`Network::detach_fault_line`], removing the synthetic line
    pub(crate) fn reattach_fault_line(&mut self, fault: LineId, synthetic: LineId, driver: Option<GateId>) {
        if let Some(g) = driver {
            self.gates[g.index()].output = fault;
        }
        self.lines[fault.index()].driver = driver;
        debug_assert_eq!(synthetic.index(), self.lines.len() - 1);
        self.lines.pop();
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Network with {} inputs, {} outputs and {} gates:",
            self.primary_inputs().len(),
            self.primary_outputs().len(),
            self.nb_gates()
        )?;
        for gate in &self.gates {
            writeln!(
                f,
                "\t{} = {}({})",
                self.lines[gate.output.index()].name,
                gate.kind,
                gate.inputs.iter().map(|&l| self.line(l).name()).join(", ")
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_and() -> (Network, LineId, LineId, LineId) {
        let mut net = Network::new();
        let a = net.add_line("a");
        let b = net.add_line("b");
        let o = net.add_line("o");
        net.and(&[a, b], o).unwrap();
        (net, a, b, o)
    }

    #[test]
    fn test_basic() {
        let (net, a, b, o) = single_and();
        assert_eq!(net.nb_lines(), 3);
        assert_eq!(net.nb_gates(), 1);
        assert_eq!(net.primary_inputs(), vec![a, b]);
        assert_eq!(net.primary_outputs(), vec![o]);
        assert!(net.line(a).is_primary_input());
        assert!(net.line(o).is_primary_output());
        assert!(!net.line(o).is_primary_input());
        let g = net.line(o).driver().unwrap();
        assert_eq!(net.gate(g).inputs(), &[a, b]);
        assert_eq!(net.gate(g).output(), o);
        assert_eq!(net.gate(g).kind(), GateKind::And);
        assert_eq!(net.line(a).sinks(), &[g]);
    }

    #[test]
    fn test_name_deduplication() {
        let mut net = Network::new();
        let a0 = net.add_line("a");
        let a1 = net.add_line("a");
        let a2 = net.add_line("a");
        assert_eq!(net.line(a0).name(), "a");
        assert_eq!(net.line(a1).name(), "a_1");
        assert_eq!(net.line(a2).name(), "a_2");

        let o0 = net.add_line("o");
        let o1 = net.add_line("o");
        let g0 = net.and(&[a0, a1], o0).unwrap();
        let g1 = net.and(&[a1, a2], o1).unwrap();
        assert_eq!(net.gate(g0).name(), "and");
        assert_eq!(net.gate(g1).name(), "and_1");
    }

    #[test]
    fn test_construction_errors() {
        let mut net = Network::new();
        let a = net.add_line("a");
        let b = net.add_line("b");
        let o = net.add_line("o");
        assert!(matches!(net.and(&[], o), Err(Error::Config(_))));
        assert!(matches!(
            net.add_gate(GateKind::Not, &[a, b], o),
            Err(Error::Config(_))
        ));
        net.and(&[a, b], o).unwrap();
        assert!(matches!(net.or(&[a, b], o), Err(Error::Config(_))));
    }

    #[test]
    fn test_forward_and() {
        let (mut net, a, b, o) = single_and();
        let g = net.line(o).driver().unwrap();
        net.set_value(a, FiveValue::ON);
        net.set_value(b, FiveValue::ON);
        assert!(net.forward(g).same_pair(&FiveValue::ON));
        net.set_value(a, FiveValue::OFF);
        assert!(net.forward(g).same_pair(&FiveValue::OFF));
        net.set_value(a, FiveValue::UNKNOWN);
        net.set_value(b, FiveValue::OFF);
        assert!(net.forward(g).same_pair(&FiveValue::OFF));
        net.set_value(b, FiveValue::ON);
        assert!(net.forward(g).same_pair(&FiveValue::UNKNOWN));
    }

    #[test]
    fn test_forward_inverting_gates() {
        let mut net = Network::new();
        let a = net.add_line("a");
        let b = net.add_line("b");
        let nand_o = net.add_line("nand_o");
        let nor_o = net.add_line("nor_o");
        let xnor_o = net.add_line("xnor_o");
        let not_o = net.add_line("not_o");
        let g_nand = net.nand(&[a, b], nand_o).unwrap();
        let g_nor = net.nor(&[a, b], nor_o).unwrap();
        let g_xnor = net.xnor(&[a, b], xnor_o).unwrap();
        let g_not = net.not(a, not_o).unwrap();
        net.set_value(a, FiveValue::ON);
        net.set_value(b, FiveValue::OFF);
        assert!(net.forward(g_nand).same_pair(&FiveValue::ON));
        assert!(net.forward(g_nor).same_pair(&FiveValue::OFF));
        assert!(net.forward(g_xnor).same_pair(&FiveValue::OFF));
        assert!(net.forward(g_not).same_pair(&FiveValue::OFF));
    }

    #[test]
    fn test_forward_propagates_fault_effect() {
        let (mut net, a, b, o) = single_and();
        let g = net.line(o).driver().unwrap();
        net.set_value(a, FiveValue::ON_IS_OFF);
        net.set_value(b, FiveValue::ON);
        assert!(net.forward(g).same_pair(&FiveValue::ON_IS_OFF));
        assert!(net.has_sensitized_input(g));
        net.set_value(b, FiveValue::OFF);
        assert!(net.forward(g).same_pair(&FiveValue::OFF));
    }

    #[test]
    fn test_reset() {
        let (mut net, a, b, o) = single_and();
        net.set_value(a, FiveValue::ON);
        net.set_value(b, FiveValue::OFF);
        net.set_value(o, FiveValue::ON_IS_OFF);
        net.reset();
        for l in net.line_ids() {
            assert!(net.value(l).same_pair(&FiveValue::UNKNOWN));
        }
        net.reset();
        for l in net.line_ids() {
            assert!(net.value(l).same_pair(&FiveValue::UNKNOWN));
        }
    }

    #[test]
    fn test_frontier_predicates() {
        let (mut net, a, b, o) = single_and();
        let g = net.line(o).driver().unwrap();
        assert!(!net.has_sensitized_input(g));
        net.set_value(a, FiveValue::OFF_IS_ON);
        assert!(net.has_sensitized_input(g));
        // Output X, forward X & X = X: trivially implied
        net.reset();
        assert!(net.can_imply_output(g));
        net.set_value(o, FiveValue::ON);
        assert!(!net.can_imply_output(g));
        net.set_value(a, FiveValue::ON);
        net.set_value(b, FiveValue::ON);
        assert!(net.can_imply_output(g));
        assert_eq!(net.unknown_inputs(g), Vec::new());
        net.set_value(b, FiveValue::UNKNOWN);
        assert_eq!(net.unknown_inputs(g), vec![b]);
    }

    #[test]
    fn test_equation() {
        let mut net = Network::new();
        let a = net.add_line("a");
        let b = net.add_line("b");
        let c = net.add_line("c");
        let m = net.add_line("m");
        let o = net.add_line("o");
        net.and(&[a, b], m).unwrap();
        net.or(&[m, c], o).unwrap();
        assert_eq!(net.equation(o), "or(and(a, b), c)");
        assert_eq!(net.equation(a), "a");
    }

    #[test]
    fn test_display() {
        let (net, _, _, _) = single_and();
        let s = format!("{net}");
        assert!(s.contains("Network with 2 inputs, 1 outputs and 1 gates:"));
        assert!(s.contains("o = and(a, b)"));
    }

    #[test]
    fn test_fault_splice_roundtrip() {
        let (mut net, _, _, o) = single_and();
        let g = net.line(o).driver().unwrap();
        let (synthetic, driver) = net.detach_fault_line(o);
        assert_eq!(driver, Some(g));
        assert_eq!(net.nb_lines(), 4);
        assert_eq!(net.line(synthetic).name(), "o_in");
        assert_eq!(net.line(synthetic).driver(), Some(g));
        assert!(net.line(o).is_primary_input());
        assert_eq!(net.gate(g).output(), synthetic);
        net.reattach_fault_line(o, synthetic, driver);
        assert_eq!(net.nb_lines(), 3);
        assert_eq!(net.line(o).driver(), Some(g));
        assert_eq!(net.gate(g).output(), o);
    }

    #[test]
    fn test_splice_on_primary_input() {
        let (mut net, a, _, _) = single_and();
        let (synthetic, driver) = net.detach_fault_line(a);
        assert_eq!(driver, None);
        assert!(net.line(synthetic).is_primary_input());
        net.reattach_fault_line(a, synthetic, driver);
        assert_eq!(net.nb_lines(), 3);
        assert!(net.line(a).is_primary_input());
    }
}
