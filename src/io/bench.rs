//! IO for .bench (ISCAS) files

use std::io::{BufRead, BufReader, Read, Write};

use fxhash::FxHashMap;
use itertools::Itertools;

use crate::error::Error;
use crate::network::{GateKind, LineId, Network};

fn gate_kind(name: &str) -> Option<GateKind> {
    match name.to_uppercase().as_str() {
        "AND" => Some(GateKind::And),
        "NAND" => Some(GateKind::Nand),
        "OR" => Some(GateKind::Or),
        "NOR" => Some(GateKind::Nor),
        "XOR" => Some(GateKind::Xor),
        "XNOR" => Some(GateKind::Xnor),
        "NOT" => Some(GateKind::Not),
        _ => None,
    }
}

fn network_from_statements(
    statements: &[Vec<String>],
    inputs: &[String],
    outputs: &[String],
) -> Result<Network, Error> {
    let mut net = Network::new();
    let mut name_to_line: FxHashMap<String, LineId> = FxHashMap::default();

    // Declare every line first so gates can reference later statements
    for name in inputs {
        let id = net.add_line(name);
        if name_to_line.insert(name.clone(), id).is_some() {
            return Err(Error::Parse(format!("{name} is defined twice")));
        }
    }
    for s in statements {
        let id = net.add_line(&s[0]);
        if name_to_line.insert(s[0].clone(), id).is_some() {
            return Err(Error::Parse(format!("{} is defined twice", s[0])));
        }
    }
    for o in outputs {
        if !name_to_line.contains_key(o) {
            return Err(Error::Parse(format!("output {o} is not generated anywhere")));
        }
    }

    for s in statements {
        let kind = match s[1].to_uppercase().as_str() {
            "DFF" | "DFFRSE" => {
                return Err(Error::Parse(format!(
                    "sequential gate {} is not supported",
                    s[1]
                )))
            }
            _ => gate_kind(&s[1])
                .ok_or_else(|| Error::Parse(format!("unknown gate type {}", s[1])))?,
        };
        let mut gate_inputs = Vec::new();
        for dep in &s[2..] {
            match name_to_line.get(dep) {
                Some(&l) => gate_inputs.push(l),
                None => {
                    return Err(Error::Parse(format!(
                        "gate input {dep} is not generated anywhere"
                    )))
                }
            }
        }
        net.add_gate(kind, &gate_inputs, name_to_line[&s[0]])?;
    }
    Ok(net)
}

/// Read a network in .bench format, as used by the ISCAS benchmarks
///
/// These files describe the design with simple statements like:
/// ```text
///     # This is a comment
///     INPUT(i0)
///     INPUT(i1)
///     x0 = AND(i0, i1)
///     x1 = NAND(x0, i1)
///     x2 = OR(x0, i0)
///     x3 = NOR(i0, x1)
///     x4 = XOR(x3, x2)
///     x5 = NOT(x4)
///     OUTPUT(x5)
/// ```
/// Only the combinational gate subset of the format is accepted.
pub fn read_bench<R: Read>(r: R) -> Result<Network, Error> {
    let mut statements = Vec::new();
    let mut inputs = Vec::new();
    let mut outputs = Vec::new();
    for l in BufReader::new(r).lines() {
        let s = l?;
        let t = s.trim();
        if t.is_empty() || t.starts_with('#') {
            continue;
        }
        if !t.contains('=') {
            let parts: Vec<_> = t
                .split(&['(', ')'])
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .collect();
            if parts.len() != 2 {
                return Err(Error::Parse(format!("malformed statement: {t}")));
            }
            if ["INPUT", "PINPUT"].contains(&parts[0]) {
                inputs.push(parts[1].to_string());
            } else if ["OUTPUT", "POUTPUT"].contains(&parts[0]) {
                outputs.push(parts[1].to_string());
            } else {
                return Err(Error::Parse(format!("unknown keyword {}", parts[0])));
            }
        } else {
            let parts: Vec<String> = t
                .split(&['=', '(', ',', ')'])
                .map(|s| s.trim().to_owned())
                .filter(|s| !s.is_empty())
                .collect();
            if parts.len() < 2 {
                return Err(Error::Parse(format!("malformed statement: {t}")));
            }
            statements.push(parts);
        }
    }
    network_from_statements(&statements, &inputs, &outputs)
}

/// Write a network in .bench format, as used by the ISCAS benchmarks
pub fn write_bench<W: Write>(w: &mut W, net: &Network) -> Result<(), Error> {
    writeln!(w, "# .bench (ISCAS) file")?;
    writeln!(w, "# Generated by datpg")?;
    for l in net.primary_inputs() {
        writeln!(w, "INPUT({})", net.line(l).name())?;
    }
    writeln!(w)?;
    for l in net.primary_outputs() {
        writeln!(w, "OUTPUT({})", net.line(l).name())?;
    }
    writeln!(w)?;
    for g in net.gate_ids() {
        let gate = net.gate(g);
        writeln!(
            w,
            "{} = {}({})",
            net.line(gate.output()).name(),
            gate.kind().name().to_uppercase(),
            gate.inputs().iter().map(|&l| net.line(l).name()).join(", ")
        )?;
    }
    Ok(())
}
