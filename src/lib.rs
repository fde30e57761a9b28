//! Test pattern generation for combinational logic
//!
//! This crate computes, for a gate-level network and a single stuck-at
//! fault (a wire permanently forced to a fixed logic level), either a
//! primary-input assignment that makes the fault observable at a primary
//! output, or a proof by exhaustion that no such assignment exists.
//! The search is the classical
//! [D-Algorithm](https://en.wikipedia.org/wiki/Automatic_test_pattern_generation):
//! a five-valued logic algebra carries the good-circuit and faulty-circuit
//! values of every signal at once, deterministic implication propagates
//! forced values, and a recursive backtracking search resolves the
//! remaining choices through the D- and J-frontiers.
//!
//! # Usage
//!
//! ```
//! use datpg::{atpg, FiveValue, Network};
//!
//! // o = a & b
//! let mut net = Network::new();
//! let a = net.add_line("a");
//! let b = net.add_line("b");
//! let o = net.add_line("o");
//! net.and(&[a, b], o).unwrap();
//!
//! // Find a test vector for o stuck at 0
//! let detected = atpg::run(&mut net, o, false).unwrap();
//! assert!(detected);
//! assert!(net.value(a).same_pair(&FiveValue::ON));
//! assert!(net.value(b).same_pair(&FiveValue::ON));
//! ```
//!
//! The companion binary drives the same engine from the command line:
//!
//! ```bash
//! # Show a network read from a .bench (ISCAS) file
//! datpg show design.bench
//! # Generate test patterns for every stuck-at fault
//! datpg atpg design.bench -o design.test
//! # Draw the circuit with one sensitized path highlighted
//! datpg render design.bench -o design.tex --fault n22
//! ```
//!
//! # Datastructures
//!
//! `Network` owns the whole circuit: `Line`s are wires holding a
//! `FiveValue`, `Gate`s are computation nodes over a closed variant set
//! (And, Nand, Or, Nor, Xor, Xnor, Not). The network is also the builder;
//! construction goes through `&mut` methods and all naming state is owned
//! by the network itself, so independent networks never interact.
//!
//! Only single faults on combinational networks are supported; sequential
//! elements, fault simulation and pattern compaction are out of scope.

#![warn(missing_docs)]

pub mod atpg;
pub mod cmd;
mod error;
pub mod io;
pub mod logic;
pub mod network;
pub mod render;

pub use error::Error;
pub use logic::{FiveValue, NineValue, TriValue};
pub use network::{Gate, GateId, GateKind, Line, LineId, Network};
