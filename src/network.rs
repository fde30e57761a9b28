//! Gate-level network representation
//!
//! A network is a directed acyclic graph of [`Gate`]s connected by
//! [`Line`]s. Each line has at most one driver and any number of
//! consumers; lines without a driver are primary inputs, lines without
//! consumers are primary outputs.

mod gates;
mod network;

pub use gates::{Gate, GateKind};
pub use network::{GateId, Line, LineId, Network};
