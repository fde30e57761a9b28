//! Diagram export to circuitikz
//!
//! Renders a network as a standalone LaTeX document. Gates are placed in
//! layers by their distance from the primary outputs, and every line gets
//! its own vertical routing track in the layer of its deepest consumer.
//! Line colors reflect current values, so rendering right after a
//! successful search shows the sensitized path: solid green for 1, solid
//! red for 0, dashed for fault effects.

use std::io::Write;

use fxhash::FxHashMap;

use crate::error::Error;
use crate::logic::FiveValue;
use crate::network::{GateId, LineId, Network};

/// Geometry options for the diagram
#[derive(Debug, Clone)]
pub struct TikzOptions {
    /// Horizontal spacing reserved per routing track
    pub track_width: f64,
    /// Extra spacing around each layer so gate pins do not collide
    pub pin_width: f64,
    /// Vertical spacing per gate
    pub component_width: f64,
    /// Scale factor for the whole diagram
    pub scale: f64,
}

impl Default for TikzOptions {
    fn default() -> Self {
        TikzOptions {
            track_width: 0.2,
            pin_width: 1.2,
            component_width: 1.4,
            scale: 1.0,
        }
    }
}

struct Layout {
    gate_coords: FxHashMap<GateId, (usize, usize)>,
    gate_positions: FxHashMap<GateId, (f64, f64)>,
    line_tracks: FxHashMap<LineId, usize>,
    tracks_per_layer: FxHashMap<i64, usize>,
}

fn line_modifier(value: FiveValue) -> &'static str {
    if value.same_pair(&FiveValue::ON) {
        "green!50!black, thick"
    } else if value.same_pair(&FiveValue::OFF) {
        "red, thick"
    } else if value.same_pair(&FiveValue::ON_IS_OFF) {
        "green!50!black, dashed, thick"
    } else if value.same_pair(&FiveValue::OFF_IS_ON) {
        "red, dashed, thick"
    } else {
        ""
    }
}

fn input_index(net: &Network, gate: GateId, line: LineId) -> usize {
    net.gate(gate)
        .inputs()
        .iter()
        .position(|&l| l == line)
        .unwrap_or(0)
}

fn compute_layout(net: &Network, options: &TikzOptions) -> Layout {
    // Layer gates by distance from the outputs; a line is released to the
    // next layer once all its consumers are placed
    let mut gate_coords: FxHashMap<GateId, (usize, usize)> = FxHashMap::default();
    let mut placed = vec![false; net.nb_gates()];
    let mut this_layer: Vec<LineId> = net.primary_outputs();
    let mut depth = 0usize;
    while !this_layer.is_empty() {
        let mut to_visit = Vec::new();
        for (i, &line) in this_layer.iter().enumerate() {
            let gate = match net.line(line).driver() {
                Some(g) => g,
                None => continue,
            };
            gate_coords.insert(gate, (depth, i));
            placed[gate.index()] = true;
            for &in_line in net.gate(gate).inputs() {
                let parent_unplaced = net
                    .line(in_line)
                    .driver()
                    .map_or(true, |g| !placed[g.index()]);
                let ready = net
                    .line(in_line)
                    .sinks()
                    .iter()
                    .all(|g| placed[g.index()]);
                if parent_unplaced && ready {
                    to_visit.push(in_line);
                }
            }
        }
        depth += 1;
        this_layer = to_visit;
    }

    // One routing track per line, in the layer of its deepest consumer
    let mut tracks_per_layer: FxHashMap<i64, usize> = FxHashMap::default();
    let mut line_tracks = FxHashMap::default();
    for line in net.line_ids() {
        let max_x = net
            .line(line)
            .sinks()
            .iter()
            .map(|g| gate_coords[g].0 as i64)
            .max()
            .unwrap_or(-1);
        let track = tracks_per_layer.entry(max_x).or_insert(0);
        line_tracks.insert(line, *track);
        *track += 1;
    }

    let mut accumulated = vec![0.0f64];
    for layer in 1..depth {
        let tracks = tracks_per_layer.get(&(layer as i64)).copied().unwrap_or(0);
        let layer_width = (tracks + 1) as f64 * options.track_width + options.pin_width;
        accumulated.push(accumulated[layer - 1] + layer_width);
    }

    let mut gate_positions = FxHashMap::default();
    for (&gate, &(x, y)) in &gate_coords {
        gate_positions.insert(
            gate,
            (-(x as f64 + accumulated[x]), y as f64 * options.component_width),
        );
    }

    Layout {
        gate_coords,
        gate_positions,
        line_tracks,
        tracks_per_layer,
    }
}

/// Write a standalone circuitikz document for the network
pub fn write_tikz<W: Write>(w: &mut W, net: &Network, options: &TikzOptions) -> Result<(), Error> {
    let layout = compute_layout(net, options);
    writeln!(w, "\\documentclass{{standalone}}")?;
    writeln!(w, "\\usepackage{{tikz}}")?;
    writeln!(w, "\\usepackage{{circuitikz}}")?;
    writeln!(w, "\\begin{{document}}")?;
    writeln!(
        w,
        "\\begin{{circuitikz}}[ieee ports, scale={}, font=\\small]",
        options.scale
    )?;
    for g in net.gate_ids() {
        write_gate(w, net, &layout, g)?;
    }
    for l in net.line_ids() {
        write_line(w, net, &layout, l, options)?;
    }
    writeln!(w, "\\end{{circuitikz}}")?;
    writeln!(w, "\\end{{document}}")?;
    Ok(())
}

fn write_gate<W: Write>(w: &mut W, net: &Network, layout: &Layout, g: GateId) -> Result<(), Error> {
    let gate = net.gate(g);
    let (x, y) = layout.gate_positions[&g];
    writeln!(
        w,
        "\\node [{} port, number inputs={}] ({}) at ({:.1}, {:.1}) {{\\verb|{}|}};",
        gate.kind().name(),
        gate.inputs().len(),
        g,
        x,
        y,
        gate.name()
    )?;
    Ok(())
}

fn write_line<W: Write>(
    w: &mut W,
    net: &Network,
    layout: &Layout,
    l: LineId,
    options: &TikzOptions,
) -> Result<(), Error> {
    let line = net.line(l);
    let modifier = line_modifier(line.value());
    let modifier_str = if modifier.is_empty() {
        String::new()
    } else {
        format!(" [{modifier}]")
    };
    match (line.driver(), line.sinks().is_empty()) {
        // Floating line: just a label
        (None, true) => {
            writeln!(w, "\\draw{} node {{{}}};", modifier_str, l)?;
        }
        // Primary input: label to the left of its deepest consumer, then
        // route to every consumer through the line's track
        (None, false) => {
            let mut earliest = line.sinks()[0];
            for &g in line.sinks() {
                if layout.gate_coords[&g].0 > layout.gate_coords[&earliest].0 {
                    earliest = g;
                }
            }
            let layer = layout.gate_coords[&earliest].0;
            let tracks = layout.tracks_per_layer.get(&(layer as i64)).copied().unwrap_or(0);
            let layer_width = (tracks + 1) as f64 * options.track_width;
            let track_offset = (layout.line_tracks[&l] + 1) as f64 * options.track_width;
            writeln!(
                w,
                "\\draw ({}.in {}) ++(-{:.1}, 0){} node[left] ({}) {{\\verb|{}|}};",
                earliest,
                input_index(net, earliest, l) + 1,
                layer_width,
                modifier_str,
                l,
                line.name()
            )?;
            write!(w, "\\draw{}", modifier_str)?;
            for &child in line.sinks() {
                write!(
                    w,
                    " ({}.east) -- ++({:.1}, 0) |- ({}.in {})",
                    l,
                    track_offset,
                    child,
                    input_index(net, child, l) + 1
                )?;
            }
            writeln!(w, ";")?;
        }
        // Primary output: label at the driver's output pin
        (Some(parent), true) => {
            writeln!(
                w,
                "\\draw{} ({}.out) node[right] {{\\verb|{}|}};",
                modifier_str,
                parent,
                line.name()
            )?;
        }
        // Internal line: route from the driver to every consumer
        (Some(parent), false) => {
            let track_offset = (layout.line_tracks[&l] + 1) as f64 * options.track_width;
            write!(w, "\\draw{}", modifier_str)?;
            for &child in line.sinks() {
                write!(
                    w,
                    " ({}.out) -- ++({:.1}, 0) |- ({}.in {})",
                    parent,
                    track_offset,
                    child,
                    input_index(net, child, l) + 1
                )?;
            }
            writeln!(w, " node[above, pos=1] {{\\verb|{}|}};", line.name())?;
        }
    }
    Ok(())
}
