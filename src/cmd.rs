//! Command line interface

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use kdam::{tqdm, BarExt};
use log::info;

use crate::atpg::Fault;
use crate::error::Error;
use crate::io::read_network_file;
use crate::logic::FiveValue;
use crate::render::{write_tikz, TikzOptions};

/// Command line arguments
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase logging verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Command line arguments
#[derive(Subcommand)]
pub enum Commands {
    /// Show statistics about a logic network
    ///
    /// Will print the gates of the network and the boolean expression of
    /// each primary output.
    #[clap()]
    Show(ShowArgs),

    /// Generate test patterns for a logic network
    ///
    /// Runs the D-Algorithm for a stuck-at-0 and a stuck-at-1 fault on
    /// every line of the network and reports a test vector for each
    /// detected fault.
    #[clap()]
    Atpg(AtpgArgs),

    /// Export a network as a circuitikz diagram
    ///
    /// Optionally runs the search for one fault first, so the diagram
    /// shows the test vector and the sensitized path.
    #[clap()]
    Render(RenderArgs),
}

/// Command arguments for network information
#[derive(Args)]
pub struct ShowArgs {
    /// Network to show
    file: PathBuf,
}

impl ShowArgs {
    /// Run the command
    pub fn run(&self) -> Result<(), Error> {
        let net = read_network_file(&self.file)?;
        print!("{}", net);
        for l in net.primary_outputs() {
            println!("{} = {}", net.line(l).name(), net.equation(l));
        }
        Ok(())
    }
}

/// Command arguments for test pattern generation
#[derive(Args)]
pub struct AtpgArgs {
    /// Network to generate test patterns for
    network: PathBuf,

    /// Output file for test patterns; defaults to stdout
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,
}

impl AtpgArgs {
    /// Run the command
    pub fn run(&self) -> Result<(), Error> {
        let mut net = read_network_file(&self.network)?;
        let primary_inputs = net.primary_inputs();
        let faults = Fault::all(&net);
        info!(
            "analyzing network with {} inputs, {} outputs and {} possible faults",
            primary_inputs.len(),
            net.primary_outputs().len(),
            faults.len()
        );

        let mut progress = tqdm!(total = faults.len());
        progress.set_description("Faults processed");
        let mut detected = 0usize;
        let mut report = String::new();
        for fault in &faults {
            let found = fault.detect(&mut net)?;
            let name = net.line(fault.line).name();
            let polarity = u8::from(fault.stuck_at_one);
            if found {
                detected += 1;
                let vector: String = primary_inputs
                    .iter()
                    .map(|&l| {
                        if net.value(l).same_pair(&FiveValue::ON) {
                            '1'
                        } else if net.value(l).same_pair(&FiveValue::OFF) {
                            '0'
                        } else {
                            'x'
                        }
                    })
                    .collect();
                report.push_str(&format!("{} stuck-at-{}: {}\n", name, polarity, vector));
            } else {
                report.push_str(&format!("{} stuck-at-{}: undetectable\n", name, polarity));
            }
            progress.update(1)?;
        }
        progress.write(format!(
            "Found tests for {}/{} faults ({:.2}% coverage)",
            detected,
            faults.len(),
            100.0 * detected as f64 / faults.len().max(1) as f64
        ))?;

        match &self.output {
            Some(path) => {
                let mut f = File::create(path)?;
                f.write_all(report.as_bytes())?;
            }
            None => print!("{}", report),
        }
        Ok(())
    }
}

/// Command arguments for diagram export
#[derive(Args)]
pub struct RenderArgs {
    /// Network to draw
    network: PathBuf,

    /// Output file for the LaTeX document
    #[arg(short = 'o', long)]
    output: PathBuf,

    /// Run the search for a fault on this line before drawing
    #[arg(long)]
    fault: Option<String>,

    /// Fault polarity used with --fault
    #[arg(long, default_value_t = 0)]
    stuck_at: u8,

    /// Scale factor for the whole diagram
    #[arg(long, default_value_t = 1.0)]
    scale: f64,
}

impl RenderArgs {
    /// Run the command
    pub fn run(&self) -> Result<(), Error> {
        let mut net = read_network_file(&self.network)?;
        if let Some(fault_name) = &self.fault {
            let line = net
                .line_ids()
                .find(|&l| net.line(l).name() == fault_name)
                .ok_or_else(|| Error::Config(format!("no line named {fault_name}")))?;
            let fault = Fault {
                line,
                stuck_at_one: self.stuck_at != 0,
            };
            let detected = fault.detect(&mut net)?;
            info!(
                "{} stuck-at-{}: {}",
                fault_name,
                self.stuck_at,
                if detected { "detected" } else { "no test found" }
            );
        }
        let options = TikzOptions {
            scale: self.scale,
            ..TikzOptions::default()
        };
        let mut f = File::create(&self.output)?;
        write_tikz(&mut f, &net, &options)
    }
}

impl Cli {
    /// Dispatch to the selected subcommand
    pub fn run(&self) -> Result<(), Error> {
        match &self.command {
            Commands::Show(args) => args.run(),
            Commands::Atpg(args) => args.run(),
            Commands::Render(args) => args.run(),
        }
    }
}
