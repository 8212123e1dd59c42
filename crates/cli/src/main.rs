// Copyright 2025 Irreducible Inc.
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use qesa_frontend::{Options, WireOrder};
use tracing_subscriber::EnvFilter;

mod commands;

/// Compiles arithmetic circuits into quadratic constraint systems.
#[derive(Debug, Parser)]
#[command(name = "ac2quad", version, about)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
	/// Compile a circuit, or every `*.arith` file of a directory, and write the canonical circuit
	/// (`_out`), the constraints (`_mat`) and a witness (`_wit`) next to each input
	Convert {
		/// A circuit file or a directory of circuit files
		path: PathBuf,

		#[command(flatten)]
		compiler: CompilerArgs,

		/// Comma-separated primary input values, the constant 1 first. Random values in
		/// `0..=256` are drawn when absent
		#[arg(long, value_delimiter = ',')]
		inputs: Option<Vec<String>>,

		/// Seed for the random primary input values
		#[arg(long)]
		seed: Option<u64>,
	},

	/// Evaluate a circuit as it is and write the witness to `<file>_wit`
	Witness {
		/// The circuit file
		file: PathBuf,

		/// Primary input values, the constant 1 first
		values: Vec<String>,
	},

	/// Compile a circuit and print statistics
	Stat {
		/// The circuit file
		file: PathBuf,

		#[command(flatten)]
		compiler: CompilerArgs,

		/// Print the statistics as JSON
		#[arg(long)]
		json: bool,
	},
}

/// Overrides of the compiler options taken from the environment.
#[derive(Debug, clap::Args)]
struct CompilerArgs {
	/// Number wires in the order of earlier releases
	#[arg(long)]
	legacy_wire_order: bool,

	/// Keep quadratic gates that compute the constant 0
	#[arg(long)]
	no_zero_propagation: bool,
}

impl CompilerArgs {
	fn options(&self) -> Options {
		let mut opts = Options::from_env();
		if self.legacy_wire_order {
			opts.wire_order = WireOrder::FirstReadyInput;
		}
		if self.no_zero_propagation {
			opts.zero_propagation = false;
		}
		opts
	}
}

fn main() -> Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::from_default_env())
		.with_writer(std::io::stderr)
		.init();

	let cli = Cli::parse();
	match cli.command {
		Commands::Convert {
			path,
			compiler,
			inputs,
			seed,
		} => commands::convert(&path, &compiler.options(), inputs.as_deref(), seed),
		Commands::Witness { file, values } => commands::witness(&file, &values),
		Commands::Stat {
			file,
			compiler,
			json,
		} => commands::stat(&file, &compiler.options(), json),
	}
}
