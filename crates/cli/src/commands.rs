// Copyright 2025 Irreducible Inc.
use std::{
	fs,
	path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use qesa_field::Scalar;
use qesa_frontend::{CircuitStat, Options, compile, parse_circuit, passes, process, write_circuit};
use rand::{Rng, SeedableRng, rngs::StdRng};
use rayon::prelude::*;

/// Extension of the circuit files picked up from a directory.
const CIRCUIT_EXTENSION: &str = "arith";

/// Appends `suffix` to the file name of `path`, e.g. `a.arith` becomes `a.arith_out`.
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
	let mut name = path.as_os_str().to_owned();
	name.push(suffix);
	PathBuf::from(name)
}

fn read_circuit(path: &Path) -> Result<qesa_frontend::ArithCircuit> {
	let text = fs::read_to_string(path)
		.with_context(|| format!("Failed to read circuit from {}", path.display()))?;
	parse_circuit(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
	fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}

fn parse_values(values: &[String]) -> Result<Vec<Scalar>> {
	values
		.iter()
		.map(|value| {
			value
				.trim()
				.parse::<Scalar>()
				.with_context(|| format!("Invalid input value `{value}`"))
		})
		.collect()
}

/// Lists the circuit files under `path`: the file itself, or the `*.arith` files of a directory
/// in name order.
fn circuit_files(path: &Path) -> Result<Vec<PathBuf>> {
	if !path.is_dir() {
		return Ok(vec![path.to_path_buf()]);
	}
	let mut files = Vec::new();
	for entry in
		fs::read_dir(path).with_context(|| format!("Failed to list {}", path.display()))?
	{
		let file = entry?.path();
		if file.is_file() && file.extension().is_some_and(|ext| ext == CIRCUIT_EXTENSION) {
			files.push(file);
		}
	}
	files.sort();
	Ok(files)
}

/// Random primary input values: the constant 1 followed by values in `0..=256`.
fn random_inputs(n: usize, rng: &mut impl Rng) -> Vec<Scalar> {
	(0..n)
		.map(|i| {
			if i == 0 {
				Scalar::one()
			} else {
				Scalar::from(rng.random_range(0..=256u64))
			}
		})
		.collect()
}

fn convert_file(file: &Path, opts: &Options, inputs: Option<&[Scalar]>, seed: u64) -> Result<()> {
	let _scope = tracing::info_span!("Processing", file = %file.display()).entered();
	let circuit = read_circuit(file)?;
	let inputs = match inputs {
		Some(inputs) => inputs.to_vec(),
		None => random_inputs(circuit.inputs.len(), &mut StdRng::seed_from_u64(seed)),
	};
	let processed = process(circuit, &inputs, opts)
		.with_context(|| format!("Failed to compile {}", file.display()))?;
	tracing::info!(n_gates = processed.circuit.n_gates(), "new circuit");

	write_file(&with_suffix(file, "_out"), &write_circuit(&processed.circuit))?;
	write_file(&with_suffix(file, "_mat"), &processed.constraint_system.to_text())?;
	write_file(&with_suffix(file, "_wit"), &processed.witness.to_text())?;
	Ok(())
}

/// Compiles every circuit under `path` in parallel. A failing circuit is reported and does not
/// stop the others.
pub fn convert(
	path: &Path,
	opts: &Options,
	inputs: Option<&[String]>,
	seed: Option<u64>,
) -> Result<()> {
	let inputs = inputs.map(parse_values).transpose()?;
	let seed = seed.unwrap_or_else(|| rand::rng().random());
	if inputs.is_none() {
		tracing::info!(seed, "drawing random primary inputs");
	}

	let files = circuit_files(path)?;
	let n_failed = files
		.par_iter()
		.filter(|file| match convert_file(file, opts, inputs.as_deref(), seed) {
			Ok(()) => false,
			Err(e) => {
				tracing::error!(file = %file.display(), "{e:#}");
				true
			}
		})
		.count();

	if n_failed > 0 {
		anyhow::bail!("{n_failed} of {} circuits failed", files.len());
	}
	Ok(())
}

/// Evaluates the circuit in `file` without compiling it and writes `<file>_wit`.
pub fn witness(file: &Path, values: &[String]) -> Result<()> {
	if file.is_dir() {
		anyhow::bail!("{} is a directory, expected a single circuit file", file.display());
	}
	let circuit = read_circuit(file)?;
	let inputs = parse_values(values)?;
	let witness = passes::evaluate(&circuit, &inputs)
		.with_context(|| format!("Failed to evaluate {}", file.display()))?;
	write_file(&with_suffix(file, "_wit"), &witness.to_text())
}

/// Compiles the circuit in `file` and prints its statistics.
pub fn stat(file: &Path, opts: &Options, json: bool) -> Result<()> {
	let compiled = compile(read_circuit(file)?, opts)
		.with_context(|| format!("Failed to compile {}", file.display()))?;
	let stat = CircuitStat::collect(&compiled);
	if json {
		println!("{}", serde_json::to_string_pretty(&stat)?);
	} else {
		print!("{stat}");
	}
	Ok(())
}
