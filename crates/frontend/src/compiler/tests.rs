// Copyright 2025 Irreducible Inc.
use qesa_core::{ConstraintSystem, Witness, verify::verify_constraints};
use rand::{Rng, SeedableRng as _, rngs::StdRng};

use super::*;
use crate::{
	compiler::{arith_circuit::Wire, gate::Opcode},
	text::parse_circuit,
};

fn scalars(values: &[u64]) -> Vec<Scalar> {
	values.iter().map(|&v| Scalar::from(v)).collect()
}

fn value(witness: &Witness, wire: Wire) -> Scalar {
	witness.values()[wire.as_u32() as usize].clone()
}

/// Compiles `text`, evaluates it and checks the witness against the constraints.
fn run(text: &str, inputs: &[u64], opts: &Options) -> Processed {
	let circuit = parse_circuit(text).unwrap();
	let processed = process(circuit, &scalars(inputs), opts).unwrap();
	verify_constraints(&processed.constraint_system, &processed.witness).unwrap();
	processed
}

fn assert_canonical(circuit: &ArithCircuit) {
	for data in circuit.gates.values() {
		assert!(
			matches!(data.opcode, Opcode::Quadratic(_) | Opcode::Split | Opcode::Zerop),
			"non-canonical gate `{}`",
			data.description()
		);
	}
	let wires = circuit.wires().into_iter().map(|w| w.as_u32()).collect::<Vec<_>>();
	assert_eq!(wires, (0..circuit.num_variables() as u32).collect::<Vec<_>>());
	circuit.validate().unwrap();
}

const AFFINE_PRODUCT: &str = "\
input 0 # one-input
input 1 # a
input 2 # b
const-mul-5 in 1 <0> out 1 <3>
add in 2 <1 3> out 1 <4>
mul in 2 <4 2> out 1 <5>
output 5
";

#[test]
fn test_affine_product() {
	let processed = run(AFFINE_PRODUCT, &[1, 3, 4], &Options::default());
	assert_canonical(&processed.circuit);
	assert_eq!(processed.circuit.n_gates(), 1);
	assert_eq!(processed.constraint_system.n_constraints(), 1);
	assert_eq!(processed.circuit.outputs, vec![Wire::from_u32(3)]);
	assert_eq!(value(&processed.witness, processed.circuit.outputs[0]), Scalar::from(32u64));
}

#[test]
fn test_wrong_witness_is_rejected() {
	let processed = run(AFFINE_PRODUCT, &[1, 3, 4], &Options::default());
	let mut values = processed.witness.into_values();
	values[3] = Scalar::from(31u64);
	assert!(
		verify_constraints(&processed.constraint_system, &Witness::from_values(values)).is_err()
	);
}

const ZERO_CHAIN: &str = "\
input 0 # one-input
input 1 # x
sub in 2 <1 1> out 1 <2>
mul in 2 <2 1> out 1 <3>
mul in 2 <3 1> out 1 <4>
mul in 2 <4 4> out 1 <5>
output 5
";

#[test]
fn test_zero_chain() {
	let processed = run(ZERO_CHAIN, &[1, 9], &Options::default());
	assert_canonical(&processed.circuit);
	assert_eq!(processed.circuit.n_gates(), 1);
	let data = processed.circuit.gates.values().next().unwrap();
	assert!(matches!(&data.opcode, Opcode::Quadratic(form) if form.is_zero()));
	assert_eq!(value(&processed.witness, processed.circuit.outputs[0]), Scalar::ZERO);
}

#[test]
fn test_zero_chain_without_propagation() {
	let opts = Options {
		zero_propagation: false,
		..Options::default()
	};
	let processed = run(ZERO_CHAIN, &[1, 9], &opts);
	assert_canonical(&processed.circuit);
	assert_eq!(processed.circuit.n_gates(), 3);
	assert_eq!(value(&processed.witness, processed.circuit.outputs[0]), Scalar::ZERO);
}

const ZERO_TEST: &str = "\
input 0 # one-input
input 1 # x
zerop in 1 <1> out 2 <2 3>
output 3
";

#[test]
fn test_zerop_of_zero() {
	let processed = run(ZERO_TEST, &[1, 0], &Options::default());
	assert_eq!(processed.witness.values(), scalars(&[1, 0, 0, 0]).as_slice());
}

#[test]
fn test_zerop_of_seven() {
	let processed = run(ZERO_TEST, &[1, 7], &Options::default());
	let inverse = Scalar::from(7u64).inverse().unwrap();
	assert_eq!(
		processed.witness.values(),
		&[Scalar::one(), Scalar::from(7u64), inverse, Scalar::one()]
	);
	assert_eq!(processed.constraint_system.n_constraints(), 2);
}

#[test]
fn test_zerop_of_internal_wire_is_padded() {
	let text = "\
input 0 # one-input
input 1 # x
mul in 2 <1 1> out 1 <2>
zerop in 1 <2> out 2 <3 4>
output 4
";
	let processed = run(text, &[1, 5], &Options::default());
	assert_canonical(&processed.circuit);
	assert_eq!(processed.circuit.gate_counts().get("quadratic"), Some(&2));
	assert_eq!(processed.circuit.gate_counts().get("zerop"), Some(&1));
	assert_eq!(value(&processed.witness, processed.circuit.outputs[0]), Scalar::one());
}

#[test]
fn test_split_pack_inverse() {
	let text = "\
input 0 # one-input
input 1 # x
split in 1 <1> out 8 <2 3 4 5 6 7 8 9>
pack in 8 <2 3 4 5 6 7 8 9> out 1 <10>
output 10
";
	let compiled = compile(parse_circuit(text).unwrap(), &Options::default()).unwrap();
	assert_canonical(compiled.circuit());
	assert_eq!(compiled.circuit().gate_counts().get("split"), Some(&1));
	let output = compiled.circuit().outputs[0];
	for x in 0..=255u64 {
		let witness = compiled.generate_witness(&scalars(&[1, x])).unwrap();
		verify_constraints(compiled.constraint_system(), &witness).unwrap();
		assert_eq!(value(&witness, output), Scalar::from(x));
	}
}

#[test]
fn test_linear_output_is_padded() {
	let text = "\
input 0 # one-input
input 1
input 2
add in 2 <1 2> out 1 <3>
output 3
";
	let processed = run(text, &[1, 20, 22], &Options::default());
	assert_canonical(&processed.circuit);
	assert_eq!(processed.circuit.n_gates(), 1);
	assert_eq!(value(&processed.witness, processed.circuit.outputs[0]), Scalar::from(42u64));
}

#[test]
fn test_constant_input_moved_to_front() {
	let text = "\
input 0 # a
input 1 # constant
mul in 2 <0 0> out 1 <2>
output 2
";
	let processed = run(text, &[1, 5], &Options::default());
	assert_eq!(processed.circuit.inputs[0].annotation, "constant");
	assert_eq!(processed.circuit.inputs[1].annotation, "a");
	assert_eq!(value(&processed.witness, processed.circuit.outputs[0]), Scalar::from(25u64));
}

const MIXED: &str = "\
input 0 # one-input
input 1 # a
input 2 # b
input 3 # c
split in 1 <1> out 8 <10 11 12 13 14 15 16 17>
xor in 2 <10 11> out 1 <20>
pack in 3 <20 12 13> out 1 <21>
const-mul-neg-3 in 1 <3> out 1 <22>
add in 2 <2 22> out 1 <23>
mul in 2 <23 21> out 1 <24>
sub in 2 <24 2> out 1 <25>
zerop in 1 <25> out 2 <26 27>
mul in 2 <26 20> out 1 <28>
output 27
output 28
";

#[test]
fn test_random_witnesses() {
	let mut rng = StdRng::seed_from_u64(42);
	for wire_order in [WireOrder::AllInputsReady, WireOrder::FirstReadyInput] {
		let opts = Options {
			wire_order,
			..Options::default()
		};
		let compiled = compile(parse_circuit(MIXED).unwrap(), &opts).unwrap();
		assert_canonical(compiled.circuit());
		for _ in 0..100 {
			let inputs = [
				1,
				rng.random_range(0..256),
				rng.random_range(0..256),
				rng.random_range(0..256),
			];
			let witness = compiled.generate_witness(&scalars(&inputs)).unwrap();
			assert_eq!(witness.len(), compiled.constraint_system().num_variables);
			verify_constraints(compiled.constraint_system(), &witness).unwrap();
		}
	}
}

#[test]
fn test_constraint_file_reads_back() {
	let compiled = compile(parse_circuit(MIXED).unwrap(), &Options::default()).unwrap();
	let cs = compiled.constraint_system();
	assert_eq!(&ConstraintSystem::parse_text(&cs.to_text()).unwrap(), cs);
}

#[test]
fn test_no_inputs() {
	let circuit = ArithCircuit::new();
	assert!(matches!(
		compile(circuit, &Options::default()),
		Err(Error::MalformedCircuit(_))
	));
}

#[test]
fn test_cycle() {
	let text = "\
input 0 # one-input
mul in 2 <0 2> out 1 <1>
mul in 2 <0 1> out 1 <2>
output 2
";
	assert!(matches!(
		compile(parse_circuit(text).unwrap(), &Options::default()),
		Err(Error::MalformedCircuit(_))
	));
}

#[test]
fn test_witness_input_errors() {
	let compiled = compile(parse_circuit(AFFINE_PRODUCT).unwrap(), &Options::default()).unwrap();
	assert_eq!(
		compiled.generate_witness(&scalars(&[1, 3])),
		Err(Error::InputCountMismatch {
			expected: 3,
			actual: 2
		})
	);
	assert_eq!(
		compiled.generate_witness(&scalars(&[2, 3, 4])),
		Err(Error::ConstantInputNotOne {
			value: Scalar::from(2u64)
		})
	);
}

const AFFINE_READ_BY_XOR: &str = "\
input 0 # one-input
input 1
input 2
sub in 2 <1 0> out 1 <3>
mul in 2 <3 2> out 1 <4>
xor in 2 <3 2> out 1 <5>
output 4
output 5
";

#[test]
fn test_affine_read_by_mul_and_xor() {
	for (inputs, expected) in [([1, 1, 1], [0, 1]), ([1, 2, 1], [1, 0]), ([1, 1, 0], [0, 0])] {
		let processed = run(AFFINE_READ_BY_XOR, &inputs, &Options::default());
		assert_canonical(&processed.circuit);
		let values = processed
			.circuit
			.outputs
			.iter()
			.map(|&wire| value(&processed.witness, wire))
			.collect::<Vec<_>>();
		assert_eq!(values, scalars(&expected));
	}
}

#[test]
fn test_affine_read_by_xor_only() {
	let text = "\
input 0 # one-input
input 1
input 2
sub in 2 <1 0> out 1 <3>
xor in 2 <3 2> out 1 <4>
output 4
";
	let processed = run(text, &[1, 1, 1], &Options::default());
	assert_canonical(&processed.circuit);
	assert_eq!(processed.circuit.n_gates(), 2);
	assert_eq!(value(&processed.witness, processed.circuit.outputs[0]), Scalar::one());
}

#[test]
fn test_wire_ids_exhausted() {
	let text = "\
input 0 # one-input
input 4294967293
add in 2 <0 4294967293> out 1 <4294967294>
output 4294967294
";
	assert!(matches!(
		compile(parse_circuit(text).unwrap(), &Options::default()),
		Err(Error::MalformedCircuit(_))
	));
}
