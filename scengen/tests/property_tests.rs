//! Randomized checks over small generated schemas: rendered output must
//! parse back into exactly the values the schema resolved to.

use config_schema::{SchemaNode, merge_nodes, validate_schema};
use pretty_assertions::assert_eq;
use scengen::render::{RenderOptions, generate_ini_from_schema, generate_yaml_from_schema};
use serde_json::{Map, Value, json};

/// Small deterministic xorshift generator, so failures reproduce.
struct Rng(u64);

impl Rng {
	fn next(&mut self) -> u64 {
		let mut x = self.0;
		x ^= x << 13;
		x ^= x >> 7;
		x ^= x << 17;
		self.0 = x;
		x
	}

	fn below(&mut self, bound: u64) -> u64 {
		self.next() % bound
	}

	/// A lowercase word that no quoting heuristic fires on.
	fn word(&mut self) -> String {
		let length = 3 + self.below(6);
		let mut word = String::from("v");
		for _ in 0..length {
			let letter = b'a' + (self.below(26) as u8);
			word.push(letter as char);
		}
		word
	}
}

/// Generate a random schema level together with the value its rendering
/// should resolve to. Depth is capped at 3 and branching at 4.
fn random_level(rng: &mut Rng, depth: u32) -> (Vec<SchemaNode>, Map<String, Value>) {
	let branching = 1 + rng.below(4);
	let mut nodes = Vec::new();
	let mut expected = Map::new();

	for index in 0..branching {
		let key = format!("k{depth}_{index}");
		let can_nest = depth < 3;
		let kind = rng.below(if can_nest { 5 } else { 4 });

		let (node, value) = match kind {
			0 => {
				let word = rng.word();
				(
					SchemaNode {
						key: key.clone(),
						multi_type: vec!["string".to_string()],
						default_value: Some(json!(word)),
						..Default::default()
					},
					json!(word),
				)
			}
			1 => {
				let number = rng.below(10_000);
				(
					SchemaNode {
						key: key.clone(),
						multi_type: vec!["number".to_string()],
						default_value: Some(json!(number)),
						..Default::default()
					},
					json!(number),
				)
			}
			2 => {
				let flag = rng.below(2) == 0;
				(
					SchemaNode {
						key: key.clone(),
						multi_type: vec!["bool".to_string()],
						default_value: Some(json!(flag)),
						..Default::default()
					},
					json!(flag),
				)
			}
			3 => {
				let items: Vec<String> = (0..1 + rng.below(4)).map(|_| rng.word()).collect();
				(
					SchemaNode {
						key: key.clone(),
						multi_type: vec!["list".to_string()],
						item_multi_type: vec!["string".to_string()],
						default_value: Some(json!(items)),
						..Default::default()
					},
					json!(items),
				)
			}
			_ => {
				let (children, child_values) = random_level(rng, depth + 1);
				(
					SchemaNode {
						key: key.clone(),
						multi_type: vec!["object".to_string()],
						children,
						..Default::default()
					},
					Value::Object(child_values),
				)
			}
		};

		nodes.push(node);
		expected.insert(key, value);
	}

	(nodes, expected)
}

#[test]
fn random_schemas_round_trip_through_a_yaml_parser() {
	for seed in 1..=25u64 {
		let mut rng = Rng(seed.wrapping_mul(0x9E37_79B9_7F4A_7C15));
		let (nodes, expected) = random_level(&mut rng, 1);

		let lines = generate_yaml_from_schema(&nodes, &RenderOptions::default())
			.expect("generated trees have no type conflicts");
		let output = format!("{}\n", lines.join("\n").trim());

		let parsed: Value = serde_yaml_ng::from_str(&output)
			.unwrap_or_else(|e| panic!("seed {seed}: output did not parse: {e}\n{output}"));

		assert_eq!(parsed, Value::Object(expected), "seed {seed} diverged:\n{output}");
	}
}

#[test]
fn random_schemas_validate_idempotently() {
	for seed in 1..=10u64 {
		let mut rng = Rng(seed.wrapping_mul(0xA24B_AED4_963E_E407));
		let (nodes, _) = random_level(&mut rng, 1);
		let raw = serde_json::to_value(&nodes).expect("nodes serialize");

		let first = validate_schema(&raw, "random.yml.json");
		let second = validate_schema(&raw, "random.yml.json");

		assert!(first.is_empty(), "seed {seed}: generated schema was invalid: {first:#?}");
		assert_eq!(first, second);
	}
}

#[test]
fn pairwise_merges_of_random_flat_layers_are_associative() {
	for seed in 1..=25u64 {
		let mut rng = Rng(seed | 0x0DD0_0000);

		let mut layer = |rng: &mut Rng| -> Vec<SchemaNode> {
			(0..1 + rng.below(4))
				.map(|index| SchemaNode {
					// Overlapping key space so layers actually collide.
					key: format!("k{}", rng.below(4).max(index % 2)),
					multi_type: vec!["string".to_string()],
					default_value: Some(json!(rng.word())),
					..Default::default()
				})
				.collect()
		};

		let a = layer(&mut rng);
		let b = layer(&mut rng);
		let c = layer(&mut rng);

		let left = merge_nodes(merge_nodes(a.clone(), b.clone()), c.clone());
		let right = merge_nodes(a, merge_nodes(b, c));

		assert_eq!(left, right, "seed {seed} broke associativity");
	}
}

/// Minimal INI section reader for the parse-back check: section name ->
/// data lines, comments and blanks dropped.
fn parse_ini_sections(output: &str) -> Vec<(String, Vec<String>)> {
	let mut sections: Vec<(String, Vec<String>)> = Vec::new();

	for line in output.lines() {
		let line = line.trim();
		if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
			continue;
		}

		if line.starts_with('[') {
			let name = line
				.trim_start_matches('[')
				.split(']')
				.next()
				.unwrap_or_default()
				.to_string();
			sections.push((name, Vec::new()));
		} else if let Some((_, data)) = sections.last_mut() {
			data.push(line.to_string());
		}
	}

	sections
}

#[test]
fn random_inventories_parse_back_into_their_group_structure() {
	for seed in 1..=15u64 {
		let mut rng = Rng(seed.wrapping_mul(0x2545_F491_4F6C_DD1D));

		let group_count = 1 + rng.below(3);
		let mut group_names = Vec::new();
		let mut groups_value = Map::new();
		let mut group_children = Vec::new();
		let mut expected_hosts: Vec<Vec<String>> = Vec::new();

		for index in 0..group_count {
			let name = format!("{}-{index}", rng.word());
			let hosts: Vec<String> = (0..1 + rng.below(3)).map(|_| rng.word()).collect();

			groups_value.insert(name.clone(), json!(hosts));
			group_children.push(SchemaNode {
				key: name.clone(),
				multi_type: vec!["list".to_string()],
				item_multi_type: vec!["object".to_string()],
				children: vec![SchemaNode {
					key: "hostname".to_string(),
					multi_type: vec!["string".to_string()],
					..Default::default()
				}],
				..Default::default()
			});
			group_names.push(name);
			expected_hosts.push(hosts);
		}

		let nodes = vec![
			SchemaNode {
				key: "groups".to_string(),
				multi_type: vec!["object".to_string()],
				default_value: Some(Value::Object(groups_value)),
				children: group_children,
				..Default::default()
			},
			SchemaNode {
				key: "aggregations".to_string(),
				multi_type: vec!["object".to_string()],
				children: vec![SchemaNode {
					key: "all-groups".to_string(),
					multi_type: vec!["list".to_string()],
					item_multi_type: vec!["object".to_string()],
					default_value: Some(json!(group_names.clone())),
					..Default::default()
				}],
				..Default::default()
			},
		];

		let lines = generate_ini_from_schema(&nodes, &RenderOptions::default());
		let output = format!("{}\n", lines.join("\n").trim());
		let sections = parse_ini_sections(&output);

		let mut expected: Vec<(String, Vec<String>)> = group_names
			.iter()
			.cloned()
			.zip(expected_hosts)
			.collect();
		expected.push(("all-groups:children".to_string(), group_names.clone()));

		assert_eq!(sections, expected, "seed {seed} diverged:\n{output}");
	}
}
