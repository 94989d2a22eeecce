use std::collections::HashMap;

use super::dictionary::Dictionary;
use super::word::{Word, WordRole};

/// The sentence shapes the graph is wired for.
///
/// Every adjacent role pair in every template becomes a set of directed
/// edges between the matching role groups. The catalog is fixed at
/// compile time; template selection at generation time hashes the start
/// word over its length.
pub const SENTENCE_TEMPLATES: [&[WordRole]; 8] = [
	&[WordRole::Subject, WordRole::Verb, WordRole::Noun],
	&[WordRole::Subject, WordRole::Verb, WordRole::Noun, WordRole::Adverb],
	&[WordRole::Subject, WordRole::Adverb, WordRole::Verb, WordRole::Noun],
	&[WordRole::Subject, WordRole::Auxiliary, WordRole::Verb, WordRole::Preposition, WordRole::Noun],
	&[WordRole::Subject, WordRole::Auxiliary, WordRole::Verb, WordRole::Noun],
	&[WordRole::Subject, WordRole::Verb, WordRole::Preposition, WordRole::Noun],
	&[WordRole::Subject, WordRole::Auxiliary, WordRole::Verb],
	&[WordRole::Subject, WordRole::Verb, WordRole::Adverb],
];

/// One vocabulary entry inside the graph, with its outgoing transitions.
///
/// Edges are `Word` snapshots taken at build time: a later frequency
/// boost on a canonical entry is not visible through an edge copy.
/// Traversal therefore re-resolves canonical entries through the graph
/// index instead of following edge copies.
#[derive(Clone, Debug)]
pub struct WordNode {
	/// The canonical entry. Its frequency is the only mutable state.
	pub word: Word,
	/// Outgoing edges, newest first; at most one per target text.
	pub edges: Vec<Word>,
	/// Boost accumulated during the current exchange.
	boost: i32,
}

/// Directed transition graph over the whole vocabulary.
///
/// # Responsibilities
/// - Flatten the role groups into a node arena with a stable order
/// - Expand the template catalog into deduplicated directed edges
/// - Track prompt boosts so they can be reverted exactly
///
/// # Invariants
/// - At most one edge exists per (source node, target text) pair
/// - Node arena and edge lists are immutable after `build`; only node
///   frequencies change, through `boost_matching` / `reset_boosts`
/// - Two entries with the same text share one identity: the index maps
///   a text to the first node carrying it, whatever its role
#[derive(Clone, Debug, Default)]
pub struct WordGraph {
	nodes: Vec<WordNode>,
	index: HashMap<String, usize>,
}

impl WordGraph {
	/// Builds the transition graph for a vocabulary.
	///
	/// # Behavior
	/// - Nodes are created in flatten order (`WordRole::ALL`, then record
	///   order), which defines node ids and first-match resolution.
	/// - For each template and each adjacent role pair in it, every
	///   entry of the first role gets an edge to every entry of the
	///   second role, deduplicated by target text.
	/// - A pair implied by several templates is wired once.
	pub fn build(dictionary: &Dictionary) -> Self {
		let mut graph = WordGraph::default();

		for word in dictionary.flattened() {
			let id = graph.nodes.len();
			graph.index.entry(word.text.clone()).or_insert(id);
			graph.nodes.push(WordNode { word: word.clone(), edges: Vec::new(), boost: 0 });
		}

		for template in SENTENCE_TEMPLATES {
			for pair in template.windows(2) {
				for from_word in dictionary.group(pair[0]) {
					// Same-text entries share one identity: edges attach
					// to the first node carrying the text, whatever role
					// it was tagged with.
					let Some(from_id) = graph.resolve(&from_word.text) else {
						continue;
					};
					for to_word in dictionary.group(pair[1]) {
						graph.ensure_edge(from_id, to_word);
					}
				}
			}
		}

		graph
	}

	/// Adds an edge snapshot unless the source already has an edge to
	/// the same target text. New edges go to the front of the list.
	fn ensure_edge(&mut self, from_id: usize, to_word: &Word) {
		let node = &mut self.nodes[from_id];
		if node.edges.iter().any(|edge| edge == to_word) {
			return;
		}
		node.edges.insert(0, to_word.clone());
	}

	/// Id of the first node whose text matches exactly.
	pub fn resolve(&self, text: &str) -> Option<usize> {
		self.index.get(text).copied()
	}

	pub fn node(&self, id: usize) -> &WordNode {
		&self.nodes[id]
	}

	pub fn nodes(&self) -> &[WordNode] {
		&self.nodes
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Boosts every entry, of any role, whose lowercased text equals
	/// `token` (already lowercase). The amount is recorded so the boost
	/// can be reverted exactly.
	pub fn boost_matching(&mut self, token: &str, amount: i32) {
		for node in &mut self.nodes {
			if node.word.text.to_lowercase() == token {
				node.word.add_frequency(amount);
				node.boost += amount;
			}
		}
	}

	/// Reverts every boost applied since the last reset, restoring each
	/// entry's baseline frequency exactly. Calling it twice is harmless:
	/// the second call finds nothing to revert.
	pub fn reset_boosts(&mut self) {
		for node in &mut self.nodes {
			node.word.add_frequency(-node.boost);
			node.boost = 0;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn dictionary(entries: &[(&str, i32, WordRole)]) -> Dictionary {
		let mut dictionary = Dictionary::default();
		for (text, frequency, role) in entries {
			dictionary.add_word(Word::new(text, *frequency, *role));
		}
		dictionary
	}

	#[test]
	fn test_edge_union_is_idempotent() {
		// Subject→Verb appears in four templates; the edge must exist once.
		let graph = WordGraph::build(&dictionary(&[
			("I", 5, WordRole::Subject),
			("like", 3, WordRole::Verb),
		]));

		let id = graph.resolve("I").unwrap();
		let like_edges =
			graph.node(id).edges.iter().filter(|edge| edge.text == "like").count();
		assert_eq!(like_edges, 1);
	}

	#[test]
	fn test_new_edges_go_to_the_front() {
		let graph = WordGraph::build(&dictionary(&[
			("I", 5, WordRole::Subject),
			("eat", 3, WordRole::Verb),
			("see", 2, WordRole::Verb),
		]));

		let id = graph.resolve("I").unwrap();
		let texts: Vec<&str> = graph.node(id).edges.iter().map(|e| e.text.as_str()).collect();
		assert_eq!(texts, ["see", "eat"]);
	}

	#[test]
	fn test_edges_are_snapshots() {
		let mut graph = WordGraph::build(&dictionary(&[
			("I", 5, WordRole::Subject),
			("like", 3, WordRole::Verb),
		]));

		graph.boost_matching("like", 100);

		let like_id = graph.resolve("like").unwrap();
		assert_eq!(graph.node(like_id).word.frequency, 103);

		// The edge copy on "I" keeps its build-time frequency.
		let i_id = graph.resolve("I").unwrap();
		assert_eq!(graph.node(i_id).edges[0].frequency, 3);
	}

	#[test]
	fn test_boost_reset_round_trip() {
		let mut graph = WordGraph::build(&dictionary(&[
			("cat", 7, WordRole::Subject),
			("dog", 4, WordRole::Subject),
		]));

		// "cat" boosted twice (repeated token), "dog" never.
		graph.boost_matching("cat", 100);
		graph.boost_matching("cat", 100);
		graph.reset_boosts();

		assert_eq!(graph.node(graph.resolve("cat").unwrap()).word.frequency, 7);
		assert_eq!(graph.node(graph.resolve("dog").unwrap()).word.frequency, 4);
	}

	#[test]
	fn test_same_text_under_two_roles_is_one_identity() {
		// "run" is tagged both Verb and Noun. Edge wiring resolves the
		// source by text, so everything lands on the first node (the
		// Verb one, per flatten order) and the Noun node stays bare.
		let graph = WordGraph::build(&dictionary(&[
			("I", 5, WordRole::Subject),
			("run", 3, WordRole::Verb),
			("run", 2, WordRole::Noun),
			("quickly", 2, WordRole::Adverb),
		]));

		let first = graph.resolve("run").unwrap();
		assert_eq!(graph.node(first).word.role, WordRole::Verb);

		let noun_id = graph
			.nodes()
			.iter()
			.position(|node| node.word.text == "run" && node.word.role == WordRole::Noun)
			.unwrap();
		assert!(graph.node(noun_id).edges.is_empty());
		assert!(!graph.node(first).edges.is_empty());

		// And the Subject still has exactly one "run" edge.
		let i_id = graph.resolve("I").unwrap();
		let run_edges =
			graph.node(i_id).edges.iter().filter(|edge| edge.text == "run").count();
		assert_eq!(run_edges, 1);
	}

	#[test]
	fn test_final_only_roles_follow_templates() {
		// A Noun can only be followed by an Adverb (template
		// Subject-Verb-Noun-Adverb); nothing else may leave it.
		let graph = WordGraph::build(&dictionary(&[
			("I", 5, WordRole::Subject),
			("like", 3, WordRole::Verb),
			("pizza", 2, WordRole::Noun),
			("quickly", 2, WordRole::Adverb),
			("with", 2, WordRole::Preposition),
		]));

		let pizza_id = graph.resolve("pizza").unwrap();
		assert!(graph.node(pizza_id).edges.iter().all(|edge| edge.role == WordRole::Adverb));
	}
}
