use std::path::Path;

use super::dictionary::Dictionary;
use super::graph::{SENTENCE_TEMPLATES, WordGraph};
use super::word::WordRole;

/// Additive frequency bump applied to every vocabulary entry mentioned
/// in a prompt, reverted after the reply has been generated.
pub const PROMPT_BOOST: i32 = 100;

/// Reply used when the vocabulary has no subject to start from.
pub const FALLBACK_REPLY: &str = "I don't have anything to say.";

/// Exclusive upper bound of the hash-derived score variation.
const SCORE_VARIATION: i32 = 50;

/// Chat-style sentence generator over a word-transition graph.
///
/// # Responsibilities
/// - Tokenize prompts and locate contextual subjects
/// - Apply and revert prompt-driven frequency boosts
/// - Walk the graph greedily along one sentence template per reply
///
/// A full exchange is boost → generate → reset, in that order, once per
/// prompt; `respond` packages the triple. Exchanges must not overlap:
/// hosts that accept concurrent requests serialize them around the
/// whole triple (the server holds its lock across `respond`).
///
/// Generation is deterministic: the only "randomness" is a hash of the
/// generator's own inputs, so an identical vocabulary and prompt always
/// produce the identical reply.
#[derive(Clone, Debug)]
pub struct Generator {
	graph: WordGraph,
}

impl Generator {
	/// Builds a generator over an already-built graph.
	pub fn new(graph: WordGraph) -> Self {
		Self { graph }
	}

	/// Loads a lexicon file and builds the transition graph for it.
	///
	/// # Errors
	/// Fails when the file is missing or a record is malformed; the
	/// generator cannot operate without a vocabulary.
	pub fn from_lexicon<P: AsRef<Path>>(filepath: P) -> Result<Self, Box<dyn std::error::Error>> {
		let dictionary = Dictionary::new(filepath)?;
		Ok(Self::new(WordGraph::build(&dictionary)))
	}

	/// Read access to the underlying graph.
	pub fn graph(&self) -> &WordGraph {
		&self.graph
	}

	/// Splits a prompt into lowercase word tokens.
	///
	/// Only `a`–`z` runs form words and only the space character
	/// separates them; every other character (digits, punctuation) is
	/// dropped without breaking the current word, so `"Cat's"`
	/// tokenizes as `cats`.
	fn tokenize(prompt: &str) -> Vec<String> {
		let mut tokens = Vec::new();
		let mut current = String::new();

		for c in prompt.to_lowercase().chars() {
			if c == ' ' {
				if !current.is_empty() {
					tokens.push(std::mem::take(&mut current));
				}
			} else if c.is_ascii_lowercase() {
				current.push(c);
			}
		}
		if !current.is_empty() {
			tokens.push(current);
		}

		tokens
	}

	/// Deterministic 31-based polynomial hash of `s`, wrapped to 32
	/// bits. Stable across runs and platforms; the only source of
	/// variation anywhere in generation.
	fn text_hash(s: &str) -> i32 {
		s.chars().fold(0i32, |hash, c| hash.wrapping_mul(31).wrapping_add(c as i32))
	}

	/// Maps `s` onto `0..buckets`.
	fn hash_bucket(s: &str, buckets: usize) -> usize {
		Self::text_hash(s).unsigned_abs() as usize % buckets
	}

	/// Node ids of Subject entries whose text appears in the prompt, in
	/// token order. The same node appears twice if the prompt repeats
	/// its word; duplicates are tolerated downstream.
	fn contextual_subjects(&self, prompt: &str) -> Vec<usize> {
		let mut found = Vec::new();
		for token in Self::tokenize(prompt) {
			for (id, node) in self.graph.nodes().iter().enumerate() {
				if node.word.role == WordRole::Subject && node.word.text.to_lowercase() == token {
					found.push(id);
				}
			}
		}
		found
	}

	/// Boosts every entry mentioned in the prompt by `PROMPT_BOOST` and
	/// reports whether the prompt contains `the` immediately followed
	/// by a known subject.
	///
	/// # Behavior
	/// - The article check scans every adjacent token pair; any single
	///   `the` + subject hit leaves the flag set.
	/// - Boosting matches entries of any role, once per token
	///   occurrence, by lowercased text.
	pub fn boost_words_from_prompt(&mut self, prompt: &str) -> bool {
		let tokens = Self::tokenize(prompt);

		let mut article_prefix = false;
		for pair in tokens.windows(2) {
			if pair[0] != "the" {
				continue;
			}
			let next_is_subject = self.graph.nodes().iter().any(|node| {
				node.word.role == WordRole::Subject && node.word.text.to_lowercase() == pair[1]
			});
			if next_is_subject {
				article_prefix = true;
			}
		}

		for token in &tokens {
			self.graph.boost_matching(token, PROMPT_BOOST);
		}

		article_prefix
	}

	/// Reverts the boosts of the current exchange. Call once per
	/// exchange, after the reply has been generated.
	pub fn reset_all_boosts(&mut self) {
		self.graph.reset_boosts();
	}

	/// Generates a reply for `prompt` by walking one sentence template.
	///
	/// # Behavior
	/// - Starts from the first contextual subject; with none, falls back
	///   to a prompt-hash pick over all Subject entries; with no
	///   subjects at all, returns `FALLBACK_REPLY`.
	/// - The template is chosen by hashing the start word over the
	///   catalog size.
	/// - Each later template position greedily picks, among the current
	///   edge list, the matching-role edge with the highest
	///   `snapshot frequency + hash(sentence so far + candidate) %
	///   SCORE_VARIATION` score; strict comparison, so the first best
	///   candidate encountered wins ties.
	/// - Advancing re-resolves the chosen text to its canonical node. A
	///   position with no matching edge is skipped and leaves the
	///   cursor exhausted, so the remaining positions are skipped too
	///   and the sentence comes out shorter than the template.
	/// - The reply is capitalized and period-terminated; the literal
	///   `the ` prefix is prepended first when `use_article_prefix` is
	///   set.
	pub fn generate_most_likely_sentence(&self, prompt: &str, use_article_prefix: bool) -> String {
		let contextual = self.contextual_subjects(prompt);

		let start_id = match contextual.first() {
			Some(id) => *id,
			None => {
				let subjects: Vec<usize> = self
					.graph
					.nodes()
					.iter()
					.enumerate()
					.filter(|(_, node)| node.word.role == WordRole::Subject)
					.map(|(id, _)| id)
					.collect();
				if subjects.is_empty() {
					return FALLBACK_REPLY.to_owned();
				}
				subjects[Self::hash_bucket(prompt, subjects.len())]
			}
		};

		let start_word = self.graph.node(start_id).word.text.clone();
		let template =
			SENTENCE_TEMPLATES[Self::hash_bucket(&start_word, SENTENCE_TEMPLATES.len())];

		let mut sentence = String::new();
		if use_article_prefix {
			sentence.push_str("the ");
		}
		sentence.push_str(&start_word);

		// Cursor over the edge list scanned at the next position. A scan
		// consumes it; only a successful pick re-arms it.
		let mut cursor = Some(start_id);

		for expected_role in &template[1..] {
			let mut best_score = i32::MIN;
			let mut best_text: Option<String> = None;

			if let Some(id) = cursor.take() {
				for edge in &self.graph.node(id).edges {
					if edge.role != *expected_role {
						continue;
					}
					// Scores read the edge snapshot frequency; boosts on
					// canonical entries are not visible here.
					let variation = Self::hash_bucket(
						&format!("{}{}", sentence, edge.text),
						SCORE_VARIATION as usize,
					) as i32;
					let score = edge.frequency + variation;
					if score > best_score {
						best_score = score;
						best_text = Some(edge.text.clone());
					}
				}
			}

			if let Some(text) = best_text {
				sentence.push(' ');
				sentence.push_str(&text);
				cursor = self.graph.resolve(&text);
			}
		}

		let mut reply = String::with_capacity(sentence.len() + 1);
		let mut chars = sentence.chars();
		if let Some(first) = chars.next() {
			reply.extend(first.to_uppercase());
			reply.push_str(chars.as_str());
			reply.push('.');
		}
		reply
	}

	/// Runs one full exchange: boost, generate with the detected
	/// article flag, reset.
	///
	/// The reset runs whatever the generation outcome, so boosts never
	/// leak into the next exchange.
	pub fn respond(&mut self, prompt: &str) -> String {
		let use_article_prefix = self.boost_words_from_prompt(prompt);
		let reply = self.generate_most_likely_sentence(prompt, use_article_prefix);
		self.reset_all_boosts();
		reply
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use super::super::word::Word;

	fn generator(entries: &[(&str, i32, WordRole)]) -> Generator {
		let mut dictionary = Dictionary::default();
		for (text, frequency, role) in entries {
			dictionary.add_word(Word::new(text, *frequency, *role));
		}
		Generator::new(WordGraph::build(&dictionary))
	}

	#[test]
	fn test_tokenize_drops_punctuation_without_breaking_words() {
		assert_eq!(Generator::tokenize("Cat's"), ["cats"]);
		assert_eq!(Generator::tokenize("I like pizza!"), ["i", "like", "pizza"]);
		assert_eq!(Generator::tokenize("room 101 is empty"), ["room", "is", "empty"]);
	}

	#[test]
	fn test_tokenize_space_is_the_only_separator() {
		assert_eq!(Generator::tokenize("one,two three"), ["onetwo", "three"]);
		assert_eq!(Generator::tokenize("   spaced   out   "), ["spaced", "out"]);
		assert!(Generator::tokenize("42 !?").is_empty());
	}

	#[test]
	fn test_contextual_subjects_in_token_order_with_duplicates() {
		let chat = generator(&[
			("cat", 5, WordRole::Subject),
			("dog", 4, WordRole::Subject),
			("like", 3, WordRole::Verb),
		]);

		let found = chat.contextual_subjects("dog cat dog");
		let texts: Vec<&str> = found
			.iter()
			.map(|id| chat.graph().node(*id).word.text.as_str())
			.collect();
		assert_eq!(texts, ["dog", "cat", "dog"]);
	}

	#[test]
	fn test_boost_is_reverted_exactly() {
		let mut chat = generator(&[
			("cat", 7, WordRole::Subject),
			("like", 3, WordRole::Verb),
		]);

		// "cat" appears twice, "like" once, "pizza" is unknown.
		chat.boost_words_from_prompt("cat like cat pizza");

		let cat = chat.graph().resolve("cat").unwrap();
		let like = chat.graph().resolve("like").unwrap();
		assert_eq!(chat.graph().node(cat).word.frequency, 7 + 2 * PROMPT_BOOST);
		assert_eq!(chat.graph().node(like).word.frequency, 3 + PROMPT_BOOST);

		chat.reset_all_boosts();
		assert_eq!(chat.graph().node(cat).word.frequency, 7);
		assert_eq!(chat.graph().node(like).word.frequency, 3);
	}

	#[test]
	fn test_article_prefix_detection() {
		let mut chat = generator(&[
			("dog", 5, WordRole::Subject),
			("runs", 3, WordRole::Verb),
		]);

		assert!(chat.boost_words_from_prompt("the dog runs"));
		chat.reset_all_boosts();

		// "the" before an unknown word, or a subject without "the",
		// leaves the flag unset.
		assert!(!chat.boost_words_from_prompt("the pizza runs"));
		chat.reset_all_boosts();
		assert!(!chat.boost_words_from_prompt("dog the"));
		chat.reset_all_boosts();
	}

	#[test]
	fn test_empty_vocabulary_falls_back() {
		let mut chat = generator(&[]);
		assert_eq!(chat.respond("hello there"), FALLBACK_REPLY);
	}

	#[test]
	fn test_no_subjects_falls_back() {
		let mut chat = generator(&[("like", 3, WordRole::Verb)]);
		assert_eq!(chat.respond("like"), FALLBACK_REPLY);
	}

	#[test]
	fn test_generation_is_deterministic() {
		let chat = generator(&[
			("I", 5, WordRole::Subject),
			("you", 4, WordRole::Subject),
			("like", 3, WordRole::Verb),
			("eat", 2, WordRole::Verb),
			("pizza", 2, WordRole::Noun),
			("quickly", 2, WordRole::Adverb),
		]);

		let first = chat.generate_most_likely_sentence("something unrelated", false);
		let second = chat.generate_most_likely_sentence("something unrelated", false);
		assert_eq!(first, second);
		assert!(first.ends_with('.'));
	}

	#[test]
	fn test_large_frequency_gap_always_wins() {
		// "you" hashes onto the Subject-Verb-Adverb template. The gap
		// between the verbs exceeds the variation span, so the heavier
		// verb wins no matter the variation.
		let chat = generator(&[
			("you", 5, WordRole::Subject),
			("eat", 100, WordRole::Verb),
			("see", 10, WordRole::Verb),
			("food", 2, WordRole::Noun),
		]);

		assert_eq!(chat.generate_most_likely_sentence("you", false), "You eat.");
	}

	#[test]
	fn test_boosts_do_not_reach_edge_snapshots() {
		// Boosting "see" raises its canonical frequency past "eat", but
		// body positions score edge snapshots, so the walk is unmoved.
		let mut chat = generator(&[
			("you", 5, WordRole::Subject),
			("eat", 100, WordRole::Verb),
			("see", 10, WordRole::Verb),
			("food", 2, WordRole::Noun),
		]);

		let use_article = chat.boost_words_from_prompt("you see");
		assert!(!use_article);
		assert_eq!(chat.generate_most_likely_sentence("you see", use_article), "You eat.");
		chat.reset_all_boosts();

		let see = chat.graph().resolve("see").unwrap();
		assert_eq!(chat.graph().node(see).word.frequency, 10);
	}

	#[test]
	fn test_unmatched_position_truncates_the_walk() {
		// "cat" hashes onto Subject-Auxiliary-Verb. With no auxiliary in
		// the vocabulary the second position finds nothing, and the verb
		// position after it scans an exhausted cursor: the reply is just
		// the capitalized subject.
		let chat = generator(&[
			("cat", 5, WordRole::Subject),
			("like", 3, WordRole::Verb),
		]);

		assert_eq!(chat.generate_most_likely_sentence("cat", false), "Cat.");
	}
}
