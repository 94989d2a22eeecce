use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Grammatical category of a vocabulary entry.
///
/// The set is closed: sentence templates are expressed over these six
/// roles and the lexicon loader rejects anything else.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WordRole {
	Subject,
	Verb,
	Noun,
	Adverb,
	Auxiliary,
	Preposition,
}

impl WordRole {
	/// Every role, in the fixed order used wherever the system needs a
	/// deterministic iteration over roles (most importantly the graph's
	/// flatten order).
	pub const ALL: [WordRole; 6] = [
		WordRole::Subject,
		WordRole::Verb,
		WordRole::Noun,
		WordRole::Adverb,
		WordRole::Auxiliary,
		WordRole::Preposition,
	];

	/// Canonical spelling used in lexicon files.
	pub fn as_str(&self) -> &'static str {
		match self {
			WordRole::Subject => "Subject",
			WordRole::Verb => "Verb",
			WordRole::Noun => "Noun",
			WordRole::Adverb => "Adverb",
			WordRole::Auxiliary => "Auxiliary",
			WordRole::Preposition => "Preposition",
		}
	}
}

impl FromStr for WordRole {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"Subject" => Ok(WordRole::Subject),
			"Verb" => Ok(WordRole::Verb),
			"Noun" => Ok(WordRole::Noun),
			"Adverb" => Ok(WordRole::Adverb),
			"Auxiliary" => Ok(WordRole::Auxiliary),
			"Preposition" => Ok(WordRole::Preposition),
			_ => Err(format!("Unknown word role: {}", s)),
		}
	}
}

impl fmt::Display for WordRole {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A vocabulary entry: surface text, weight and grammatical role.
///
/// The frequency is the entry's base likelihood plus whatever prompt
/// boost is currently applied; it is the only mutable part.
///
/// ## Invariants
/// - `text` is non-empty
/// - Two words are equal iff their `text` matches. Role and frequency
///   are not part of identity; edge deduplication and canonical lookup
///   in the graph depend on exactly this equality.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Word {
	pub text: String,
	pub frequency: i32,
	pub role: WordRole,
}

impl Word {
	/// Creates a new entry with its baseline frequency.
	pub fn new(text: &str, frequency: i32, role: WordRole) -> Self {
		Self { text: text.to_owned(), frequency, role }
	}

	/// Adds `amount` to the frequency. Negative amounts revert boosts.
	pub fn add_frequency(&mut self, amount: i32) {
		self.frequency += amount;
	}
}

impl PartialEq for Word {
	fn eq(&self, other: &Self) -> bool {
		self.text == other.text
	}
}

impl Eq for Word {}

impl fmt::Display for Word {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.text)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_role_round_trip() {
		for role in WordRole::ALL {
			assert_eq!(role.as_str().parse::<WordRole>(), Ok(role));
		}
	}

	#[test]
	fn test_unknown_role_is_rejected() {
		assert!("Pronoun".parse::<WordRole>().is_err());
		assert!("subject".parse::<WordRole>().is_err());
	}

	#[test]
	fn test_identity_is_text_only() {
		let a = Word::new("run", 5, WordRole::Verb);
		let b = Word::new("run", 99, WordRole::Noun);
		let c = Word::new("walk", 5, WordRole::Verb);
		assert_eq!(a, b);
		assert_ne!(a, c);
	}

	#[test]
	fn test_frequency_adjustment() {
		let mut word = Word::new("pizza", 7, WordRole::Noun);
		word.add_frequency(100);
		assert_eq!(word.frequency, 107);
		word.add_frequency(-100);
		assert_eq!(word.frequency, 7);
	}
}
