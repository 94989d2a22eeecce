use std::collections::HashMap;
use std::path::Path;
use std::sync::mpsc;
use std::thread;

use serde::{Deserialize, Serialize};

use crate::io::{build_output_path, read_file};
use super::word::{Word, WordRole};

/// Role-grouped vocabulary parsed from a lexicon file.
///
/// One record per line, three comma-separated fields:
/// `text,frequency,role`. Fields are trimmed, blank lines are skipped.
///
/// # Responsibilities
/// - Parse records into `Word`s grouped by role (group created on first use)
/// - Preserve record order within each group
/// - Cache parsed lexicons in a compact binary sibling for fast reloads
///
/// # Invariants
/// - Every word in a group carries that group's role
/// - Group order equals record order in the source file
///
/// # Parse policy
/// Strict: the first malformed record (field count ≠ 3, unparsable
/// frequency, unknown role) aborts the whole load with a line-numbered
/// error. Nothing is skipped silently.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Dictionary {
	groups: HashMap<WordRole, Vec<Word>>,
}

impl Dictionary {
	/// Loads a lexicon, preferring the binary cache when one exists.
	///
	/// # Behavior
	/// - If a `.bin` sibling of the `.csv` exists, deserializes it.
	/// - Otherwise parses the CSV and writes the `.bin` cache.
	///
	/// # Errors
	/// Fails when the file is missing or unreadable, or when a record is
	/// malformed. Load failures are meant to be fatal to the caller: the
	/// system cannot operate without a vocabulary.
	///
	/// # Notes
	/// The cache is preferred unconditionally; after editing the `.csv`,
	/// delete the `.bin` sibling to force a re-parse.
	pub fn new<P: AsRef<Path>>(filepath: P) -> Result<Self, Box<dyn std::error::Error>> {
		let binary_path = build_output_path(&filepath, "bin")?;
		if binary_path.exists() {
			let bytes = std::fs::read(binary_path)?;
			return Ok(postcard::from_bytes(&bytes)?);
		}

		let dictionary = Self::read_lexicon_file(&filepath)?;
		let bytes = postcard::to_stdvec(&dictionary)?;
		std::fs::write(binary_path, bytes)?;
		Ok(dictionary)
	}

	/// Parses a CSV lexicon, splitting the lines into chunks parsed on
	/// separate threads and merged back in chunk order.
	///
	/// Merging in chunk order (not channel-arrival order) keeps two
	/// contracts: record order within a role group is file order, and the
	/// error reported for a broken file is deterministic.
	fn read_lexicon_file<P: AsRef<Path>>(filename: P) -> Result<Dictionary, Box<dyn std::error::Error>> {
		let lines = read_file(&filename)?;
		if lines.is_empty() {
			return Ok(Dictionary::default());
		}

		let chunks = num_cpus::get().max(1);
		let chunk_size = ((lines.len() + chunks - 1) / chunks).max(1);

		let (tx, rx) = mpsc::channel();
		for (index, chunk) in lines.chunks(chunk_size).enumerate() {
			let tx = tx.clone();
			let chunk: Vec<String> = chunk.to_vec();

			thread::spawn(move || {
				let partial = Self::parse_chunk(&chunk, index * chunk_size + 1);
				tx.send((index, partial)).expect("Failed to send from thread");
			});
		}
		drop(tx);

		let mut partials: Vec<(usize, Result<Dictionary, String>)> = rx.iter().collect();
		partials.sort_by_key(|(index, _)| *index);

		let mut dictionary = Dictionary::default();
		for (_, partial) in partials {
			dictionary.merge(partial?);
		}
		Ok(dictionary)
	}

	/// Parses a run of consecutive lines into a partial dictionary.
	///
	/// `first_line_number` is the 1-based file position of `lines[0]`,
	/// used for error reporting.
	fn parse_chunk(lines: &[String], first_line_number: usize) -> Result<Dictionary, String> {
		let mut partial = Dictionary::default();
		for (offset, line) in lines.iter().enumerate() {
			if line.trim().is_empty() {
				continue;
			}
			partial.add_word(Self::parse_record(line, first_line_number + offset)?);
		}
		Ok(partial)
	}

	/// Parses one `text,frequency,role` record.
	fn parse_record(line: &str, line_number: usize) -> Result<Word, String> {
		let fields: Vec<&str> = line.split(',').collect();
		if fields.len() != 3 {
			return Err(format!(
				"line {}: expected 3 comma-separated fields, got {}",
				line_number,
				fields.len()
			));
		}

		let text = fields[0].trim();
		if text.is_empty() {
			return Err(format!("line {}: empty word text", line_number));
		}

		let frequency = fields[1].trim().parse::<i32>().map_err(|_| {
			format!("line {}: frequency is not an integer: {}", line_number, fields[1].trim())
		})?;

		let role = fields[2].trim().parse::<WordRole>()
			.map_err(|e| format!("line {}: {}", line_number, e))?;

		Ok(Word::new(text, frequency, role))
	}

	/// Appends a word to the group of its role, creating the group on
	/// first use.
	pub fn add_word(&mut self, word: Word) {
		self.groups.entry(word.role).or_default().push(word);
	}

	/// Appends every group of `other` onto this dictionary's groups,
	/// preserving `other`'s internal order.
	pub fn merge(&mut self, mut other: Dictionary) {
		for role in WordRole::ALL {
			if let Some(words) = other.groups.remove(&role) {
				self.groups.entry(role).or_default().extend(words);
			}
		}
	}

	/// Words of one role, in record order. Empty if the role never
	/// occurred in the lexicon.
	pub fn group(&self, role: WordRole) -> &[Word] {
		self.groups.get(&role).map(Vec::as_slice).unwrap_or(&[])
	}

	/// Total number of words across all groups.
	pub fn len(&self) -> usize {
		self.groups.values().map(Vec::len).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.groups.values().all(Vec::is_empty)
	}

	/// All words in flatten order: roles in `WordRole::ALL` order, record
	/// order within a group. This order defines node identity in the
	/// transition graph.
	pub fn flattened(&self) -> impl Iterator<Item = &Word> {
		WordRole::ALL.iter().flat_map(|role| self.group(*role).iter())
	}
}
