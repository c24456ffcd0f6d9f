use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::table::AssociativeTable;

/// Initial cell count of the outer context table.
const CONTEXT_CELLS: usize = 57;

/// A k-order Markov model over the characters of a training text.
///
/// The model maps every k-character context window to the counts of the
/// characters observed immediately after it. Context windows at the start
/// of the text wrap around: the text is scanned with its own last `k`
/// characters prepended, so every position has a full-length context.
///
/// ## Responsibilities
/// - Accumulate per-context transition counts during construction
/// - Score a passage as a sum of add-one smoothed log-probabilities
///
/// ## Invariants
/// - For every position `i` of the training text, the inner table for the
///   context ending at `i` was incremented exactly once for character `i`
/// - The model is read-only after construction; scoring never mutates it
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CharModel {
	/// Order of the model (context length in characters).
	k: usize,
	/// Training text the statistics were drawn from.
	text: String,
	/// Number of distinct characters in the training text.
	alphabet: usize,
	/// Per-context transition counts, keyed by k-character windows.
	/// Each context owns its count table by value.
	contexts: AssociativeTable<String, AssociativeTable<char, usize>>,
}

impl CharModel {
	/// Builds a k-order model from the statistics of `text`.
	///
	/// # Parameters
	/// - `k`: Context length in characters, at least 1.
	/// - `text`: Training text, non-empty. A text shorter than `k` is
	///   accepted but degrades to truncated context windows.
	///
	/// # Errors
	/// Returns an error if `k` is zero or `text` is empty.
	pub fn new(k: usize, text: &str) -> Result<Self, String> {
		if k < 1 {
			return Err("Order must be >= 1".to_owned());
		}
		if text.is_empty() {
			return Err("Training text must not be empty".to_owned());
		}

		let chars: Vec<char> = text.chars().collect();
		let alphabet = chars.iter().copied().collect::<HashSet<char>>().len();
		let padded = wrap_tail(&chars, k);

		let default_counts = AssociativeTable::new(alphabet, 0usize);
		let mut contexts = AssociativeTable::new(CONTEXT_CELLS, default_counts);
		for (i, &c) in chars.iter().enumerate() {
			let window = window_at(&padded, i, k);
			*contexts.entry(&window).entry(&c) += 1;
		}

		log::debug!("built order-{} model: alphabet {}, {} contexts", k, alphabet, contexts.len());

		Ok(Self {
			k,
			text: text.to_owned(),
			alphabet,
			contexts,
		})
	}

	/// Log probability of `text` under the statistics of this model.
	///
	/// The passage is padded with its own last `k` characters (its own
	/// tail, not the training text's), then each character contributes
	/// `ln((count + 1) / (alphabet + tot))` where `count` is how often the
	/// model saw this character after the context and `tot` is the total
	/// number of observations for that context. Contexts the model never
	/// saw fall back to all-zero counts, so smoothing degrades to uniform
	/// over the alphabet.
	///
	/// The sum is *not* normalized by the length of the passage. An empty
	/// passage scores 0.0.
	pub fn log_probability(&self, text: &str) -> f64 {
		let chars: Vec<char> = text.chars().collect();
		let padded = wrap_tail(&chars, self.k);

		let mut log_probability = 0.0;
		for (i, &c) in chars.iter().enumerate() {
			let window = window_at(&padded, i, self.k);
			let (count, seen) = match self.contexts.find(&window) {
				Some(counts) => (counts.get(&c), counts.values().sum::<usize>()),
				None => (0, 0),
			};
			let probability = (count + 1) as f64 / (self.alphabet + seen) as f64;
			log_probability += probability.ln();
		}
		log_probability
	}

	/// Order of the model.
	pub fn order(&self) -> usize {
		self.k
	}

	/// Number of distinct characters in the training text.
	pub fn alphabet(&self) -> usize {
		self.alphabet
	}

	/// Training text the model was built from.
	pub fn text(&self) -> &str {
		&self.text
	}
}

/// Prepends the last `k` characters of `chars` to the text itself, so
/// context windows near the start wrap around instead of running out
/// of bounds.
fn wrap_tail(chars: &[char], k: usize) -> Vec<char> {
	let tail = &chars[chars.len().saturating_sub(k)..];
	let mut padded = Vec::with_capacity(tail.len() + chars.len());
	padded.extend_from_slice(tail);
	padded.extend_from_slice(chars);
	padded
}

/// The context window starting at position `i`, clamped at the end of the
/// padded text so an order larger than the text cannot slice out of bounds.
fn window_at(padded: &[char], i: usize, k: usize) -> String {
	padded[i..(i + k).min(padded.len())].iter().collect()
}
