use std::fmt;

use serde::{Deserialize, Serialize};

use super::char_model::CharModel;

/// One of the two candidate speakers of an identification.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Speaker {
	A,
	B,
}

impl fmt::Display for Speaker {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Speaker::A => write!(f, "A"),
			Speaker::B => write!(f, "B"),
		}
	}
}

/// Outcome of a two-way speaker identification.
///
/// Both probabilities are average log-probabilities per character of the
/// unknown passage, so passages of different lengths compare fairly.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Identification {
	/// Normalized log probability of speaker A having produced the passage.
	pub probability_a: f64,
	/// Normalized log probability of speaker B having produced the passage.
	pub probability_b: f64,
	/// The more plausible speaker; ties resolve to B.
	pub verdict: Speaker,
}

/// Given sample texts from two speakers and a passage from an unidentified
/// speaker, returns the normalized log probabilities of each speaker having
/// uttered that passage under a k-order character model, and a conclusion
/// drawn from the two probabilities.
///
/// # Parameters
/// - `speaker_a`, `speaker_b`: Reference texts, non-empty.
/// - `unknown`: Passage to attribute, non-empty.
/// - `k`: Order of both character models, at least 1.
///
/// # Errors
/// Returns an error if either model rejects its training input or the
/// unknown passage is empty.
pub fn identify_speaker(speaker_a: &str, speaker_b: &str, unknown: &str, k: usize) -> Result<Identification, String> {
	if unknown.is_empty() {
		return Err("Unknown passage must not be empty".to_owned());
	}

	let model_a = CharModel::new(k, speaker_a)?;
	let model_b = CharModel::new(k, speaker_b)?;

	let length = unknown.chars().count() as f64;
	let probability_a = model_a.log_probability(unknown) / length;
	let probability_b = model_b.log_probability(unknown) / length;

	let verdict = if probability_a > probability_b {
		Speaker::A
	} else {
		Speaker::B
	};
	log::debug!("identification: A {:.6}, B {:.6} -> {}", probability_a, probability_b, verdict);

	Ok(Identification {
		probability_a,
		probability_b,
		verdict,
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	const EPSILON: f64 = 1e-12;

	#[test]
	fn attributes_to_the_better_matching_speaker() {
		let identification = identify_speaker("aaaaab", "bbbbba", "aaaaa", 1).unwrap();
		assert_eq!(identification.verdict, Speaker::A);
		assert!(identification.probability_a > identification.probability_b);
		// Every query character scores (4 + 1) / (2 + 5) under A and
		// (0 + 1) / (2 + 1) under B
		assert!((identification.probability_a - (5.0f64 / 7.0).ln()).abs() < EPSILON);
		assert!((identification.probability_b - (1.0f64 / 3.0).ln()).abs() < EPSILON);
	}

	#[test]
	fn mirrored_references_flip_the_verdict() {
		let identification = identify_speaker("bbbbba", "aaaaab", "aaaaa", 1).unwrap();
		assert_eq!(identification.verdict, Speaker::B);
	}

	#[test]
	fn tie_resolves_to_b() {
		let identification = identify_speaker("abab", "abab", "abab", 1).unwrap();
		assert_eq!(identification.probability_a, identification.probability_b);
		assert_eq!(identification.verdict, Speaker::B);
	}

	#[test]
	fn rejects_empty_inputs() {
		assert!(identify_speaker("aa", "bb", "", 1).is_err());
		assert!(identify_speaker("", "bb", "ab", 1).is_err());
		assert!(identify_speaker("aa", "", "ab", 1).is_err());
	}

	#[test]
	fn speaker_displays_as_single_letter() {
		assert_eq!(Speaker::A.to_string(), "A");
		assert_eq!(Speaker::B.to_string(), "B");
	}
}
