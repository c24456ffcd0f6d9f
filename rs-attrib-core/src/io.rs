use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Reads a whole text file into a `String`.
///
/// Reference and query texts are scanned character by character, so the
/// content is kept as-is (no line splitting, no trimming).
pub fn read_text<P: AsRef<Path>>(filename: P) -> io::Result<String> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents)
}
