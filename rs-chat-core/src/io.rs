use std::path::{Path, PathBuf};
use std::{fs, io};

/// Reads a whole text file and returns its lines.
///
/// Splits on `\n` / `\r\n`; the trailing newline does not produce an
/// empty last line.
pub fn read_file<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	let contents = fs::read_to_string(filename)?;
	Ok(contents.lines().map(str::to_owned).collect())
}

/// Derives a sibling path carrying a different extension.
///
/// Example: `data/lexicon.csv` + `"bin"` → `data/lexicon.bin`
pub fn build_output_path<P: AsRef<Path>>(
	input_path: P,
	output_extension: &str,
) -> io::Result<PathBuf> {
	let input_path = input_path.as_ref();
	if input_path.file_stem().is_none() {
		return Err(io::Error::new(io::ErrorKind::InvalidInput, "Input path has no filename"));
	}
	Ok(input_path.with_extension(output_extension))
}

/// Extracts the base filename without its extension.
///
/// Examples:
/// - `"./data/lexicon.csv"` → `"lexicon"`
/// - `"lexicon.csv"` → `"lexicon"`
pub fn get_filename<P: AsRef<Path>>(input_path: P) -> io::Result<String> {
	let stem = input_path
		.as_ref()
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Path has no filename"))?;

	Ok(stem.to_string_lossy().to_string())
}

/// Lists all files with a given extension in a directory.
///
/// Returns file names only (no paths), sorted so callers see a stable
/// order.
pub fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<String>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();
		if !path.is_file() {
			continue;
		}
		if path.extension() != Some(std::ffi::OsStr::new(extension)) {
			continue;
		}
		if let Some(name) = path.file_name() {
			files.push(name.to_string_lossy().to_string());
		}
	}

	files.sort();
	Ok(files)
}
