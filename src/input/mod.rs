use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod clipboard;

/// Text shown when the reader starts without any input.
pub const SAMPLE_TEXT: &str = "Rapid serial visual presentation (RSVP) is a scientific method for studying the timing of vision. In RSVP, a sequence of stimuli is shown to an observer at one location in their visual field. The observer is instructed to report one of these stimuli - the target - which has a feature that differentiates it from the rest of the stream. For instance, observers may see a sequence of stimuli consisting of gray letters with the exception of one red letter. They are told to report the red letter. People make errors in this task in the form of reports of stimuli that occurred before or after the target. The position in time of the letter they report, relative to the target, is an estimate of the timing of visual selection on that trial. The term, and methodologies to study it, was first introduced by Mary C. Potter.";

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Nothing to read in {0}")]
    EmptyInput(String),

    #[error("Invalid text encoding (expected UTF-8): {0}")]
    InvalidEncoding(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Plain text handed to a reading session, with a label for the status line.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedText {
    pub text: String,
    pub source: String,
}

pub fn load_file(path: &Path) -> Result<LoadedText, LoadError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(LoadError::FileNotFound(path.to_path_buf()))
        }
        Err(err) => return Err(err.into()),
    };

    let source = path.display().to_string();
    let text = String::from_utf8(bytes).map_err(|_| LoadError::InvalidEncoding(source.clone()))?;
    non_empty(text, source)
}

pub fn load_reader(mut reader: impl io::Read, source: &str) -> Result<LoadedText, LoadError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let text =
        String::from_utf8(bytes).map_err(|_| LoadError::InvalidEncoding(source.to_string()))?;
    non_empty(text, source.to_string())
}

pub fn sample() -> LoadedText {
    LoadedText {
        text: SAMPLE_TEXT.to_string(),
        source: "sample text".to_string(),
    }
}

fn non_empty(text: String, source: String) -> Result<LoadedText, LoadError> {
    if text.trim().is_empty() {
        return Err(LoadError::EmptyInput(source));
    }
    Ok(LoadedText { text, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_valid_file_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("valid.txt");
        fs::write(&path, "hello world").unwrap();

        let loaded = load_file(&path).unwrap();
        assert_eq!(loaded.text, "hello world");
        assert!(loaded.source.ends_with("valid.txt"));
    }

    #[test]
    fn test_empty_file_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        fs::write(&path, "  \n\t").unwrap();

        match load_file(&path) {
            Err(LoadError::EmptyInput(_)) => (),
            other => panic!("Expected EmptyInput error, got {other:?}"),
        }
    }

    #[test]
    fn test_nonexistent_file_error() {
        let dir = tempfile::tempdir().unwrap();
        match load_file(&dir.path().join("missing.txt")) {
            Err(LoadError::FileNotFound(path)) => assert!(path.ends_with("missing.txt")),
            other => panic!("Expected FileNotFound error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_utf8_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("binary.txt");
        fs::write(&path, [0xff, 0xfe, 0x00, 0x41]).unwrap();
        assert!(matches!(load_file(&path), Err(LoadError::InvalidEncoding(_))));
    }

    #[test]
    fn test_load_reader() {
        let loaded = load_reader("piped words".as_bytes(), "stdin").unwrap();
        assert_eq!(loaded.text, "piped words");
        assert_eq!(loaded.source, "stdin");
        assert!(matches!(
            load_reader("".as_bytes(), "stdin"),
            Err(LoadError::EmptyInput(_))
        ));
    }

    #[test]
    fn test_sample_text_is_readable() {
        let loaded = sample();
        assert!(loaded.text.starts_with("Rapid serial visual presentation"));
    }
}
