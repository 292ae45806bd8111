//! Loading JSON documents from files or stdin.

use serde_json::Value;
use std::io::{self, Read};
use thiserror::Error;

/// Errors surfaced while loading a document.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("failed to read file {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error("failed to read stdin: {0}")]
    Stdin(#[source] io::Error),
    #[error("invalid JSON in {origin}: {source}")]
    Json {
        origin: String,
        source: serde_json::Error,
    },
}

/// Reads JSON from `path`, or from stdin when no path is given.
pub fn read_json(path: Option<&str>) -> Result<Value, InputError> {
    match path {
        Some(path) => read_json_file(path),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(InputError::Stdin)?;
            parse(&buffer, "stdin")
        }
    }
}

/// Reads JSON from a file.
pub fn read_json_file(path: &str) -> Result<Value, InputError> {
    let text = std::fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.to_string(),
        source,
    })?;
    parse(&text, path)
}

fn parse(text: &str, origin: &str) -> Result<Value, InputError> {
    serde_json::from_str(text).map_err(|source| InputError::Json {
        origin: origin.to_string(),
        source,
    })
}
