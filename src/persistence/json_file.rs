use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use serde_json::{from_str, to_string};
use thiserror::Error;
use crate::domain::commands::Command;

#[derive(Debug, Error)]
pub enum JournalError {
    #[error("Failed to access journal {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse command on line {line} of {path}: {source}")]
    Parse {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize command: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Reads a journal written by [`Journal`]: one JSON command per line.
/// A missing file is an empty journal.
pub fn read_commands<P: AsRef<Path>>(path: P) -> Result<Vec<Command>, JournalError> {
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(JournalError::Io { path: path.to_path_buf(), source });
        }
    };
    let reader = BufReader::new(file);

    let mut commands = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| JournalError::Io { path: path.to_path_buf(), source })?;
        if line.trim().is_empty() {
            continue;
        }
        let command: Command = from_str(&line).map_err(|source| JournalError::Parse {
            path: path.to_path_buf(),
            line: index + 1,
            source,
        })?;

        commands.push(command);
    }

    Ok(commands)
}

/// Append-only log of applied commands.
#[derive(Debug)]
pub struct Journal {
    path: PathBuf,
    file: Mutex<File>,
}

impl Journal {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, JournalError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| JournalError::Io { path: path.clone(), source })?;

        Ok(Journal { path, file: Mutex::new(file) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, command: &Command) -> Result<(), JournalError> {
        let mut line = to_string(command)?;
        line.push('\n');

        let mut file = self.file.lock();
        let written = file.write_all(line.as_bytes());
        written
            .and_then(|()| file.flush())
            .map_err(|source| JournalError::Io { path: self.path.clone(), source })
    }
}
