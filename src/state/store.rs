use std::{
    fs::File,
    io::{BufReader, BufWriter, ErrorKind, Write},
    path::{Path, PathBuf},
};

use snafu::ResultExt;

use crate::common::{Result, StateSnafu};

use super::State;

/// JSON file holding the persisted resource states.
#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is an empty state.
    pub fn load(&self) -> Result<State> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No state file yet");
                return Ok(State::default());
            }
            Err(err) => {
                return Err(err).boxed_local().context(StateSnafu {
                    message: format!("Failed to open state {}", self.path.display()),
                })
            }
        };

        let state: State = serde_json::from_reader(BufReader::new(file))
            .boxed_local()
            .context(StateSnafu {
                message: format!("Failed to read state from {}", self.path.display()),
            })?;

        tracing::debug!(
            path = %self.path.display(),
            resources = state.resources.len(),
            "State loaded",
        );
        Ok(state)
    }

    pub fn save(&self, state: &State) -> Result<()> {
        let file = File::create(&self.path).boxed_local().context(StateSnafu {
            message: format!("Failed to create state {}", self.path.display()),
        })?;

        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, state)
            .boxed_local()
            .context(StateSnafu {
                message: format!("Failed to write state to {}", self.path.display()),
            })?;
        writer.flush().boxed_local().context(StateSnafu {
            message: format!("Failed to flush state to {}", self.path.display()),
        })?;

        tracing::debug!(
            path = %self.path.display(),
            resources = state.resources.len(),
            "State saved",
        );
        Ok(())
    }
}
