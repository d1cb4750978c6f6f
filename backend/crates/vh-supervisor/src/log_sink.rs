use crate::{SupervisorError, SupervisorResult};

use std::fs::File;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use error_location::ErrorLocation;

/// Append-only destination for a child process's stdout and stderr.
///
/// The file is truncated once on open and shared by every process launched
/// afterwards; it is never rotated.
#[derive(Debug)]
pub struct LogSink {
    path: PathBuf,
    file: File,
}

impl LogSink {
    #[track_caller]
    pub fn open_truncated(path: &Path) -> SupervisorResult<Self> {
        let caller = Location::caller();

        let opened = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map_or(Ok(()), std::fs::create_dir_all)
            .and_then(|()| File::create(path));

        match opened {
            Ok(file) => Ok(Self {
                path: path.to_path_buf(),
                file,
            }),
            Err(source) => Err(SupervisorError::LogSink {
                path: path.to_path_buf(),
                source,
                location: ErrorLocation::from(caller),
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A fresh handle onto the sink for one child stream.
    #[track_caller]
    pub fn stdio(&self) -> SupervisorResult<Stdio> {
        self.file
            .try_clone()
            .map(Stdio::from)
            .map_err(|source| SupervisorError::LogSink {
                path: self.path.clone(),
                source,
                location: ErrorLocation::from(Location::caller()),
            })
    }
}
