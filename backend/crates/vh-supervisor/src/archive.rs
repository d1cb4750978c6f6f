//! Streaming zip archive of the worlds directory.

use crate::{SupervisorError, SupervisorResult};

use std::fs::File;
use std::io::{self, Write};
use std::panic::Location;
use std::path::{Component, Path, PathBuf};

use bytes::{Bytes, BytesMut};
use error_location::ErrorLocation;
use log::debug;
use tokio::sync::mpsc;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Bytes buffered before a chunk is handed to the consumer.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// One file captured by a backup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// `/`-separated path relative to the worlds directory
    pub name: String,
    pub path: PathBuf,
}

/// Every regular file under `worlds_dir`, recursively, in file-name order.
///
/// A missing directory yields no entries.
pub fn enumerate_world_files(worlds_dir: &Path) -> SupervisorResult<Vec<ArchiveEntry>> {
    if !worlds_dir.exists() {
        debug!(
            "Worlds directory {} does not exist, nothing to archive",
            worlds_dir.display()
        );
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();

    for entry in WalkDir::new(worlds_dir).sort_by_file_name() {
        let entry = entry.map_err(|source| SupervisorError::WorldsScan {
            path: worlds_dir.to_path_buf(),
            source,
            location: ErrorLocation::from(Location::caller()),
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let name = archive_name(worlds_dir, entry.path()).ok_or_else(|| {
            SupervisorError::internal(format!(
                "{} is not under {}",
                entry.path().display(),
                worlds_dir.display()
            ))
        })?;

        entries.push(ArchiveEntry {
            name,
            path: entry.into_path(),
        });
    }

    Ok(entries)
}

fn archive_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;

    let parts: Vec<_> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect();

    (!parts.is_empty()).then(|| parts.join("/"))
}

/// Write `entries` as a zip archive into `sink`.
///
/// Blocking; the archive is produced front to back without seeking, so the
/// sink can be a pipe.
pub fn write_archive<W: Write>(entries: &[ArchiveEntry], sink: W) -> SupervisorResult<()> {
    let mut zip = ZipWriter::new_stream(sink);
    let base_options =
        SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in entries {
        let mut source = File::open(&entry.path)?;
        let size = source.metadata()?.len();
        let options = base_options.large_file(size >= u64::from(u32::MAX));

        zip.start_file(&entry.name, options)?;
        io::copy(&mut source, &mut zip)?;
        debug!("Archived {} ({size} bytes)", entry.name);
    }

    zip.finish()?;
    Ok(())
}

/// `Write` adapter that forwards fixed-size chunks over a channel.
///
/// Must only be used off the async runtime (it blocks on a full channel).
/// A closed channel surfaces as `BrokenPipe`.
pub struct ChunkWriter {
    buffer: BytesMut,
    tx: mpsc::Sender<SupervisorResult<Bytes>>,
}

impl ChunkWriter {
    pub fn new(tx: mpsc::Sender<SupervisorResult<Bytes>>) -> Self {
        Self {
            buffer: BytesMut::with_capacity(CHUNK_SIZE),
            tx,
        }
    }

    fn send_buffered(&mut self) -> io::Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        let chunk = self.buffer.split().freeze();
        self.tx
            .blocking_send(Ok(chunk))
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "backup consumer went away"))
    }
}

impl Write for ChunkWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        if self.buffer.len() >= CHUNK_SIZE {
            self.send_buffered()?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.send_buffered()
    }
}

impl Drop for ChunkWriter {
    fn drop(&mut self) {
        if let Err(e) = self.send_buffered() {
            debug!("Dropped final backup chunk: {e}");
        }
    }
}
