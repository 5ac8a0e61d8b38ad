use crate::error::BatchError;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const DEFAULT_ZSTD_LEVEL: i32 = 3;
const RECORD_EXTENSION: &str = "cri";

/// Receives finished batches of encoded records.
pub trait BatchWriter {
    /// Writes one batch as part number `part` and returns where it went.
    fn write_batch(&mut self, part: usize, lines: &[String]) -> Result<PathBuf, BatchError>;
}

/// Writes each batch to `<dir>/<source name>.part_NNNNNN.cri.zst`.
#[derive(Debug, Clone)]
pub struct ZstdBatchWriter {
    output_dir: PathBuf,
    stem: String,
    level: i32,
}

impl ZstdBatchWriter {
    pub fn new(output_dir: impl Into<PathBuf>, source: &Path, level: i32) -> Self {
        let stem = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "games".to_string());
        Self {
            output_dir: output_dir.into(),
            stem,
            level,
        }
    }

    pub fn part_path(&self, part: usize) -> PathBuf {
        self.output_dir
            .join(format!("{}.part_{:06}.{}.zst", self.stem, part, RECORD_EXTENSION))
    }

    fn write_compressed(&self, path: &Path, lines: &[String]) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut encoder = zstd::stream::write::Encoder::new(BufWriter::new(file), self.level)?;
        for line in lines {
            encoder.write_all(line.as_bytes())?;
            encoder.write_all(b"\n")?;
        }
        encoder.finish()?.flush()
    }
}

impl BatchWriter for ZstdBatchWriter {
    fn write_batch(&mut self, part: usize, lines: &[String]) -> Result<PathBuf, BatchError> {
        let path = self.part_path(part);
        // A part only appears under its final name once fully written.
        let partial = path.with_extension("zst.partial");

        self.write_compressed(&partial, lines)
            .and_then(|()| fs::rename(&partial, &path))
            .map_err(|source| {
                let _ = fs::remove_file(&partial);
                BatchError {
                    path: path.clone(),
                    source,
                }
            })?;
        Ok(path)
    }
}

/// Groups encoded records into fixed-size batches and hands them to a writer.
pub struct Batcher<W> {
    writer: W,
    chunk_size: usize,
    lines: Vec<String>,
    next_part: usize,
}

impl<W: BatchWriter> Batcher<W> {
    pub fn new(writer: W, chunk_size: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            writer,
            chunk_size,
            lines: Vec::with_capacity(chunk_size.min(1 << 16)),
            next_part: 0,
        }
    }

    /// Adds one record; returns the written path when this completed a batch.
    pub fn push(&mut self, line: String) -> Result<Option<PathBuf>, BatchError> {
        self.lines.push(line);
        if self.lines.len() >= self.chunk_size {
            return self.flush().map(Some);
        }
        Ok(None)
    }

    fn flush(&mut self) -> Result<PathBuf, BatchError> {
        let path = self.writer.write_batch(self.next_part, &self.lines)?;
        self.lines.clear();
        self.next_part += 1;
        Ok(path)
    }

    /// Writes any buffered records and returns the number of parts written overall.
    pub fn finish(mut self) -> Result<(usize, W), BatchError> {
        if !self.lines.is_empty() {
            self.flush()?;
        }
        Ok((self.next_part, self.writer))
    }

    pub fn pending(&self) -> usize {
        self.lines.len()
    }
}
