use crate::error::PipelineError;
use bzip2::read::MultiBzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use zstd::stream::read::Decoder as ZstdDecoder;

pub type GameInput = Box<dyn BufRead + Send>;

const INPUT_BUFFER_BYTES: usize = 1 << 16;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CompressionMode {
    Plain,
    Zstd,
    Bzip2,
}

impl CompressionMode {
    pub fn parse(raw: &str) -> Result<Self, String> {
        let normalized = raw.trim();
        if normalized.eq_ignore_ascii_case("zstd") || normalized.eq_ignore_ascii_case("zst") {
            Ok(Self::Zstd)
        } else if normalized.eq_ignore_ascii_case("bzip2") || normalized.eq_ignore_ascii_case("bz2")
        {
            Ok(Self::Bzip2)
        } else if normalized.eq_ignore_ascii_case("plain") || normalized.eq_ignore_ascii_case("none")
        {
            Ok(Self::Plain)
        } else {
            Err(format!(
                "Invalid compression value '{}'. Supported values: 'zstd', 'bzip2' or 'plain'.",
                normalized
            ))
        }
    }

    /// Picks the decoder from the file extension; anything unknown is plain text.
    pub fn infer(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("zst") => Self::Zstd,
            Some(ext) if ext.eq_ignore_ascii_case("bz2") => Self::Bzip2,
            _ => Self::Plain,
        }
    }
}

/// Expands a path or glob pattern into the list of input shards.
pub fn expand_inputs(pattern: &str) -> Result<Vec<PathBuf>, PipelineError> {
    let paths: Vec<PathBuf> = if pattern.contains('*') || pattern.contains('?') {
        let mut paths: Vec<PathBuf> = glob::glob(pattern)?
            .filter_map(|entry| entry.ok())
            .collect();
        paths.sort();
        paths
    } else {
        vec![PathBuf::from(pattern)]
    };

    if paths.is_empty() {
        return Err(PipelineError::NoInputs(pattern.to_string()));
    }
    Ok(paths)
}

pub fn open_input_stream(
    path: &Path,
    compression: CompressionMode,
) -> Result<GameInput, PipelineError> {
    let file = File::open(path).map_err(|source| PipelineError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    match compression {
        CompressionMode::Plain => Ok(Box::new(BufReader::with_capacity(
            INPUT_BUFFER_BYTES,
            file,
        ))),
        CompressionMode::Zstd => ZstdDecoder::new(file)
            .map(|decoder| {
                Box::new(BufReader::with_capacity(INPUT_BUFFER_BYTES, decoder)) as GameInput
            })
            .map_err(|source| PipelineError::Open {
                path: path.to_path_buf(),
                source,
            }),
        // Lichess archives are concatenated bzip2 streams.
        CompressionMode::Bzip2 => Ok(Box::new(BufReader::with_capacity(
            INPUT_BUFFER_BYTES,
            MultiBzDecoder::new(file),
        ))),
    }
}
