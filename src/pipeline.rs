use crate::batch::{BatchWriter, Batcher};
use crate::error::{PipelineError, ReadError};
use crate::log;
use crate::openings::OpeningTable;
use crate::progress::Progress;
use crate::reader::GameReader;
use std::io::BufRead;
use std::path::Path;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ShardSummary {
    pub games: u64,
    pub malformed: u64,
    pub parts: usize,
}

#[derive(Clone, Copy, Debug)]
pub struct ShardOptions {
    pub chunk_size: usize,
    pub strict: bool,
}

/// Converts one input shard into numbered batches of encoded records.
///
/// Malformed games are logged and counted; only read and write failures end the shard.
pub fn convert_shard<R: BufRead, W: BatchWriter>(
    source: &Path,
    input: R,
    openings: Option<&OpeningTable>,
    options: ShardOptions,
    writer: W,
    progress: &mut Progress,
) -> Result<ShardSummary, PipelineError> {
    let mut batcher = Batcher::new(writer, options.chunk_size);
    let mut summary = ShardSummary::default();

    for outcome in GameReader::new(input, openings).strict(options.strict) {
        match outcome {
            Ok(record) => {
                summary.games += 1;
                progress.record_game();
                if let Some(path) = batcher.push(record.to_string())? {
                    progress.batch_written(&path);
                }
            }
            Err(ReadError::Malformed(game)) => {
                summary.malformed += 1;
                progress.record_malformed();
                log::warn(format!("{}: {}", source.display(), game));
            }
            Err(ReadError::Io(source_err)) => {
                return Err(PipelineError::Read {
                    path: source.to_path_buf(),
                    source: source_err,
                });
            }
        }
    }

    let pending = batcher.pending();
    let (parts, _) = batcher.finish()?;
    if pending > 0 {
        log::info(format!(
            "{}: wrote final part with {} games",
            source.display(),
            pending
        ));
    }
    summary.parts = parts;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::tests::MemoryWriter;
    use crate::error::BatchError;
    use crate::record::split_fields;
    use std::path::PathBuf;

    const GAMES: &str = "[Site \"x/one\"]\n[Result \"1-0\"]\n\n1. e4 e5 2. Qxf7# 1-0\n\n\
                         [Site \"x/two\"]\n[White \"Magnus]\n\n1. d4 *\n\n\
                         [Site \"x/three\"]\n[Result \"0-1\"]\n\n1. f3 e5 2. g4 Qh4# 0-1\n\n\
                         [Site \"x/four\"]\n\n1. c4 *\n\n";

    fn options(chunk_size: usize) -> ShardOptions {
        ShardOptions {
            chunk_size,
            strict: false,
        }
    }

    struct SharedMemory<'a>(&'a mut MemoryWriter);

    impl BatchWriter for SharedMemory<'_> {
        fn write_batch(&mut self, part: usize, lines: &[String]) -> Result<PathBuf, BatchError> {
            self.0.write_batch(part, lines)
        }
    }

    #[test]
    fn test_convert_shard_batches_and_skips_malformed() {
        let mut memory = MemoryWriter::default();
        let mut progress = Progress::new(None);

        let summary = convert_shard(
            Path::new("games.pgn"),
            GAMES.as_bytes(),
            None,
            options(2),
            SharedMemory(&mut memory),
            &mut progress,
        )
        .unwrap();

        assert_eq!(
            summary,
            ShardSummary {
                games: 3,
                malformed: 1,
                parts: 2
            }
        );

        let ids: Vec<String> = memory
            .batches
            .iter()
            .flat_map(|(_, lines)| lines.iter())
            .map(|line| split_fields(line).expect("23 fields")[0].to_string())
            .collect();
        assert_eq!(ids, ["one", "three", "four"]);
        assert_eq!(memory.batches[0].0, 0);
        assert_eq!(memory.batches[1].0, 1);
        assert_eq!(memory.batches[1].1.len(), 1);
    }

    #[test]
    fn test_convert_empty_shard_writes_nothing() {
        let mut memory = MemoryWriter::default();
        let summary = convert_shard(
            Path::new("empty.pgn"),
            "".as_bytes(),
            None,
            options(10),
            SharedMemory(&mut memory),
            &mut Progress::new(None),
        )
        .unwrap();

        assert_eq!(summary, ShardSummary::default());
        assert!(memory.batches.is_empty());
    }

    struct RefusingWriter;

    impl BatchWriter for RefusingWriter {
        fn write_batch(&mut self, part: usize, _: &[String]) -> Result<PathBuf, BatchError> {
            Err(BatchError {
                path: PathBuf::from(format!("part-{part}")),
                source: std::io::Error::other("disk full"),
            })
        }
    }

    #[test]
    fn test_batch_failure_stops_shard() {
        let err = convert_shard(
            Path::new("games.pgn"),
            GAMES.as_bytes(),
            None,
            options(1),
            RefusingWriter,
            &mut Progress::new(None),
        )
        .unwrap_err();

        assert!(matches!(err, PipelineError::Batch(_)));
        assert!(err.to_string().contains("part-0"));
    }
}
