use chess_cri::batch::{DEFAULT_ZSTD_LEVEL, ZstdBatchWriter};
use chess_cri::input::{CompressionMode, expand_inputs, open_input_stream};
use chess_cri::pipeline::{ShardOptions, convert_shard};
use chess_cri::progress::Progress;
use chess_cri::{OpeningTable, PipelineError, log};
use clap::Parser;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

/// Convert PGN game dumps into compressed `.cri` record batches.
#[derive(Parser, Debug)]
#[command(name = "chess-cri", version, about)]
struct Args {
    /// Input file or glob pattern; every match is converted on its own.
    input: String,

    /// Opening table mapping `ECO│Opening` to compact opening codes.
    #[arg(long)]
    openings: Option<PathBuf>,

    /// Directory receiving the `.cri.zst` part files.
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Games per output part file.
    #[arg(short, long, default_value_t = 1_000_000)]
    chunk_size: usize,

    /// Input compression (`zstd`, `bzip2` or `plain`); inferred from the extension when omitted.
    #[arg(long, value_parser = CompressionMode::parse)]
    compression: Option<CompressionMode>,

    /// zstd level for output parts.
    #[arg(long, default_value_t = DEFAULT_ZSTD_LEVEL)]
    level: i32,

    /// Expected number of games, used for the remaining-time estimate.
    #[arg(long)]
    expected_games: Option<u64>,

    /// Ignore blank lines that cannot close a game block.
    #[arg(long)]
    strict: bool,
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let openings = args
        .openings
        .as_deref()
        .map(|path| {
            OpeningTable::load(path).map_err(|source| PipelineError::Openings {
                path: path.to_path_buf(),
                source,
            })
        })
        .transpose()?;
    if let Some(table) = &openings {
        log::info(format!("Loaded {} opening codes", table.len()));
    }

    let options = ShardOptions {
        chunk_size: args.chunk_size,
        strict: args.strict,
    };

    for path in expand_inputs(&args.input)? {
        let compression = args
            .compression
            .unwrap_or_else(|| CompressionMode::infer(&path));
        let input = open_input_stream(&path, compression)?;
        let writer = ZstdBatchWriter::new(&args.output_dir, &path, args.level);
        let mut progress = Progress::new(args.expected_games);

        log::info(format!("Converting {}", path.display()));
        let summary = convert_shard(
            &path,
            input,
            openings.as_ref(),
            options,
            writer,
            &mut progress,
        )?;
        progress.finished(&path);
        if summary.malformed > 0 {
            log::warn(format!(
                "{}: skipped {} malformed games",
                path.display(),
                summary.malformed
            ));
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error(e.to_string());
            ExitCode::FAILURE
        }
    }
}
