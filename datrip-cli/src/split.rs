use anyhow::{Context, Result};
use clap::Parser;
use datrip::frame::FrameReader;
use datrip::track::{FileSink, Segmenter};
use datrip_cli::args::SplitArgs;
use datrip_cli::terminal;
use log::{error, info};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use std::process;

fn open_input(path: &Path) -> Result<Box<dyn Read>> {
    if path.as_os_str() == "-" {
        Ok(Box::new(io::stdin().lock()))
    } else {
        let file =
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        Ok(Box::new(file))
    }
}

fn run_app() -> Result<()> {
    let args = SplitArgs::parse();
    terminal::init_logging(args.verbose, args.quiet);
    if args.version {
        eprintln!("datsplit {}", env!("CARGO_PKG_VERSION"));
    }

    let input = open_input(&args.input)?;
    let mut reader = FrameReader::new(BufReader::new(input));
    reader.seek_frames(args.seek_n_frames)?;

    let mut segmenter = Segmenter::new(args.config(), FileSink::new(&args.prefix));
    while let Some((parsed, next)) = reader.next_with_lookahead()? {
        if !segmenter.push(&parsed.frame, &parsed.info, &next)? {
            break;
        }
    }
    segmenter.finish()?;

    info!(
        "wrote {} tracks from {} frames ({:.1} seconds of audio)",
        segmenter.tracks_written(),
        segmenter.frames_read(),
        segmenter.audio_seconds(),
    );
    Ok(())
}

fn main() {
    process::exit(match run_app() {
        Ok(()) => 0,
        Err(err) => {
            error!("Fatal: {:#}", err);
            1
        }
    });
}
