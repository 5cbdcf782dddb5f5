use anyhow::{Context, Result};
use clap::Parser;
use datrip::merge::Merger;
use datrip_cli::args::MergeArgs;
use datrip_cli::terminal;
use log::error;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;
use std::process;

fn open_input(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    Ok(BufReader::new(file))
}

fn run_app() -> Result<()> {
    let args = MergeArgs::parse();
    terminal::init_logging(args.verbose, args.quiet);
    if args.version {
        eprintln!("datmerge {}", env!("CARGO_PKG_VERSION"));
    }

    let first = open_input(&args.first)?;
    let second = open_input(&args.second)?;
    let third = open_input(&args.third)?;
    let mut out = BufWriter::new(io::stdout().lock());

    let mut merger = Merger::new([first, second, third], &mut out);
    let result = merger.run();

    let stats = merger.stats();
    eprintln!("frames merged: {}", stats.frames);
    eprintln!(
        "corrected errors: {} {} {}",
        stats.corrected[0], stats.corrected[1], stats.corrected[2],
    );
    eprintln!("uncorrected errors: {}", stats.uncorrected);

    drop(merger);
    out.flush()?;
    result?;
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
