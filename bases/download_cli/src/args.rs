// bases/download_cli/src/args.rs
use clap::Parser;

/// Search for music and download it as mp3 into ~/Downloads/Wavegrab Downloads
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
