//! CLI argument definitions for `chime`.

use clap::{Arg, ArgAction, Command};

/// Build the CLI argument parser and command definitions.
pub fn build_cli() -> Command {
    Command::new("Chime")
        .version("0.1.0")
        .about("Play a single audio resource with transport controls")
        .arg(
            Arg::new("GAIN")
                .long("gain")
                .short('g')
                .value_name("GAIN")
                .default_value("70")
                .help("The playback gain (0-100)"),
        )
        .arg(
            Arg::new("probe-only")
                .long("probe-only")
                .action(ArgAction::SetTrue)
                .help("Print duration and stream metadata, then exit"),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .action(ArgAction::SetTrue)
                .help("Suppress the TUI and play headless"),
        )
        .arg(
            Arg::new("INPUT")
                .help("The audio file to play")
                .required(false)
                .default_value("audio.mp3")
                .index(1),
        )
}
