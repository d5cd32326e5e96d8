use std::{
    collections::VecDeque,
    io,
    path::Path,
    sync::{Arc, Mutex},
    thread::sleep,
    time::Duration,
};

use chime_lib::controller::{format_time, Controller};
use chime_lib::element::MediaEvent;
use chime_lib::info::Info;
use chime_lib::playback::player::AudioElement;
use clap::ArgMatches;
use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{error, info};
use ratatui::{backend::CrosstermBackend, Terminal};
use symphonia::core::errors::Result;

use crate::{controls, logging, ui};

pub fn run(args: &ArgMatches, log_buffer: Arc<Mutex<VecDeque<String>>>) -> Result<i32> {
    info!("Starting chime");

    let file_path = args.get_one::<String>("INPUT").unwrap().clone();
    let gain = parse_gain(args.get_one::<String>("GAIN").unwrap());
    let quiet = args.get_flag("quiet");

    if !Path::new(&file_path).is_file() {
        error!("input file not found: {}", file_path);
        return Ok(-1);
    }

    if args.get_flag("probe-only") {
        let probed = Info::probe(Path::new(&file_path))?;
        println!(
            "duration: {}  sample rate: {} Hz  channels: {}",
            format_time(probed.duration),
            probed.sample_rate,
            probed.channels
        );
        return Ok(0);
    }

    let (element, media_events) = AudioElement::open(&file_path)?;
    element.set_volume(gain / 100.0);

    let mut controller = Controller::new(element);
    controller.toggle_play();

    let _raw_mode = RawModeGuard::enable().ok();
    let mut terminal = if !quiet {
        let mut stdout = io::stdout();
        let _ = execute!(stdout, EnterAlternateScreen, cursor::Hide);
        let backend = CrosstermBackend::new(stdout);
        Terminal::new(backend).ok()
    } else {
        None
    };

    // UI / input loop.
    let mut ended = false;
    loop {
        while let Ok(event) = media_events.try_recv() {
            if event == MediaEvent::Ended {
                ended = true;
            }
            controller.handle_event(event);
        }

        if let Some(term) = terminal.as_mut() {
            let status = controls::status_text(&controller);
            let log_lines = logging::snapshot(&log_buffer);
            ui::draw_status(term, &status, &log_lines);
        }

        if !controls::handle_key_event(&mut controller) {
            break;
        }

        if quiet && ended {
            break;
        }

        sleep(Duration::from_millis(50));
    }

    // Restore the terminal state before exiting.
    if let Some(mut term) = terminal {
        let _ = term.show_cursor();
        let stdout = term.backend_mut();
        let _ = execute!(stdout, LeaveAlternateScreen, cursor::Show);
    }

    Ok(0)
}

/// Parse the --gain value, falling back to the default and clamping to the
/// documented 0-100 range.
fn parse_gain(arg: &str) -> f32 {
    arg.parse::<f32>().unwrap_or(70.0).clamp(0.0, 100.0)
}

struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gain_is_clamped_to_percent_range() {
        assert_eq!(parse_gain("500"), 100.0);
        assert_eq!(parse_gain("-5"), 0.0);
        assert_eq!(parse_gain("70"), 70.0);
    }

    #[test]
    fn unparsable_gain_falls_back_to_default() {
        assert_eq!(parse_gain("loud"), 70.0);
    }
}
