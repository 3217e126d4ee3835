use rand::Rng;
use speedometer::{load_config, Gauge, GaugeCommand, GaugeConfig};
use std::env;
use std::io::{self, BufRead};
use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::Duration;

const RANDOM_TARGET_INTERVAL: Duration = Duration::from_millis(2500);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    // speedometer [config.toml] [--stdin]
    let mut config_path = None;
    let mut use_stdin = false;
    for arg in env::args().skip(1) {
        if arg == "--stdin" {
            use_stdin = true;
        } else {
            config_path = Some(arg);
        }
    }

    let config = match config_path {
        Some(path) => load_config(path)?,
        None => GaugeConfig::default(),
    };
    let mut gauge = Gauge::new(config)?;
    let (sender, receiver) = mpsc::channel();

    if use_stdin {
        thread::spawn(move || read_stdin_values(sender));
    } else {
        let (min, max) = (gauge.range().min_value(), gauge.range().max_value());
        thread::spawn(move || send_random_values(sender, min, max));
    }

    gauge.show_with_commands(receiver)
}

/// One value per line. `=` in front of a value snaps instead of animating.
fn read_stdin_values(sender: Sender<GaugeCommand>) {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("Failed to read stdin: {}", e);
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let command = match line.strip_prefix('=') {
            Some(rest) => rest.trim().parse().map(GaugeCommand::SnapValue),
            None => line.parse().map(GaugeCommand::SetValue),
        };
        match command {
            Ok(command) => {
                if sender.send(command).is_err() {
                    break;
                }
            }
            Err(_) => tracing::warn!("Ignoring non-numeric input {:?}", line),
        }
    }
}

fn send_random_values(sender: Sender<GaugeCommand>, min: f64, max: f64) {
    let mut rng = rand::rng();
    loop {
        let value = rng.random_range(min..=max);
        if sender.send(GaugeCommand::SetValue(value)).is_err() {
            break;
        }
        thread::sleep(RANDOM_TARGET_INTERVAL);
    }
}
