//! Interactive route registry.
//!
//! Run with:
//! ```bash
//! cargo run -p navigator -- --log-level info --top 5
//! ```

use std::fs::File;
use std::io;
use std::process::ExitCode;

use clap::Parser;
use log::{error, LevelFilter};
use simplelog::{
    ColorChoice, CombinedLogger, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};

use navigator::{Config, Console, Navigator};

fn initialize_logging(config: &Config) -> io::Result<()> {
    let level = LevelFilter::from(config.log_level);
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];
    if let Some(path) = &config.log_file {
        loggers.push(WriteLogger::new(
            level.max(LevelFilter::Info),
            simplelog::Config::default(),
            File::create(path)?,
        ));
    }
    CombinedLogger::init(loggers).map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}

fn main() -> ExitCode {
    let config = Config::parse();
    if let Err(e) = initialize_logging(&config) {
        eprintln!("failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    let navigator = Navigator::with_order(config.order.into());
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut console = Console::new(
        stdin.lock(),
        stdout.lock(),
        navigator,
        usize::from(config.top),
    );

    match console.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
