//! Command-line configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use rbmap::Traversal;

#[derive(Parser, Debug)]
#[command(name = "navigator")]
#[command(about = "Interactive registry of named routes")]
pub struct Config {
    /// Log verbosity on stderr
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Also append log records to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Number of routes listed by the top-routes menu entry
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u16).range(1..))]
    pub top: u16,

    /// Order in which stored routes are enumerated
    #[arg(long, value_enum, default_value_t = ScanOrder::InOrder)]
    pub order: ScanOrder,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ScanOrder {
    /// Ascending route id
    InOrder,
    /// Root first, then left and right subtrees
    PreOrder,
}

impl From<ScanOrder> for Traversal {
    fn from(order: ScanOrder) -> Self {
        match order {
            ScanOrder::InOrder => Traversal::InOrder,
            ScanOrder::PreOrder => Traversal::PreOrder,
        }
    }
}
