// src/config.rs
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::domain::{AmountValue, EngineOptions};

#[derive(Debug, Clone, clap::Parser)]
#[clap(name = "car-auction", about = "Car auction engine with an HTTP front end")]
pub struct Arguments {
    #[clap(long, env, default_value = "127.0.0.1:8080")]
    pub bind_address: SocketAddr,

    /// Smallest amount accepted as the first bid of an auction.
    #[clap(long, env, default_value = "1")]
    pub min_opening_bid: AmountValue,

    /// JSON-lines file that applied commands are appended to and replayed
    /// from at startup. Without it all state is lost on exit.
    #[clap(long, env)]
    pub journal_path: Option<PathBuf>,
}

impl Arguments {
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            min_opening_bid: self.min_opening_bid,
        }
    }
}

impl fmt::Display for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "bind_address: {}", self.bind_address)?;
        writeln!(f, "min_opening_bid: {}", self.min_opening_bid)?;
        match &self.journal_path {
            Some(path) => write!(f, "journal_path: {}", path.display()),
            None => write!(f, "journal_path: None"),
        }
    }
}
