//! Server configuration from the command line, falling back to environment variables.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Where the league database lives.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum DbSource {
    /// SQLite file at `--db-path`.
    #[default]
    File,
    /// Throwaway in-memory database.
    Memory,
}

#[derive(Clone, Debug, Parser)]
#[command(name = "web", about = "Cribbage league organizer web server")]
pub struct Config {
    /// Address to listen on.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Database backend.
    #[arg(long, env = "DB_SOURCE", value_enum, default_value_t = DbSource::File)]
    pub db: DbSource,

    /// SQLite file used when `--db file`.
    #[arg(long, env = "DATABASE_PATH", default_value = "data/db.sqlite")]
    pub db_path: PathBuf,
}

impl Config {
    pub fn bind_addr(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }
}
