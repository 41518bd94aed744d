//! CLI module for the storefront backend
//!
//! - `serve`: run the HTTP API
//! - `seed`: fill empty collections with fixture data and exit

pub mod seed;
pub mod serve;

use clap::{Parser, Subcommand};

/// Storefront backend - catalog, users, and chat boards over a key-value store
#[derive(Parser)]
#[command(name = "storefront")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Seed empty collections and exit
    Seed,
}
