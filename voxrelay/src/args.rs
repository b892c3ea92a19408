use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Voice message relay: speech in, chat reply out
#[derive(Debug, Parser)]
#[command(name = "voxrelay", about = "Transcribe uploaded voice messages and answer them with a chat model")]
pub struct Args {
    /// Path to configuration file (built-in defaults when omitted)
    #[arg(short, long, env = "VOXRELAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the listen address
    #[arg(long, env = "VOXRELAY_LISTEN")]
    pub listen: Option<SocketAddr>,

    /// Log filter directives, in `RUST_LOG` syntax
    #[arg(long, env = "VOXRELAY_LOG", default_value = "info")]
    pub log_filter: String,
}
