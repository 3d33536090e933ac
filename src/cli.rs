use std::path::PathBuf;

use clap::{Parser, ValueHint};

/// Serve the launch records dashboard.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(author, version, about = "Interactive launch records dashboard", long_about = None)]
pub struct Cli {
    /// Launch records file (.csv, .json or .parquet)
    #[arg(
        long,
        env = "LAUNCH_DASH_DATA",
        default_value = "spacex_launch_dash.csv",
        value_hint = ValueHint::FilePath
    )]
    pub data: PathBuf,

    /// Interface to bind
    #[arg(long, env = "LAUNCH_DASH_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "LAUNCH_DASH_PORT", default_value_t = 8050)]
    pub port: u16,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from(["launch-dash", "--data", "launches.parquet", "-p", "9000"]).unwrap();
        assert_eq!(cli.data, PathBuf::from("launches.parquet"));
        assert_eq!(cli.port, 9000);
    }
}
