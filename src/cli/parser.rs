use clap::{Parser, Subcommand};

/// Command-line interface definition for stempeluhr
/// Attendance server with entry/exit clocking and Germany-time stamping
#[derive(Parser)]
#[command(
    name = "stempeluhr",
    version = env!("CARGO_PKG_VERSION"),
    about = "Employee attendance server: entry/exit clocking over HTTP, stamped with the current time in Germany",
    long_about = None
)]
pub struct Cli {
    /// Override the data directory (useful for tests or custom layouts)
    #[arg(global = true, long = "data-dir")]
    pub data_dir: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the configuration, the data directory and the default accounts
    Init,

    /// Run the HTTP server
    Serve {
        #[arg(long, value_name = "ADDR", help = "Bind address (host:port), overrides the configured one")]
        bind: Option<String>,
    },

    /// Archive the data documents into a zip file
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, help = "Overwrite the destination without asking")]
        force: bool,
    },
}
