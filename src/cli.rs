use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Directory holding config.yaml and cached model files
    #[clap(long, default_value = ".")]
    pub data_dir: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP daemon
    Daemon {},

    /// Predict the top domains for a project description
    Predict {
        /// Free-text project description
        description: String,
    },

    /// Rank investors for a domain
    Investors {
        /// Domain label to match against investor records
        domain: String,

        /// Narrow results to a kind of investor (e.g. "Angel", "VC")
        #[clap(long)]
        investor_type: Option<String>,
    },

    /// List the domain catalog labels
    Domains {},
}
