use clap::builder::styling::AnsiColor;
use clap::builder::Styles;
use clap::{Parser, Subcommand};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// colouring of the help
const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().bold())
    .usage(AnsiColor::BrightMagenta.on_default().bold())
    .literal(AnsiColor::BrightMagenta.on_default())
    .placeholder(AnsiColor::White.on_default());

#[derive(Parser)]
#[command(
    version = VERSION,
    about = "Inspect, convert and filter SnapGene (.dna) files",
    arg_required_else_help = true,
    styles = STYLES
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode a file and print it as JSON
    #[command(arg_required_else_help = true)]
    Parse {
        /// the input file, or `-` for standard input
        input: String,

        /// write the JSON here instead of standard output
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Show the header, sequence length and block counts
    #[command(arg_required_else_help = true)]
    Info {
        /// the input file, or `-` for standard input
        input: String,
    },

    /// List top-level block types and flag the ones without a decoder
    #[command(arg_required_else_help = true)]
    Check {
        /// the input file, or `-` for standard input
        input: String,

        /// hex dump every block of an unknown type
        #[arg(short, long)]
        examine: bool,
    },

    /// Write a copy of the file keeping only some block types
    #[command(arg_required_else_help = true)]
    Filter {
        /// the input file, or `-` for standard input
        input: String,

        /// block types to keep, comma separated (e.g. 0,6,10)
        #[arg(short, long, value_delimiter = ',', required = true)]
        keep: Vec<u8>,

        /// the output file
        #[arg(short, long)]
        output: String,
    },

    /// List the edit history nodes
    #[command(arg_required_else_help = true)]
    History {
        /// the input file, or `-` for standard input
        input: String,

        /// also list the block types stored with each node
        #[arg(short, long)]
        verbose: bool,
    },
}

/// Maps the conventional `-` to standard input.
pub fn input_path(input: &str) -> Option<&str> {
    (input != "-").then_some(input)
}
