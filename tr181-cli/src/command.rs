use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tr181_common::{AccessFilter, NameJoin};

#[derive(Debug, Parser)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Load a data-model definition file
    Open(OpenArgs),
    /// Search for parameters containing TEXT. With no TEXT, every parameter is listed.
    Find {
        #[arg(default_value = "")]
        text: String,
    },
    /// Turn case sensitive searching on or off
    Case {
        #[clap(action=clap::ArgAction::Set)]
        enable: bool,
    },
    /// Restrict results by access type
    Access { kind: AccessArg },
    /// Print the current results again
    List,
    /// Select result rows by number, replacing the previous selection
    Select(SelectArgs),
    /// Export the selected parameter names
    Copy(CopyArgs),
    /// Print info about the loaded model and the current search
    Info,
    /// Leave the shell
    Exit,
}

#[derive(Debug, Args)]
pub struct OpenArgs {
    /// Path to a definition XML file
    #[arg(value_hint=clap::ValueHint::FilePath)]
    pub path: PathBuf,
}

#[derive(Debug, Args)]
pub struct SelectArgs {
    /// Row numbers, as printed in the result list
    #[arg(required = true, value_parser = clap::value_parser!(u32).range(1..))]
    pub rows: Vec<u32>,
}

impl SelectArgs {
    /// The selected rows as zero-based result positions
    pub fn positions(&self) -> Vec<usize> {
        self.rows.iter().map(|&row| row as usize - 1).collect()
    }
}

#[derive(Debug, Args)]
pub struct CopyArgs {
    /// Write the names to this file instead of printing them
    #[arg(short, long, value_hint=clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

/// Access constraint as given on the command line
#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
pub enum AccessArg {
    /// No constraint
    Any,
    /// Only read-only parameters
    ReadOnly,
    /// Everything which is not read-only
    ReadWrite,
}

impl From<AccessArg> for AccessFilter {
    fn from(value: AccessArg) -> Self {
        match value {
            AccessArg::Any => AccessFilter::Any,
            AccessArg::ReadOnly => AccessFilter::ReadOnlyOnly,
            AccessArg::ReadWrite => AccessFilter::ReadWriteOnly,
        }
    }
}

/// Name join policy as given on the command line
#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
pub enum NameJoinArg {
    /// Insert a '.' between object and parameter names when the object name lacks one
    Auto,
    /// Join names exactly as written in the file
    Concat,
}

impl From<NameJoinArg> for NameJoin {
    fn from(value: NameJoinArg) -> Self {
        match value {
            NameJoinArg::Auto => NameJoin::Auto,
            NameJoinArg::Concat => NameJoin::Concat,
        }
    }
}
