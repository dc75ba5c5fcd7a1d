use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use tr181_cli::command::{AccessArg, NameJoinArg};
use tr181_common::{DataModel, Query};

#[derive(Parser)]
struct Args {
    /// The data-model definition file to read
    #[arg(value_hint=clap::ValueHint::FilePath)]
    file: PathBuf,
    /// Only print parameters whose name contains this text
    #[arg(default_value = "")]
    query: String,
    /// Match the query with case preserved
    #[clap(short, long)]
    case_sensitive: bool,
    /// Restrict output by access type
    #[clap(short, long, value_enum, default_value_t = AccessArg::Any)]
    access: AccessArg,
    /// Prefix each name with its access type
    #[clap(short, long)]
    show_access: bool,
    /// How object and parameter names are joined
    #[clap(long, value_enum, default_value_t = NameJoinArg::Auto)]
    name_join: NameJoinArg,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let model = match DataModel::load_with(&args.file, args.name_join.into()) {
        Ok(model) => model,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let query = Query::new(args.query)
        .with_case_sensitive(args.case_sensitive)
        .with_access_filter(args.access.into());

    let entries = model.entries();
    for entry in query.positions(entries).into_iter().map(|i| &entries[i]) {
        if args.show_access {
            println!("{:<18} {}", entry.access(), entry.qualified_name());
        } else {
            println!("{}", entry.qualified_name());
        }
    }
    ExitCode::SUCCESS
}
