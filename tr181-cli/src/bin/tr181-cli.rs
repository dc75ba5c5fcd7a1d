//! A REPL-style interactive shell for searching TR-181 data-model definitions
use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use log::warn;
use reedline::{
    default_emacs_keybindings, Emacs, FileBackedHistory, KeyModifiers, MenuBuilder, Reedline,
    ReedlineEvent, ReedlineMenu, Signal,
};
use tr181_cli::{
    command::{Cli, Commands},
    shell::{CommandCompleter, LookupPrompt},
};
use tr181_common::{
    config::LookupConfig,
    session::{SelectionError, Session},
};

#[derive(Parser)]
struct Args {
    /// A data-model definition file to open on start
    #[arg(value_hint=clap::ValueHint::FilePath)]
    file: Option<PathBuf>,
    /// Path to a lookup config TOML file
    #[arg(long, value_hint=clap::ValueHint::FilePath)]
    config: Option<PathBuf>,
    /// Start with case sensitive searching
    #[clap(short, long)]
    case_sensitive: bool,
}

fn print_results(session: &Session) {
    if session.model().is_none() {
        println!("No model loaded. Use 'open <FILE>' to load one.");
        return;
    }
    for (i, name) in session.results().iter().enumerate() {
        println!("{:>6}  {name}", i + 1);
    }
    println!(
        "{} of {} parameters shown",
        session.result_count(),
        session.total_count()
    );
}

fn print_info(session: &Session) {
    match session.model() {
        Some(model) => {
            println!("Model Definition File: {}", model.source());
            println!("Parameters: {}", model.len());
            for (access, count) in model.count_by_access() {
                println!("  {access:<18} {count}");
            }
        }
        None => println!("No model loaded"),
    }
    let query = session.query();
    println!("Query: '{}'", query.text());
    println!("Case sensitive: {}", query.case_sensitive());
    println!("Access: {}", query.access_filter());
    println!(
        "Shown: {}, selected: {}",
        session.result_count(),
        session.selected().len()
    );
}

fn open_model(session: &mut Session, path: &Path) {
    match session.open(path) {
        Ok(model) => println!(
            "Model Definition File: {} ({} parameters)",
            model.source(),
            model.len()
        ),
        Err(e) => println!("Error: {e}"),
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match LookupConfig::load(path) {
            Ok(c) => c,
            Err(e) => {
                println!("Error reading config file: ");
                println!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => LookupConfig::default(),
    };

    let mut query = config.query();
    if args.case_sensitive {
        query.set_case_sensitive(true);
    }
    let mut session = Session::new(query).with_name_join(config.name_join);

    if let Some(path) = &args.file {
        open_model(&mut session, path);
    } else {
        println!("Load the definition file to start: 'open <FILE>'");
    }

    let completion_menu = Box::new(
        reedline::IdeMenu::default()
            .with_default_border()
            .with_name("completion_menu"),
    );
    let mut keybindings = default_emacs_keybindings();
    keybindings.add_binding(
        KeyModifiers::NONE,
        reedline::KeyCode::Tab,
        ReedlineEvent::UntilFound(vec![
            ReedlineEvent::Menu("completion_menu".to_string()),
            ReedlineEvent::MenuNext,
        ]),
    );
    let edit_mode = Box::new(Emacs::new(keybindings));

    let mut rl = Reedline::create()
        .with_completer(Box::new(CommandCompleter))
        .with_menu(ReedlineMenu::EngineCompleter(completion_menu))
        .with_edit_mode(edit_mode);
    match FileBackedHistory::with_file(config.history_size, config.history_file.clone()) {
        Ok(history) => rl = rl.with_history(Box::new(history)),
        Err(e) => warn!(
            "Command history disabled, cannot use {}: {e}",
            config.history_file.display()
        ),
    }

    loop {
        let prompt = LookupPrompt::new(&session);
        let line = match rl.read_line(&prompt) {
            Ok(Signal::Success(line)) => line,
            Ok(Signal::CtrlC) => continue,
            Ok(Signal::CtrlD) => {
                println!("Exiting...");
                break;
            }
            Err(e) => {
                println!("Reedline error: {e}");
                return ExitCode::FAILURE;
            }
        };

        let split = match shlex::split(&line) {
            Some(split) => split,
            None => {
                println!("Unbalanced quotes in command");
                continue;
            }
        };
        if split.is_empty() {
            continue;
        }
        let cmd = match Cli::try_parse_from(
            std::iter::once("").chain(split.iter().map(String::as_str)),
        ) {
            Ok(c) => c,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match cmd.command {
            Commands::Open(args) => open_model(&mut session, &args.path),
            Commands::Find { text } => {
                session.set_text(text);
                print_results(&session);
            }
            Commands::Case { enable } => {
                session.set_case_sensitive(enable);
                println!("Case sensitive search {}", if enable { "on" } else { "off" });
                print_results(&session);
            }
            Commands::Access { kind } => {
                session.set_access_filter(kind.into());
                println!("Access filter: {}", session.query().access_filter());
                print_results(&session);
            }
            Commands::List => print_results(&session),
            Commands::Select(args) => match session.select(&args.positions()) {
                Ok(()) => {
                    for name in session.selected() {
                        println!("{name}");
                    }
                }
                Err(SelectionError::OutOfRange { index, len }) => {
                    println!("Row {} is out of range; {len} results are shown", index + 1);
                }
            },
            Commands::Copy(args) => {
                if session.selected().is_empty() {
                    println!("Nothing selected. Use 'select <ROW>...' first.");
                    continue;
                }
                let mut text = session.selection_text();
                text.push('\n');
                match args.output {
                    Some(path) => match std::fs::write(&path, text) {
                        Ok(_) => println!(
                            "Wrote {} names to {}",
                            session.selected().len(),
                            path.display()
                        ),
                        Err(e) => println!("Error writing {}: {e}", path.display()),
                    },
                    None => print!("{text}"),
                }
            }
            Commands::Info => print_info(&session),
            Commands::Exit => {
                println!("Exiting...");
                break;
            }
        }
    }
    ExitCode::SUCCESS
}
