use anyhow::{Context, Result};
use booklist::config::{AppConfig, CliConfig, FileConfig, DEFAULT_REQUEST_TIMEOUT_SEC};
use booklist::book::ALL_FIELDS;
use booklist::{
    BookField, BookStore, BookStoreClient, ListSynchronizer, PasswordAuthorizer, SyncError,
    TerminalPasswordPrompt,
};
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli_style;
mod view;

use cli_style::{get_styles, CommandGroup, CommandHelp, Tone};
use view::BusyIndicator;

use rustyline::{
    completion::Completer, highlight::Highlighter, history::FileHistory, validate::Validator,
    CompletionType, Config, Editor, Helper,
};

fn parse_path(s: &str) -> Result<PathBuf> {
    let original_path = PathBuf::from(s);
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
#[command(styles=get_styles(), version)]
struct CliArgs {
    /// Base URL of the book store (e.g. http://localhost:5001).
    #[clap(long)]
    pub base_url: Option<String>,

    /// Path to a TOML config file. Values in the file override CLI flags.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Timeout in seconds for book store requests.
    #[clap(long, default_value_t = DEFAULT_REQUEST_TIMEOUT_SEC)]
    pub timeout_sec: u64,

    /// Also send the image URL when updating a book.
    #[clap(long)]
    pub send_image_on_update: bool,

    /// Do not fetch the book list on start.
    #[clap(long)]
    pub no_load: bool,

    /// Log filter used when LOG_LEVEL is not set (e.g. "info", "booklist=debug").
    #[clap(long)]
    pub log_level: Option<String>,

    /// Where to keep the command history.
    #[clap(long, value_parser = parse_path)]
    pub history_file: Option<PathBuf>,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            base_url: self.base_url.clone(),
            request_timeout_sec: self.timeout_sec,
            send_image_on_update: self.send_image_on_update,
            load_on_start: !self.no_load,
            log_level: self.log_level.clone(),
            history_file: self.history_file.clone(),
        }
    }
}

#[derive(Parser)]
#[command(styles=get_styles(), name = "", disable_help_subcommand = true)]
struct InnerCli {
    #[command(subcommand)]
    command: InnerCommand,
}

#[derive(Subcommand)]
enum InnerCommand {
    /// Shows the book list.
    List,

    /// Fetches the book list again from the store.
    Reload,

    /// Shows the new-book and edit drafts.
    Draft,

    /// Sets a field (title, author, image_url) of the draft being worked on.
    /// While a book is being edited the edit draft is changed, otherwise
    /// the new-book draft.
    Set { field: String, value: String },

    /// Creates a book from the new-book draft.
    Create,

    /// Starts editing the book at the given row.
    Edit { row: usize },

    /// Saves the book being edited.
    Update,

    /// Stops editing without saving.
    Cancel,

    /// Deletes the book at the given row.
    Delete { row: usize },

    /// Shows the available commands.
    Help,

    /// Close this program.
    Exit,
}

enum CommandExecutionResult {
    Ok,
    Exit,
    Error(String),
}

const COMMANDS_HELP: &[CommandHelp] = &[
    CommandHelp {
        name: "list",
        args: "",
        description: "Show the book list",
        group: CommandGroup::Browsing,
    },
    CommandHelp {
        name: "reload",
        args: "",
        description: "Fetch the book list again",
        group: CommandGroup::Browsing,
    },
    CommandHelp {
        name: "draft",
        args: "",
        description: "Show the new-book and edit drafts",
        group: CommandGroup::Browsing,
    },
    CommandHelp {
        name: "set",
        args: "<field> <value>",
        description: "Set title, author or image_url of the current draft",
        group: CommandGroup::Editing,
    },
    CommandHelp {
        name: "create",
        args: "",
        description: "Create a book from the new-book draft",
        group: CommandGroup::Editing,
    },
    CommandHelp {
        name: "edit",
        args: "<row>",
        description: "Start editing the book at a row",
        group: CommandGroup::Editing,
    },
    CommandHelp {
        name: "update",
        args: "",
        description: "Save the book being edited",
        group: CommandGroup::Editing,
    },
    CommandHelp {
        name: "cancel",
        args: "",
        description: "Stop editing without saving",
        group: CommandGroup::Editing,
    },
    CommandHelp {
        name: "delete",
        args: "<row>",
        description: "Delete the book at a row",
        group: CommandGroup::Editing,
    },
    CommandHelp {
        name: "help",
        args: "",
        description: "Show this help",
        group: CommandGroup::System,
    },
    CommandHelp {
        name: "exit",
        args: "",
        description: "Close this program",
        group: CommandGroup::System,
    },
];

/// Maps a synchronizer error to what the operator sees.
///
/// Declined authorization is silent apart from a muted note.
fn report_sync_error(err: SyncError) -> CommandExecutionResult {
    match err {
        SyncError::Unauthorized => {
            cli_style::note(Tone::Muted, "Not authorized, nothing was changed.");
            CommandExecutionResult::Ok
        }
        other => CommandExecutionResult::Error(other.to_string()),
    }
}

async fn execute_command(
    line: String,
    sync: &mut ListSynchronizer,
    indicator: &mut BusyIndicator,
) -> CommandExecutionResult {
    if line.trim().is_empty() {
        return CommandExecutionResult::Ok;
    }

    let args =
        shlex::split(&line).unwrap_or_else(|| line.split_whitespace().map(String::from).collect());

    let cli = InnerCli::try_parse_from(std::iter::once(" ").chain(args.iter().map(String::as_str)));

    let cli = match cli {
        Ok(cli) => cli,
        Err(e) => {
            if e.print().is_err() {
                println!("{}", e);
            }
            return CommandExecutionResult::Ok;
        }
    };

    cli_style::print_command_echo(&line);
    match cli.command {
        InnerCommand::List => view::render_collection(sync.state()),
        InnerCommand::Reload => {
            // A failure shows up as last_error in the rendered list
            if let Err(err) = indicator.run(sync.load()).await {
                debug!("Reload failed: {}", err);
            }
            view::render_collection(sync.state());
        }
        InnerCommand::Draft => view::render_drafts(sync.state()),
        InnerCommand::Set { field, value } => {
            let Some(field) = BookField::from_str(&field) else {
                let valid: Vec<&str> = ALL_FIELDS.iter().map(|f| f.as_str()).collect();
                return CommandExecutionResult::Error(format!(
                    "Unknown field '{}'. Valid fields are: {}",
                    field,
                    valid.join(", ")
                ));
            };
            sync.set_field(field, value);
            view::render_drafts(sync.state());
        }
        InnerCommand::Create => {
            let result = indicator.run(sync.create()).await;
            match result {
                Ok(book) => {
                    cli_style::note(Tone::Success, &format!("Created \"{}\"", book.title));
                    view::render_collection(sync.state());
                }
                Err(err) => return report_sync_error(err),
            }
        }
        InnerCommand::Edit { row } => {
            let Some(book) = view::book_at_row(sync.state(), row).cloned() else {
                return CommandExecutionResult::Error(format!("No book at row {}", row));
            };
            if let Some(discarded) = sync.begin_edit(&book) {
                let message = format!("Discarded unsaved changes to \"{}\"", discarded.title);
                cli_style::note(Tone::Warning, &message);
            }
            view::render_drafts(sync.state());
        }
        InnerCommand::Update => {
            let result = indicator.run(sync.commit_edit()).await;
            match result {
                Ok(book) => {
                    cli_style::note(Tone::Success, &format!("Updated \"{}\"", book.title));
                    view::render_collection(sync.state());
                }
                Err(err) => return report_sync_error(err),
            }
        }
        InnerCommand::Cancel => match sync.cancel_edit() {
            Some(book) => {
                cli_style::note(Tone::Muted, &format!("Stopped editing \"{}\"", book.title))
            }
            None => cli_style::note(Tone::Muted, "Nothing is being edited."),
        },
        InnerCommand::Delete { row } => {
            let Some(book) = view::book_at_row(sync.state(), row).cloned() else {
                return CommandExecutionResult::Error(format!("No book at row {}", row));
            };
            let result = indicator.run(sync.remove(&book.id)).await;
            match result {
                Ok(_) => {
                    cli_style::note(Tone::Success, &format!("Deleted \"{}\"", book.title));
                    view::render_collection(sync.state());
                }
                Err(err) => return report_sync_error(err),
            }
        }
        InnerCommand::Help => cli_style::print_help(COMMANDS_HELP),
        InnerCommand::Exit => return CommandExecutionResult::Exit,
    }
    CommandExecutionResult::Ok
}

#[derive(rustyline_derive::Hinter)]
struct MyHelper {
    commands_names: Vec<String>,
}

impl MyHelper {
    pub fn new() -> Self {
        let commands_names: Vec<String> = InnerCli::command()
            .get_subcommands()
            .map(|sc| sc.get_name().to_string())
            .collect();

        MyHelper { commands_names }
    }
}

impl Completer for MyHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        _pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        if line.contains(' ') {
            return Ok((0, Vec::with_capacity(0)));
        }
        let matches = self
            .commands_names
            .iter()
            .filter(|c| c.starts_with(line))
            .map(|c| c.to_string())
            .collect::<Vec<_>>();

        Ok((0, matches))
    }
}

impl Highlighter for MyHelper {}
impl Validator for MyHelper {}
impl Helper for MyHelper {}

fn init_logging(log_level: Option<&str>) {
    let default_level = log_level
        .and_then(|level| level.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::WARN);

    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(default_level.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();
    let file_config = cli_args
        .config
        .as_deref()
        .map(FileConfig::load)
        .transpose()?;
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    init_logging(config.log_level.as_deref());

    let store: Arc<dyn BookStore> = Arc::new(
        BookStoreClient::new(config.base_url.clone(), config.request_timeout_sec)
            .context("Could not set up the book store client")?,
    );
    let authorizer = Arc::new(PasswordAuthorizer::new(
        Arc::new(TerminalPasswordPrompt::new()),
        store.clone(),
    ));
    let mut sync = ListSynchronizer::new(store, authorizer, config.sync_options());
    let mut indicator = BusyIndicator::new(sync.subscribe());

    info!("Using book store at {}", config.base_url);
    cli_style::print_welcome(&config.base_url);

    if config.load_on_start {
        if let Err(err) = indicator.run(sync.load()).await {
            debug!("Initial load failed: {}", err);
        }
        view::render_collection(sync.state());
    }

    let rl_config = Config::builder()
        .completion_type(CompletionType::List)
        .build();

    let mut rl = Editor::<MyHelper, FileHistory>::with_config(rl_config)?;
    rl.set_helper(Some(MyHelper::new()));
    if let Some(history) = &config.history_file {
        if rl.load_history(history).is_err() {
            info!("No previous history at {:?}", history);
        }
    }

    let prompt = cli_style::get_prompt();
    loop {
        cli_style::flush();
        let readline = rl.readline(&prompt);

        match readline {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);
                match execute_command(line, &mut sync, &mut indicator).await {
                    CommandExecutionResult::Ok => {}
                    CommandExecutionResult::Exit => {
                        break;
                    }
                    CommandExecutionResult::Error(err) => {
                        cli_style::note(Tone::Error, &err);
                        continue;
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("CTRL-D: exiting.");
                break;
            }
            Err(e) => {
                println!("Error: {:?}", e);
                break;
            }
        }
    }

    if let Some(history) = &config.history_file {
        if let Err(e) = rl.save_history(history) {
            warn!("Could not save history to {:?}: {}", history, e);
        }
    }
    cli_style::print_goodbye();
    Ok(())
}
