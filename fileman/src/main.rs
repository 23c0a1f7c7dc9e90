use clap::Parser;
use fileman::eval::current_user;
use fileman::{ExecContext, FmError, LineOutcome, Shell};
use fileman_config::{FilemanConfig, LogFormat, LoggingConfig, ShellConfig};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

mod completer;

/// fileman - interactive file manager rooted at your home directory
#[derive(Parser, Debug)]
#[command(name = "fileman", version, about)]
struct Args {
    /// Start directory, and the limit for `up` (defaults to $HOME)
    #[arg(long, env = "FILEMAN_ROOT")]
    root: Option<PathBuf>,

    /// Config file (replaces the default search locations)
    #[arg(long)]
    config: Option<String>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    debug: bool,

    /// Execute one command and exit
    #[arg(short = 'c')]
    command: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let loaded = match &args.config {
        Some(path) => fileman_config::load_from_file(path),
        None => fileman_config::load(),
    };
    let config = loaded.unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load config: {e}, using defaults");
        FilemanConfig::default()
    });

    init_tracing(&config.logging, args.debug);
    colored::control::set_override(config.shell.color);

    let opened = match args.root {
        Some(root) => Shell::open(root).await,
        None => Shell::open_home().await,
    };
    let mut shell = match opened {
        Ok(shell) => shell,
        Err(e) => {
            eprintln!("fileman: cannot start in home directory: {e}");
            std::process::exit(1);
        }
    };
    info!(home = %shell.home.display(), "session started");

    if let Some(line) = args.command {
        let mut ctx = ExecContext::default().with_color(config.shell.color);
        let code = match shell.execute_line(&line, &mut ctx).await {
            Ok(LineOutcome::Completed | LineOutcome::Empty) => 0,
            Ok(LineOutcome::Failed | LineOutcome::Unknown) => 1,
            Err(FmError::Exit(code)) => code,
            Err(e) => {
                eprintln!("fileman: {e}");
                1
            }
        };
        std::process::exit(code);
    }

    run_repl(&mut shell, &config.shell).await
}

fn init_tracing(logging: &LoggingConfig, debug: bool) {
    let directives = if debug {
        "debug".to_string()
    } else {
        logging.directives()
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(directives));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match logging.format {
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Compact => builder.compact().init(),
    }
}

const PROMPT_STYLES: &[(&str, &str)] = &[
    ("{red}", "\x1b[31m"),
    ("{green}", "\x1b[32m"),
    ("{blue}", "\x1b[34m"),
    ("{yellow}", "\x1b[33m"),
    ("{cyan}", "\x1b[36m"),
    ("{bold}", "\x1b[1m"),
    ("{reset}", "\x1b[0m"),
];

/// Fill in the prompt template. Style tokens are dropped when `color` is off.
fn render_prompt(template: &str, shell: &Shell, user: &str, color: bool) -> String {
    let mut prompt = template
        .replace("{cwd}", &shell.cwd.display().to_string())
        .replace("{home}", &shell.home.display().to_string())
        .replace("{user}", user);
    for &(token, escape) in PROMPT_STYLES {
        prompt = prompt.replace(token, if color { escape } else { "" });
    }
    prompt
}

async fn run_repl(shell: &mut Shell, shell_config: &ShellConfig) -> Result<(), Box<dyn std::error::Error>> {
    use completer::FilemanHelper;
    use rustyline::error::ReadlineError;
    use rustyline::history::DefaultHistory;
    use rustyline::{CompletionType, Config, Editor};

    let rl_config = Config::builder()
        .completion_type(CompletionType::List)
        .max_history_size(shell_config.history.max_entries)?
        .history_ignore_dups(true)?
        .history_ignore_space(true)
        .build();

    let cwd = Arc::new(RwLock::new(shell.cwd.clone()));
    let helper = FilemanHelper::new(cwd.clone(), shell.home.clone());

    let mut rl: Editor<FilemanHelper, DefaultHistory> = Editor::with_config(rl_config)?;
    rl.set_helper(Some(helper));

    let history_path = shell_config
        .history
        .enabled
        .then(|| shell_config.history.path());
    if let Some(path) = &history_path {
        if let Err(e) = rl.load_history(path) {
            debug!(path = %path.display(), error = %e, "no history loaded");
        }
    }

    let user = current_user();
    let mut ctx = ExecContext::default().with_color(shell_config.color);

    println!("Welcome to the File Manager, {user}!");
    ctx.stdout
        .writeln(&format!("You are currently in {}", shell.cwd.display()))?;

    loop {
        if let Ok(mut guard) = cwd.write() {
            guard.clone_from(&shell.cwd);
        }

        let prompt = render_prompt(&shell_config.prompt, shell, &user, shell_config.color);
        match rl.readline(&prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = rl.add_history_entry(line.as_str());
                }

                match shell.execute_line(&line, &mut ctx).await {
                    Ok(_) => {}
                    Err(FmError::Exit(code)) => {
                        save_history(&mut rl, history_path.as_deref());
                        println!("Thank you for using File Manager, {user}, goodbye!");
                        std::process::exit(code);
                    }
                    Err(e) => eprintln!("fileman: {e}"),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("Error: {err:?}");
                break;
            }
        }
    }

    save_history(&mut rl, history_path.as_deref());
    println!("Thank you for using File Manager, {user}, goodbye!");
    Ok(())
}

fn save_history<H: rustyline::Helper>(
    rl: &mut rustyline::Editor<H, rustyline::history::DefaultHistory>,
    path: Option<&std::path::Path>,
) {
    if let Some(path) = path {
        if let Err(e) = rl.save_history(path) {
            debug!(path = %path.display(), error = %e, "failed to save history");
        }
    }
}
