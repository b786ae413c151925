//! mosaicsh - a small interactive command interpreter
//!
//! Runs a single line (`-c`), a script file, or an interactive
//! read-eval loop on top of the `mosaicsh` library.

use std::env;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use mosaicsh::config::ConfigLoader;
use mosaicsh::{create_session, platform, Config, PromptFormatter, Shell};

/// Environment variable holding a `tracing` filter directive
const LOG_ENV_VAR: &str = "MOSAICSH_LOG";

/// Command line arguments
#[derive(Debug, Default)]
struct AppArgs {
    /// Line given with `-c`
    command: Option<String>,
    /// Configuration file path
    config_path: Option<PathBuf>,
    /// Enable debug logging
    debug: bool,
    /// Skip the startup file
    norc: bool,
    /// Script to run instead of the interactive loop
    script: Option<PathBuf>,
}

impl AppArgs {
    /// Parse command line arguments
    fn parse() -> anyhow::Result<Self> {
        let args: Vec<String> = env::args().collect();
        let mut app_args = AppArgs::default();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "-c" => match args.get(i + 1) {
                    Some(line) => {
                        app_args.command = Some(line.clone());
                        i += 1;
                    }
                    None => bail!("-c: option requires an argument"),
                },
                "--config" => match args.get(i + 1) {
                    Some(path) => {
                        app_args.config_path = Some(PathBuf::from(path));
                        i += 1;
                    }
                    None => bail!("Missing config file path"),
                },
                "--debug" | "-d" => app_args.debug = true,
                "--norc" => app_args.norc = true,
                "--help" | "-h" => {
                    print_help();
                    process::exit(0);
                }
                "--version" | "-v" => {
                    println!("{} {}", mosaicsh::NAME, mosaicsh::VERSION);
                    process::exit(0);
                }
                arg if arg.starts_with('-') => bail!("Unknown option: {}", arg),
                path => {
                    if app_args.script.is_some() {
                        bail!("Unexpected argument: {}", path);
                    }
                    app_args.script = Some(PathBuf::from(path));
                }
            }
            i += 1;
        }

        Ok(app_args)
    }
}

/// Print help information
fn print_help() {
    println!("{} - {}", mosaicsh::NAME, mosaicsh::DESCRIPTION);
    println!();
    println!("USAGE:");
    println!("    mosaicsh [OPTIONS] [SCRIPT]");
    println!();
    println!("OPTIONS:");
    println!("    -c <LINE>              Run one line and exit with its status");
    println!("        --config <PATH>    Path to configuration file");
    println!("    -d, --debug            Enable debug logging");
    println!("        --norc             Do not run the startup file");
    println!("    -h, --help             Print this help message");
    println!("    -v, --version          Print version information");
    println!();
    println!("CONFIGURATION:");
    println!("    mosaicsh looks for configuration files in the following order:");
    println!("    1. Path specified with --config");
    println!("    2. $MOSAICSH_CONFIG");
    println!("    3. $XDG_CONFIG_HOME/mosaicsh/config.toml (or config.json)");
    println!("    4. ~/.mosaicsh.toml (or ~/.mosaicsh.json)");
    println!("    5. Built-in defaults");
    println!();
    println!("ENVIRONMENT:");
    println!("    MOSAICSH_CONFIG    Path to configuration file");
    println!("    MOSAICSH_LOG       Log filter (error, warn, info, debug, trace)");
}

/// Install the stderr subscriber; `MOSAICSH_LOG` wins over `--debug`, which
/// wins over the configured level
fn init_logging(args: &AppArgs, config: &Config) {
    let directive = match env::var(LOG_ENV_VAR) {
        Ok(value) if !value.trim().is_empty() => value,
        _ if args.debug => "debug".to_string(),
        _ => config.logging.level.clone(),
    };

    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|e| {
        eprintln!("mosaicsh: invalid log filter '{}': {}", directive, e);
        EnvFilter::new("warn")
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

fn load_configuration(args: &AppArgs) -> anyhow::Result<Config> {
    match &args.config_path {
        Some(path) => ConfigLoader::load_from_path(path)
            .with_context(|| format!("cannot use configuration {}", path.display())),
        None => Ok(ConfigLoader::new().load()?),
    }
}

/// Run the startup file, if there is one
fn run_rc_file(shell: &mut Shell, config: &Config) {
    let Some(path) = config.shell.rc_path() else {
        return;
    };
    if !path.is_file() {
        debug!("no startup file at {}", path.display());
        return;
    }
    if let Err(e) = shell.run_file(&path) {
        shell.notice(&format!("mosaicsh: {}: {}", path.display(), e));
    }
}

/// Read-eval loop; returns the exit code
fn run_interactive(shell: &mut Shell, config: &Config) -> anyhow::Result<i32> {
    if let Err(e) = platform::install_interrupt_guard() {
        warn!("{}", e);
    }

    let mut editor = DefaultEditor::new().map_err(mosaicsh::Error::from)?;
    for entry in shell.session().history.entries() {
        if let Err(e) = editor.add_history_entry(entry.as_str()) {
            debug!("editor history: {}", e);
        }
    }

    let formatter = PromptFormatter::new(config.shell.prompt.clone());
    loop {
        shell.notify_jobs();
        match editor.readline(&shell.prompt(&formatter)) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    if let Err(e) = editor.add_history_entry(line.as_str()) {
                        debug!("editor history: {}", e);
                    }
                    shell.session_mut().history.add(&line);
                }
                shell.run_line(&line);
                if let Some(code) = shell.exit_requested() {
                    return Ok(code);
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => return Ok(shell.session().last_status),
            Err(e) => return Err(mosaicsh::Error::from(e).into()),
        }
    }
}

fn run(args: AppArgs) -> anyhow::Result<i32> {
    let config = load_configuration(&args)?;
    init_logging(&args, &config);
    info!("starting {} v{}", mosaicsh::NAME, mosaicsh::VERSION);

    let mut shell = Shell::new(create_session(&config));

    let code = if let Some(line) = &args.command {
        let status = shell.run_line(line);
        shell.exit_requested().unwrap_or(status)
    } else if let Some(script) = &args.script {
        let status = shell
            .run_file(script)
            .with_context(|| format!("cannot run {}", script.display()))?;
        shell.exit_requested().unwrap_or(status)
    } else if io::stdin().is_terminal() {
        if !args.norc {
            run_rc_file(&mut shell, &config);
        }
        match shell.exit_requested() {
            Some(code) => code,
            None => run_interactive(&mut shell, &config)?,
        }
    } else {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .context("cannot read standard input")?;
        let status = shell.run_script(&input);
        shell.exit_requested().unwrap_or(status)
    };

    if let Err(e) = shell.teardown() {
        shell.notice(&format!("mosaicsh: {}", e));
    }
    Ok(code)
}

fn main() {
    let args = AppArgs::parse().unwrap_or_else(|e| {
        eprintln!("mosaicsh: {}", e);
        eprintln!("Try 'mosaicsh --help' for more information.");
        process::exit(2);
    });

    match run(args) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("mosaicsh: {:#}", e);
            process::exit(1);
        }
    }
}
