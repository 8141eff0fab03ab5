//! launchrank: interactive ranking shell
//!
//! Reads queries and commands from stdin, one per line, and keeps the
//! learning register saved in the background.

use anyhow::{bail, Result};
use launchrank::{
    config,
    shell::{Flow, Shell},
    Session, SessionEvent,
};
use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, level_filters::LevelFilter};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// What the command line asked for
enum Invocation {
    Run { config: Option<PathBuf> },
    Help,
    Version,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config_path = match parse_args(std::env::args().skip(1))? {
        Invocation::Run { config } => config,
        Invocation::Help => {
            print_usage();
            return Ok(());
        }
        Invocation::Version => {
            println!("launchrank {}", launchrank::VERSION);
            return Ok(());
        }
    };

    // Load configuration
    let settings = config::load(config_path.as_deref())?;

    // Initialize logging
    init_tracing(settings.general.debug);
    info!("Starting launchrank v{}", launchrank::VERSION);

    let (tx, mut events) = mpsc::unbounded_channel();
    let session = Session::open(&settings).with_events(tx);
    info!(
        "Register at {} ({} entries)",
        session.register_path().display(),
        session.register().len()
    );

    let interactive = std::io::stdin().is_terminal();
    let mut shell = Shell::new(session, settings.search.max_results)
        .with_color(std::io::stdout().is_terminal());
    let mut autosave = autosave_interval(settings.register.save_interval_secs);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = std::io::stdout();

    if interactive {
        prompt(&mut stdout)?;
    }
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if on_line(&mut shell, &line, &mut stdout, interactive)? == Flow::Quit {
                    break;
                }
            }
            _ = next_tick(&mut autosave) => {
                if let Err(e) = shell.session_mut().save_if_dirty() {
                    debug!("Autosave skipped: {}", e);
                }
            }
            Some(event) = events.recv() => log_event(&event),
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    // Drain whatever the last command produced
    while let Ok(event) = events.try_recv() {
        log_event(&event);
    }

    shell.session_mut().save()?;
    info!("Bye");
    Ok(())
}

fn prompt<W: Write>(out: &mut W) -> std::io::Result<()> {
    write!(out, "> ")?;
    out.flush()
}

/// Handle one stdin line; the prompt is reprinted here and only here
fn on_line<W: Write>(
    shell: &mut Shell,
    line: &str,
    out: &mut W,
    interactive: bool,
) -> std::io::Result<Flow> {
    let flow = shell.handle(line, out)?;
    if flow == Flow::Continue && interactive {
        prompt(out)?;
    } else {
        out.flush()?;
    }
    Ok(flow)
}

fn init_tracing(debug: bool) {
    let level = if debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("launchrank: logging already initialized");
    }
}

fn autosave_interval(secs: u64) -> Option<Interval> {
    if secs == 0 {
        return None;
    }
    let period = Duration::from_secs(secs);
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    Some(interval)
}

/// Next autosave tick, or never when autosave is off
async fn next_tick(autosave: &mut Option<Interval>) {
    match autosave {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

fn log_event(event: &SessionEvent) {
    match event {
        SessionEvent::Saved { path, entries } => {
            debug!("Saved {} entries to {}", entries, path.display())
        }
        SessionEvent::SaveFailed { path, error } => {
            debug!("Save to {} failed: {}", path.display(), error)
        }
        other => debug!("{:?}", other),
    }
}

fn parse_args<I: Iterator<Item = String>>(mut args: I) -> Result<Invocation> {
    let mut config = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-c" | "--config" => match args.next() {
                Some(path) => config = Some(PathBuf::from(path)),
                None => bail!("{} needs a file argument", arg),
            },
            "-h" | "--help" => return Ok(Invocation::Help),
            "-V" | "--version" => return Ok(Invocation::Version),
            other => bail!("unexpected argument {:?} (see --help)", other),
        }
    }
    Ok(Invocation::Run { config })
}

/// Print usage information
fn print_usage() {
    println!(
        r#"
launchrank v{}
Fuzzy, learning launcher ranking in your terminal

USAGE:
    launchrank [OPTIONS]

OPTIONS:
    -c, --config <FILE>    Path to configuration file
    -h, --help             Print help information
    -V, --version          Print version information

COMMANDS (stdin):
    <text>                 Rank everything against <text>
    :pick N / :do N        Choose a row / run an action on it
    :fav N                 Toggle a favorite
    :save, :rescan, :quit

ENVIRONMENT VARIABLES:
    LAUNCHRANK_SETTINGS_PATH   Path to settings.yml
    LAUNCHRANK_DEBUG           Enable debug logging (true/false)
    LAUNCHRANK_REGISTER_PATH   Learning register file
    LAUNCHRANK_SAVE_INTERVAL   Seconds between autosaves (0 disables)
"#,
        launchrank::VERSION
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use launchrank::learn::LearningRegister;
    use launchrank::sources::SourceRegistry;

    fn shell(dir: &tempfile::TempDir) -> Shell {
        let session = Session::new(
            LearningRegister::new(),
            SourceRegistry::new(),
            dir.path().join("r.json"),
        );
        Shell::new(session, 5)
    }

    #[test]
    fn test_one_prompt_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let mut shell = shell(&dir);
        let mut out = Vec::new();

        assert_eq!(on_line(&mut shell, "term", &mut out, true).unwrap(), Flow::Continue);
        assert_eq!(on_line(&mut shell, ":help", &mut out, true).unwrap(), Flow::Continue);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("> ").count(), 2);
        assert!(text.ends_with("> "));
    }

    #[test]
    fn test_no_prompt_when_piped_or_quitting() {
        let dir = tempfile::tempdir().unwrap();
        let mut shell = shell(&dir);
        let mut out = Vec::new();

        on_line(&mut shell, "term", &mut out, false).unwrap();
        assert_eq!(on_line(&mut shell, ":quit", &mut out, true).unwrap(), Flow::Quit);
        assert!(!String::from_utf8(out).unwrap().contains("> "));
    }

    #[test]
    fn test_parse_args() {
        let args = |list: &[&str]| parse_args(list.iter().map(|s| s.to_string()));
        assert!(matches!(
            args(&["-c", "x.yml"]).unwrap(),
            Invocation::Run { config: Some(p) } if p == PathBuf::from("x.yml")
        ));
        assert!(matches!(args(&["-V"]).unwrap(), Invocation::Version));
        assert!(args(&["-c"]).is_err());
        assert!(args(&["--bogus"]).is_err());
    }
}
