//! Line-oriented interactive shell over a [`Session`]
//!
//! Plain text runs a search; lines starting with `:` are commands acting
//! on the rows printed by the last search or action listing.

use crate::actions::Action;
use crate::objects::ObjectRef;
use crate::relevance::format_common_substrings;
use crate::results::Rankable;
use crate::session::Session;
use std::io::{self, Write};
use std::str::FromStr;
use thiserror::Error;

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Query(String),
    Pick(usize),
    Do(usize),
    Fav(usize),
    Save,
    Rescan,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command :{0} (try :help)")]
    Unknown(String),
    #[error(":{0} needs a row number")]
    MissingRow(String),
    #[error("invalid row number {0:?}")]
    InvalidRow(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let Some(rest) = line.strip_prefix(':') else {
            return Ok(Command::Query(line.to_string()));
        };

        let mut parts = rest.split_whitespace();
        let name = parts.next().unwrap_or_default().to_lowercase();
        let row = |name: &str, arg: Option<&str>| -> Result<usize, CommandError> {
            let arg = arg.ok_or_else(|| CommandError::MissingRow(name.to_string()))?;
            match arg.parse::<usize>() {
                Ok(n) if n > 0 => Ok(n),
                _ => Err(CommandError::InvalidRow(arg.to_string())),
            }
        };

        match name.as_str() {
            "pick" | "p" => row(&name, parts.next()).map(Command::Pick),
            "do" | "d" => row(&name, parts.next()).map(Command::Do),
            "fav" | "f" => row(&name, parts.next()).map(Command::Fav),
            "save" => Ok(Command::Save),
            "rescan" => Ok(Command::Rescan),
            "help" | "h" | "?" => Ok(Command::Help),
            "quit" | "q" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Whether the input loop should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Shell {
    session: Session,
    max_results: usize,
    color: bool,
    key: String,
    rows: Vec<Rankable>,
    leaf: Option<ObjectRef>,
    actions: Vec<Rankable>,
}

impl Shell {
    pub fn new(session: Session, max_results: usize) -> Self {
        Self {
            session,
            max_results: max_results.max(1),
            color: false,
            key: String::new(),
            rows: Vec::new(),
            leaf: None,
            actions: Vec::new(),
        }
    }

    /// Highlight matches with ANSI bold instead of brackets
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Handle one input line, writing any output to `out`
    pub fn handle<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<Flow> {
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                writeln!(out, "{}", e)?;
                return Ok(Flow::Continue);
            }
        };

        match command {
            Command::Query(key) => self.query(key, out)?,
            Command::Pick(n) => self.pick(n, out)?,
            Command::Do(n) => self.perform(n, out)?,
            Command::Fav(n) => self.favorite(n, out)?,
            Command::Save => match self.session.save() {
                Ok(()) => writeln!(out, "saved to {}", self.session.register_path().display())?,
                Err(e) => writeln!(out, "save failed: {}", e)?,
            },
            Command::Rescan => {
                let total = self.session.rescan();
                writeln!(out, "indexed {} entries", total)?;
            }
            Command::Help => print_help(out)?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn query<W: Write>(&mut self, key: String, out: &mut W) -> io::Result<()> {
        let results = self.session.search(&key);
        self.rows = results.take(self.max_results);
        self.key = key;
        self.leaf = None;
        self.actions.clear();

        if self.rows.is_empty() {
            return writeln!(out, "no matches");
        }
        for (i, rb) in self.rows.iter().enumerate() {
            self.print_row(out, i + 1, rb, &self.key)?;
        }
        Ok(())
    }

    fn pick<W: Write>(&mut self, n: usize, out: &mut W) -> io::Result<()> {
        let Some(rb) = self.rows.get(n - 1) else {
            return writeln!(out, "no row {}", n);
        };
        let leaf = rb.object.clone();
        self.session.activate(leaf.as_ref(), &self.key);

        self.actions = self.session.rank_actions(leaf.as_ref(), "").matches().collect();
        writeln!(out, "{}:", leaf.display())?;
        for (i, action) in self.actions.iter().enumerate() {
            self.print_row(out, i + 1, action, "")?;
        }
        self.leaf = Some(leaf);
        Ok(())
    }

    fn perform<W: Write>(&mut self, n: usize, out: &mut W) -> io::Result<()> {
        let Some(leaf) = self.leaf.clone() else {
            return writeln!(out, "pick a row first");
        };
        let Some(action) = self.actions.get(n - 1).map(|rb| rb.object.clone()) else {
            return writeln!(out, "no action {}", n);
        };

        self.session.perform(action.as_ref(), leaf.as_ref(), "");
        match Action::from_key(&action.key()) {
            Some(builtin) => writeln!(out, "{}", builtin.describe(leaf.as_ref())),
            None => writeln!(out, "{}: {}", action.display(), leaf.display()),
        }
    }

    fn favorite<W: Write>(&mut self, n: usize, out: &mut W) -> io::Result<()> {
        let Some(rb) = self.rows.get(n - 1) else {
            return writeln!(out, "no row {}", n);
        };
        let object = rb.object.clone();
        if self.session.toggle_favorite(object.as_ref()) {
            writeln!(out, "* {} is now a favorite", object.display())
        } else {
            writeln!(out, "{} is no longer a favorite", object.display())
        }
    }

    fn print_row<W: Write>(&self, out: &mut W, n: usize, rb: &Rankable, key: &str) -> io::Result<()> {
        let name = if self.color {
            format_common_substrings(&rb.display, key, str::to_string, |s| {
                format!("\x1b[1m{}\x1b[0m", s)
            })
        } else {
            format_common_substrings(&rb.display, key, str::to_string, |s| format!("[{}]", s))
        };
        let star = if self.session.register().is_favorite(rb.object()) {
            "*"
        } else {
            " "
        };
        match rb.object.description() {
            Some(desc) => writeln!(out, "{:>3}.{}{:>7.1}  {}  ({})", n, star, rb.rank, name, desc),
            None => writeln!(out, "{:>3}.{}{:>7.1}  {}", n, star, rb.rank, name),
        }
    }
}

fn print_help<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "text       search for text")?;
    writeln!(out, ":pick N    choose row N and list its actions")?;
    writeln!(out, ":do N      run action N on the chosen row")?;
    writeln!(out, ":fav N     toggle row N as a favorite")?;
    writeln!(out, ":save      save the learning register")?;
    writeln!(out, ":rescan    re-read indexed directories")?;
    writeln!(out, ":quit      save and exit")
}
