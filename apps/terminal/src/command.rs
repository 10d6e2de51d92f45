//! # Command Parsing
//!
//! One input line, one [`Command`]. Pure: no store access, no I/O.
//!
//! ```text
//! "add 4"          → Command::Add(4)
//! "remove 1"       → Command::Remove(0)        (cart positions are 1-based)
//! "sort price-asc" → Command::Sort(Some(SortKey::PriceAsc))
//! "category all"   → Command::Category(CategoryFilter::All)
//! "search mono"    → Command::Search("mono")
//! ```

use cyber_core::{CategoryFilter, SortKey};
use cyber_session::Credentials;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Signup(Credentials),
    Login(Credentials),
    Logout,
    Items,
    /// Empty text clears the search.
    Search(String),
    /// `None` restores catalog order.
    Sort(Option<SortKey>),
    Category(CategoryFilter),
    Add(u32),
    /// Zero-based cart index.
    Remove(usize),
    Cart,
    Clear,
    Checkout,
    Fav(u32),
    History,
    Whoami,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty input")]
    Empty,

    #[error("unknown command '{0}'. type 'help'")]
    UnknownCommand(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("invalid {what}: '{value}'")]
    InvalidArgument { what: &'static str, value: String },
}

impl Command {
    pub fn parse(line: &str) -> Result<Command, ParseError> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        if verb.is_empty() {
            return Err(ParseError::Empty);
        }

        let args: Vec<&str> = rest.split_whitespace().collect();

        match verb.to_ascii_lowercase().as_str() {
            "signup" => credentials(&args, "signup <user> <pass>").map(Command::Signup),
            "login" => credentials(&args, "login <user> <pass>").map(Command::Login),
            "logout" => no_args(&args, "logout", Command::Logout),
            "items" | "ls" => no_args(&args, "items", Command::Items),
            "search" => Ok(Command::Search(rest.to_string())),
            "sort" => {
                let key = single(&args, "sort <price-asc|price-desc|name|none>")?;
                if key.eq_ignore_ascii_case("none") {
                    return Ok(Command::Sort(None));
                }
                key.parse::<SortKey>()
                    .map(|k| Command::Sort(Some(k)))
                    .map_err(|_| invalid("sort key", key))
            }
            "category" => {
                let value = single(&args, "category <all|weapon|implant|gear>")?;
                value
                    .parse::<CategoryFilter>()
                    .map(Command::Category)
                    .map_err(|_| invalid("category", value))
            }
            "add" => item_id(&args, "add <id>").map(Command::Add),
            "fav" => item_id(&args, "fav <id>").map(Command::Fav),
            "remove" | "rm" => {
                let value = single(&args, "remove <position>")?;
                match value.parse::<usize>() {
                    Ok(position) if position >= 1 => Ok(Command::Remove(position - 1)),
                    _ => Err(invalid("cart position", value)),
                }
            }
            "cart" => no_args(&args, "cart", Command::Cart),
            "clear" => no_args(&args, "clear", Command::Clear),
            "checkout" | "buy" => no_args(&args, "checkout", Command::Checkout),
            "history" => no_args(&args, "history", Command::History),
            "whoami" => no_args(&args, "whoami", Command::Whoami),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(ParseError::UnknownCommand(other.to_string())),
        }
    }
}

fn invalid(what: &'static str, value: &str) -> ParseError {
    ParseError::InvalidArgument {
        what,
        value: value.to_string(),
    }
}

fn no_args(args: &[&str], usage: &'static str, command: Command) -> Result<Command, ParseError> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(ParseError::Usage(usage))
    }
}

fn single<'a>(args: &[&'a str], usage: &'static str) -> Result<&'a str, ParseError> {
    match args {
        [value] => Ok(*value),
        _ => Err(ParseError::Usage(usage)),
    }
}

fn item_id(args: &[&str], usage: &'static str) -> Result<u32, ParseError> {
    let value = single(args, usage)?;
    value.parse::<u32>().map_err(|_| invalid("item id", value))
}

fn credentials(args: &[&str], usage: &'static str) -> Result<Credentials, ParseError> {
    match args {
        [username, password] => Ok(Credentials::new(*username, *password)),
        _ => Err(ParseError::Usage(usage)),
    }
}
