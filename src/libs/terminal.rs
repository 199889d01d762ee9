use thiserror::Error;

use crate::structs::view::ResultCard;

use super::sort::SortMode;

pub const HELP: &str = "These commands are supported:
  <text>         search games by title (at least 3 characters)
  :sort <mode>   order results by priceAsc, priceDesc, alphabetical or anything else for API order
  :open <n>      show the deals of result n
  :close         close the game detail
  :show          show results and detail again
  :help          list these options
  :quit          exit";

#[derive(Error, Debug, PartialEq)]
pub enum CommandError {
    #[error("Unknown command :{0}, type :help for the list")]
    UnknownCommand(String),

    #[error("Expected a result number, got {0:?}")]
    InvalidIndex(String),
}

/// One line of terminal input. Plain text is a change of the search field.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Input(String),
    Sort(SortMode),
    Open(usize),
    Close,
    Show,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Command, CommandError> {
        let Some(command) = line.trim_start().strip_prefix(':') else {
            return Ok(Command::Input(line.to_string()));
        };

        let (name, argument) = match command.trim().split_once(char::is_whitespace) {
            Some((name, argument)) => (name, argument.trim()),
            None => (command.trim(), ""),
        };

        match name {
            "sort" => Ok(Command::Sort(SortMode::from_value(argument))),
            "open" => match argument.parse::<usize>() {
                Ok(n) if n > 0 => Ok(Command::Open(n - 1)),
                _ => Err(CommandError::InvalidIndex(argument.to_string())),
            },
            "close" => Ok(Command::Close),
            "show" => Ok(Command::Show),
            "help" => Ok(Command::Help),
            "quit" | "q" => Ok(Command::Quit),
            other => Err(CommandError::UnknownCommand(other.to_string())),
        }
    }
}

pub fn format_results(results: &[ResultCard]) -> String {
    if results.is_empty() {
        return "No results".to_string();
    }

    results
        .iter()
        .enumerate()
        .map(|(i, card)| format!("{:>3}. {}", i + 1, card))
        .collect::<Vec<String>>()
        .join("\n")
}
