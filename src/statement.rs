//! Turns one line of input into a meta-command or a statement.

use crate::error::PrepareError;
use crate::row::Row;

// Non-SQL statements like .exit are called “meta-commands”.
#[derive(Debug, PartialEq, Eq)]
pub enum MetaCommand {
    Exit,
    Unrecognized,
}

impl MetaCommand {
    /// Returns `None` when `input` is not a meta-command at all.
    pub fn parse(input: &str) -> Option<MetaCommand> {
        match input {
            ".exit" => Some(MetaCommand::Exit),
            _ if input.starts_with('.') => Some(MetaCommand::Unrecognized),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Statement {
    Insert(Row),
    Select,
}

impl Statement {
    pub fn prepare(input: &str) -> Result<Statement, PrepareError> {
        let mut tokens = input.split_whitespace();

        match tokens.next() {
            Some("insert") => {
                let args: Vec<&str> = tokens.collect();
                let [id, username, email] = args[..] else {
                    return Err(PrepareError::SyntaxError);
                };
                Ok(Statement::Insert(Row::new(parse_id(id)?, username, email)?))
            }
            Some("select") => Ok(Statement::Select),
            _ => Err(PrepareError::Unrecognized(input.to_string())),
        }
    }
}

fn parse_id(token: &str) -> Result<u32, PrepareError> {
    let id: i64 = token.parse().map_err(|_| PrepareError::SyntaxError)?;
    if id < 0 {
        return Err(PrepareError::NegativeId);
    }
    u32::try_from(id).map_err(|_| PrepareError::SyntaxError)
}
