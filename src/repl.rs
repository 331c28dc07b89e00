//! The prompt loop: reads commands, runs them against a table and writes
//! the results.

use std::io::{BufRead, Write};

use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{DbError, PrepareError, Result};
use crate::statement::{MetaCommand, Statement};
use crate::table::Table;

/// Runs until `.exit` or end of input. Only failures writing `output` or
/// reading `input` end the loop early; statement errors are reported inline.
pub fn run<R: BufRead, W: Write>(
    mut input: R,
    output: &mut W,
    table: &mut Table,
    config: &Config,
) -> Result<()> {
    let mut buffer = Vec::new();

    loop {
        write!(output, "{}", config.prompt)?;
        output.flush()?;

        buffer.clear();
        if input.read_until(b'\n', &mut buffer)? == 0 {
            break;
        }

        // A line that is not UTF-8 cannot hold a valid statement.
        let Ok(line) = std::str::from_utf8(&buffer) else {
            debug!(bytes = buffer.len(), "input line is not valid UTF-8");
            writeln!(output, "{}", PrepareError::SyntaxError)?;
            continue;
        };

        let command = line.trim();
        if command.is_empty() {
            continue;
        }

        match MetaCommand::parse(command) {
            Some(MetaCommand::Exit) => break,
            Some(MetaCommand::Unrecognized) => {
                writeln!(output, "Unrecognized command '{command}'.")?;
                continue;
            }
            None => {}
        }

        match Statement::prepare(command) {
            Ok(statement) => execute(&statement, table, output)?,
            Err(e) => writeln!(output, "{e}")?,
        }
    }

    output.flush()?;
    Ok(())
}

fn execute<W: Write>(statement: &Statement, table: &mut Table, output: &mut W) -> Result<()> {
    match statement {
        Statement::Insert(row) => match table.insert_row(row) {
            Ok(()) => writeln!(output, "Executed.")?,
            Err(DbError::TableFull) => {
                debug!(id = row.id(), "insert rejected, table full");
                writeln!(output, "Error: Table full.")?;
            }
            Err(e) => {
                warn!(error = %e, "insert failed");
                writeln!(output, "Error: {e}")?;
            }
        },
        Statement::Select => {
            for (i, row) in table.rows().enumerate() {
                match row {
                    Ok(row) => writeln!(output, "{row}")?,
                    Err(e) => {
                        warn!(row = i, error = %e, "row read failed");
                        writeln!(output, "Error reading row {i}: {e}")?;
                    }
                }
            }
            writeln!(output, "Executed.")?;
        }
    }
    Ok(())
}
