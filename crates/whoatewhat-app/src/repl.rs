//! Line-oriented conversation loop.

use std::io::{BufRead, Write};

use whoatewhat_chat::{ChatError, SharedSession};
use whoatewhat_core::SessionState;

/// Meta-commands recognised at the prompt; anything else is an utterance.
#[derive(Debug, PartialEq, Eq)]
pub enum Command<'a> {
    Summary,
    Unassigned,
    People,
    Reset,
    Quit,
    Say(&'a str),
    Blank,
}

impl<'a> Command<'a> {
    pub fn parse(line: &'a str) -> Self {
        let trimmed = line.trim();
        match trimmed {
            "" => Command::Blank,
            ":summary" => Command::Summary,
            ":unassigned" => Command::Unassigned,
            ":people" => Command::People,
            ":reset" => Command::Reset,
            ":quit" | ":q" => Command::Quit,
            _ => Command::Say(trimmed),
        }
    }
}

/// Output options for the loop.
pub struct ReplOptions {
    pub json: bool,
}

/// Run the conversation until EOF or `:quit`.
pub fn run<R: BufRead, W: Write>(
    session: &SharedSession,
    input: R,
    out: &mut W,
    options: &ReplOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    if session.greet()? {
        if let Some(welcome) = session.snapshot()?.history().last() {
            writeln!(out, "{}", welcome.text)?;
        }
    }

    for line in input.lines() {
        let line = line?;
        match Command::parse(&line) {
            Command::Blank => continue,
            Command::Quit => break,
            Command::Summary => print_summary(session, out, options)?,
            Command::Unassigned => {
                let snapshot = session.snapshot()?;
                let names: Vec<String> = snapshot
                    .unassigned_items()
                    .iter()
                    .map(|item| item.name.clone())
                    .collect();
                if names.is_empty() {
                    writeln!(out, "Every item is assigned.")?;
                } else {
                    writeln!(out, "Unassigned: {}", names.join(", "))?;
                }
            }
            Command::People => {
                let snapshot = session.snapshot()?;
                for person in snapshot.people() {
                    let items: Vec<&str> = person
                        .assignments
                        .iter()
                        .map(|a| a.receipt_item.name.as_str())
                        .collect();
                    writeln!(out, "{}: {}", person.name, items.join(", "))?;
                }
            }
            Command::Reset => {
                session.reset()?;
                writeln!(out, "Session cleared. Load a new receipt to start again.")?;
            }
            Command::Say(text) => {
                if session.with_store(|store| store.state())? == SessionState::AwaitingReceipt {
                    writeln!(out, "No receipt loaded.")?;
                    continue;
                }
                match session.handle_message(text) {
                    Ok((reply, state)) => {
                        writeln!(out, "{}", reply)?;
                        if state == SessionState::Complete {
                            print_summary(session, out, options)?;
                        }
                    }
                    Err(ChatError::EmptyMessage) => continue,
                    Err(e) => return Err(e.into()),
                }
            }
        }
    }

    Ok(())
}

fn print_summary<W: Write>(
    session: &SharedSession,
    out: &mut W,
    options: &ReplOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    match session.summary()? {
        Some(summary) if options.json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;
        }
        Some(summary) => {
            writeln!(out, "{}", session.engine().responses().render_summary(&summary))?;
        }
        None => writeln!(out, "No receipt loaded.")?,
    }
    Ok(())
}
