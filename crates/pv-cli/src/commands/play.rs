use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use colored::Colorize;
use pv_dialogue::{DialogueError, EndReason, EngineState, SessionHost, SessionId};

const LISTENER: &str = "player";

pub fn run(path: &Path, script: bool) -> Result<(), String> {
    let document = Arc::new(super::load_document(path)?);
    let speaker = super::display_title(&document, path);

    let mut host = SessionHost::new();
    let id = host
        .start(speaker, LISTENER, document)
        .map_err(|e| e.to_string())?;

    let stdin = io::stdin();
    let reason = converse(&mut host, id, &mut stdin.lock(), script)?;

    println!();
    println!("  {}", format!("[conversation over: {reason}]").dimmed());
    Ok(())
}

/// Drive one session with replies read from `input` until it ends.
fn converse(
    host: &mut SessionHost,
    id: SessionId,
    input: &mut impl BufRead,
    script: bool,
) -> Result<EndReason, String> {
    loop {
        let session = host.session(id).map_err(|e| e.to_string())?;
        match session.state() {
            EngineState::Ended(reason) => return Ok(reason),
            EngineState::AwaitingAcknowledgement => {
                if let Some(engine) = session.engine() {
                    say(engine.speaker(), engine.speech());
                }
                if !script {
                    prompt("  (Enter to continue) ");
                    if read_line(input)?.is_none() {
                        return abort(host, id);
                    }
                }
                host.acknowledge(id).map_err(|e| e.to_string())?;
            }
            EngineState::AwaitingChoice => {
                let choices = session.choices();
                for (i, choice) in choices.iter().enumerate() {
                    println!("  {} {}", format!("{}.", i + 1).yellow(), choice.text);
                }
                let available = choices.len();

                prompt("> ");
                let Some(line) = read_line(input)? else {
                    return abort(host, id);
                };
                if script {
                    println!("{line}");
                }
                if matches!(line.as_str(), "q" | "quit") {
                    return abort(host, id);
                }

                let picked = line.parse::<usize>().ok().and_then(|n| n.checked_sub(1));
                let Some(index) = picked else {
                    println!("  Enter a number between 1 and {available}, or q to leave.");
                    continue;
                };
                match host.choose(id, index) {
                    Ok(_) => println!(),
                    Err(DialogueError::InvalidChoice { available, .. }) => {
                        println!("  No such reply. Pick 1 to {available}.");
                    }
                    Err(e) => return Err(e.to_string()),
                }
            }
        }
    }
}

fn abort(host: &mut SessionHost, id: SessionId) -> Result<EndReason, String> {
    host.end(id).map_err(|e| e.to_string())
}

fn say(speaker: Option<&str>, speech: &str) {
    match speaker {
        Some(name) => println!("  {} {speech}", format!("{name}:").cyan().bold()),
        None => println!("  {speech}"),
    }
}

fn prompt(text: &str) {
    print!("{text}");
    io::stdout().flush().ok();
}

/// Next trimmed line, or `None` at end of input.
fn read_line(input: &mut impl BufRead) -> Result<Option<String>, String> {
    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .map_err(|e| format!("cannot read input: {e}"))?;
    if read == 0 {
        Ok(None)
    } else {
        Ok(Some(line.trim().to_string()))
    }
}
