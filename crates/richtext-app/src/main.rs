mod config;
mod repl;

use std::io::{self, BufRead as _, Write as _};

use anyhow::{Context as _, Result};
use log::{error, info, warn};
use richtext_core::{
    Command, FileStorage, Format, InputOutcome, Key, Mark, Point, Session, StorageResult,
    is_active, render_document,
};

use crate::config::AppConfig;
use crate::repl::{HELP, Line, parse_line};

fn main() -> Result<()> {
    env_logger::init();

    let config = AppConfig::from_env();
    let storage = config.open_storage()?;
    info!("document stored at {}", storage.path().display());

    let mut session = Session::open(storage, config.session);
    println!("{}", render_document(session.doc()));

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();
    loop {
        print!("> ");
        stdout.flush().context("flushing stdout")?;

        line.clear();
        if stdin.lock().read_line(&mut line).context("reading stdin")? == 0 {
            break;
        }

        match parse_line(&line) {
            Ok(Line::Quit) => break,
            Ok(parsed) => execute(&mut session, parsed)?,
            Err(err) => eprintln!("{err:#}"),
        }
    }

    info!("bye");
    Ok(())
}

fn execute(session: &mut Session<FileStorage>, line: Line) -> Result<()> {
    match line {
        Line::Empty | Line::Quit => {}
        Line::Show => {
            let value = serde_json::to_value(session.doc())?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Line::Render => println!("{}", render_document(session.doc())),
        Line::Status => print_status(session),
        Line::Select(selection) => {
            if let Err(err) = session.set_selection(selection) {
                eprintln!("{err}");
            }
        }
        Line::SelectAll => session.select_all(),
        Line::Deselect => session.deselect(),
        Line::Key(chord) => match session.handle_key(&chord) {
            Ok(InputOutcome::Handled(command)) => println!("{}", command.label()),
            // Unbound printable keys fall through to text input.
            Ok(InputOutcome::Ignored) => match chord.key {
                Key::Char(c) if !chord.ctrl && !chord.alt => {
                    report(session.insert_text(&c.to_string()))
                }
                _ => warn!("{chord} is not bound"),
            },
            Err(err) => error!("saving failed: {err}"),
        },
        Line::Click(button) => match session.activate(button) {
            Ok(_) => println!("{}", button.command().label()),
            Err(err) => error!("saving failed: {err}"),
        },
        Line::Type(text) => report(session.insert_text(&text)),
        Line::Run(command) => report(session.run(command)),
        Line::Help => print_help(session),
    }
    Ok(())
}

fn report(result: StorageResult<bool>) {
    match result {
        Ok(true) => {}
        Ok(false) => println!("nothing changed"),
        Err(err) => error!("saving failed: {err}"),
    }
}

fn print_status(session: &Session<FileStorage>) {
    let editor = session.editor();
    match editor.selection() {
        Some(selection) => println!(
            "selection {} -> {}",
            point_label(&selection.anchor),
            point_label(&selection.focus)
        ),
        None => println!("no selection"),
    }
    for mark in Mark::ALL {
        println!(
            "{:<10}{}",
            mark.as_str(),
            is_active(editor, Format::Mark(mark))
        );
    }
    println!("{:<10}{}", "code", is_active(editor, Format::CodeBlock));
}

fn point_label(point: &Point) -> String {
    let path: Vec<String> = point.path.iter().map(usize::to_string).collect();
    format!("{}:{}", path.join("."), point.offset)
}

fn print_help(session: &Session<FileStorage>) {
    println!("{HELP}");
    println!("\nkey bindings:");
    for binding in session.keymap().bindings() {
        println!("  {:<24} {}", binding.chord.to_string(), binding.command.label());
    }
    println!("\ncommand ids:");
    for command in Command::ALL {
        println!("  {:<24} {}", command.id(), command.label());
    }
}
