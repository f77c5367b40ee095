//! Interactive console loop
//!
//! Reads commands from stdin and prints the board to stdout. Gateway round
//! trips run as [`InFlightCalls`] so the prompt stays live while the coach is
//! thinking: moves are refused with a busy message, but the board can be
//! inspected and pieces selected.

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use crate::game::{GameError, GameResult, Outcome};
use crate::input::commands::{parse_command, CommandError, ConsoleCommand, HELP};
use crate::networking::{InFlightCalls, SessionDriver};
use crate::ui::text::{describe_outcome, render_board, render_status, render_transcript};

/// Run until stdin closes or the user quits
pub async fn run_console(mut driver: SessionDriver) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut calls = InFlightCalls::new();

    println!("{HELP}\n");
    print_board(&driver);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("[CONSOLE] Input closed");
                    break;
                };

                match parse_command(&line) {
                    Ok(ConsoleCommand::Quit) => break,
                    Ok(ConsoleCommand::Help) => println!("{HELP}"),
                    Ok(ConsoleCommand::Board) => print_board(&driver),
                    Ok(ConsoleCommand::Transcript) => {
                        print!("{}", render_transcript(driver.session().chat()));
                    }
                    Ok(ConsoleCommand::Event(event)) => {
                        match driver.dispatch_detached(event, &mut calls) {
                            Ok(Some(outcome)) => report(&driver, Ok(outcome)),
                            Ok(None) => println!("Waiting for the coach..."),
                            Err(err) => report(&driver, Err(err)),
                        }
                    }
                    Err(CommandError::Empty) => {}
                    Err(err) => println!("{err}"),
                }
            }
            Some(completed) = calls.next(), if !calls.is_empty() => {
                let result = driver.complete(completed);
                report(&driver, result);
            }
        }
    }

    calls.abort_all();
    Ok(())
}

fn report(driver: &SessionDriver, result: GameResult<Outcome>) {
    match result {
        Ok(Outcome::ChatAnswered) => {
            if let Some(entry) = driver.session().chat().entries().last() {
                println!("coach: {}", entry.content);
            }
        }
        Ok(Outcome::Selection(_)) => print_board(driver),
        Ok(outcome) => {
            if let Some(line) = describe_outcome(&outcome) {
                println!("{line}");
            }
            if changes_board(&outcome) {
                print_board(driver);
            }
        }
        Err(GameError::Busy) => println!("{}", GameError::Busy.user_message()),
        Err(err) => println!("{}", err.user_message()),
    }
}

fn changes_board(outcome: &Outcome) -> bool {
    matches!(
        outcome,
        Outcome::Move(_)
            | Outcome::Undone(_)
            | Outcome::BatchCoached { .. }
            | Outcome::ModeChanged(_)
            | Outcome::GameStarted(_)
    )
}

fn print_board(driver: &SessionDriver) {
    let session = driver.session();
    let snapshot = session.snapshot();

    println!();
    print!(
        "{}",
        render_board(session.position().current(), &snapshot.highlight)
    );
    println!("{}", render_status(&snapshot));
    if !snapshot.feedback.is_empty() {
        println!("\n{}", snapshot.feedback);
    }
}
