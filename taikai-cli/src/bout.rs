use taikai_core::{BoutDuration, Clock, Scoreboard, Side, MAX_PENALTIES};
use taikai_live::{Bout, BoutCommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::config::Config;
use crate::Error;

const HELP: &str = "\
Commands:
  start | stop | <empty line>   start or stop the clock
  reset                         reset the clock
  a+ | a-                       add or remove a point of AKA
  ap+ | ap-                     add or remove a penalty of AKA
  as                            toggle the advantage of AKA
  b+ | b- | bp+ | bp- | bs      the same for AO
  show                          print the scoreboard
  quit                          leave";

pub async fn run(config: &Config, duration: BoutDuration) -> Result<(), Error> {
    let bout = Bout::new(duration, config.tick());

    // Announces the end of the bout while waiting for input.
    let mut rx = bout.clock().watch();
    let announcer = tokio::task::spawn(async move {
        let mut announced = false;

        while rx.changed().await.is_ok() {
            let expired = rx.borrow().remaining().is_zero();
            if expired && !announced {
                println!("Time is up");
            }
            announced = expired;
        }
    });

    println!("{}", HELP);
    print_bout(&bout);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "quit" | "exit" => break,
            "show" => (),
            "help" => {
                println!("{}", HELP);
                continue;
            }
            input => match input.parse::<BoutCommand>().and_then(|cmd| bout.apply(cmd)) {
                Ok(()) => (),
                Err(err) => {
                    println!("{}", err);
                    continue;
                }
            },
        }

        print_bout(&bout);
    }

    bout.clock().stop();
    announcer.abort();
    Ok(())
}

fn print_bout(bout: &Bout) {
    let (clock, board) = bout.snapshot();

    print_clock(&clock);
    print_side(&board, Side::A, "AKA");
    print_side(&board, Side::B, "AO ");
}

fn print_clock(clock: &Clock) {
    let state = if clock.is_running() { "running" } else { "stopped" };
    println!("  {} ({})", clock.remaining(), state);
}

fn print_side(board: &Scoreboard, side: Side, label: &str) {
    println!(
        "  {} {:>3}  penalties {}/{}{}",
        label,
        board.points(side),
        board.penalties(side),
        MAX_PENALTIES,
        if board.has_advantage(side) {
            "  senshu"
        } else {
            ""
        }
    );
}
