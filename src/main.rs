use std::io::{self, Write};

use anyhow::{bail, Context};
use clap::Parser;

use minimax_rs::{Error, Game, Move, Outcome, Search, Side, SIZE};

#[derive(Parser)]
#[command(author, version, about = "Play noughts and crosses against a perfect opponent", long_about = None)]
struct Args {
    /// Let the engine open the game
    #[arg(long)]
    ai_first: bool,
    /// Search every node instead of pruning with alpha-beta
    #[arg(long)]
    no_pruning: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let first = if args.ai_first {
        Side::Maximizer
    } else {
        Side::Minimizer
    };
    let mut game = Game::new(first);
    let mut search = Search::with_pruning(!args.no_pruning);

    println!("You are '{}', the engine is '{}'", Side::Minimizer.symbol(), Side::Maximizer.symbol());
    println!("Enter moves as 'row col', each between 1 and {}", SIZE);

    while !game.done() {
        println!("\n{}", game.grid());
        match game.to_move() {
            Side::Minimizer => loop {
                let mv = read_move()?;
                match game.step(mv) {
                    Ok(_) => break,
                    Err(Error::Occupied { .. }) => println!("Cell already occupied! Try again."),
                    Err(Error::OutOfBounds { .. }) => {
                        println!("Numbers must be between 1 and {}.", SIZE)
                    }
                    Err(e) => return Err(e.into()),
                }
            },
            Side::Maximizer => {
                println!("Engine is thinking...");
                let mv = game.ai_move(&mut search)?;
                println!("Engine plays at ({}, {})", mv.row + 1, mv.col + 1);
            }
        }
    }

    println!("\n{}", game.grid());
    match game.outcome() {
        Outcome::MaximizerWins => println!("{} wins!", Side::Maximizer.symbol()),
        Outcome::MinimizerWins => println!("{} wins!", Side::Minimizer.symbol()),
        Outcome::Draw => println!("It's a tie!"),
        Outcome::NotTerminal => bail!("game loop ended before the game did"),
    }

    Ok(())
}

/// Prompts until the human enters two numbers, converting them to a 0-based
/// move. Bounds and occupancy are checked by the game.
fn read_move() -> anyhow::Result<Move> {
    loop {
        print!("Your move: ");
        io::stdout().flush().context("failed to flush stdout")?;

        let mut input = String::new();
        let read = io::stdin()
            .read_line(&mut input)
            .context("failed to read move from stdin")?;
        if read == 0 {
            bail!("stdin closed before the game finished");
        }

        let numbers: Result<Vec<usize>, _> = input.split_whitespace().map(str::parse).collect();
        match numbers.as_deref() {
            Ok(&[row, col]) if row >= 1 && col >= 1 => return Ok(Move::new(row - 1, col - 1)),
            Ok(&[_, _]) => println!("Numbers must be between 1 and {}.", SIZE),
            _ => println!("Invalid input! Enter a row and a column."),
        }
    }
}
