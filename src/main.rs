use std::{env, path::Path, process::exit};

use anyhow::Result;
use rand::{rngs::StdRng, SeedableRng};

use snake::config::Settings;
use snake::game::{Game, Outcome};
use snake::logging;
use snake::term::{CrosstermTerminal, Terminal};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        exit(1);
    }
}

fn run() -> Result<()> {
    let settings = Settings::from_env()?;
    if let Some(path) = env::var_os("SNAKE_LOG") {
        logging::init(Path::new(&path))?;
    }

    let mut term = CrosstermTerminal::open()?;
    let res = play(&settings, &mut term);

    // Stray keystrokes must not leak to the shell
    let cleanup = term.drain_input().and_then(|_| term.restore());
    let outcome = res?;
    cleanup?;

    if let Some(line) = outcome.exit_line() {
        println!("{}", line);
    }
    Ok(())
}

fn play(settings: &Settings, term: &mut CrosstermTerminal) -> Result<Outcome> {
    let rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut game = Game::new(settings, term, rng)?;
    Ok(game.run()?)
}
