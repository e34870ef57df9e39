use std::error::Error;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use coup_engine::{Game, GameConfig, Move, Target};

const MAX_MOVES: usize = 2000;

/// Someone who owes a move, picked at random, playing a random legal move.
fn random_move(game: &Game, rng: &mut impl Rng) -> Option<(String, Move, Option<Target>)> {
    let waiting: Vec<(&str, Vec<Move>)> = game.players()
        .iter()
        .filter_map(|player| {
            let moves = game.legal_moves(player.name()).ok()?;
            (!moves.is_empty()).then_some((player.name(), moves))
        })
        .collect();

    let (name, moves) = waiting.choose(rng)?;
    let mv = *moves.choose(rng)?;

    let target = if mv.needs_player_target() {
        let opponents: Vec<&str> = game.players()
            .iter()
            .filter(|player| player.is_in_game() && player.name() != *name)
            .map(|player| player.name())
            .collect();
        Some(Target::Player(opponents.choose(rng)?.to_string()))
    } else if mv.needs_card_target() {
        let hand = game.player(name).ok()?.influence();
        Some(Target::Card(*hand.choose(rng)?))
    } else {
        None
    };

    Some((name.to_string(), mv, target))
}

fn main() -> Result<(), Box<dyn Error>> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut args = std::env::args().skip(1);
    let num_players: usize = args.next().map(|arg| arg.parse()).transpose()?.unwrap_or(4);
    let seed: u64 = match args.next() {
        Some(arg) => arg.parse()?,
        None => rand::thread_rng().gen(),
    };

    let mut game = Game::new("self-play", GameConfig::default().with_seed(seed));
    for idx in 0..num_players {
        game.add_player(&format!("player{idx}"), None)?;
    }
    game.start()?;

    let mut rng = Pcg64::seed_from_u64(seed);
    for _ in 0..MAX_MOVES {
        if game.is_finished() {
            break;
        }

        let (name, mv, target) = random_move(&game, &mut rng).ok_or("nobody left to move")?;
        game.apply_move(&name, mv, target)?;
    }

    match game.get_winner() {
        Some(winner) => info!(seed, moves = game.log().len(), "game over, {} wins", winner.name()),
        None => info!(seed, "no winner after {MAX_MOVES} moves"),
    }

    game.log().write_csv(std::io::stdout())?;
    Ok(())
}
