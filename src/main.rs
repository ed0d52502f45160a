use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io;
use wordle_assistant::cli::{CliInterface, parse_cli};
use wordle_assistant::game_loop;
use wordle_assistant::logging::init_logging;
use wordle_assistant::tui::TuiInterface;
use wordle_assistant::wordbank::{WordSource, load_valid_words};

fn main() {
    let cli = parse_cli();
    match init_logging(cli.verbose, cli.tui) {
        Ok(Some(path)) => println!("Logging to {}", path.display()),
        Ok(None) => {}
        Err(e) => eprintln!("Failed to set up logging: {e}"),
    }

    let config = cli.config();
    let source = cli.word_source();
    log::info!("Starting with {config:?}, word source {source:?}");
    if let WordSource::Url(url) = &source {
        println!("Fetching word list from {url} ...");
    }
    let valid_words = load_valid_words(&source, config.word_length);

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    if cli.tui {
        match TuiInterface::new(&config) {
            Ok(mut interface) => {
                game_loop(&config, &valid_words, &mut interface, &mut rng);
            }
            Err(e) => {
                eprintln!("Failed to start the terminal interface: {e}");
                std::process::exit(1);
            }
        }
    } else {
        let stdin = io::stdin();
        let mut interface = CliInterface::new(stdin.lock(), &config);
        game_loop(&config, &valid_words, &mut interface, &mut rng);
    }
}
