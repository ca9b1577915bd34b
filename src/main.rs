use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use clap::Parser;
use log::error;

use cnfpad_lib::config::Config;
use cnfpad_lib::driver::{Driver, Message, Presenter};
use cnfpad_lib::service::HttpTransport;
use cnfpad_lib::session::Event;
use cnfpad_lib::translator;

const HELP: &str = "type clauses one per line (e.g. `1 -2 3`); commands: :solve :random :clear :show :quit";

#[derive(Parser)]
#[command(author, version, about = "Type CNF clauses, see the formula, ask a remote solver")]
struct Cli {
    /// Base address of the solving service.
    #[arg(long, value_name = "URL", conflicts_with = "local")]
    base_address: Option<String>,

    /// Talk to a service running on this machine.
    #[arg(long)]
    local: bool,

    /// Initial clauses, one per line.
    #[arg(short, long, value_name = "PATH")]
    input: Option<PathBuf>,
}

struct Terminal;

impl Presenter for Terminal {
    fn show_formula(&mut self, text: &str) {
        println!("formula: {text}");
    }

    fn show_result(&mut self, text: &str) {
        println!("{text}");
    }

    fn set_input(&mut self, text: &str) {
        println!("input:");
        for line in text.lines() {
            println!("  {line}");
        }
    }
}

fn parse_command(line: &str) -> Option<Message> {
    let line = line.trim();
    match line {
        "" => None,
        ":solve" => Some(Message::Session(Event::Solve)),
        ":random" => Some(Message::Session(Event::Random)),
        ":clear" => Some(Message::Session(Event::InputChanged(String::new()))),
        ":show" => Some(Message::Show),
        ":quit" | ":q" => Some(Message::Quit),
        _ if line.starts_with(':') => {
            println!("{HELP}");
            None
        },
        _ => Some(Message::Append(line.to_string())),
    }
}

/// Initial clauses from `path`; exchange documents are accepted too.
fn load_input(path: &Path) -> Result<String, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    translator::from_exchange_document(&text)
        .map_err(|e| format!("{}: {e}", path.display()))
}

fn main() {
    env_logger::builder()
        .format_timestamp(None)
        .format_module_path(false)
        .init();

    let cli = Cli::parse();

    let config = match (cli.base_address, cli.local) {
        (Some(address), _) => Config::new(address),
        (None, true) => Config::local(),
        (None, false) => Config::default(),
    };

    let initial = match cli.input.as_deref().map(load_input) {
        Some(Ok(raw)) => Some(raw),
        Some(Err(e)) => {
            error!("Error. {e}");
            std::process::exit(-1);
        },
        None => None,
    };

    println!("service: {}", config.base_address());
    println!("{HELP}");

    let mut driver = Driver::new(Arc::new(HttpTransport::new(config)), Terminal);
    let tx = driver.sender();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if let Some(message) = parse_command(&line) {
                if tx.send(message).is_err() {
                    return;
                }
            }
        }
        let _ = tx.send(Message::Quit);
    });

    // the probe is fire-and-forget, the loop does not wait for it
    let _probe = driver.startup("Frontend loaded", initial);
    driver.run();
}
