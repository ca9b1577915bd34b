use std::io::{self, Read};

use clap::Parser;
use log::{debug, error};

use cnfpad_lib::translator;

/// Offline conversions between the clause notation and the exchange format.
///
/// Reads clauses from stdin, one per line, and prints the exchange document.
#[derive(Parser)]
#[command(author, version)]
struct Cli {
    /// Print the readable formula instead.
    #[arg(long, conflicts_with_all = ["reverse", "random"])]
    render: bool,

    /// Read an exchange document and print clause notation.
    #[arg(long, conflicts_with = "random")]
    reverse: bool,

    /// Print a random instance: variables, clauses, literals per clause.
    #[arg(long, num_args = 3, value_names = ["VARS", "CLAUSES", "WIDTH"])]
    random: Option<Vec<usize>>,

    /// Seed for --random.
    #[arg(long, requires = "random")]
    seed: Option<u64>,
}

/// `--random` sizes as variables, clauses and literals per clause.
fn random_sizes(sizes: &[usize]) -> Result<(u32, usize, usize), String> {
    let (vars, clauses, width) = match sizes {
        [vars, clauses, width] => (*vars, *clauses, *width),
        _ => return Err(format!("expected 3 sizes, got {}", sizes.len())),
    };
    let num_vars = match u32::try_from(vars) {
        Ok(n) if n > 0 => n,
        _ => return Err(format!("number of variables must be between 1 and {}", u32::MAX)),
    };
    if width == 0 {
        return Err("clauses need at least one literal".to_string());
    }
    Ok((num_vars, clauses, width))
}

fn main() {

    env_logger::builder()
        .format_timestamp(None)
        .format_level(false)
        .format_module_path(false)
        .init();

    let cli = Cli::parse();

    if let Some(sizes) = cli.random {
        let rng = match cli.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        let (num_vars, num_clauses, width) = match random_sizes(&sizes) {
            Ok(sizes) => sizes,
            Err(e) => {
                error!("Error. {e}");
                std::process::exit(-1);
            }
        };
        println!("{}", translator::random_formula(&rng, num_vars, num_clauses, width));
        return;
    }

    let mut text = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut text) {
        error!("cannot read stdin: {e}");
        std::process::exit(-1);
    }

    if cli.render {
        println!("{}", translator::render_text(&text));
        return;
    }

    let converted = if cli.reverse {
        translator::from_exchange_document(&text)
    } else {
        let lines = translator::parse_lines(&text);
        debug!("{} clause lines", lines.len());
        translator::to_exchange_document(&lines).map(|doc| doc.to_string())
    };

    match converted {
        Ok(out) => println!("{out}"),
        Err(e) => {
            error!("Error. {e}");
            std::process::exit(-1);
        }
    }

}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_random_sizes() {
        assert_eq!(random_sizes(&[5, 10, 3]), Ok((5, 10, 3)));
        assert_eq!(random_sizes(&[5, 0, 3]), Ok((5, 0, 3)));
        assert!(random_sizes(&[0, 3, 3]).is_err());
        assert!(random_sizes(&[3, 3, 0]).is_err());
        assert!(random_sizes(&[3, 3]).is_err());
    }
}
