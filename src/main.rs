use std::fs;
use std::path::Path;
use std::process;

use clap::{App, Arg, ArgMatches};
use log::{info, LevelFilter};

use crossword_csp::{find_fill, render_grid, Crossword, Error, FillFailure, FillOptions, Result};

fn parse_args<'a>() -> ArgMatches<'a> {
    App::new("generate")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Fill a crossword grid from a word list")
        .arg(
            Arg::with_name("structure")
                .help("Grid file: one row per line, _ for open cells")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("words")
                .help("Word list: one word per line")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::with_name("output")
                .help("Also write the filled grid to this file as plain text (no image output)")
                .index(3),
        )
        .arg(
            Arg::with_name("max-states")
                .long("max-states")
                .takes_value(true)
                .value_name("N")
                .help("Give up after visiting N search states")
                .validator(|value| value.parse::<u64>().map(|_| ()).map_err(|err| err.to_string())),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("Log more (repeat for more detail)"),
        )
        .get_matches()
}

fn setup_logging(verbosity: u64) -> Result<()> {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{}][{}] {}", record.level(), record.target(), message))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()?;

    Ok(())
}

fn run() -> Result<()> {
    let matches = parse_args();
    setup_logging(matches.occurrences_of("verbose"))?;

    // Required arguments are always present once clap has accepted the command line.
    let structure = matches.value_of("structure").unwrap_or_default();
    let words = matches.value_of("words").unwrap_or_default();
    let options = FillOptions {
        state_limit: matches.value_of("max-states").and_then(|value| value.parse().ok()),
    };

    let crossword = Crossword::load(structure, words)?;
    info!("loaded {:?}", crossword);

    match find_fill(&crossword, &options) {
        Ok(result) => {
            info!("{:?}", result.statistics);

            let display_grid = render_grid(&crossword, &result.assignment);
            println!("{}", display_grid);

            if let Some(output) = matches.value_of("output") {
                fs::write(output, &display_grid).map_err(|source| Error::Io {
                    path: Path::new(output).to_path_buf(),
                    source,
                })?;
                info!("written fill to {}", output);
            }
        }
        Err(FillFailure::Unsatisfiable) => println!("No solution."),
        Err(failure @ FillFailure::ExhaustedStateLimit) => println!("No solution: {}", failure),
    }

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {}", err);
        process::exit(1);
    }
}
