use std::env;
use std::fs;
use std::io::{self, Read};

use anyhow::Error;
use clap::{values_t, App, AppSettings, Arg};
use env_logger::{fmt, Builder, Target};
use log::{error, info};
use log::{Level, LevelFilter, Record};

use cdsat::config::{SolverConfig, SolverConfigUpdate};
use cdsat::search::{Solver, Verdict};
use cdsat_dimacs::DimacsParser;

fn main() {
    let exit_code = match main_with_err() {
        Err(err) => {
            error!("{}", err);
            1
        }
        Ok(exit_code) => exit_code,
    };
    std::process::exit(exit_code);
}

fn init_logging() {
    let format = |buf: &mut fmt::Formatter, record: &Record| {
        use std::io::Write;
        if record.level() == Level::Info {
            writeln!(buf, "c {}", record.args())
        } else {
            writeln!(buf, "c {}: {}", record.level(), record.args())
        }
    };

    let mut builder = Builder::new();
    builder
        .target(Target::Stdout)
        .format(format)
        .filter(None, LevelFilter::Info);

    if let Ok(ref env_var) = env::var("CDSAT_LOG") {
        builder.parse_filters(env_var);
    }

    builder.init();
}

fn banner() {
    info!("This is cdsat {}", env!("CARGO_PKG_VERSION"));
}

fn main_with_err() -> Result<i32, Error> {
    let matches = App::new("cdsat")
        .version(env!("CARGO_PKG_VERSION"))
        .setting(AppSettings::DisableHelpSubcommand)
        .setting(AppSettings::VersionlessSubcommands)
        .arg_from_usage("[INPUT] 'The input file to use (stdin if omitted)'")
        .arg_from_usage("[config-file] --config=[FILE] 'Read parameters from configuration file'")
        .arg(
            Arg::from_usage("[config-option] -C --config-option")
                .value_name("OPTION>=<VALUE")
                .help("Specify a single config option as a TOML key-value pair")
                .multiple(true)
                .number_of_values(1),
        )
        .get_matches();

    init_logging();
    banner();

    let mut config_update = SolverConfigUpdate::new();

    if let Some(config_path) = matches.value_of("config-file") {
        let mut config_contents = String::new();
        fs::File::open(config_path)?.read_to_string(&mut config_contents)?;

        config_update.merge(toml::from_str(&config_contents)?);
    }

    for config_option in values_t!(matches, "config-option", String).unwrap_or(vec![]) {
        config_update.merge(toml::from_str(&config_option)?);
    }

    let mut config = SolverConfig::default();
    config_update.apply_to(&mut config);

    let stdin = io::stdin();

    let mut locked_stdin;
    let mut opened_file;

    let file = match matches.value_of("INPUT") {
        Some(path) => {
            info!("Reading file '{}'", path);
            opened_file = fs::File::open(path)?;
            &mut opened_file as &mut dyn io::Read
        }
        None => {
            info!("Reading from stdin");
            locked_stdin = stdin.lock();
            &mut locked_stdin as &mut dyn io::Read
        }
    };

    let formula = DimacsParser::parse(file)?;

    let mut solver = Solver::new(config);
    solver.add_formula(&formula)?;

    match solver.solve() {
        Ok(Verdict::Sat(model)) => {
            println!("s SATISFIABLE");
            print!("v");
            for (index, value) in model.into_iter().enumerate() {
                let var = (index + 1) as i64;
                print!(" {}", if value { var } else { -var });
            }
            println!(" 0");
            Ok(10)
        }
        Ok(Verdict::Unsat) => {
            println!("s UNSATISFIABLE");
            Ok(20)
        }
        Err(err) => {
            log::error!("{}", err);
            println!("s UNKNOWN");
            Ok(0)
        }
    }
}
