use std::env;
use std::fs;
use std::io::{self, Read, Write};

use anyhow::Error;
use clap::{value_t, values_t, App, AppSettings, Arg};
use env_logger::{fmt, Builder, Target};
use log::{error, info, warn};
use log::{Level, LevelFilter, Record};

use linenv::config::{InferenceConfig, InferenceConfigUpdate};
use linenv::tables::TableParser;
use linenv::{Inference, Outputs, Solution};

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

    if let Ok(ref env_var) = env::var("LINENV_LOG") {
        builder.parse_filters(env_var);
    }

    builder.init();
}

fn banner() {
    info!("This is linenv {}", env!("LINENV_VERSION"));
    info!(
        "  {} build - {}",
        env!("LINENV_PROFILE"),
        env!("LINENV_RUSTC_VERSION")
    );
}

fn labels(target: &mut impl Write, prefix: &str, labels: &[bool]) -> io::Result<()> {
    target.write_all(prefix.as_bytes())?;
    for &label in labels {
        target.write_all(if label { b" 1" } else { b" 0" })?;
    }
    target.write_all(b"\n")
}

fn print_solution(solution: &Solution, outputs: Outputs) -> io::Result<()> {
    let stdout = io::stdout();
    let mut target = stdout.lock();

    writeln!(target, "s OPTIMUM")?;
    labels(&mut target, "y", solution.labeling())?;
    if outputs.count() >= 2 {
        writeln!(target, "e {}", solution.energy())?;
    }
    if let Some(auxiliary) = solution.auxiliary() {
        labels(&mut target, "z", auxiliary.as_slice())?;
    }
    target.flush()
}

fn main_with_err() -> Result<i32, Error> {
    let matches = App::new("linenv")
        .version(env!("LINENV_VERSION"))
        .setting(AppSettings::DisableHelpSubcommand)
        .arg_from_usage("[INPUT] 'The table file to use (stdin if omitted)'")
        .arg_from_usage("[config-file] --config=[FILE] 'Read parameters from configuration file'")
        .arg(
            Arg::from_usage("[config-option] -C --config-option")
                .value_name("OPTION>=<VALUE")
                .help("Specify a single config option, see 'linenv -C help' for a list of options.")
                .multiple(true)
                .number_of_values(1),
        )
        .arg(
            Arg::from_usage(
                "[outputs] --outputs=[N] 'Number of results to print: labeling, energy and \
                 auxiliary labeling'",
            )
            .default_value("2"),
        )
        .get_matches();

    if values_t!(matches, "config-option", String)
        .unwrap_or_default()
        .iter()
        .any(|option| option == "help")
    {
        print!("{}", InferenceConfig::help());
        return Ok(0);
    }

    init_logging();
    banner();

    let outputs = Outputs::from_count(value_t!(matches, "outputs", usize)?)?;

    let mut config_update = InferenceConfigUpdate::new();

    if let Some(config_path) = matches.value_of("config-file") {
        let mut config_contents = String::new();
        fs::File::open(config_path)?.read_to_string(&mut config_contents)?;

        config_update.merge(toml::from_str(&config_contents)?);
    }

    for config_option in values_t!(matches, "config-option", String).unwrap_or_default() {
        config_update.merge(toml::from_str(&config_option)?);
    }

    let mut inference = Inference::new();

    inference.config(&config_update)?;

    let stdin = io::stdin();

    let mut locked_stdin;
    let mut opened_file;

    let file = match matches.value_of("INPUT") {
        Some(path) => {
            info!("Reading file '{}'", path);
            opened_file = fs::File::open(path)?;
            &mut opened_file as &mut dyn Read
        }
        None => {
            info!("Reading from stdin");
            locked_stdin = stdin.lock();
            &mut locked_stdin as &mut dyn Read
        }
    };

    let tables = TableParser::parse(file)?;

    let solution = inference.infer_tables(
        &tables.unary,
        &tables.pairwise,
        &tables.coeffs,
        &tables.cliques,
        outputs,
    )?;

    if !solution.empty_cliques().is_empty() {
        warn!(
            "{} of the referenced cliques are empty",
            solution.empty_cliques().len()
        );
    }

    print_solution(&solution, outputs)?;

    Ok(0)
}
