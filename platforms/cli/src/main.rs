use anyhow::{Context, Result};
use clap::Parser;
use multitape::{Computation, Outcome, ProgramManager};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    /// Name of the built-in machine to run (see --list)
    #[clap(short, long, required_unless_present = "list")]
    program: Option<String>,

    /// The input written after the start marker on the first tape
    #[clap(short, long, default_value = "")]
    input: String,

    /// Stop after this many steps if the machine has not reached a terminal state
    #[clap(short = 'm', long, default_value_t = multitape::MAX_EXECUTION_STEPS)]
    max_steps: usize,

    /// Print each configuration together with the transition that produced it
    #[clap(short = 'd', long)]
    debug: bool,

    /// Print the whole configuration history as JSON
    #[clap(long, conflicts_with = "debug")]
    json: bool,

    /// List the built-in machines and exit
    #[clap(short, long)]
    list: bool,

    /// Log engine events (overridden by RUST_LOG)
    #[clap(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.list {
        list_programs()?;
        return Ok(());
    }

    let name = cli.program.as_deref().unwrap_or_default();
    let machine = ProgramManager::get_program_by_name(name)
        .with_context(|| format!("unknown program '{name}', use --list to see the choices"))?;

    info!(program = name, input = %cli.input, "starting computation");
    let mut computation = machine.start_computation(&cli.input)?;

    let outcome = if cli.debug {
        run_verbose(&mut computation, cli.max_steps)?
    } else {
        computation.run(cli.max_steps)?
    };

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(computation.configurations())?
        );
        return Ok(());
    }

    println!("{}", computation.current_configuration());
    println!(
        "Steps: {}, Space: {}",
        computation.steps(),
        computation.space()
    );
    match outcome {
        Outcome::Accepted => println!("Accepted"),
        Outcome::Rejected => println!("Rejected"),
        Outcome::Halted(output) => println!("Halted with output: {output}"),
        Outcome::Exhausted { steps } => println!("Still running after {steps} steps"),
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn list_programs() -> Result<()> {
    for index in 0..ProgramManager::get_program_count() {
        let info = ProgramManager::get_program_info(index)?;
        println!(
            "{:<18} {} tapes, {} transitions - {}",
            info.name, info.total_tapes, info.transition_count, info.description
        );
    }

    Ok(())
}

fn run_verbose(computation: &mut Computation, max_steps: usize) -> Result<Outcome> {
    println!("{:>5}  {}", 0, computation.current_configuration());

    for _ in 0..max_steps {
        if !computation.has_next_configuration() {
            break;
        }

        computation.step()?;
        if let Some(transition) = computation.last_transition() {
            println!("       {transition}");
        }
        println!(
            "{:>5}  {}",
            computation.steps(),
            computation.current_configuration()
        );
    }

    Ok(computation.outcome().unwrap_or(Outcome::Exhausted {
        steps: computation.steps(),
    }))
}
