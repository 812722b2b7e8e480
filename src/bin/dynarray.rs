use anyhow::{Context, Result};
use dynarray_demo::cli::Cli;
use dynarray_demo::scenario::Runner;

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    let runner = Runner::new(cli.verbose, cli.initial_capacity);

    let reports = runner
        .run_all(&cli.scenarios())
        .context("Demonstration stopped")?;

    println!("\nEnd of tests: {} scenario(s) passed", reports.len());
    Ok(())
}
