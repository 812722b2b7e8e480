use clap::Parser;

use crate::scenario::Scenario;

#[derive(Parser, Debug)]
#[command(name = "dynarray")]
#[command(version, about = "Walk through growth, copy, move and assignment of an owning array", long_about = None)]
pub struct Cli {
    /// Scenario to run; repeat the flag to run several
    #[arg(short, long, value_enum, default_value = "all")]
    pub scenario: Vec<Scenario>,

    /// Capacity the resize scenario grows to before overflowing
    #[arg(short = 'c', long, default_value_t = 5)]
    pub initial_capacity: usize,

    /// Narrate every buffer operation
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Requested scenarios with `all` expanded.
    pub fn scenarios(&self) -> Vec<Scenario> {
        Scenario::expand(&self.scenario)
    }
}
