//! Utils

use clap::Parser;

/// Arguments for the cart demo
#[derive(Debug, Parser)]
pub struct DemoCartArgs {
    /// Number of items to take from the fixture cart
    #[clap(short, long)]
    pub n: Option<usize>,

    /// Fixture set to use for the panels, cart & rules
    #[clap(short, long, default_value = "kocaeli")]
    pub fixture: String,
}
