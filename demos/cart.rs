//! Cart Demo
//!
//! Prices a fixture cart against its rule set and prints the summary.
//!
//! Use `-f` to load a fixture set by name
//! Use `-n` to take only the first n items of the fixture cart

use std::io;

use anyhow::Result;
use clap::Parser;

use pano::{fixtures::Fixture, pricing::price_cart, summary::write_summary, utils::DemoCartArgs};

/// Cart Demo
pub fn main() -> Result<()> {
    let args = DemoCartArgs::parse();

    let fixture = Fixture::from_set(&args.fixture)?;

    let cart = fixture.cart(args.n)?;
    let rules = fixture.rules();

    let totals = price_cart(&cart, rules)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    write_summary(&mut handle, &totals, &cart, fixture.panel_meta_map(), rules)?;

    Ok(())
}
