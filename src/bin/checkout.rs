//! Checkout
//!
//! Prices a basket of product codes against a fixture set and prints the receipt.
//!
//! Use `-f` to load a fixture set by name
//! Use `-d` to point at a different fixture directory

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use checkout::{
    fixtures::Fixture, observability::init_logging, receipt::Receipt, utils::CheckoutArgs,
};

/// Checkout
pub fn main() -> Result<()> {
    let args = CheckoutArgs::parse();

    init_logging(&args.logging)?;

    let fixture = Fixture::from_set_in(&args.fixtures_dir, &args.fixture)
        .with_context(|| format!("loading fixture set {:?}", args.fixture))?;

    let mut basket = fixture.basket()?;

    for code in &args.codes {
        basket
            .add_product(code)
            .with_context(|| format!("adding product {code}"))?;
    }

    info!(items = basket.len(), "priced basket");

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    Receipt::from_basket(&basket)?.write_to(&mut handle)?;

    Ok(())
}
