//! Till checkout
//!
//! Loads a fixture set, checks out its cart and prints the receipt.
//!
//! Use `-f` to pick a fixture set by name
//! Use `-d` to point at a different fixtures directory

use std::io;

use anyhow::{Result, anyhow};
use clap::Parser;

use till::{fixtures::Fixture, utils::CheckoutArgs};

fn main() -> Result<()> {
    let args = CheckoutArgs::parse();

    till::utils::init_logging(&args.log_level).map_err(|err| anyhow!(err))?;

    let fixture = Fixture::from_set_in(&args.fixtures_dir, &args.fixture)?;
    let teller = fixture.teller()?;
    let receipt = teller.checkout(fixture.cart())?;

    let stdout = io::stdout();
    let handle = stdout.lock();

    receipt.write_to(handle)?;

    Ok(())
}
