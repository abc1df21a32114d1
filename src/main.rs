mod rsa;

pub use crate::rsa::*;

use clap::Parser;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let rsenc = Rsenc::parse();
    rsenc.run()?;
    Ok(())
}
