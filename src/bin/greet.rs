use std::{env, io};

use anyhow::{Context, Result};
use clap::Parser;
use csv2json::greet::{self, GreetArgs};

fn main() -> Result<()> {
    let args = GreetArgs::parse();
    let dir = env::current_dir().context("unable to resolve the current directory")?;

    greet::run(&args, &dir, &mut io::stdout().lock())
}
