use std::{env, process};

use clap::error::ErrorKind as ClapErrorKind;
use log::debug;

use csv2json::{
    BatchError,
    cli::{parse_args, usage_error},
    config::check_if_valid_file,
    converter::convert,
};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(error) = run().await {
        eprintln!("error: {error}");
        process::exit(1);
    }
}

async fn run() -> Result<(), BatchError> {
    let spec = match parse_args(env::args_os()) {
        Ok(spec) => spec,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => {
                err.print()?;
                return Ok(());
            }
            _ => return Err(usage_error(&err)),
        },
    };
    debug!("Input: {:?}", spec);

    check_if_valid_file(&spec.filepath)?;

    let execution = convert(&spec).await?;
    debug!(
        "{} records written, {} rows skipped in {:?}",
        execution.write_count, execution.skip_count, execution.duration
    );

    Ok(())
}
