use std::{io, path::PathBuf, process::ExitCode};

use clap::Parser;

use azure_tts_console::{
    config::Config,
    console,
    error::{Error, Result},
    tts::client,
};

#[derive(Parser)]
#[command(name = "azure-tts-console")]
#[command(about = "Speak typed messages through the Azure speech synthesis service")]
struct Cli {
    /// Path to the properties file selecting the connection mode
    #[arg(value_name = "PROPERTIES_FILE")]
    properties: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::Config(err)) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("Error getting audio: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    println!("Loading properties from {}", cli.properties.display());
    let config = Config::load(&cli.properties)?;

    let mut speech = client::connect(&config)?;
    let session = console::run(&mut speech, io::stdin().lock(), io::stdout());
    // Close even when the session failed; report the first error.
    let closed = speech.close();
    session.and(closed)
}
