use clap::Parser;
use modsync::config::Cli;
use modsync::Config;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Convert CLI args to Config - this validates immediately
    let config = Config::try_from(cli)?;

    println!("modsync v{}", modsync::VERSION);

    modsync::commands::run::run(config)?;

    Ok(())
}
