use clap::Parser;
use ui_test_synth::cli::commands::{cmd_analyze, cmd_features};
use ui_test_synth::cli::config::{Cli, Commands, load_config};
use ui_test_synth::logging::init_logging;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_json);

    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Analyze(args) => {
            let success = cmd_analyze(&args, &config)?;
            if !success {
                std::process::exit(1);
            }
        }
        Commands::Features { snapshots, profile } => {
            cmd_features(&snapshots, profile.as_deref(), &config)?;
        }
    }

    Ok(())
}
