use clap::Parser;
use std::path::Path;

use simbatch::args::{Cli, Commands};
use simbatch::commands;
use simbatch::error::SimError;
use simbatch::logging;
use simbatch::settings::load_settings;
use simbatch::visuals;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    let settings = load_settings(cli.settings.as_deref())?;

    let result = match &cli.command {
        Commands::Submit(pass) => {
            commands::submit_batch(&pass.args, &settings.scheduler, Path::new(".")).map(|report| {
                if !cli.quiet {
                    visuals::print_submit_report(&report);
                }
            })
        }
        Commands::Merge(merge) => commands::run_merge(&merge.rest.args, &settings.merge).map(|stats| {
            if merge.stats {
                visuals::print_detailed(&stats);
            } else if !cli.quiet {
                visuals::print_summary(&stats);
            }
        }),
    };

    if let Err(e) = &result {
        exit_on_clap_error(e);
    }
    result.map_err(anyhow::Error::from)
}

// Help, version and usage errors from a command's option set print and exit the clap way.
fn exit_on_clap_error(e: &SimError) {
    if let Some(clap_err) = e.clap_error() {
        clap_err.exit();
    }
}
