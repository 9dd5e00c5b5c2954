use clap::{ArgAction, Args, Parser, Subcommand};

// Top-level CLI parser. Tool options are parsed by each command's own option set.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Submit batch simulations to a scheduler and merge their outputs"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        help = "Site settings file (toml, yaml or json)",
        value_name = "FILE"
    )]
    pub settings: Option<String>,

    #[arg(short, long, global = true, action = ArgAction::Count, help = "Increase log verbosity")]
    pub verbose: u8,

    #[arg(short, long, global = true, help = "Only log warnings and errors")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render one job script per copy and hand them to the scheduler
    #[command(disable_help_flag = true)]
    Submit(PassThrough),

    /// Merge histogram output files into one total
    #[command(disable_help_flag = true)]
    Merge(MergeArgs),
}

#[derive(Args, Debug, Clone)]
pub struct PassThrough {
    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "ARGS",
        help = "Arguments for the command's option set (use --help to list them)"
    )]
    pub args: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct MergeArgs {
    #[arg(long, help = "Show a per-histogram table after merging")]
    pub stats: bool,

    #[command(flatten)]
    pub rest: PassThrough,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_arguments_pass_through_untouched() {
        let cli = Cli::try_parse_from([
            "simbatch", "-v", "submit", "--nCopies", "2", "./sim", "--help",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        let Commands::Submit(pass) = cli.command else {
            panic!("expected submit");
        };
        assert_eq!(pass.args, vec!["--nCopies", "2", "./sim", "--help"]);
    }

    #[test]
    fn merge_stats_flag_is_taken_before_tool_arguments() {
        let cli = Cli::try_parse_from(["simbatch", "merge", "--stats", "--files", "a_1.hdf5"])
            .unwrap();
        let Commands::Merge(merge) = cli.command else {
            panic!("expected merge");
        };
        assert!(merge.stats);
        assert_eq!(merge.rest.args, vec!["--files", "a_1.hdf5"]);
    }
}
