use anyhow::Result;
use funnelmap::cli::{self, Commands};

fn main() -> Result<()> {
    cli::init_logging();
    let cli = cli::args::parse_args();

    match cli.command {
        Commands::Solve {
            scenario,
            format,
            output,
        } => cli::handle_solve_command(scenario, format, output),
        Commands::Share { decode, scenario } => cli::handle_share_command(decode, scenario),
        Commands::Batch { input, cpc, output } => cli::handle_batch_command(input, cpc, output),
    }
}
