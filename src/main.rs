use burrow::commands::check::CheckCommand;
use burrow::commands::env::EnvCommand;
use burrow::commands::run::RunCommand;
use burrow::config::{self, BurrowConfig};
use burrow::error::{Result, format_error_chain, get_exit_code};
use burrow::logging;
use burrow::platform::PlatformKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "burrow")]
#[command(author, version, about = "Launcher for a bundled RabbitMQ server", long_about = None)]
struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Bundle root directory (default: the directory of this executable)
    #[arg(long, global = true, value_name = "DIR")]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch and supervise the bundled RabbitMQ server
    Run {
        /// Node name passed to the server (RABBITMQ_NODENAME)
        #[arg(long, value_name = "NAME")]
        node_name: Option<String>,
    },

    /// Verify the bundle layout and prerequisites without launching
    Check,

    /// Output the environment reconciliation for shell evaluation
    ///
    /// Prints the PATH prepend the launcher would apply. Use with eval in
    /// your shell to run the bundled Erlang tools directly.
    Env,
}

fn main() {
    let cli = Cli::parse();

    logging::setup_logger(cli.verbose);

    let result: Result<()> = (|| {
        // Platform support is checked before anything else runs.
        let platform = PlatformKind::classify()?;
        let bundle_root = config::resolve_bundle_root(cli.root.as_deref())?;
        let config = BurrowConfig::load(&bundle_root)?;

        match cli.command {
            Commands::Run { node_name } => {
                let command = RunCommand::new(&config, &bundle_root, platform)?;
                command.execute(node_name.as_deref())
            }
            Commands::Check => {
                let command = CheckCommand::new(&config, &bundle_root, platform)?;
                command.execute()
            }
            Commands::Env => {
                let command = EnvCommand::new(&config, &bundle_root, platform)?;
                command.execute()
            }
        }
    })();

    if let Err(e) = result {
        eprintln!("{}", format_error_chain(&e));
        std::process::exit(get_exit_code(&e));
    }
}
