use std::io::IsTerminal as _;
use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

use sikum::cli::{Cli, Command};
use sikum::config::Config;
use sikum::console::Console;

fn main() -> ExitCode {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn try_main() -> anyhow::Result<()> {
    sikum::logging::init().context("init logging")?;

    let cli = Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    let config = Config::from_env(cli.data_dir).context("load config")?;

    match cli.command {
        Command::Run(args) => {
            let stdin = std::io::stdin();
            let interactive = stdin.is_terminal();
            let mut console = Console::new(config.open_app(&args.fragment)).with_prompt(interactive);
            console
                .run(stdin.lock(), &mut std::io::stdout().lock())
                .context("run session")?;
        }
        Command::Render(args) => {
            let console = Console::new(config.open_app(&args.fragment));
            print!("{}", console.screen());
        }
    }

    Ok(())
}
