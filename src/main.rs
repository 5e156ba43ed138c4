use std::process::ExitCode;

use loss_plot::{Cli, PlotConfig, PlotError};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = match Cli::from_args(std::env::args_os().collect()) {
        Ok(cli) => cli,
        Err(PlotError::Usage) => {
            eprintln!("{}", Cli::usage());
            return PlotError::Usage.exit_code();
        }
        Err(e) => {
            eprintln!("error: {e}");
            return e.exit_code();
        }
    };

    let config = PlotConfig::from(cli);
    match loss_plot::run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::debug!("run failed: {e:?}");
            eprintln!("error: {e}");
            e.exit_code()
        }
    }
}
