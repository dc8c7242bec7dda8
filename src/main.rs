//! main.rs
//! Entry point for filet

use filet::app::AppState;
use filet::config::Config;
use filet::core::terminal::{self, Surface};
use filet::utils::cli::{CliAction, handle_args};
use filet::utils::{init_logging, resolve_initial_dir};

use std::process::ExitCode;

fn main() -> ExitCode {
    std::panic::set_hook(Box::new(|info| {
        let _ = terminal::restore();

        eprintln!("\n[filet] Error occurred: {}", info);

        #[cfg(debug_assertions)]
        {
            let bt = std::backtrace::Backtrace::force_capture();
            eprintln!("\nStack Backtrace:\n{}", bt);
        }
    }));

    let path_arg = match handle_args() {
        CliAction::RunApp => None,
        CliAction::RunAppAtPath(path) => Some(path),
        CliAction::Exit => return ExitCode::SUCCESS,
        CliAction::Fail => return ExitCode::FAILURE,
    };

    match run(path_arg.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("[filet] Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(path_arg: Option<&str>) -> filet::Result<()> {
    let config = Config::from_env();
    init_logging(&config);

    let mut surface = Surface::open()?;
    let start = resolve_initial_dir(path_arg)?;

    log::info!("starting in {}", start.display());
    let mut app = AppState::new(config, start);
    terminal::run_terminal(&mut app, &mut surface)
}
