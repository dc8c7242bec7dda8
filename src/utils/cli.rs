//! Command-line argument parsing and help for filet.
//!
//! filet takes at most one argument: the directory to start in. `--help` and
//! `--version` are the only options.
//!
//! When invoked with no args (filet), filet starts in the current directory.

use crate::app::keymap::KEYBINDS;

#[derive(Debug, PartialEq, Eq)]
pub enum CliAction {
    RunApp,
    RunAppAtPath(String),
    Exit,
    Fail,
}

pub fn handle_args() -> CliAction {
    let args: Vec<String> = std::env::args().skip(1).collect();
    parse_args(&args)
}

/// Decides what to do from the arguments after the program name.
pub fn parse_args(args: &[String]) -> CliAction {
    match args {
        [] => CliAction::RunApp,
        [arg] => match arg.as_str() {
            "--version" | "-v" => {
                print_version();
                CliAction::Exit
            }
            "-h" | "--help" => {
                print_help();
                CliAction::Exit
            }
            "--" => CliAction::RunApp,
            arg if arg.starts_with('-') && arg.len() > 1 => {
                eprintln!("Unknown argument: {}", arg);
                eprintln!("Try --help for available options");
                CliAction::Fail
            }
            arg => CliAction::RunAppAtPath(arg.to_string()),
        },
        // `--` lets a directory named like an option through
        [sep, arg] if sep == "--" => CliAction::RunAppAtPath(arg.clone()),
        _ => {
            eprintln!("Error: filet accepts at most one argument.");
            eprintln!("Usage: filet [PATH]");
            CliAction::Fail
        }
    }
}

fn print_version() {
    println!("filet {}", env!("CARGO_PKG_VERSION"));
}

fn print_help() {
    println!(
        r#"filet - a tiny terminal directory browser

USAGE:
  filet [PATH]

PATH:
  Directory to open (defaults to current directory)

OPTIONS:
  -h, --help              Print help information
  -v, --version           Display the current installed version of filet

ENVIRONMENT:
  EDITOR                  Program for 'e' (default: vi)
  SHELL                   Program for 's' (default: /bin/sh)
  HOME                    Target of '~'
  FILET_LOG               Write a debug log to this file
"#
    );
    println!("KEYS:");
    for (key, description) in KEYBINDS {
        println!("  {:<22}  {}", key, description);
    }
}
