mod board;
mod global;


use clap::Command;

pub fn build_cli() -> Command {
    global::root_command()
        .subcommand(board::show_command())
        .subcommand(board::watch_command())
}
