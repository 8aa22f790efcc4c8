use clap::{Arg, ArgAction, Command};

pub fn root_command() -> Command {
    Command::new("quizrank")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Show quiz leaderboards ranked by course and week")
        .long_about("quizrank ranks quiz attempts per course and week and prints the leaderboard. 'watch' keeps the board on screen and refreshes it in the background until interrupted.")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .help("Disable colored output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
}
