use clap::{Arg, ArgAction, Command};

/// Filter and source arguments shared by `show` and `watch`.
fn with_board_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("course")
                .long("course")
                .short('c')
                .help("Course to rank (omit for all courses)"),
        )
        .arg(
            Arg::new("week")
                .long("week")
                .short('w')
                .help("Week to rank (omit for all weeks)"),
        )
        .arg(
            Arg::new("data")
                .long("data")
                .help("Attempts file to read (default: ~/.quizrank/attempts.json)")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            Arg::new("viewer")
                .long("viewer")
                .help("Email of the viewing user, highlighted in the table"),
        )
        .arg(
            Arg::new("limit")
                .long("limit")
                .help("Maximum number of rows (1-1000)")
                .value_parser(clap::value_parser!(u32).range(1..=1000)),
        )
}

pub fn show_command() -> Command {
    with_board_args(
        Command::new("show").about("Print the leaderboard once"),
    )
    .arg(
        Arg::new("json")
            .long("json")
            .help("Output in JSON format")
            .action(ArgAction::SetTrue),
    )
}

pub fn watch_command() -> Command {
    with_board_args(
        Command::new("watch")
            .about("Keep the leaderboard on screen, refreshing in the background until Ctrl-C"),
    )
    .arg(
        Arg::new("interval-ms")
            .long("interval-ms")
            .help("Refresh period in milliseconds (default: 5000)")
            .value_parser(clap::value_parser!(u64).range(100..)),
    )
}
