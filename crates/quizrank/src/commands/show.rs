use std::sync::Arc;

use chrono::Utc;
use clap::ArgMatches;
use tracing::{error, info};

use quizrank_core::{
    BoardFrame, JsonFileProvider, RankingQueryAdapter, Reconciliation, ResultSet, SchedulerPhase,
};

use super::helpers::{BoardRequest, board_request, load_config_with_warning, runtime};
use super::json_types::LeaderboardJson;
use crate::color;
use crate::table::{EMPTY_MESSAGE, TableFormatter};

pub(crate) fn handle_show_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");
    let config = load_config_with_warning();
    let request = board_request(matches, &config)?;

    info!(
        event = "cli.show_started",
        scope = %request.scope,
        data_path = %request.data_path.display(),
        json_output = json_output,
    );

    let result_set = match runtime()?.block_on(fetch_once(&request)) {
        Ok(set) => set,
        Err(e) => {
            eprintln!("{} {}", color::error("Failed to load leaderboard:"), e);
            error!(
                event = "cli.show_failed",
                scope = %request.scope,
                error = %e
            );
            return Err(e);
        }
    };

    let frame = BoardFrame {
        scope: request.scope.clone(),
        phase: SchedulerPhase::Live,
        loading: false,
        rows: BoardFrame::build_rows(
            &result_set,
            &Reconciliation::initial(&result_set),
            request.options.viewer_email.as_deref(),
        ),
        changed: true,
        refreshed_at: Some(Utc::now()),
        last_error: None,
    };

    if json_output {
        let output = LeaderboardJson::new(&frame.scope, &frame.rows);
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if frame.is_empty() {
        println!("{}", color::bold(&frame.scope.label()));
        println!("{}", EMPTY_MESSAGE);
    } else {
        TableFormatter::new(&frame.rows).print_table(&frame);
    }

    info!(event = "cli.show_completed", rows = frame.participants());
    Ok(())
}

async fn fetch_once(request: &BoardRequest) -> Result<ResultSet, Box<dyn std::error::Error>> {
    let provider = JsonFileProvider::open(&request.data_path).await?;
    let adapter = RankingQueryAdapter::new(Arc::new(provider.clone()));
    let result = adapter
        .fetch_scope(&request.scope, request.options.limit)
        .await;
    provider.close();
    Ok(result?)
}
