use std::sync::Arc;

use game_search::libs::{
    cheapshark::{ApiError, CheapSharkClient},
    terminal::{format_results, Command, HELP},
    variable::Config,
    version::print_version,
    widget::{LogReporter, Outcome, SearchWidget},
};
use log::{info, warn};
use thiserror::Error;
use tokio::io::{self, AsyncBufReadExt, BufReader};

type Widget = SearchWidget<CheapSharkClient, LogReporter>;

#[derive(Error, Debug)]
enum ApplicationError {
    #[error(transparent)]
    ApiError(#[from] ApiError),

    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), ApplicationError> {
    env_logger::init();
    print_version();

    let config = Config::from_env();
    info!("Starting game search service against {}", config.api_url);

    let widget: Arc<Widget> = Arc::new(
        SearchWidget::new(CheapSharkClient::new(&config)?, LogReporter)
            .with_min_characters(config.min_characters)
            .with_sort_mode(config.default_sort),
    );

    println!("{}", HELP);

    let mut lines = BufReader::new(io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        match Command::parse(&line) {
            Ok(Command::Input(text)) => {
                // Searches are not awaited so a fast typist can have several in flight
                let widget = widget.clone();
                tokio::spawn(async move {
                    match widget.on_input(&text).await {
                        Outcome::Applied | Outcome::Cleared => show_results(&widget),
                        Outcome::Stale | Outcome::Failed => (),
                    }
                });
            }
            Ok(Command::Sort(sort_mode)) => {
                widget.set_sort_mode(sort_mode);
                show_results(&widget);
            }
            Ok(Command::Open(index)) => {
                let widget = widget.clone();
                tokio::spawn(async move {
                    match widget.click_card(index).await {
                        Some(Outcome::Applied) => show_detail(&widget),
                        Some(_) => (),
                        None => warn!("There is no result {}", index + 1),
                    }
                });
            }
            Ok(Command::Close) => widget.dismiss_detail(),
            Ok(Command::Show) => {
                show_results(&widget);
                show_detail(&widget);
            }
            Ok(Command::Help) => println!("{}", HELP),
            Ok(Command::Quit) => break,
            Err(e) => println!("{}", e),
        }
    }

    Ok(())
}

fn show_results(widget: &Widget) {
    println!("{}", format_results(&widget.results()));
}

fn show_detail(widget: &Widget) {
    if let Some(panel) = widget.detail() {
        println!("{}", panel);
    }
}
