use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, error};
use parking_lot::Mutex;

use crate::structs::{
    game::{GameId, GameSummary},
    view::{DetailPanel, ResultCard},
};

use super::{
    cheapshark::{ApiError, GameApi},
    sort::{sort_games, SortMode},
};

pub const MIN_CHARACTERS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Search,
    Detail,
}

/// Receives every failed fetch. Failures never reach the view.
pub trait FailureReporter: Send + Sync {
    fn report(&self, kind: FetchKind, error: &ApiError);
}

pub struct LogReporter;

impl FailureReporter for LogReporter {
    fn report(&self, kind: FetchKind, error: &ApiError) {
        match kind {
            FetchKind::Search => error!("Error fetching games: {}", error),
            FetchKind::Detail => error!("Error fetching game detail: {}", error),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The response was rendered
    Applied,
    /// A newer request was issued before this one resolved
    Stale,
    Failed,
    /// Input was below the threshold, results were emptied
    Cleared,
}

#[derive(Default)]
struct WidgetState {
    games: Vec<GameSummary>,
    sort_mode: SortMode,
    results: Vec<ResultCard>,
    detail: Option<DetailPanel>,
}

impl WidgetState {
    fn render_results(&mut self) {
        self.results = sort_games(&self.games, self.sort_mode)
            .iter()
            .map(ResultCard::new)
            .collect();
    }
}

/// Search-and-detail widget. Every operation takes `&self` so one instance
/// can be shared between the tasks of overlapping requests; each request
/// channel keeps a token and only the latest issued request may change the
/// view.
pub struct SearchWidget<A, R = LogReporter> {
    api: A,
    reporter: R,
    min_characters: usize,
    state: Mutex<WidgetState>,
    search_token: AtomicU64,
    detail_token: AtomicU64,
}

impl<A: GameApi, R: FailureReporter> SearchWidget<A, R> {
    pub fn new(api: A, reporter: R) -> Self {
        SearchWidget {
            api,
            reporter,
            min_characters: MIN_CHARACTERS,
            state: Mutex::new(WidgetState::default()),
            search_token: AtomicU64::new(0),
            detail_token: AtomicU64::new(0),
        }
    }

    pub fn with_min_characters(mut self, min_characters: usize) -> Self {
        self.min_characters = min_characters;
        self
    }

    pub fn with_sort_mode(self, sort_mode: SortMode) -> Self {
        self.state.lock().sort_mode = sort_mode;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn results(&self) -> Vec<ResultCard> {
        self.state.lock().results.clone()
    }

    pub fn detail(&self) -> Option<DetailPanel> {
        self.state.lock().detail.clone()
    }

    pub fn sort_mode(&self) -> SortMode {
        self.state.lock().sort_mode
    }

    /// Handles a change of the search text.
    pub async fn on_input(&self, value: &str) -> Outcome {
        let query = value.trim();
        debug!("Input changed: {:?}", query);

        if query.chars().count() < self.min_characters {
            // Supersede anything in flight so it cannot refill the list.
            // The last result set stays for the next sort change.
            self.search_token.fetch_add(1, Ordering::SeqCst);

            self.state.lock().results.clear();
            return Outcome::Cleared;
        }

        self.search(query).await
    }

    pub async fn search(&self, query: &str) -> Outcome {
        let token = self.search_token.fetch_add(1, Ordering::SeqCst) + 1;

        match self.api.search_games(query).await {
            Ok(games) => {
                let mut state = self.state.lock();
                if self.search_token.load(Ordering::SeqCst) != token {
                    debug!("Dropping stale results for {:?}", query);
                    return Outcome::Stale;
                }

                state.games = games;
                state.render_results();
                Outcome::Applied
            }
            Err(e) => {
                self.reporter.report(FetchKind::Search, &e);
                Outcome::Failed
            }
        }
    }

    /// Re-renders the last applied result set, no request is made.
    pub fn set_sort_mode(&self, sort_mode: SortMode) {
        let mut state = self.state.lock();
        state.sort_mode = sort_mode;
        state.render_results();
    }

    pub fn render_results(&self) {
        self.state.lock().render_results();
    }

    /// Clicks the card at `index` of the rendered list. Returns `None` when
    /// there is no such card.
    pub async fn click_card(&self, index: usize) -> Option<Outcome> {
        let game_id = self.state.lock().results.get(index)?.game_id.clone();

        Some(self.open_detail(&game_id).await)
    }

    pub async fn open_detail(&self, game_id: &GameId) -> Outcome {
        let token = self.detail_token.fetch_add(1, Ordering::SeqCst) + 1;

        match self.api.game_detail(game_id).await {
            Ok(detail) => {
                let panel = DetailPanel::new(&detail);

                let mut state = self.state.lock();
                if self.detail_token.load(Ordering::SeqCst) != token {
                    debug!("Dropping stale detail for game {}", game_id);
                    return Outcome::Stale;
                }

                state.detail = Some(panel);
                Outcome::Applied
            }
            Err(e) => {
                self.reporter.report(FetchKind::Detail, &e);
                Outcome::Failed
            }
        }
    }

    /// The panel's dismiss control.
    pub fn dismiss_detail(&self) {
        self.detail_token.fetch_add(1, Ordering::SeqCst);
        self.state.lock().detail = None;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use reqwest::StatusCode;
    use tokio::sync::oneshot;

    use super::*;
    use crate::structs::game::{Deal, GameDetail, GameInfo};

    fn game(id: &str, title: &str, cheapest: &str) -> GameSummary {
        GameSummary {
            game_id: GameId::new(id),
            external: title.to_string(),
            thumb: format!("https://cdn.example/{id}.jpg"),
            cheapest: cheapest.to_string(),
            ..GameSummary::default()
        }
    }

    fn detail(title: &str, deals: usize) -> GameDetail {
        GameDetail {
            info: GameInfo {
                title: title.to_string(),
                thumb: "https://cdn.example/detail.jpg".to_string(),
                ..GameInfo::default()
            },
            cheapest_price_ever: None,
            deals: (0..deals)
                .map(|i| Deal {
                    store_id: i.to_string(),
                    price: "1.00".to_string(),
                    ..Deal::default()
                })
                .collect(),
        }
    }

    /// Answers from fixed tables and records every request.
    #[derive(Default)]
    struct ScriptedApi {
        games: HashMap<String, Vec<GameSummary>>,
        details: HashMap<GameId, GameDetail>,
        searches: Mutex<Vec<String>>,
        detail_requests: Mutex<Vec<GameId>>,
    }

    #[async_trait]
    impl GameApi for ScriptedApi {
        async fn search_games(&self, title: &str) -> Result<Vec<GameSummary>, ApiError> {
            self.searches.lock().push(title.to_string());
            self.games
                .get(title)
                .cloned()
                .ok_or(ApiError::StatusError(StatusCode::INTERNAL_SERVER_ERROR))
        }

        async fn game_detail(&self, game_id: &GameId) -> Result<GameDetail, ApiError> {
            self.detail_requests.lock().push(game_id.clone());
            self.details
                .get(game_id)
                .cloned()
                .ok_or_else(|| ApiError::MissingDetail(game_id.clone()))
        }
    }

    /// Each search waits until the test releases its response.
    #[derive(Default)]
    struct GatedApi {
        gates: Mutex<HashMap<String, oneshot::Receiver<Vec<GameSummary>>>>,
    }

    impl GatedApi {
        fn gate(&self, title: &str) -> oneshot::Sender<Vec<GameSummary>> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().insert(title.to_string(), rx);
            tx
        }
    }

    #[async_trait]
    impl GameApi for GatedApi {
        async fn search_games(&self, title: &str) -> Result<Vec<GameSummary>, ApiError> {
            let gate = self.gates.lock().remove(title);
            match gate {
                Some(rx) => Ok(rx.await.unwrap_or_default()),
                None => Err(ApiError::StatusError(StatusCode::NOT_FOUND)),
            }
        }

        async fn game_detail(&self, game_id: &GameId) -> Result<GameDetail, ApiError> {
            Err(ApiError::MissingDetail(game_id.clone()))
        }
    }

    #[derive(Default)]
    struct RecordingReporter {
        failures: Mutex<Vec<(FetchKind, String)>>,
    }

    impl FailureReporter for RecordingReporter {
        fn report(&self, kind: FetchKind, error: &ApiError) {
            self.failures.lock().push((kind, error.to_string()));
        }
    }

    fn portal_api() -> ScriptedApi {
        let mut api = ScriptedApi::default();
        api.games.insert(
            "portal".to_string(),
            vec![game("2", "Portal 2", "9.99"), game("1", "Portal", "1.99")],
        );
        api.details.insert(GameId::new("1"), detail("Portal", 3));
        api.details.insert(GameId::new("2"), detail("Portal 2", 0));
        api
    }

    fn widget(api: ScriptedApi) -> SearchWidget<ScriptedApi, RecordingReporter> {
        SearchWidget::new(api, RecordingReporter::default())
    }

    fn titles(widget: &SearchWidget<ScriptedApi, RecordingReporter>) -> Vec<String> {
        widget.results().into_iter().map(|c| c.title).collect()
    }

    #[tokio::test]
    async fn test_short_input_clears_without_request() {
        let widget = widget(portal_api());
        assert_eq!(widget.on_input("portal").await, Outcome::Applied);
        assert_eq!(widget.results().len(), 2);

        assert_eq!(widget.on_input("  po ").await, Outcome::Cleared);

        assert!(widget.results().is_empty());
        assert_eq!(*widget.api().searches.lock(), vec!["portal".to_string()]);
    }

    #[tokio::test]
    async fn test_input_is_trimmed_and_threshold_counts_characters() {
        let mut api = portal_api();
        api.games.insert("día".to_string(), vec![game("9", "Día", "2")]);
        let widget = widget(api);

        assert_eq!(widget.on_input("  día  ").await, Outcome::Applied);
        assert_eq!(*widget.api().searches.lock(), vec!["día".to_string()]);
    }

    #[tokio::test]
    async fn test_results_render_in_api_order_and_resort_without_request() {
        let widget = widget(portal_api());

        widget.on_input("portal").await;
        assert_eq!(titles(&widget), ["Portal 2", "Portal"]);

        widget.set_sort_mode(SortMode::PriceAsc);
        assert_eq!(titles(&widget), ["Portal", "Portal 2"]);

        widget.set_sort_mode(SortMode::Unordered);
        assert_eq!(titles(&widget), ["Portal 2", "Portal"]);

        assert_eq!(widget.api().searches.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_sort_change_after_clear_redraws_last_results() {
        let widget = widget(portal_api());
        widget.on_input("portal").await;

        assert_eq!(widget.on_input("po").await, Outcome::Cleared);
        assert!(widget.results().is_empty());

        widget.set_sort_mode(SortMode::Alphabetical);

        assert_eq!(titles(&widget), ["Portal", "Portal 2"]);
        assert_eq!(widget.api().searches.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_render_is_idempotent() {
        let widget = widget(portal_api());
        widget.on_input("portal").await;

        let first = widget.results();
        widget.render_results();
        widget.render_results();

        assert_eq!(widget.results(), first);
    }

    #[tokio::test]
    async fn test_initial_sort_mode_applies_to_first_render() {
        let widget = widget(portal_api()).with_sort_mode(SortMode::Alphabetical);

        widget.on_input("portal").await;

        assert_eq!(widget.sort_mode(), SortMode::Alphabetical);
        assert_eq!(titles(&widget), ["Portal", "Portal 2"]);
    }

    #[tokio::test]
    async fn test_failed_search_keeps_previous_results() {
        let widget = widget(portal_api());
        widget.on_input("portal").await;

        assert_eq!(widget.on_input("unknown").await, Outcome::Failed);

        assert_eq!(titles(&widget), ["Portal 2", "Portal"]);
        let failures = widget.reporter().failures.lock();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, FetchKind::Search);
    }

    #[tokio::test]
    async fn test_stale_search_is_dropped_regardless_of_resolution_order() {
        let api = GatedApi::default();
        let first = api.gate("port");
        let second = api.gate("portal");
        let widget = SearchWidget::new(api, RecordingReporter::default());

        let (older, newer, _) = tokio::join!(
            widget.on_input("port"),
            widget.on_input("portal"),
            async {
                let _ = second.send(vec![game("1", "Portal", "1.99")]);
                tokio::task::yield_now().await;
                let _ = first.send(vec![game("7", "Porta Potty Simulator", "0.99")]);
            }
        );

        assert_eq!(newer, Outcome::Applied);
        assert_eq!(older, Outcome::Stale);
        let titles: Vec<String> = widget.results().into_iter().map(|c| c.title).collect();
        assert_eq!(titles, ["Portal"]);
    }

    #[tokio::test]
    async fn test_clearing_supersedes_search_in_flight() {
        let api = GatedApi::default();
        let pending = api.gate("portal");
        let widget = SearchWidget::new(api, RecordingReporter::default());

        let (searched, cleared, _) = tokio::join!(
            widget.on_input("portal"),
            widget.on_input(""),
            async {
                let _ = pending.send(vec![game("1", "Portal", "1.99")]);
            }
        );

        assert_eq!(cleared, Outcome::Cleared);
        assert_eq!(searched, Outcome::Stale);
        assert!(widget.results().is_empty());
    }

    #[tokio::test]
    async fn test_click_card_opens_detail() {
        let widget = widget(portal_api());
        widget.on_input("portal").await;

        assert_eq!(widget.click_card(1).await, Some(Outcome::Applied));

        assert_eq!(*widget.api().detail_requests.lock(), vec![GameId::new("1")]);
        let panel = widget.detail().unwrap();
        assert_eq!(panel.title, "Portal");
        assert_eq!(panel.score, "Metacritic Score: N/A");
        assert_eq!(panel.deals.map(|d| d.lines.len()), Some(3));
    }

    #[tokio::test]
    async fn test_click_outside_results_does_nothing() {
        let widget = widget(portal_api());

        assert_eq!(widget.click_card(0).await, None);
        assert!(widget.api().detail_requests.lock().is_empty());
    }

    #[tokio::test]
    async fn test_missing_detail_is_reported_and_panel_kept() {
        let widget = widget(portal_api());
        widget.open_detail(&GameId::new("2")).await;

        assert_eq!(
            widget.open_detail(&GameId::new("404")).await,
            Outcome::Failed
        );

        assert_eq!(widget.detail().map(|p| p.title), Some("Portal 2".to_string()));
        let failures = widget.reporter().failures.lock();
        assert_eq!(
            *failures,
            vec![(FetchKind::Detail, "No detail found for game 404".to_string())]
        );
    }

    #[tokio::test]
    async fn test_dismiss_clears_panel_and_search_keeps_it() {
        let widget = widget(portal_api());
        widget.open_detail(&GameId::new("2")).await;

        widget.on_input("portal").await;
        widget.on_input("").await;
        assert!(widget.results().is_empty());
        assert!(widget.detail().is_some());

        widget.dismiss_detail();
        assert_eq!(widget.detail(), None);
    }

    #[tokio::test]
    async fn test_reopening_a_game_fetches_again() {
        let widget = widget(portal_api());

        widget.open_detail(&GameId::new("1")).await;
        widget.open_detail(&GameId::new("1")).await;

        assert_eq!(widget.api().detail_requests.lock().len(), 2);
    }
}
