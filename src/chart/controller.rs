//! Chart lifecycle and data-refresh controller.
//!
//! The controller is the single authority over the user's symbol/timeframe
//! selection, the outbound data request, and the rendered chart instance. A
//! refresh snapshots the selection, dispatches the request on the async
//! runtime, and hands the completion back to the UI thread through a channel;
//! [`ChartController::poll`] applies completions in arrival order. Every
//! successful load replaces the chart instance wholesale: the previous
//! instance is released before its successor is constructed, so exactly one
//! instance is ever bound to the surface.
//!
//! There is no request fencing or cancellation. Overlapping refreshes are
//! allowed and the last response to arrive wins, regardless of issue order.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use crate::market::constant::is_valid_symbol;
use crate::market::datafeed::{ChartDataSource, DatafeedError};
use crate::market::object::{ChartData, Selection};

use super::base::{ChartStyle, LevelLineStyle, DEFAULT_CHART_STYLE, DEFAULT_LEVEL_STYLE};
use super::surface::{ChartInstance, ChartSurface};

/// Lifecycle state of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// No chart rendered yet
    Idle,
    /// A request is in flight
    Loading,
    /// A chart is bound to the surface
    Rendered,
    /// Torn down; terminal
    Destroyed,
}

/// Completion of one data request.
type FetchOutcome = Result<ChartData, DatafeedError>;

/// Owns the selection, the data requests, and the one live chart instance.
pub struct ChartController<S: ChartSurface> {
    /// Current symbol/timeframe choice
    selection: Selection,
    /// Lifecycle state
    state: ControllerState,
    /// Factory for chart instances
    surface: S,
    /// The one live chart, if any
    chart: Option<S::Instance>,
    /// Data source collaborator
    datafeed: Arc<dyn ChartDataSource>,
    /// Fixed visual configuration for every instance
    style: ChartStyle,
    /// Fixed level-line style
    level_style: LevelLineStyle,
    /// Runtime the requests are dispatched on
    runtime: Handle,
    /// Completion queue back to the UI thread
    outcome_tx: Sender<FetchOutcome>,
    outcome_rx: Receiver<FetchOutcome>,
    /// Message of the most recent failed refresh, cleared on success
    last_error: Option<String>,
}

impl<S: ChartSurface> ChartController<S> {
    /// Create a controller with the default selection.
    pub fn new(surface: S, datafeed: Arc<dyn ChartDataSource>, runtime: Handle) -> Self {
        let (outcome_tx, outcome_rx) = channel();
        Self {
            selection: Selection::default(),
            state: ControllerState::Idle,
            surface,
            chart: None,
            datafeed,
            style: DEFAULT_CHART_STYLE,
            level_style: DEFAULT_LEVEL_STYLE,
            runtime,
            outcome_tx,
            outcome_rx,
            last_error: None,
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_loading(&self) -> bool {
        self.state == ControllerState::Loading
    }

    /// Message of the most recent failed refresh, if the last refresh failed.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// The live chart instance, if one is rendered.
    pub fn chart(&self) -> Option<&S::Instance> {
        self.chart.as_ref()
    }

    pub fn chart_mut(&mut self) -> Option<&mut S::Instance> {
        self.chart.as_mut()
    }

    /// Change the selected symbol. Takes effect on the next refresh only.
    pub fn set_symbol(&mut self, symbol: &str) {
        if self.state == ControllerState::Destroyed {
            warn!("set_symbol ignored after teardown");
            return;
        }
        if !is_valid_symbol(symbol) {
            warn!("ignoring unknown symbol: {}", symbol);
            return;
        }
        self.selection.symbol = symbol.to_string();
    }

    /// Change the selected timeframe. Takes effect on the next refresh only.
    pub fn set_timeframe(&mut self, timeframe: crate::market::constant::Timeframe) {
        if self.state == ControllerState::Destroyed {
            warn!("set_timeframe ignored after teardown");
            return;
        }
        self.selection.timeframe = timeframe;
    }

    /// Mount hook: issue the initial data request.
    pub fn initialize(&mut self) {
        debug!("chart controller initializing");
        self.refresh();
    }

    /// Issue one data request carrying the current selection.
    ///
    /// The selection is snapshotted here; changing it while the request is in
    /// flight does not alter the request. An in-flight request is neither
    /// deduplicated nor cancelled.
    pub fn refresh(&mut self) {
        if self.state == ControllerState::Destroyed {
            warn!("refresh ignored after teardown");
            return;
        }

        let request = self.selection.to_request();
        info!("refreshing chart: {} {}", request.symbol, request.timeframe);
        self.state = ControllerState::Loading;

        let datafeed = self.datafeed.clone();
        let tx = self.outcome_tx.clone();
        self.runtime.spawn(async move {
            let outcome = datafeed.query_chart_data(&request).await;
            // The controller may already be gone; a dead channel is fine.
            let _ = tx.send(outcome);
        });
    }

    /// Apply completed request outcomes, in arrival order.
    ///
    /// Called every frame by the hosting shell; this is the completion edge of
    /// the async model, running on the UI thread.
    pub fn poll(&mut self) {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.apply_outcome(outcome);
        }
    }

    fn apply_outcome(&mut self, outcome: FetchOutcome) {
        if self.state == ControllerState::Destroyed {
            debug!("discarding response that completed after teardown");
            return;
        }

        match outcome {
            Ok(data) => {
                info!(
                    "chart data loaded: {} candles, {} levels",
                    data.candles.len(),
                    data.levels.len()
                );
                self.replace_chart(data);
                self.last_error = None;
                self.state = ControllerState::Rendered;
            }
            Err(err) => {
                warn!("chart refresh failed: {}", err);
                self.last_error = Some(err.to_string());
                // The prior chart, if any, stays untouched.
                self.state = if self.chart.is_some() {
                    ControllerState::Rendered
                } else {
                    ControllerState::Idle
                };
            }
        }
    }

    /// Release the current instance and build its replacement from `data`.
    ///
    /// The old instance's series is never mutated in place; a full rebuild
    /// guarantees a clean redraw with no stale overlay lines.
    fn replace_chart(&mut self, data: ChartData) {
        if let Some(mut old) = self.chart.take() {
            old.destroy();
        }

        let mut chart = self.surface.create_chart(&self.style);
        chart.set_series_data(data.candles);
        for price in &data.levels {
            chart.add_level_line(*price, &self.level_style);
        }
        chart.fit_visible_range();
        self.chart = Some(chart);
    }

    /// Unmount hook: release the chart instance. Terminal.
    pub fn teardown(&mut self) {
        if self.state == ControllerState::Destroyed {
            warn!("teardown called on a destroyed controller");
            return;
        }
        if let Some(mut chart) = self.chart.take() {
            chart.destroy();
        }
        self.state = ControllerState::Destroyed;
        info!("chart controller torn down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use reqwest::StatusCode;

    use crate::market::constant::Timeframe;
    use crate::market::datafeed::StaticDatafeed;
    use crate::market::object::{CandleData, ChartRequest};

    /// Shared ledger of what the surface created and released.
    #[derive(Default)]
    struct SurfaceLog {
        created: AtomicUsize,
        live: AtomicUsize,
        destroys: AtomicUsize,
    }

    struct StubChart {
        log: Arc<SurfaceLog>,
        candles: Vec<CandleData>,
        levels: Vec<f64>,
        fit_count: usize,
        destroyed: bool,
    }

    impl ChartInstance for StubChart {
        fn set_series_data(&mut self, candles: Vec<CandleData>) {
            assert!(!self.destroyed, "mutated a destroyed chart");
            self.candles = candles;
        }

        fn add_level_line(&mut self, price: f64, _style: &LevelLineStyle) {
            assert!(!self.destroyed, "mutated a destroyed chart");
            self.levels.push(price);
        }

        fn fit_visible_range(&mut self) {
            assert!(!self.destroyed, "mutated a destroyed chart");
            self.fit_count += 1;
        }

        fn destroy(&mut self) {
            if self.destroyed {
                return;
            }
            self.destroyed = true;
            self.log.live.fetch_sub(1, Ordering::SeqCst);
            self.log.destroys.fetch_add(1, Ordering::SeqCst);
        }

        fn is_destroyed(&self) -> bool {
            self.destroyed
        }
    }

    struct StubSurface {
        log: Arc<SurfaceLog>,
    }

    impl StubSurface {
        fn new() -> (Self, Arc<SurfaceLog>) {
            let log = Arc::new(SurfaceLog::default());
            (Self { log: log.clone() }, log)
        }
    }

    impl ChartSurface for StubSurface {
        type Instance = StubChart;

        fn create_chart(&mut self, _style: &ChartStyle) -> StubChart {
            self.log.created.fetch_add(1, Ordering::SeqCst);
            self.log.live.fetch_add(1, Ordering::SeqCst);
            StubChart {
                log: self.log.clone(),
                candles: Vec::new(),
                levels: Vec::new(),
                fit_count: 0,
                destroyed: false,
            }
        }
    }

    /// Datafeed that records every request and replays scripted outcomes.
    struct ScriptedDatafeed {
        requests: Mutex<Vec<ChartRequest>>,
        script: Mutex<VecDeque<Result<ChartData, ()>>>,
    }

    impl ScriptedDatafeed {
        fn new(script: Vec<Result<ChartData, ()>>) -> Arc<Self> {
            Arc::new(Self {
                requests: Mutex::new(Vec::new()),
                script: Mutex::new(script.into()),
            })
        }

        fn recorded_requests(&self) -> Vec<ChartRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChartDataSource for ScriptedDatafeed {
        async fn query_chart_data(&self, req: &ChartRequest) -> Result<ChartData, DatafeedError> {
            self.requests.lock().unwrap().push(req.clone());
            match self.script.lock().unwrap().pop_front() {
                Some(Ok(data)) => Ok(data),
                _ => Err(DatafeedError::Status(StatusCode::INTERNAL_SERVER_ERROR)),
            }
        }
    }

    fn sample_candle() -> CandleData {
        CandleData {
            time: 1.0,
            open: 1.0,
            high: 2.0,
            low: 0.5,
            close: 1.5,
        }
    }

    fn sample_data(levels: Vec<f64>) -> ChartData {
        ChartData {
            candles: vec![sample_candle()],
            levels,
        }
    }

    fn controller_with(
        datafeed: Arc<dyn ChartDataSource>,
    ) -> (ChartController<StubSurface>, Arc<SurfaceLog>) {
        let (surface, log) = StubSurface::new();
        let controller = ChartController::new(surface, datafeed, Handle::current());
        (controller, log)
    }

    /// Drive the runtime until the in-flight refresh has been applied.
    async fn pump(controller: &mut ChartController<StubSurface>) {
        for _ in 0..100 {
            tokio::task::yield_now().await;
            controller.poll();
            if !controller.is_loading() {
                return;
            }
        }
        panic!("refresh never completed");
    }

    #[tokio::test]
    async fn test_initial_state_is_idle() {
        let (controller, log) = controller_with(Arc::new(StaticDatafeed::new(sample_data(vec![]))));
        assert_eq!(controller.state(), ControllerState::Idle);
        assert!(controller.chart().is_none());
        assert_eq!(log.created.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_refresh_success_renders_example_scenario() {
        let datafeed = Arc::new(StaticDatafeed::new(sample_data(vec![1.75])));
        let (mut controller, log) = controller_with(datafeed);

        controller.refresh();
        assert_eq!(controller.state(), ControllerState::Loading);

        pump(&mut controller).await;
        assert_eq!(controller.state(), ControllerState::Rendered);
        assert!(controller.last_error().is_none());

        let chart = controller.chart().unwrap();
        assert_eq!(chart.candles, vec![sample_candle()]);
        assert_eq!(chart.levels, vec![1.75]);
        assert_eq!(chart.fit_count, 1);
        assert_eq!(log.live.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_initialize_issues_initial_request() {
        let datafeed = ScriptedDatafeed::new(vec![Ok(sample_data(vec![]))]);
        let (mut controller, _log) = controller_with(datafeed.clone());

        controller.initialize();
        pump(&mut controller).await;

        let requests = datafeed.recorded_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].symbol, "/ES=F");
        assert_eq!(requests[0].timeframe, Timeframe::Minute5);
    }

    #[tokio::test]
    async fn test_mutual_exclusion_one_live_instance() {
        let datafeed = Arc::new(StaticDatafeed::new(sample_data(vec![1.75])));
        let (mut controller, log) = controller_with(datafeed);

        controller.refresh();
        pump(&mut controller).await;
        controller.refresh();
        pump(&mut controller).await;

        assert_eq!(log.created.load(Ordering::SeqCst), 2);
        assert_eq!(log.live.load(Ordering::SeqCst), 1);
        assert_eq!(log.destroys.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_refresh_is_idempotent() {
        let datafeed = Arc::new(StaticDatafeed::new(sample_data(vec![1.75, 2.5])));
        let (mut controller, _log) = controller_with(datafeed);

        controller.refresh();
        pump(&mut controller).await;
        let first = {
            let chart = controller.chart().unwrap();
            (chart.candles.clone(), chart.levels.clone(), chart.fit_count)
        };

        controller.refresh();
        pump(&mut controller).await;
        let chart = controller.chart().unwrap();

        assert_eq!(chart.candles, first.0);
        assert_eq!(chart.levels, first.1);
        assert_eq!(chart.fit_count, first.2);
    }

    #[tokio::test]
    async fn test_level_line_count_matches_response() {
        for levels in [vec![], vec![1.75], vec![1.0, 2.0, 3.0, 4.0]] {
            let datafeed = Arc::new(StaticDatafeed::new(sample_data(levels.clone())));
            let (mut controller, _log) = controller_with(datafeed);

            controller.refresh();
            pump(&mut controller).await;
            assert_eq!(controller.chart().unwrap().levels, levels);
        }
    }

    #[tokio::test]
    async fn test_failure_preserves_prior_render() {
        let datafeed = ScriptedDatafeed::new(vec![Ok(sample_data(vec![1.75])), Err(())]);
        let (mut controller, log) = controller_with(datafeed);

        controller.refresh();
        pump(&mut controller).await;

        controller.refresh();
        assert_eq!(controller.state(), ControllerState::Loading);
        pump(&mut controller).await;

        // Prior chart untouched, state back to Rendered, failure recorded
        assert_eq!(controller.state(), ControllerState::Rendered);
        assert!(controller.last_error().is_some());
        let chart = controller.chart().unwrap();
        assert_eq!(chart.candles, vec![sample_candle()]);
        assert_eq!(chart.levels, vec![1.75]);
        assert_eq!(log.created.load(Ordering::SeqCst), 1);
        assert_eq!(log.destroys.load(Ordering::SeqCst), 0);

        // The controller is not locked: a later refresh still works
        controller.refresh();
        assert_eq!(controller.state(), ControllerState::Loading);
        pump(&mut controller).await;
    }

    #[tokio::test]
    async fn test_failure_before_first_render_returns_idle() {
        let datafeed = ScriptedDatafeed::new(vec![Err(())]);
        let (mut controller, log) = controller_with(datafeed);

        controller.refresh();
        pump(&mut controller).await;

        assert_eq!(controller.state(), ControllerState::Idle);
        assert!(controller.chart().is_none());
        assert_eq!(log.created.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_selection_change_does_not_alter_inflight_request() {
        let datafeed = ScriptedDatafeed::new(vec![Ok(sample_data(vec![])), Ok(sample_data(vec![]))]);
        let (mut controller, _log) = controller_with(datafeed.clone());

        controller.refresh();
        controller.set_symbol("TSLA");
        controller.set_timeframe(Timeframe::Daily);
        pump(&mut controller).await;

        // Only the next refresh picks up the new selection
        controller.refresh();
        pump(&mut controller).await;

        let requests = datafeed.recorded_requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].symbol, "/ES=F");
        assert_eq!(requests[0].timeframe, Timeframe::Minute5);
        assert_eq!(requests[1].symbol, "TSLA");
        assert_eq!(requests[1].timeframe, Timeframe::Daily);
    }

    #[tokio::test]
    async fn test_last_completed_response_wins() {
        let datafeed = Arc::new(StaticDatafeed::new(sample_data(vec![])));
        let (mut controller, log) = controller_with(datafeed);

        // Two overlapping refreshes: completions are applied in arrival
        // order, so the later arrival overwrites the earlier one even if its
        // request was issued first.
        let slow = ChartData {
            candles: vec![sample_candle()],
            levels: vec![1.0],
        };
        let fast = ChartData {
            candles: vec![sample_candle()],
            levels: vec![2.0],
        };

        controller.apply_outcome(Ok(fast));
        controller.apply_outcome(Ok(slow));

        let chart = controller.chart().unwrap();
        assert_eq!(chart.levels, vec![1.0]);
        assert_eq!(log.created.load(Ordering::SeqCst), 2);
        assert_eq!(log.live.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_teardown_releases_resource_exactly_once() {
        let datafeed = Arc::new(StaticDatafeed::new(sample_data(vec![1.75])));
        let (mut controller, log) = controller_with(datafeed);

        controller.refresh();
        pump(&mut controller).await;

        controller.teardown();
        assert_eq!(controller.state(), ControllerState::Destroyed);
        assert_eq!(log.live.load(Ordering::SeqCst), 0);
        assert_eq!(log.destroys.load(Ordering::SeqCst), 1);

        // Terminal: repeated teardown and further mutation are ignored
        controller.teardown();
        controller.set_symbol("TSLA");
        controller.set_timeframe(Timeframe::Daily);
        controller.refresh();
        assert_eq!(controller.state(), ControllerState::Destroyed);
        assert_eq!(controller.selection().symbol, "/ES=F");
        assert_eq!(log.destroys.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_late_response_after_teardown_is_discarded() {
        let datafeed = Arc::new(StaticDatafeed::new(sample_data(vec![])));
        let (mut controller, log) = controller_with(datafeed);

        controller.teardown();
        controller.apply_outcome(Ok(sample_data(vec![1.75])));

        assert_eq!(controller.state(), ControllerState::Destroyed);
        assert!(controller.chart().is_none());
        assert_eq!(log.created.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_set_symbol_rejects_unknown_values() {
        let datafeed = Arc::new(StaticDatafeed::new(sample_data(vec![])));
        let (mut controller, _log) = controller_with(datafeed);

        controller.set_symbol("AAPL");
        assert_eq!(controller.selection().symbol, "/ES=F");

        controller.set_symbol("/NQ=F");
        assert_eq!(controller.selection().symbol, "/NQ=F");
    }
}
