//! Refresh lifecycle for the live-scores view model.
//!
//! ```text
//!  start() ──▶ fixtures fetch ─┐
//!          ──▶ leagues fetch ──┤      ┌──────────────┐
//!  timer (every 120 s) ────────┼──▶   │  SyncCore    │ ──watch──▶ renderers
//!  refresh_now() ──────────────┘      │  ViewModel   │
//!                                     └──────────────┘
//! ```
//!
//! The scheduler is the only writer of the view model. Renderers read it
//! through a `watch` channel and write back only "refresh now" and
//! "select league" via [`SyncHandle`].
//!
//! Overlapping fixtures requests (a manual refresh racing a timer tick) are
//! tagged with increasing sequence numbers; a response is applied only if no
//! newer request has been issued since, so an old response can never
//! overwrite a newer snapshot.

use chrono::Utc;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::error::{LifecycleError, NetworkError};
use crate::live_scores::{normalize_leagues, normalize_matches, Endpoint, FootballDataSource};
use crate::models::{SyncFailure, ViewModel};

/// Shortest accepted refresh period; `interval_at` panics on a zero period.
const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerPhase {
    /// Constructed, not started
    Idle,
    /// Initial fixtures fetch in flight
    Starting,
    /// Steady state, periodic timer armed
    Live,
    /// Terminal: timer cancelled, no further fetches scheduled
    Stopped,
}

/// State shared by the scheduler, its timer task and every handle.
struct SyncCore {
    source: Arc<dyn FootballDataSource>,
    view: watch::Sender<ViewModel>,
    phase: watch::Sender<SchedulerPhase>,
    /// Sequence number of the most recently issued fixtures request.
    /// Only read or bumped while holding the view lock.
    issued: AtomicU64,
}

impl SyncCore {
    fn new(source: Arc<dyn FootballDataSource>) -> Self {
        let (view, _) = watch::channel(ViewModel::default());
        let (phase, _) = watch::channel(SchedulerPhase::Idle);
        SyncCore {
            source,
            view,
            phase,
            issued: AtomicU64::new(0),
        }
    }

    /// Allocate a sequence number for a new fixtures request and flag loading.
    fn issue_fixtures_request(&self) -> u64 {
        let mut seq = 0;
        self.view.send_if_modified(|vm| {
            seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
            let was_loading = vm.is_loading;
            vm.is_loading = true;
            !was_loading
        });
        seq
    }

    async fn refresh_fixtures(&self) {
        let seq = self.issue_fixtures_request();
        debug!("[{}] Fixtures request #{} issued", self.source.name(), seq);
        let outcome = self.source.fetch(Endpoint::live_fixtures()).await;
        self.apply_fixtures(seq, outcome);
    }

    /// Apply the outcome of fixtures request `seq`. Returns `false` when a newer
    /// request has been issued in the meantime and the outcome was discarded.
    fn apply_fixtures(&self, seq: u64, outcome: Result<Vec<Value>, NetworkError>) -> bool {
        let endpoint = Endpoint::live_fixtures();
        let source = self.source.name();

        let update = match outcome {
            Ok(records) => {
                let normalized = normalize_matches(&records);
                for rejected in &normalized.rejected {
                    warn!("[{}] Fixture {}", source, rejected);
                }
                Ok(normalized.items)
            }
            Err(e) => Err((SyncFailure::from_network(endpoint, &e), e)),
        };

        let failed = update.is_err();
        let mut applied = false;
        let mut summary = String::new();
        self.view.send_if_modified(|vm| {
            if self.issued.load(Ordering::SeqCst) != seq {
                return false;
            }
            applied = true;
            match update {
                Ok(matches) => {
                    summary = format!("{} live matches", matches.len());
                    vm.matches = matches;
                    vm.last_error = None;
                    vm.last_updated = Some(Utc::now());
                }
                Err((failure, e)) => {
                    summary = e.to_string();
                    vm.last_error = Some(failure);
                }
            }
            vm.is_loading = false;
            true
        });

        if !applied {
            debug!("[{}] Discarding superseded fixtures response #{}", source, seq);
            return false;
        }
        if failed {
            warn!(
                "[{}] Live scores fetch failed: {}; keeping previous snapshot",
                source, summary
            );
        } else {
            info!("[{}] Live scores updated: {}", source, summary);
        }

        self.phase.send_if_modified(|phase| {
            if *phase == SchedulerPhase::Starting {
                *phase = SchedulerPhase::Live;
                true
            } else {
                false
            }
        });
        true
    }

    async fn refresh_leagues(&self) {
        let source = self.source.name();
        match self.source.fetch(Endpoint::Leagues).await {
            Ok(records) => {
                let normalized = normalize_leagues(&records);
                for rejected in &normalized.rejected {
                    warn!("[{}] League {}", source, rejected);
                }
                info!("[{}] Loaded {} leagues", source, normalized.items.len());
                self.view.send_modify(|vm| {
                    vm.leagues = normalized.items;
                    vm.leagues_error = None;
                });
            }
            Err(e) => {
                warn!("[{}] Failed to fetch leagues: {}", source, e);
                let failure = SyncFailure::from_network(Endpoint::Leagues, &e);
                self.view.send_modify(|vm| vm.leagues_error = Some(failure));
            }
        }
    }
}

/// Cloneable consumer capability set: subscribe, refresh now, select league.
#[derive(Clone)]
pub struct SyncHandle {
    core: Arc<SyncCore>,
}

impl SyncHandle {
    pub fn subscribe(&self) -> watch::Receiver<ViewModel> {
        self.core.view.subscribe()
    }

    pub fn snapshot(&self) -> ViewModel {
        self.core.view.borrow().clone()
    }

    pub fn phase(&self) -> SchedulerPhase {
        *self.core.phase.borrow()
    }

    pub fn subscribe_phase(&self) -> watch::Receiver<SchedulerPhase> {
        self.core.phase.subscribe()
    }

    /// Out-of-band fixtures fetch. The periodic timer keeps its cadence.
    ///
    /// Resolves once the response has been applied (or discarded because a
    /// newer request overtook it). Dropping the future does not cancel the
    /// request.
    pub async fn refresh_now(&self) -> Result<(), LifecycleError> {
        match self.phase() {
            SchedulerPhase::Starting | SchedulerPhase::Live => {}
            other => return Err(LifecycleError::NotRunning(other)),
        }
        info!("Manual live-score refresh requested");
        let core = Arc::clone(&self.core);
        if let Err(e) = tokio::spawn(async move { core.refresh_fixtures().await }).await {
            warn!("Manual refresh task failed: {}", e);
        }
        Ok(())
    }

    /// Set or clear the league filter. An empty name clears it. Never fetches.
    pub fn select_league(&self, league: Option<&str>) {
        let league = league
            .filter(|name| !name.trim().is_empty())
            .map(str::to_string);
        self.core.view.send_if_modified(|vm| {
            if vm.selected_league == league {
                return false;
            }
            debug!("League filter: {:?}", league);
            vm.selected_league = league;
            true
        });
    }
}

/// Owns the refresh lifecycle and the periodic timer.
///
/// A stopped scheduler cannot be restarted; build a new one for a fresh
/// session. Dropping the scheduler cancels its timer.
pub struct SyncScheduler {
    handle: SyncHandle,
    refresh_interval: Duration,
    timer: Option<JoinHandle<()>>,
}

impl SyncScheduler {
    /// `refresh_interval` is clamped to at least one second.
    pub fn new(source: Arc<dyn FootballDataSource>, refresh_interval: Duration) -> Self {
        if refresh_interval < MIN_REFRESH_INTERVAL {
            warn!(
                "Refresh interval {:?} too short, using {:?}",
                refresh_interval, MIN_REFRESH_INTERVAL
            );
        }
        let refresh_interval = refresh_interval.max(MIN_REFRESH_INTERVAL);
        SyncScheduler {
            handle: SyncHandle {
                core: Arc::new(SyncCore::new(source)),
            },
            refresh_interval,
            timer: None,
        }
    }

    /// Idle → Starting: fetch fixtures and leagues once, then arm the timer.
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self) -> Result<(), LifecycleError> {
        let core = &self.handle.core;
        let mut previous = SchedulerPhase::Idle;
        let started = core.phase.send_if_modified(|phase| {
            previous = *phase;
            if *phase == SchedulerPhase::Idle {
                *phase = SchedulerPhase::Starting;
                true
            } else {
                false
            }
        });
        if !started {
            return Err(LifecycleError::AlreadyStarted(previous));
        }

        info!(
            "Live-score sync started (source: {}, interval={:?})",
            core.source.name(),
            self.refresh_interval
        );

        let fixtures_core = Arc::clone(core);
        tokio::spawn(async move { fixtures_core.refresh_fixtures().await });

        let leagues_core = Arc::clone(core);
        tokio::spawn(async move { leagues_core.refresh_leagues().await });

        self.timer = Some(spawn_refresh_timer(Arc::clone(core), self.refresh_interval));
        Ok(())
    }

    /// Cancel the timer and enter `Stopped`. Requests already in flight may
    /// still complete and update the view model.
    pub fn stop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        let previous = self.handle.core.phase.send_replace(SchedulerPhase::Stopped);
        if previous != SchedulerPhase::Stopped {
            info!("Live-score sync stopped (was {:?})", previous);
        }
    }

    pub fn handle(&self) -> SyncHandle {
        self.handle.clone()
    }

    pub fn snapshot(&self) -> ViewModel {
        self.handle.snapshot()
    }

    pub fn phase(&self) -> SchedulerPhase {
        self.handle.phase()
    }

    pub fn select_league(&self, league: Option<&str>) {
        self.handle.select_league(league)
    }
}

impl Drop for SyncScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Fire a fixtures fetch every `period`, first tick one period after arming.
/// Each fetch runs in its own task so aborting the timer never cuts a
/// request short.
fn spawn_refresh_timer(core: Arc<SyncCore>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            // abort() only lands at the next await point
            if *core.phase.borrow() == SchedulerPhase::Stopped {
                break;
            }
            debug!("Periodic live-score refresh");
            let core = Arc::clone(&core);
            tokio::spawn(async move { core.refresh_fixtures().await });
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FixtureId;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(120);

    enum Reply {
        Now(Result<Vec<Value>, NetworkError>),
        Gated(Arc<Notify>, Result<Vec<Value>, NetworkError>),
    }

    /// In-memory source replaying scripted replies; an exhausted script
    /// answers with an empty payload.
    #[derive(Default)]
    struct ScriptedSource {
        fixtures: Mutex<VecDeque<Reply>>,
        leagues: Mutex<VecDeque<Reply>>,
        fixture_calls: AtomicUsize,
        league_calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(fixtures: Vec<Reply>, leagues: Vec<Reply>) -> Arc<Self> {
            Arc::new(ScriptedSource {
                fixtures: Mutex::new(fixtures.into()),
                leagues: Mutex::new(leagues.into()),
                ..Default::default()
            })
        }

        fn fixture_calls(&self) -> usize {
            self.fixture_calls.load(Ordering::SeqCst)
        }

        fn league_calls(&self) -> usize {
            self.league_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl FootballDataSource for ScriptedSource {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn fetch(&self, endpoint: Endpoint) -> Result<Vec<Value>, NetworkError> {
            let (calls, script) = match endpoint {
                Endpoint::Fixtures { .. } => (&self.fixture_calls, &self.fixtures),
                Endpoint::Leagues => (&self.league_calls, &self.leagues),
            };
            calls.fetch_add(1, Ordering::SeqCst);
            let reply = script.lock().unwrap().pop_front();
            match reply {
                Some(Reply::Now(result)) => result,
                Some(Reply::Gated(gate, result)) => {
                    gate.notified().await;
                    result
                }
                None => Ok(vec![]),
            }
        }
    }

    fn fixture(id: u64, league: &str, home_goals: u32) -> Value {
        json!({
            "fixture": {"id": id, "status": {"short": "2H", "elapsed": 60}},
            "league": {"name": league},
            "teams": {
                "home": {"name": format!("Home {}", id)},
                "away": {"name": format!("Away {}", id)}
            },
            "goals": {"home": home_goals, "away": 0}
        })
    }

    fn league(id: u64, name: &str) -> Value {
        json!({
            "league": {"id": id, "name": name, "type": "League"},
            "country": {"name": "England"}
        })
    }

    fn ok(records: Vec<Value>) -> Reply {
        Reply::Now(Ok(records))
    }

    fn server_error() -> Reply {
        Reply::Now(Err(NetworkError::Status {
            status: 500,
            body: "boom".into(),
        }))
    }

    fn ids(vm: &ViewModel) -> Vec<FixtureId> {
        vm.matches.iter().map(|m| m.id.clone()).collect()
    }

    async fn wait_until(rx: &mut watch::Receiver<ViewModel>, f: impl FnMut(&ViewModel) -> bool) {
        rx.wait_for(f).await.expect("view model sender dropped");
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_fetches_fixtures_and_leagues() {
        let source = ScriptedSource::new(
            vec![ok(vec![fixture(1, "Premier League", 2), fixture(2, "La Liga", 0)])],
            vec![ok(vec![league(39, "Premier League"), league(140, "La Liga")])],
        );
        let mut scheduler = SyncScheduler::new(source.clone(), DEFAULT_REFRESH_INTERVAL);
        let mut rx = scheduler.handle().subscribe();
        assert!(rx.borrow().is_loading);
        assert_eq!(scheduler.phase(), SchedulerPhase::Idle);

        scheduler.start().unwrap();
        wait_until(&mut rx, |vm| !vm.is_loading && vm.leagues.len() == 2).await;

        let vm = scheduler.snapshot();
        assert_eq!(ids(&vm), vec![FixtureId::Number(1), FixtureId::Number(2)]);
        assert_eq!(vm.matches[0].home_score, 2);
        assert!(vm.last_error.is_none());
        assert!(vm.last_updated.is_some());
        assert_eq!(scheduler.phase(), SchedulerPhase::Live);
        assert_eq!((source.fixture_calls(), source.league_calls()), (1, 1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_keeps_stale_matches() {
        let source = ScriptedSource::new(
            vec![
                ok(vec![fixture(1, "Premier League", 1)]),
                server_error(),
                ok(vec![fixture(7, "Premier League", 3)]),
            ],
            vec![],
        );
        let mut scheduler = SyncScheduler::new(source.clone(), DEFAULT_REFRESH_INTERVAL);
        let mut rx = scheduler.handle().subscribe();
        scheduler.start().unwrap();
        wait_until(&mut rx, |vm| vm.last_updated.is_some()).await;
        let before = scheduler.snapshot();

        scheduler.handle().refresh_now().await.unwrap();
        let after = scheduler.snapshot();
        assert_eq!(after.matches, before.matches);
        assert!(!after.is_loading);
        let failure = after.last_error.expect("error should be surfaced");
        assert_eq!(failure.message, "Failed to fetch live scores");
        assert!(failure.detail.contains("500"));

        // Next successful fetch clears the error and replaces the snapshot
        scheduler.handle().refresh_now().await.unwrap();
        let recovered = scheduler.snapshot();
        assert!(recovered.last_error.is_none());
        assert_eq!(ids(&recovered), vec![FixtureId::Number(7)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_failure_goes_live_and_timer_recovers() {
        let source = ScriptedSource::new(
            vec![server_error(), ok(vec![fixture(3, "Serie A", 0)])],
            vec![],
        );
        let mut scheduler = SyncScheduler::new(source.clone(), DEFAULT_REFRESH_INTERVAL);
        let mut rx = scheduler.handle().subscribe();
        scheduler.start().unwrap();
        wait_until(&mut rx, |vm| vm.last_error.is_some()).await;
        assert_eq!(scheduler.phase(), SchedulerPhase::Live);
        assert!(scheduler.snapshot().matches.is_empty());

        tokio::time::sleep(Duration::from_secs(121)).await;
        wait_until(&mut rx, |vm| vm.last_updated.is_some()).await;
        let vm = scheduler.snapshot();
        assert!(vm.last_error.is_none());
        assert_eq!(ids(&vm), vec![FixtureId::Number(3)]);
        assert_eq!(source.fixture_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_refetches_fixtures_but_not_leagues() {
        let source = ScriptedSource::new(vec![], vec![ok(vec![league(39, "Premier League")])]);
        let mut scheduler = SyncScheduler::new(source.clone(), DEFAULT_REFRESH_INTERVAL);
        scheduler.start().unwrap();

        tokio::time::sleep(Duration::from_secs(361)).await;
        assert_eq!(source.fixture_calls(), 4);
        assert_eq!(source.league_calls(), 1);
        assert_eq!(scheduler.snapshot().leagues.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_clamped_to_one_second() {
        let source = ScriptedSource::new(vec![], vec![]);
        let mut scheduler = SyncScheduler::new(source.clone(), Duration::ZERO);
        scheduler.start().unwrap();

        // Initial fetch plus ticks at t=1s and t=2s
        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(source.fixture_calls(), 3);
        assert_eq!(scheduler.phase(), SchedulerPhase::Live);
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_refresh_keeps_timer_cadence() {
        let source = ScriptedSource::new(vec![], vec![]);
        let mut scheduler = SyncScheduler::new(source.clone(), DEFAULT_REFRESH_INTERVAL);
        scheduler.start().unwrap();

        tokio::time::sleep(Duration::from_secs(60)).await;
        scheduler.handle().refresh_now().await.unwrap();
        assert_eq!(source.fixture_calls(), 2);

        // Timer still fires at t=120s, not 60s after the manual refresh
        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(source.fixture_calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_timer_and_rejects_restart() {
        let source = ScriptedSource::new(vec![], vec![]);
        let mut scheduler = SyncScheduler::new(source.clone(), DEFAULT_REFRESH_INTERVAL);
        let mut rx = scheduler.handle().subscribe();
        scheduler.start().unwrap();
        wait_until(&mut rx, |vm| !vm.is_loading).await;

        scheduler.stop();
        assert_eq!(scheduler.phase(), SchedulerPhase::Stopped);
        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(source.fixture_calls(), 1);

        assert_eq!(
            scheduler.handle().refresh_now().await,
            Err(LifecycleError::NotRunning(SchedulerPhase::Stopped))
        );
        assert_eq!(
            scheduler.start(),
            Err(LifecycleError::AlreadyStarted(SchedulerPhase::Stopped))
        );
        assert_eq!(source.fixture_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_scheduler_cancels_timer() {
        let source = ScriptedSource::new(vec![], vec![]);
        let mut scheduler = SyncScheduler::new(source.clone(), DEFAULT_REFRESH_INTERVAL);
        let handle = scheduler.handle();
        scheduler.start().unwrap();
        drop(scheduler);

        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(source.fixture_calls(), 1);
        assert_eq!(handle.phase(), SchedulerPhase::Stopped);
        assert!(handle.refresh_now().await.is_err());
        // The last snapshot stays readable through surviving handles
        assert!(!handle.snapshot().is_loading);
    }

    #[tokio::test]
    async fn test_refresh_before_start_rejected() {
        let source = ScriptedSource::new(vec![], vec![]);
        let scheduler = SyncScheduler::new(source, DEFAULT_REFRESH_INTERVAL);
        assert_eq!(
            scheduler.handle().refresh_now().await,
            Err(LifecycleError::NotRunning(SchedulerPhase::Idle))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_league_filters_without_fetching() {
        let source = ScriptedSource::new(
            vec![ok(vec![
                fixture(1, "Premier League", 0),
                fixture(2, "La Liga", 0),
                fixture(3, "Premier League", 0),
            ])],
            vec![],
        );
        let mut scheduler = SyncScheduler::new(source.clone(), DEFAULT_REFRESH_INTERVAL);
        let mut rx = scheduler.handle().subscribe();
        scheduler.start().unwrap();
        wait_until(&mut rx, |vm| vm.matches.len() == 3).await;

        scheduler.select_league(Some("Premier League"));
        let vm = scheduler.snapshot();
        assert_eq!(vm.selected_league.as_deref(), Some("Premier League"));
        let visible: Vec<_> = vm.visible_matches().into_iter().map(|m| m.id.clone()).collect();
        assert_eq!(visible, vec![FixtureId::Number(1), FixtureId::Number(3)]);
        assert!(vm.visible_matches().iter().all(|m| m.league == "Premier League"));

        scheduler.select_league(None);
        assert_eq!(scheduler.snapshot().visible_matches().len(), 3);

        scheduler.select_league(Some("La Liga"));
        scheduler.select_league(Some(""));
        assert_eq!(scheduler.snapshot().selected_league, None);

        assert_eq!(source.fixture_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_leagues_failure_does_not_touch_matches() {
        let source = ScriptedSource::new(
            vec![ok(vec![fixture(1, "Premier League", 0)])],
            vec![Reply::Now(Err(NetworkError::Unauthorized("HTTP 403".into())))],
        );
        let mut scheduler = SyncScheduler::new(source.clone(), DEFAULT_REFRESH_INTERVAL);
        let mut rx = scheduler.handle().subscribe();
        scheduler.start().unwrap();
        wait_until(&mut rx, |vm| vm.leagues_error.is_some() && !vm.is_loading).await;

        let vm = scheduler.snapshot();
        assert!(vm.leagues.is_empty());
        assert!(vm.last_error.is_none());
        assert_eq!(vm.matches.len(), 1);
        assert_eq!(vm.leagues_error.unwrap().message, "Failed to fetch leagues");
    }

    #[tokio::test]
    async fn test_older_response_never_overwrites_newer() {
        let gate = Arc::new(Notify::new());
        let source = ScriptedSource::new(
            vec![
                Reply::Gated(gate.clone(), Ok(vec![fixture(1, "Old", 0)])),
                ok(vec![fixture(2, "New", 0)]),
            ],
            vec![],
        );
        let core = Arc::new(SyncCore::new(source.clone()));

        let slow_core = Arc::clone(&core);
        let slow = tokio::spawn(async move { slow_core.refresh_fixtures().await });
        while source.fixture_calls() == 0 {
            tokio::task::yield_now().await;
        }
        assert!(core.view.borrow().is_loading);

        core.refresh_fixtures().await;
        assert_eq!(ids(&core.view.borrow()), vec![FixtureId::Number(2)]);

        gate.notify_one();
        slow.await.unwrap();
        let vm = core.view.borrow().clone();
        assert_eq!(ids(&vm), vec![FixtureId::Number(2)]);
        assert!(!vm.is_loading);
    }

    #[test]
    fn test_superseded_outcome_discarded() {
        let core = SyncCore::new(ScriptedSource::new(vec![], vec![]));
        let first = core.issue_fixtures_request();
        let second = core.issue_fixtures_request();
        assert!(second > first);

        // The older request resolving first is discarded; loading continues
        assert!(!core.apply_fixtures(first, Ok(vec![fixture(1, "A", 0)])));
        assert!(core.view.borrow().is_loading);
        assert!(core.view.borrow().matches.is_empty());

        assert!(core.apply_fixtures(second, Ok(vec![fixture(2, "B", 0)])));
        assert!(!core.view.borrow().is_loading);
        assert_eq!(ids(&core.view.borrow()), vec![FixtureId::Number(2)]);

        // A failure from the stale request cannot set an error either
        assert!(!core.apply_fixtures(first, Err(NetworkError::RateLimited)));
        assert!(core.view.borrow().last_error.is_none());
    }
}
