//! Application state and the refresh driver.
//!
//! Everything the screen shows lives here: the latest quote snapshot, the
//! monitoring engine, the style registry, and the auto-refresh state. All
//! of it is mutated from a single control task; a refresh runs to
//! completion before the next timer tick or keystroke is serviced, so at
//! most one refresh is ever in flight.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Local};
use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind};
use futures::StreamExt;
use ratatui::{Terminal, backend::Backend};
use tokio::time::Instant;
use tracing::warn;

use engine::monitor::{MonitorConfig, MonitorEngine};
use engine::quote::Quote;
use engine::threshold::{CrossingKind, CustomThreshold};
use engine::time::Clock;
use market::QuoteSource;

use crate::notify::NotificationSink;
use crate::style::StyleRegistry;
use crate::table;
use crate::ui;

pub struct AppOptions {
    /// Exchange-prefixed instrument ids, in display order.
    pub instruments: Vec<String>,
    pub thresholds: BTreeMap<String, CustomThreshold>,
    pub monitor: MonitorConfig,
    pub refresh_secs: u64,
    pub palette_on: bool,
    pub auto_refresh: bool,
}

pub struct App {
    pub instruments: Vec<String>,
    pub quotes: HashMap<String, Quote>,
    /// Snapshot from the refresh before the current one; drives the
    /// per-refresh tick column.
    pub prior_quotes: HashMap<String, Quote>,
    pub registry: StyleRegistry,
    pub auto_refresh: bool,
    pub refresh_secs: u64,
    pub scroll: u16,
    pub status: Option<String>,
    pub last_refresh: Option<DateTime<Local>>,
    pub should_quit: bool,

    engine: MonitorEngine,
    thresholds: BTreeMap<String, CustomThreshold>,
    source: Arc<dyn QuoteSource>,
    sink: Arc<dyn NotificationSink>,
    clock: Box<dyn Clock>,
}

impl App {
    pub fn new(
        options: AppOptions,
        source: Arc<dyn QuoteSource>,
        sink: Arc<dyn NotificationSink>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            instruments: options.instruments,
            quotes: HashMap::new(),
            prior_quotes: HashMap::new(),
            registry: StyleRegistry::new(options.palette_on),
            auto_refresh: options.auto_refresh,
            refresh_secs: options.refresh_secs,
            scroll: 0,
            status: None,
            last_refresh: None,
            should_quit: false,
            engine: MonitorEngine::new(options.monitor),
            thresholds: options.thresholds,
            source,
            sink,
            clock,
        }
    }

    /// Run one refresh cycle: fetch, feed the engine, deliver whatever
    /// fired. Never fails; a fetch error keeps the previous snapshot and
    /// leaves the next cycle unaffected.
    pub async fn refresh(&mut self) {
        let fetched = match self.source.fetch(&self.instruments).await {
            Ok(quotes) => quotes,
            Err(e) => {
                warn!(error = %e, "quote fetch failed; keeping previous snapshot");
                self.status = Some(format!("fetch failed: {e}"));
                return;
            }
        };

        let now = self.clock.now_time();
        let outcome = self.engine.on_refresh(fetched.clone(), &self.thresholds, now);

        for alert in &outcome.fired {
            let direction = if alert.swing_pct >= 0.0 { "up" } else { "down" };
            let message = format!(
                "{} moved {direction} {:.2}% at {}",
                alert.display_name,
                alert.swing_pct.abs(),
                alert.triggered_at,
            );
            self.deliver("Rapid move", &message);
            self.status = Some(message);
        }

        for crossing in &outcome.crossings {
            let name = fetched
                .get(&crossing.instrument_id)
                .map(|q| q.display_name.as_str())
                .unwrap_or(crossing.instrument_id.as_str());
            let message = match crossing.kind {
                CrossingKind::Price => {
                    format!("{name} crossed price threshold at {:.2}", crossing.value)
                }
                CrossingKind::Fluctuation => {
                    format!("{name} crossed fluctuation threshold at {:.2}%", crossing.value)
                }
            };
            self.deliver("Threshold crossed", &message);
            self.status = Some(message);
        }

        self.prior_quotes = std::mem::replace(&mut self.quotes, fetched);
        self.last_refresh = Some(Local::now());
    }

    /// Sinks are untrusted; a panicking sink must not take the cycle down.
    fn deliver(&self, title: &str, message: &str) {
        let delivered = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            self.sink.notify(title, message);
        }));
        if delivered.is_err() {
            warn!(title = %title, "notification sink panicked");
        }
    }

    /// Colorized table for the current snapshot, in configured instrument
    /// order. Instruments the feed failed to resolve this run are simply
    /// absent.
    pub fn table_text(&self) -> String {
        let rows: Vec<&Quote> = self
            .instruments
            .iter()
            .filter_map(|id| self.quotes.get(id))
            .collect();
        let alerted: HashSet<String> = self
            .engine
            .active_alerts()
            .iter()
            .map(|a| a.instrument_id.clone())
            .collect();

        table::render(&rows, &self.prior_quotes, &alerted)
    }

    /// One display line per active rapid-move alert.
    pub fn alert_lines(&self) -> Vec<String> {
        self.engine
            .active_alerts()
            .iter()
            .map(|a| {
                format!(
                    "{} {} {:.2}% @ {}",
                    a.instrument_id,
                    a.display_name,
                    a.swing_pct,
                    a.triggered_at,
                )
            })
            .collect()
    }

    pub fn toggle_palette(&mut self) {
        self.registry.toggle();
    }

    pub fn scroll_by(&mut self, delta: i32) {
        let next = i32::from(self.scroll) + delta;
        self.scroll = next.clamp(0, u16::MAX.into()) as u16;
    }
}

/// Drive the screen: redraw, then wait for either a keystroke or the
/// refresh deadline. Disabling auto-refresh stops future firings
/// deterministically (the timer branch is simply not polled); re-enabling
/// schedules a cycle with zero delay; a manual refresh re-arms the
/// pending timer. The `select!` is the single writer of all shared state.
pub async fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let mut events = EventStream::new();
    let period = Duration::from_secs(app.refresh_secs.max(1));
    let mut next_refresh = Instant::now();

    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;

        tokio::select! {
            maybe = events.next() => {
                match maybe {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        match key.code {
                            KeyCode::Char('q') | KeyCode::Char('Q') => app.should_quit = true,
                            KeyCode::Char('r') | KeyCode::Char('R') => {
                                app.refresh().await;
                                next_refresh = Instant::now() + period;
                            }
                            KeyCode::Char('a') | KeyCode::Char('A') => {
                                app.auto_refresh = !app.auto_refresh;
                                if app.auto_refresh {
                                    next_refresh = Instant::now();
                                }
                            }
                            KeyCode::Char('c') | KeyCode::Char('C') => app.toggle_palette(),
                            KeyCode::Up => app.scroll_by(-1),
                            KeyCode::Down => app.scroll_by(1),
                            KeyCode::PageUp => app.scroll_by(-10),
                            KeyCode::PageDown => app.scroll_by(10),
                            _ => {}
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                }
            }
            _ = tokio::time::sleep_until(next_refresh), if app.auto_refresh => {
                app.refresh().await;
                next_refresh = Instant::now() + period;
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::NaiveDate;
    use market::QuoteFeedError;

    use engine::alert::AlertExpiry;
    use engine::fluctuation::FluctuationConfig;
    use engine::time::TradeTime;

    use super::*;
    use crate::notify::testing::RecordingSink;

    /// Replays canned fetch results in order; errors once drained.
    struct ScriptedSource {
        batches: Mutex<VecDeque<HashMap<String, Quote>>>,
    }

    impl ScriptedSource {
        fn new(batches: Vec<HashMap<String, Quote>>) -> Self {
            Self {
                batches: Mutex::new(batches.into()),
            }
        }
    }

    #[async_trait]
    impl QuoteSource for ScriptedSource {
        async fn fetch(
            &self,
            _instruments: &[String],
        ) -> Result<HashMap<String, Quote>, QuoteFeedError> {
            self.batches.lock().unwrap().pop_front().ok_or_else(|| {
                QuoteFeedError::MalformedLine {
                    instrument: "scripted".into(),
                    reason: "out of batches".into(),
                }
            })
        }
    }

    struct FixedClock(TradeTime);

    impl Clock for FixedClock {
        fn now_time(&self) -> TradeTime {
            self.0
        }
    }

    fn quote(id: &str, time: &str, price: f64, prev_close: f64) -> Quote {
        Quote {
            instrument_id: id.into(),
            display_name: format!("{id}-name"),
            open: prev_close,
            prev_close,
            price,
            high: price,
            low: price,
            volume: 100,
            turnover: 1_000.0,
            date: NaiveDate::from_ymd_opt(2024, 11, 29).unwrap(),
            time: TradeTime::parse(time).unwrap(),
        }
    }

    fn snapshot(quotes: &[Quote]) -> HashMap<String, Quote> {
        quotes
            .iter()
            .map(|q| (q.instrument_id.clone(), q.clone()))
            .collect()
    }

    fn app_with(source: ScriptedSource, sink: RecordingSink) -> App {
        App::new(
            AppOptions {
                instruments: vec!["sz002583".into()],
                thresholds: BTreeMap::new(),
                monitor: MonitorConfig {
                    fluctuation: FluctuationConfig {
                        window_secs: 30,
                        threshold_pct: 2.0,
                    },
                    expiry: AlertExpiry::default(),
                },
                refresh_secs: 3,
                palette_on: true,
                auto_refresh: false,
            },
            Arc::new(source),
            Arc::new(sink),
            Box::new(FixedClock(TradeTime::parse("13:00:10").unwrap())),
        )
    }

    #[tokio::test]
    async fn refresh_raises_alert_and_delivers_notification() {
        let source = ScriptedSource::new(vec![
            snapshot(&[quote("sz002583", "13:00:00", 10.0, 10.0)]),
            snapshot(&[quote("sz002583", "13:00:10", 10.25, 10.0)]),
        ]);
        let sink = RecordingSink::default();
        let delivered = sink.delivered.clone();
        let mut app = app_with(source, sink);

        app.refresh().await;
        assert!(delivered.lock().unwrap().is_empty());

        app.refresh().await;
        let delivered = delivered.lock().unwrap();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].0, "Rapid move");
        assert!(delivered[0].1.contains("2.50%"));

        assert_eq!(app.alert_lines().len(), 1);
        // The prior snapshot moved over for the tick column.
        assert!((app.prior_quotes["sz002583"].price - 10.0).abs() < 1e-9);
        assert!((app.quotes["sz002583"].price - 10.25).abs() < 1e-9);
    }

    #[tokio::test]
    async fn fetch_failure_keeps_snapshot_and_completes_the_cycle() {
        let source = ScriptedSource::new(vec![snapshot(&[quote(
            "sz002583",
            "13:00:00",
            10.0,
            10.0,
        )])]);
        let sink = RecordingSink::default();
        let mut app = app_with(source, sink);

        app.refresh().await;
        assert_eq!(app.quotes.len(), 1);

        // Source is drained: the next cycle fails to fetch but must keep
        // the previous snapshot and surface the failure in the status.
        app.refresh().await;
        assert_eq!(app.quotes.len(), 1);
        assert!(app.status.as_deref().unwrap_or("").contains("fetch failed"));
    }

    #[tokio::test]
    async fn panicking_sink_does_not_abort_the_cycle() {
        struct ExplodingSink;

        impl NotificationSink for ExplodingSink {
            fn notify(&self, _title: &str, _message: &str) {
                panic!("sink is broken");
            }
        }

        let source = ScriptedSource::new(vec![
            snapshot(&[quote("sz002583", "13:00:00", 10.0, 10.0)]),
            snapshot(&[quote("sz002583", "13:00:10", 10.25, 10.0)]),
        ]);
        let mut app = App::new(
            AppOptions {
                instruments: vec!["sz002583".into()],
                thresholds: BTreeMap::new(),
                monitor: MonitorConfig {
                    fluctuation: FluctuationConfig {
                        window_secs: 30,
                        threshold_pct: 2.0,
                    },
                    expiry: AlertExpiry::default(),
                },
                refresh_secs: 3,
                palette_on: true,
                auto_refresh: false,
            },
            Arc::new(source),
            Arc::new(ExplodingSink),
            Box::new(FixedClock(TradeTime::parse("13:00:10").unwrap())),
        );

        app.refresh().await;
        app.refresh().await;

        // The alert still landed even though delivery blew up.
        assert_eq!(app.alert_lines().len(), 1);
        assert!((app.quotes["sz002583"].price - 10.25).abs() < 1e-9);
    }

    #[tokio::test]
    async fn table_rows_follow_configured_instrument_order() {
        let source = ScriptedSource::new(vec![snapshot(&[
            quote("sz000002", "13:00:00", 20.0, 20.0),
            quote("sz000001", "13:00:00", 10.0, 10.0),
        ])]);
        let sink = RecordingSink::default();
        let mut app = app_with(source, sink);
        app.instruments = vec!["sz000002".into(), "sz000001".into()];

        app.refresh().await;
        let text = app.table_text();
        let first = text.find("sz000002-name").unwrap();
        let second = text.find("sz000001-name").unwrap();
        assert!(first < second);
    }
}
