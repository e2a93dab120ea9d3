//! Session Manager for the interactive monitor lifecycle
//!
//! One owning event loop is the only writer of `SharedState`: stream
//! events, snapshot results and input lines all funnel into it over
//! channels, and a reconfiguration transition completes before the loop
//! polls for the next event.

use std::time::Duration;

use anyhow::Result;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::market_data::{SharedState, StreamStatus, TimeBucket};
use crate::polymarket::{RtdsStream, StreamEvent};
use crate::ui;
use crate::vatic::TargetsClient;

use super::action_channel::{ActionChannel, SessionEvent};
use super::configurator;

/// Main session manager driving the stream, the poller and the presenter
pub struct SessionManager {
    /// Application configuration
    config: Config,
    /// Live price stream client
    stream: RtdsStream,
    /// Events from the stream reader task
    stream_rx: tokio::sync::mpsc::UnboundedReceiver<StreamEvent>,
    /// Targets API client, cloned into each poll task
    targets: TargetsClient,
    /// Action channel
    action: ActionChannel,
    /// Lines typed by the user
    input_rx: tokio::sync::mpsc::UnboundedReceiver<String>,
}

impl SessionManager {
    /// Create a new SessionManager
    pub fn new(config: Config) -> Self {
        info!("Creating new SessionManager");

        let (stream, stream_rx) = RtdsStream::new(
            config.polymarket.ws_url.clone(),
            Duration::from_secs(config.polymarket.reconnect_delay_secs),
        );

        let targets = TargetsClient::new(
            config.vatic.base_url.clone(),
            Duration::from_secs(config.vatic.timeout_seconds),
        );

        Self {
            config,
            stream,
            stream_rx,
            targets,
            action: ActionChannel::new(),
            input_rx: configurator::input_channel(),
        }
    }

    /// Run the interactive session until quit, Ctrl-C or stdin EOF
    pub async fn run(&mut self) -> Result<()> {
        ui::display_welcome_page();

        info!("awaiting initial selection");
        let Some(selection) = configurator::configure_selection(&mut self.input_rx).await else {
            info!("stdin closed before initial selection");
            return Ok(());
        };

        let mut state = SharedState::new(selection);
        self.stream
            .connect(&selection.asset.stream_symbol())
            .await?;
        info!(%selection, "session initialized");

        let mut poll = interval(Duration::from_secs(self.config.poll_interval_secs));
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut render = interval(Duration::from_millis(self.config.refresh_rate_ms));
        render.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                Some(event) = self.stream_rx.recv() => {
                    self.handle_stream_event(&mut state, event);
                }

                Some(event) = self.action.next_event() => {
                    if self.handle_session_event(&mut state, event) {
                        break;
                    }
                }

                maybe_line = self.input_rx.recv() => {
                    match maybe_line {
                        Some(line) => {
                            if self.handle_input(&mut state, &line).await? {
                                break;
                            }
                        }
                        None => {
                            info!("stdin closed, shutting down");
                            break;
                        }
                    }
                }

                _ = poll.tick() => self.spawn_poll(&state),

                _ = render.tick() => ui::dashboard::render(&state)?,

                _ = tokio::signal::ctrl_c() => {
                    info!("interrupt received, shutting down");
                    break;
                }
            }
        }

        self.stream.disconnect().await;
        info!("session terminated");
        Ok(())
    }

    /// Apply a stream lifecycle event or tick. Events for a symbol other
    /// than the current selection's can trail a just-replaced subscription
    /// and are dropped.
    fn handle_stream_event(&self, state: &mut SharedState, event: StreamEvent) {
        let current = state.selection.asset.stream_symbol();

        match event {
            StreamEvent::Connected { symbol } if symbol == current => {
                debug!(symbol, "stream connected");
                state.set_stream_status(StreamStatus::Open);
            }
            StreamEvent::Tick(tick) => state.record_price_tick(&tick.symbol, tick.value),
            StreamEvent::Disconnected { symbol } if symbol == current => {
                warn!(symbol, "stream disconnected, reconnect pending");
                state.set_stream_status(StreamStatus::Closed);
            }
            stale => debug!(?stale, "dropping event from replaced subscription"),
        }
    }

    /// Apply a session event; returns true when the session should end
    fn handle_session_event(&self, state: &mut SharedState, event: SessionEvent) -> bool {
        match event {
            SessionEvent::SnapshotFetched {
                selection,
                bucket,
                outcome,
            } => {
                if let Err(err) = &outcome {
                    warn!(%selection, "snapshot poll failed: {err}");
                }
                state.record_snapshot(selection, bucket, outcome);
                false
            }
            SessionEvent::ShutdownRequested => {
                info!("shutdown requested");
                true
            }
        }
    }

    /// Issue one snapshot poll for the current selection. Skipped entirely
    /// while a reconfiguration is in progress. Each invocation is
    /// fire-and-forget: a slow response never delays the next tick, and the
    /// bucket it was issued for travels with the result.
    fn spawn_poll(&self, state: &SharedState) {
        if state.is_configuring {
            debug!("skipping poll during reconfiguration");
            return;
        }

        let selection = state.selection;
        let bucket = TimeBucket::current(selection.timeframe);
        let client = self.targets.clone();
        let event_tx = self.action.event_tx();

        tokio::spawn(async move {
            let outcome = client
                .fetch_target(selection.asset, selection.timeframe, bucket)
                .await;
            let _ = event_tx.send(SessionEvent::SnapshotFetched {
                selection,
                bucket,
                outcome,
            });
        });
    }

    /// Handle one line of user input; returns true when the session should end
    async fn handle_input(&mut self, state: &mut SharedState, line: &str) -> Result<bool> {
        match line.to_ascii_lowercase().as_str() {
            "" => Ok(false),
            "q" | "quit" | "exit" => {
                info!("user requested quit");
                Ok(true)
            }
            "c" | "config" => {
                self.reconfigure(state).await?;
                Ok(false)
            }
            "h" | "help" => {
                ui::display_help();
                Ok(false)
            }
            other => {
                println!("Unknown command '{}'. Type 'help' for the command list.", other);
                Ok(false)
            }
        }
    }

    /// Run the reconfiguration transition: suspend the poller and the
    /// presenter, prompt for a new selection, then swap selection and
    /// snapshot in one step and resubscribe the stream. Stream ticks keep
    /// buffering while the prompt is pending; the ones for the old symbol
    /// are dropped when they drain.
    async fn reconfigure(&mut self, state: &mut SharedState) -> Result<()> {
        state.begin_configuring();
        info!("reconfiguration started");

        let Some(selection) = configurator::configure_selection(&mut self.input_rx).await else {
            // stdin is gone; the main loop observes the closed channel next
            warn!("stdin closed during reconfiguration");
            return Ok(());
        };

        state.apply_selection(selection);
        self.stream
            .connect(&selection.asset.stream_symbol())
            .await?;
        info!(%selection, "reconfiguration applied");
        Ok(())
    }
}
