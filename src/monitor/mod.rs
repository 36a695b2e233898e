//! Per-host monitoring: probe scheduling, status transitions, history log.

mod models;

pub use models::*;

use crate::probe::{extract_latency, ProbeError, ProbeReply, Prober};

use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use uuid::Uuid;

/// Monitors one host with its own repeating probe loop.
///
/// All published state lives behind a single mutex; probe completions and
/// the control operations (`start`/`stop`/`update`/`reset`) serialize on
/// it, so observers always see a consistent host.
pub struct HostMonitor {
    id: Uuid,
    state: Arc<Mutex<HostState>>,
    ping_interval: Duration,
    ping_timeout: Duration,
    prober: Arc<dyn Prober>,
    events: mpsc::UnboundedSender<TransitionEvent>,
    stop_tx: Mutex<Option<broadcast::Sender<()>>>,
    /// Bumped on every `stop()`; completions carrying an older value are
    /// stale and must not touch the state.
    generation: Arc<AtomicU64>,
}

impl HostMonitor {
    pub fn new(
        hostname: &str,
        label: &str,
        ping_interval: Duration,
        ping_timeout: Duration,
        prober: Arc<dyn Prober>,
        events: mpsc::UnboundedSender<TransitionEvent>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            state: Arc::new(Mutex::new(HostState::new(hostname, label))),
            ping_interval,
            ping_timeout,
            prober,
            events,
            stop_tx: Mutex::new(None),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_running(&self) -> bool {
        self.state.lock().unwrap().is_running
    }

    /// Copy out the published state.
    pub fn snapshot(&self) -> HostSnapshot {
        let state = self.state.lock().unwrap();
        HostSnapshot {
            id: self.id,
            hostname: state.hostname.clone(),
            label: state.label.clone(),
            status: state.status,
            latency: state.latency.clone(),
            success_count: state.success_count,
            failure_count: state.failure_count,
            is_running: state.is_running,
            log: state.log.iter().cloned().collect(),
        }
    }

    /// Begin the probe loop. No-op when already running. Probes once
    /// immediately, then once per interval tick.
    pub fn start(&self) {
        {
            let mut state = self.state.lock().unwrap();
            if state.is_running {
                return;
            }
            state.is_running = true;
            state.status = HostStatus::Pinging;
            state.previous_status = HostStatus::Pinging;
        }

        let (stop_tx, stop_rx) = broadcast::channel(1);
        *self.stop_tx.lock().unwrap() = Some(stop_tx);

        let ctx = ProbeLoop {
            host_id: self.id,
            state: self.state.clone(),
            prober: self.prober.clone(),
            events: self.events.clone(),
            generation: self.generation.clone(),
            loop_gen: self.generation.load(Ordering::SeqCst),
            interval: self.ping_interval,
            timeout: self.ping_timeout,
        };
        tokio::spawn(ctx.run(stop_rx));
    }

    /// Cancel the probe loop and return to `Idle`. Idempotent; a probe
    /// completing after this point is discarded.
    pub fn stop(&self) {
        // Invalidate in-flight completions before touching the state.
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(stop_tx) = self.stop_tx.lock().unwrap().take() {
            let _ = stop_tx.send(());
        }

        let mut state = self.state.lock().unwrap();
        state.is_running = false;
        state.status = HostStatus::Idle;
        state.latency = LATENCY_UNKNOWN.to_string();
        state.previous_status = HostStatus::Idle;
    }

    /// Replace hostname and label, dropping accumulated stats. The probe
    /// loop is restarted only if it was running before the call.
    pub fn update(&self, hostname: &str, label: &str) {
        let was_running = self.is_running();
        self.stop();
        {
            let mut state = self.state.lock().unwrap();
            state.hostname = hostname.to_string();
            state.label = effective_label(hostname, label);
            state.clear_stats();
        }
        if was_running {
            self.start();
        }
    }

    /// Stop and clear all derived state.
    pub fn reset(&self) {
        self.stop();
        self.state.lock().unwrap().clear_stats();
    }
}

/// Everything one running probe loop needs, cheap to clone into the
/// per-probe worker task.
#[derive(Clone)]
struct ProbeLoop {
    host_id: Uuid,
    state: Arc<Mutex<HostState>>,
    prober: Arc<dyn Prober>,
    events: mpsc::UnboundedSender<TransitionEvent>,
    generation: Arc<AtomicU64>,
    loop_gen: u64,
    interval: Duration,
    timeout: Duration,
}

impl ProbeLoop {
    async fn run(self, mut stop_rx: broadcast::Receiver<()>) {
        // Single permit: a tick whose predecessor is still in flight is
        // skipped rather than stacking concurrent probes for one host.
        let busy = Arc::new(tokio::sync::Semaphore::new(1));

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = stop_rx.recv() => {
                    break;
                }
                _ = interval.tick() => {
                    let permit = match busy.clone().try_acquire_owned() {
                        Ok(p) => p,
                        Err(_) => {
                            let hostname = self.state.lock().unwrap().hostname.clone();
                            tracing::warn!("Skipping probe for {}: previous still in flight", hostname);
                            continue;
                        }
                    };

                    let hostname = self.state.lock().unwrap().hostname.clone();
                    let worker = self.clone();

                    tokio::spawn(async move {
                        let _permit = permit; // Hold until the result is applied
                        let result = worker.prober.probe(&hostname, worker.timeout).await;
                        worker.apply(result);
                    });
                }
            }
        }
    }

    /// Fold one probe completion into the published state and emit a
    /// transition event when the status flipped.
    fn apply(&self, result: Result<ProbeReply, ProbeError>) {
        let mut state = self.state.lock().unwrap();

        // A completion that lost the race against stop() is a no-op.
        if !state.is_running || self.generation.load(Ordering::SeqCst) != self.loop_gen {
            return;
        }

        let new_status = match &result {
            Ok(_) => HostStatus::Up,
            Err(e) if e.is_launch_failure() => HostStatus::Error,
            Err(_) => HostStatus::Down,
        };

        match result {
            Ok(reply) => {
                let latency = extract_latency(&reply.raw_output);
                state.status = HostStatus::Up;
                state.latency = latency.clone();
                state.success_count += 1;
                let message = format!("Reply from {}: {}", state.hostname, latency);
                state.push_log(message, true);
            }
            Err(err) if err.is_launch_failure() => {
                state.status = HostStatus::Error;
                state.latency = LATENCY_ERROR.to_string();
                tracing::error!("Probe launch failed for {}: {}", state.hostname, err);
                let message = format!("Error: {}", err);
                state.push_log(message, false);
            }
            Err(err) => {
                state.status = HostStatus::Down;
                state.latency = LATENCY_TIMEOUT.to_string();
                state.failure_count += 1;
                tracing::debug!("No reply from {}: {}", state.hostname, err);
                let message = format!("No reply from {}", state.hostname);
                state.push_log(message, false);
            }
        }

        // Notify only on a flip between the monitored pair, or when the
        // very first result after starting is a failure.
        let flipped = matches!(
            (state.previous_status, new_status),
            (HostStatus::Up, HostStatus::Down)
                | (HostStatus::Down, HostStatus::Up)
                | (HostStatus::Pinging, HostStatus::Down)
        );
        if flipped {
            let _ = self.events.send(TransitionEvent {
                host_id: self.host_id,
                hostname: state.hostname.clone(),
                label: state.label.clone(),
                new_status,
                timestamp: Utc::now(),
            });
        }
        state.previous_status = new_status;
    }
}
