//! The active host collection: creates, edits and tears down monitors.

use crate::config::AppConfig;
use crate::monitor::{HostMonitor, HostSnapshot, TransitionEvent};
use crate::probe::Prober;
use crate::store::{parse_csv, FavoritesList, SavedHost};

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Owns every active [`HostMonitor`] in insertion order.
///
/// Monitors run their own probe loops; this set only mediates creation,
/// removal and bulk control. Every creation path starts the new monitor
/// immediately.
pub struct MonitorSet {
    monitors: Vec<HostMonitor>,
    prober: Arc<dyn Prober>,
    events: mpsc::UnboundedSender<TransitionEvent>,
    ping_interval: Duration,
    ping_timeout: Duration,
}

impl MonitorSet {
    /// Create an empty set. The returned receiver carries the transition
    /// events of every monitor ever added to this set.
    pub fn new(
        prober: Arc<dyn Prober>,
        cfg: &AppConfig,
    ) -> (Self, mpsc::UnboundedReceiver<TransitionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let set = Self {
            monitors: Vec::new(),
            prober,
            events: tx,
            ping_interval: Duration::from_secs_f64(cfg.ping_interval_secs),
            ping_timeout: Duration::from_millis(cfg.ping_timeout_ms),
        };
        (set, rx)
    }

    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }

    /// Create a monitor for the host, start it and append it to the set.
    pub fn add(&mut self, hostname: &str, label: &str) -> Uuid {
        let monitor = HostMonitor::new(
            hostname,
            label,
            self.ping_interval,
            self.ping_timeout,
            self.prober.clone(),
            self.events.clone(),
        );
        monitor.start();
        let id = monitor.id();
        tracing::info!("Monitoring {} ({})", hostname, id);
        self.monitors.push(monitor);
        id
    }

    /// Stop and drop the monitor with the given id.
    pub fn remove(&mut self, id: Uuid) -> bool {
        match self.monitors.iter().position(|m| m.id() == id) {
            Some(idx) => {
                let monitor = self.monitors.remove(idx);
                monitor.stop();
                tracing::info!("Removed monitor {}", id);
                true
            }
            None => false,
        }
    }

    /// Replace hostname/label on a monitor, keeping its run state.
    pub fn edit(&self, id: Uuid, hostname: &str, label: &str) -> bool {
        match self.monitors.iter().find(|m| m.id() == id) {
            Some(monitor) => {
                monitor.update(hostname, label);
                true
            }
            None => false,
        }
    }

    pub fn start_all(&self) {
        for monitor in &self.monitors {
            monitor.start();
        }
    }

    pub fn stop_all(&self) {
        for monitor in &self.monitors {
            monitor.stop();
        }
    }

    /// Replace the whole set with the hosts of a saved list.
    pub fn load_list(&mut self, list: &FavoritesList) {
        self.stop_all();
        self.monitors.clear();
        for host in &list.hosts {
            self.add(&host.hostname, &host.label);
        }
        tracing::info!("Loaded list '{}' ({} hosts)", list.name, list.hosts.len());
    }

    /// Add the hosts of a saved list without touching existing monitors.
    pub fn append_list(&mut self, list: &FavoritesList) {
        for host in &list.hosts {
            self.add(&host.hostname, &host.label);
        }
    }

    /// Parse CSV host definitions and append a monitor per parsed host.
    /// Returns how many hosts were added.
    pub fn import_csv(&mut self, contents: &str) -> usize {
        let imported = parse_csv(contents);
        for host in &imported {
            self.add(&host.hostname, &host.label);
        }
        imported.len()
    }

    /// Project the current hosts for persistence.
    pub fn saved_hosts(&self) -> Vec<SavedHost> {
        self.monitors
            .iter()
            .map(|m| {
                let snapshot = m.snapshot();
                SavedHost {
                    hostname: snapshot.hostname,
                    label: snapshot.label,
                }
            })
            .collect()
    }

    /// Published state of every host, in insertion order.
    pub fn snapshots(&self) -> Vec<HostSnapshot> {
        self.monitors.iter().map(|m| m.snapshot()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::HostStatus;
    use crate::probe::{ProbeError, ProbeReply};
    use async_trait::async_trait;
    use chrono::Utc;

    /// Always answers; keeps controller tests independent of timing.
    struct AlwaysUp;

    #[async_trait]
    impl Prober for AlwaysUp {
        async fn probe(
            &self,
            _hostname: &str,
            _timeout: Duration,
        ) -> Result<ProbeReply, ProbeError> {
            Ok(ProbeReply {
                raw_output: "64 bytes: time=1.0 ms".to_string(),
            })
        }
    }

    fn test_config() -> AppConfig {
        AppConfig {
            ping_interval_secs: 2.0,
            ping_timeout_ms: 1000,
            favorites_path: std::path::PathBuf::from("favorites.json"),
        }
    }

    fn empty_set() -> (MonitorSet, mpsc::UnboundedReceiver<TransitionEvent>) {
        MonitorSet::new(Arc::new(AlwaysUp), &test_config())
    }

    fn list_of(name: &str, hosts: &[(&str, &str)]) -> FavoritesList {
        FavoritesList {
            id: Uuid::new_v4(),
            name: name.to_string(),
            hosts: hosts
                .iter()
                .map(|(hostname, label)| SavedHost {
                    hostname: hostname.to_string(),
                    label: label.to_string(),
                })
                .collect(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_add_starts_monitor() {
        let (mut set, _events) = empty_set();
        set.add("8.8.8.8", "Google DNS");

        let snapshots = set.snapshots();
        assert_eq!(snapshots.len(), 1);
        assert!(snapshots[0].is_running);
        assert_eq!(snapshots[0].label, "Google DNS");
    }

    #[tokio::test]
    async fn test_remove_stops_and_drops() {
        let (mut set, _events) = empty_set();
        let id = set.add("8.8.8.8", "");
        set.add("1.1.1.1", "");

        assert!(set.remove(id));
        assert_eq!(set.len(), 1);
        assert_eq!(set.snapshots()[0].hostname, "1.1.1.1");
        assert!(!set.remove(id));
    }

    #[tokio::test]
    async fn test_edit_delegates_to_update() {
        let (mut set, _events) = empty_set();
        let id = set.add("8.8.8.8", "old");

        assert!(set.edit(id, "9.9.9.9", ""));
        let snapshots = set.snapshots();
        let snapshot = &snapshots[0];
        assert_eq!(snapshot.hostname, "9.9.9.9");
        assert_eq!(snapshot.label, "9.9.9.9");
        assert!(snapshot.is_running);

        assert!(!set.edit(Uuid::new_v4(), "x", "y"));
    }

    #[tokio::test]
    async fn test_stop_all_and_start_all() {
        let (mut set, _events) = empty_set();
        set.add("8.8.8.8", "");
        set.add("1.1.1.1", "");

        set.stop_all();
        assert!(set.snapshots().iter().all(|s| !s.is_running));
        assert!(set
            .snapshots()
            .iter()
            .all(|s| s.status == HostStatus::Idle));

        set.start_all();
        assert!(set.snapshots().iter().all(|s| s.is_running));
    }

    #[tokio::test]
    async fn test_load_list_replaces_current_hosts() {
        let (mut set, _events) = empty_set();
        set.add("10.0.0.1", "stale");

        let list = list_of("Prod", &[("8.8.8.8", "Google"), ("1.1.1.1", "Cloudflare")]);
        set.load_list(&list);

        let snapshots = set.snapshots();
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].hostname, "8.8.8.8");
        assert_eq!(snapshots[1].hostname, "1.1.1.1");
        assert!(snapshots.iter().all(|s| s.is_running));
    }

    #[tokio::test]
    async fn test_append_list_keeps_existing_hosts() {
        let (mut set, _events) = empty_set();
        set.add("10.0.0.1", "first");

        let list = list_of("Extra", &[("8.8.8.8", "Google")]);
        set.append_list(&list);

        let snapshots = set.snapshots();
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].hostname, "10.0.0.1");
        assert_eq!(snapshots[1].hostname, "8.8.8.8");
    }

    #[tokio::test]
    async fn test_import_csv_appends_parsed_hosts() {
        let (mut set, _events) = empty_set();
        set.add("10.0.0.1", "first");

        let added = set.import_csv("host,label\n8.8.8.8,Google\n1.1.1.1\n");
        assert_eq!(added, 2);
        assert_eq!(set.len(), 3);

        let snapshots = set.snapshots();
        assert_eq!(snapshots[1].label, "Google");
        assert_eq!(snapshots[2].label, "1.1.1.1");
        assert!(snapshots.iter().all(|s| s.is_running));
    }

    #[tokio::test]
    async fn test_saved_hosts_projection() {
        let (mut set, _events) = empty_set();
        set.add("8.8.8.8", "Google DNS");
        set.add("1.1.1.1", "");

        let saved = set.saved_hosts();
        assert_eq!(
            saved,
            vec![
                SavedHost {
                    hostname: "8.8.8.8".to_string(),
                    label: "Google DNS".to_string(),
                },
                SavedHost {
                    hostname: "1.1.1.1".to_string(),
                    label: "1.1.1.1".to_string(),
                },
            ]
        );
    }
}
