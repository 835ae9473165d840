use arrayvec::ArrayVec;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Number of alerts retained in the log before the oldest are evicted.
pub const ALERT_LOG_CAPACITY: usize = 10;

/// A record of a notable fleet event. Never mutated after creation.
#[derive(Clone, Debug, Serialize)]
pub struct Alert {
    /// Identifier unique per occurrence.
    id: String,
    /// The device that triggered the alert, or `None` for a
    /// system-wide alert.
    device_id: Option<String>,
    /// What happened.
    kind: AlertKind,
    /// How urgent it is.
    severity: Severity,
    /// When the alert was emitted.
    timestamp: DateTime<Utc>,
}

/// The kinds of alert the fleet produces.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// A vehicle's battery fell to or below the low-battery threshold.
    LowBattery {
        /// Battery level at the moment the threshold was crossed, in percent.
        level: f64,
    },
    /// An operator-raised notice, e.g. weather conditions affecting routes.
    Advisory,
}

/// Alert severity.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
}

impl Alert {
    /// Creates a new alert stamped with the current time.
    pub(crate) fn new(
        id: String,
        device_id: Option<String>,
        kind: AlertKind,
        severity: Severity,
    ) -> Self {
        Self {
            id,
            device_id,
            kind,
            severity,
            timestamp: Utc::now(),
        }
    }

    /// The occurrence-unique identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The device that triggered the alert, if any.
    pub fn device_id(&self) -> Option<&str> {
        self.device_id.as_deref()
    }

    /// What happened.
    pub fn kind(&self) -> &AlertKind {
        &self.kind
    }

    /// How urgent it is.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// When the alert was emitted.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// A bounded, newest-first log of alerts.
#[derive(Clone, Debug, Default, Serialize)]
pub struct AlertLog {
    entries: ArrayVec<Alert, ALERT_LOG_CAPACITY>,
}

impl AlertLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Default::default()
    }

    /// Prepends an alert, evicting the oldest entry once the log is full.
    pub(crate) fn push(&mut self, alert: Alert) {
        if self.entries.is_full() {
            self.entries.pop();
        }
        self.entries.insert(0, alert);
    }

    /// The number of retained alerts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The most recent alert.
    pub fn latest(&self) -> Option<&Alert> {
        self.entries.first()
    }

    /// Iterates over the retained alerts, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Alert> {
        self.entries.iter()
    }
}
