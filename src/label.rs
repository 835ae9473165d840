//! Display-language selection for fleet metadata.
//!
//! Rider-facing strings are bilingual and live entirely outside the
//! simulation's data model; this module picks and formats them.

use crate::alert::{Alert, AlertKind};

/// A display language.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Language {
    English,
    Tamil,
}

/// A string carried in both display languages.
#[derive(Clone, Debug)]
pub struct Bilingual {
    pub en: String,
    pub ta: String,
}

impl Bilingual {
    /// Creates a bilingual string pair.
    pub fn new(en: impl Into<String>, ta: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            ta: ta.into(),
        }
    }

    /// Selects the variant for the given language.
    pub fn get(&self, language: Language) -> &str {
        match language {
            Language::English => &self.en,
            Language::Tamil => &self.ta,
        }
    }
}

/// Rider-facing labels for one vehicle, keyed by device id on the
/// presentation side.
#[derive(Clone, Debug)]
pub struct VehicleLabels {
    /// The public bus number, e.g. "21G".
    pub bus_number: String,
    /// Route description.
    pub route: Bilingual,
    /// Driver name.
    pub driver: String,
    /// Current location description.
    pub current_location: Bilingual,
    /// Next stop description.
    pub next_stop: Bilingual,
    /// Ticket fare, preformatted.
    pub fare: String,
}

/// Formats an alert for display. `labels` are the triggering vehicle's
/// labels when the alert references one and the caller knows them; the
/// device id is used as a fallback name.
pub fn alert_message(alert: &Alert, labels: Option<&VehicleLabels>, language: Language) -> String {
    let name = labels
        .map(|labels| labels.bus_number.as_str())
        .or_else(|| alert.device_id())
        .unwrap_or("fleet");
    match (alert.kind(), language) {
        (AlertKind::LowBattery { level }, Language::English) => {
            format!("Bus {} battery critically low at {:.0}%", name, level)
        }
        (AlertKind::LowBattery { level }, Language::Tamil) => {
            format!("பஸ் {} பேட்டரி {:.0}% - அவசர சார்ஜிங் தேவை", name, level)
        }
        (AlertKind::Advisory, Language::English) => {
            format!("Service advisory for {}", name)
        }
        (AlertKind::Advisory, Language::Tamil) => {
            format!("{} சேவை அறிவிப்பு", name)
        }
    }
}
