pub use alert::{Alert, AlertKind, AlertLog, Severity, ALERT_LOG_CAPACITY};
pub use geo::LatLng;
pub use label::{alert_message, Bilingual, Language, VehicleLabels};
pub use simulation::{FleetStats, Simulation};
use slotmap::{new_key_type, SlotMap};
pub use tracker::{Tracker, DEFAULT_TICK_INTERVAL};
pub use vehicle::{DeviceStatus, Vehicle, VehicleAttributes};

mod alert;
pub mod geo;
mod label;
mod simulation;
mod tracker;
mod util;
mod vehicle;

new_key_type! {
    /// Unique ID of a [Vehicle].
    pub struct VehicleId;
}

type VehicleSet = SlotMap<VehicleId, Vehicle>;
