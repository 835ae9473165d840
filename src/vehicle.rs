use crate::geo::{self, LatLng, Vector2d};
use crate::util::Interval;
use crate::VehicleId;
use cgmath::{Angle, Deg};
use rand::Rng;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};

/// Maximum positional jitter applied per tick to each axis, in degrees.
const POSITION_JITTER_DEG: f64 = 0.00025; // ~27 m at the equator

/// Maximum heading change per tick, in degrees.
const HEADING_JITTER_DEG: f64 = 7.5;

/// Maximum speed change per tick, in km/h.
const SPEED_JITTER_KMH: f64 = 2.5;

/// Permitted speed range in km/h.
const SPEED_RANGE: Interval<f64> = Interval::new(5.0, 45.0);

/// Range the reported GPS accuracy radius is resampled from, in m.
const ACCURACY_RANGE: Interval<f64> = Interval::new(2.0, 4.0);

/// Battery drained per tick, in percentage points.
const BATTERY_DRAIN_PCT: f64 = 0.05;

/// Battery level at or below which the low-battery latch engages, in percent.
pub(crate) const LOW_BATTERY_PCT: f64 = 25.0;

/// Accuracy improvement applied by a manual GPS refresh, in m.
const REFRESH_ACCURACY_STEP_M: f64 = 0.3;

/// Best accuracy radius a receiver will report, in m.
const MIN_ACCURACY_M: f64 = 1.0;

/// Most satellites a receiver will report.
const MAX_SATELLITES: u8 = 12;

/// A simulated GPS-tracked vehicle.
#[derive(Clone, Debug, Serialize)]
pub struct Vehicle {
    /// The vehicle's ID.
    #[serde(skip)]
    pub(crate) id: VehicleId,
    /// Stable device identifier, unique within the fleet.
    device_id: String,
    /// The reported position.
    position: LatLng,
    /// Heading in degrees, in [0, 360).
    heading: f64,
    /// Speed in km/h.
    speed: f64,
    /// GPS accuracy radius in m.
    accuracy: f64,
    /// Altitude in m. Not perturbed by the simulation.
    altitude: f64,
    /// Battery level in percent. Never increases during a run.
    battery: f64,
    /// Number of satellites the receiver is locked to.
    satellites: u8,
    /// Signal strength, 1 to 5.
    signal_strength: u8,
    /// The device status.
    status: DeviceStatus,
    /// Passengers on board. Static display data.
    passengers: u32,
    /// Seating capacity. Static display data.
    capacity: u32,
}

/// The seed attributes of a simulated vehicle.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VehicleAttributes {
    /// Stable device identifier, unique within the fleet.
    pub device_id: String,
    /// The starting position.
    pub position: LatLng,
    /// Heading in degrees.
    pub heading: f64,
    /// Speed in km/h.
    pub speed: f64,
    /// GPS accuracy radius in m.
    pub accuracy: f64,
    /// Altitude in m.
    pub altitude: f64,
    /// Battery level in percent.
    pub battery: f64,
    /// Number of satellites the receiver is locked to.
    pub satellites: u8,
    /// Signal strength, 1 to 5.
    pub signal_strength: u8,
    /// The initial device status.
    pub status: DeviceStatus,
    /// Passengers on board.
    pub passengers: u32,
    /// Seating capacity.
    pub capacity: u32,
}

/// The status of a tracked device.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceStatus {
    /// Reporting normally.
    Online,
    /// The low-battery latch has engaged. One-way within a run;
    /// cleared only by an explicit status reset.
    LowBattery,
    /// Not reporting. Never derived by the simulation; set externally.
    Offline,
}

impl Vehicle {
    /// Creates a new vehicle.
    pub(crate) fn new(id: VehicleId, attributes: &VehicleAttributes) -> Self {
        Self {
            id,
            device_id: attributes.device_id.clone(),
            position: attributes.position,
            heading: Deg(attributes.heading).normalize().0,
            speed: SPEED_RANGE.clamp(attributes.speed),
            accuracy: f64::max(attributes.accuracy, MIN_ACCURACY_M),
            altitude: attributes.altitude,
            battery: attributes.battery.clamp(0.0, 100.0),
            satellites: attributes.satellites,
            signal_strength: attributes.signal_strength,
            status: attributes.status,
            passengers: attributes.passengers,
            capacity: attributes.capacity,
        }
    }

    /// Gets the vehicle's ID.
    pub fn id(&self) -> VehicleId {
        self.id
    }

    /// The stable device identifier.
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// The reported position.
    pub fn position(&self) -> LatLng {
        self.position
    }

    /// Heading in degrees, in [0, 360).
    pub fn heading(&self) -> f64 {
        self.heading
    }

    /// Speed in km/h.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// GPS accuracy radius in m.
    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    /// Altitude in m.
    pub fn altitude(&self) -> f64 {
        self.altitude
    }

    /// Battery level in percent.
    pub fn battery(&self) -> f64 {
        self.battery
    }

    /// Number of satellites the receiver is locked to.
    pub fn satellites(&self) -> u8 {
        self.satellites
    }

    /// Signal strength, 1 to 5.
    pub fn signal_strength(&self) -> u8 {
        self.signal_strength
    }

    /// The device status.
    pub fn status(&self) -> DeviceStatus {
        self.status
    }

    /// Passengers on board.
    pub fn passengers(&self) -> u32 {
        self.passengers
    }

    /// Seating capacity.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Whether the device is reporting normally.
    pub fn is_online(&self) -> bool {
        self.status == DeviceStatus::Online
    }

    /// Sets the device status. Setting [DeviceStatus::Online] releases the
    /// low-battery latch until the threshold is next crossed.
    pub(crate) fn set_status(&mut self, status: DeviceStatus) {
        self.status = status;
    }

    /// Advances the vehicle's kinematic state by one tick.
    ///
    /// A jittered position is proposed and kept only if it stays within
    /// `max_radius` km of `centre`; a proposal past the boundary leaves the
    /// position unchanged for this tick. Heading, speed and accuracy update
    /// either way.
    pub(crate) fn advance(&mut self, rng: &mut impl Rng, centre: LatLng, max_radius: f64) {
        let jitter = Uniform::new_inclusive(-POSITION_JITTER_DEG, POSITION_JITTER_DEG);
        let proposed = self
            .position
            .offset(Vector2d::new(jitter.sample(rng), jitter.sample(rng)));
        if geo::distance(proposed, centre) <= max_radius {
            self.position = proposed;
        }

        self.heading = Deg(self.heading + rng.gen_range(-HEADING_JITTER_DEG..HEADING_JITTER_DEG))
            .normalize()
            .0;
        self.speed = SPEED_RANGE.clamp(self.speed + rng.gen_range(-SPEED_JITTER_KMH..SPEED_JITTER_KMH));
        self.accuracy = ACCURACY_RANGE.lerp(rng.gen::<f64>());
    }

    /// Drains the battery by one tick's worth of charge, floored at zero.
    /// Returns `true` iff the level crossed the low-battery threshold and
    /// engaged the latch.
    pub(crate) fn drain_battery(&mut self) -> bool {
        if self.battery <= 0.0 {
            return false;
        }
        self.battery = f64::max(self.battery - BATTERY_DRAIN_PCT, 0.0);
        if self.battery <= LOW_BATTERY_PCT && self.status != DeviceStatus::LowBattery {
            self.status = DeviceStatus::LowBattery;
            return true;
        }
        false
    }

    /// Applies a manual GPS refresh: a step of improved accuracy and
    /// possibly one extra satellite. Only online vehicles respond.
    pub(crate) fn refresh(&mut self, rng: &mut impl Rng) {
        if self.status != DeviceStatus::Online {
            return;
        }
        self.accuracy = f64::max(self.accuracy - REFRESH_ACCURACY_STEP_M, MIN_ACCURACY_M);
        self.satellites = u8::min(self.satellites + rng.gen_range(0..2), MAX_SATELLITES);
    }
}
