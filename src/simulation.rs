use crate::alert::{Alert, AlertKind, AlertLog, Severity};
use crate::geo::LatLng;
use crate::vehicle::{DeviceStatus, Vehicle, VehicleAttributes, LOW_BATTERY_PCT};
use crate::{VehicleId, VehicleSet};
use log::{debug, warn};
use serde::Serialize;
use smallvec::SmallVec;

/// A fleet tracking simulation.
pub struct Simulation {
    /// The vehicles being simulated.
    vehicles: VehicleSet,
    /// The bounded alert log, newest first.
    alerts: AlertLog,
    /// The point vehicles random-walk around.
    centre: LatLng,
    /// Maximum distance a vehicle may stray from the centre, in km.
    max_radius: f64,
    /// The current frame of simulation.
    frame: usize,
    /// The next alert sequence number.
    seq: usize,
}

/// Aggregate statistics over the fleet.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct FleetStats {
    /// Number of tracked vehicles.
    pub total: usize,
    /// Vehicles currently reporting normally.
    pub online: usize,
    /// Vehicles with battery at or below the low-battery threshold.
    pub low_battery: usize,
    /// Passengers across the fleet.
    pub passengers: u32,
    /// Seating capacity across the fleet.
    pub capacity: u32,
    /// Satellites locked across the fleet.
    pub satellites: u32,
    /// Mean GPS accuracy radius in m, or zero for an empty fleet.
    pub average_accuracy: f64,
}

impl FleetStats {
    /// Fraction of seats occupied, in [0, 1]. Zero when the fleet
    /// reports no capacity.
    pub fn utilisation(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            f64::from(self.passengers) / f64::from(self.capacity)
        }
    }
}

impl Simulation {
    /// Creates a new simulation around the given centre point.
    pub fn new(centre: LatLng, max_radius_km: f64) -> Self {
        Self {
            vehicles: VehicleSet::default(),
            alerts: AlertLog::new(),
            centre,
            max_radius: max_radius_km,
            frame: 0,
            seq: 0,
        }
    }

    /// Adds a vehicle to the simulation.
    pub fn add_vehicle(&mut self, attributes: &VehicleAttributes) -> VehicleId {
        self.vehicles
            .insert_with_key(|id| Vehicle::new(id, attributes))
    }

    /// Advances the whole fleet by one tick.
    ///
    /// Online vehicles random-walk within the coverage radius and have their
    /// heading, speed and accuracy jittered; every vehicle drains battery.
    /// Returns the alerts emitted this tick, which are also recorded in the
    /// alert log; at most one per vehicle per threshold crossing.
    pub fn tick(&mut self) -> Vec<Alert> {
        let mut rng = rand::thread_rng();
        let (centre, max_radius) = (self.centre, self.max_radius);

        let mut crossed: SmallVec<[VehicleId; 8]> = SmallVec::new();
        for (id, vehicle) in &mut self.vehicles {
            if vehicle.is_online() {
                vehicle.advance(&mut rng, centre, max_radius);
            }
            if vehicle.drain_battery() {
                crossed.push(id);
            }
        }

        let mut emitted = Vec::with_capacity(crossed.len());
        for id in crossed {
            let vehicle = &self.vehicles[id];
            let (device, level) = (vehicle.device_id().to_owned(), vehicle.battery());
            warn!("{} battery critically low at {:.0}%", device, level);
            self.seq += 1;
            let alert = Alert::new(
                format!("alert_{:04}", self.seq),
                Some(device),
                AlertKind::LowBattery { level },
                Severity::Warning,
            );
            self.alerts.push(alert.clone());
            emitted.push(alert);
        }

        self.frame += 1;
        debug!(
            "frame {}: {} vehicles updated, {} alerts emitted",
            self.frame,
            self.vehicles.len(),
            emitted.len()
        );
        emitted
    }

    /// Applies a manual GPS refresh to one vehicle, or to the whole fleet
    /// when no vehicle is given. Only online vehicles respond; no alerts
    /// are emitted.
    pub fn refresh(&mut self, vehicle: Option<VehicleId>) {
        let mut rng = rand::thread_rng();
        match vehicle {
            Some(id) => {
                if let Some(vehicle) = self.vehicles.get_mut(id) {
                    vehicle.refresh(&mut rng);
                }
            }
            None => {
                for (_, vehicle) in &mut self.vehicles {
                    vehicle.refresh(&mut rng);
                }
            }
        }
    }

    /// Records a system-wide advisory in the alert log and returns it.
    pub fn raise_advisory(&mut self, severity: Severity) -> &Alert {
        self.seq += 1;
        let alert = Alert::new(
            format!("alert_{:04}", self.seq),
            None,
            AlertKind::Advisory,
            severity,
        );
        self.alerts.push(alert);
        self.alerts.latest().expect("alert was just pushed")
    }

    /// Sets a vehicle's device status. This is the only path by which a
    /// vehicle goes offline, and setting [DeviceStatus::Online] releases
    /// the low-battery latch.
    pub fn set_vehicle_status(&mut self, vehicle_id: VehicleId, status: DeviceStatus) {
        self.vehicles[vehicle_id].set_status(status);
    }

    /// Gets the current simulation frame index.
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// The point vehicles random-walk around.
    pub fn centre(&self) -> LatLng {
        self.centre
    }

    /// Maximum distance a vehicle may stray from the centre, in km.
    pub fn max_radius(&self) -> f64 {
        self.max_radius
    }

    /// Returns an iterator over all the vehicles in the simulation.
    pub fn iter_vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.values()
    }

    /// Gets a reference to the vehicle with the given ID.
    pub fn get_vehicle(&self, vehicle_id: VehicleId) -> &Vehicle {
        &self.vehicles[vehicle_id]
    }

    /// Looks a vehicle up by its stable device identifier.
    pub fn find_vehicle(&self, device_id: &str) -> Option<&Vehicle> {
        self.vehicles
            .values()
            .find(|vehicle| vehicle.device_id() == device_id)
    }

    /// The alert log, newest first.
    pub fn alerts(&self) -> &AlertLog {
        &self.alerts
    }

    /// Computes aggregate statistics over the fleet.
    pub fn stats(&self) -> FleetStats {
        let total = self.vehicles.len();
        let mut stats = FleetStats {
            total,
            online: 0,
            low_battery: 0,
            passengers: 0,
            capacity: 0,
            satellites: 0,
            average_accuracy: 0.0,
        };
        for vehicle in self.vehicles.values() {
            if vehicle.is_online() {
                stats.online += 1;
            }
            if vehicle.battery() <= LOW_BATTERY_PCT {
                stats.low_battery += 1;
            }
            stats.passengers += vehicle.passengers();
            stats.capacity += vehicle.capacity();
            stats.satellites += u32::from(vehicle.satellites());
            stats.average_accuracy += vehicle.accuracy();
        }
        if total > 0 {
            stats.average_accuracy /= total as f64;
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bus(device_id: &str, battery: f64, passengers: u32, capacity: u32) -> VehicleAttributes {
        VehicleAttributes {
            device_id: device_id.into(),
            position: LatLng::new(13.0827, 80.2707),
            heading: 90.0,
            speed: 20.0,
            accuracy: 3.0,
            altitude: 10.0,
            battery,
            satellites: 8,
            signal_strength: 4,
            status: DeviceStatus::Online,
            passengers,
            capacity,
        }
    }

    #[test]
    fn stats_aggregate_the_fleet() {
        let mut sim = Simulation::new(LatLng::new(13.0827, 80.2707), 25.0);
        sim.add_vehicle(&bus("GPS_001", 87.0, 32, 50));
        sim.add_vehicle(&bus("GPS_002", 20.0, 28, 45));
        let stats = sim.stats();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.online, 2);
        assert_eq!(stats.low_battery, 1);
        assert_eq!(stats.passengers, 60);
        assert_eq!(stats.capacity, 95);
        assert_eq!(stats.satellites, 16);
        assert!((stats.average_accuracy - 3.0).abs() < 1e-9);
        assert!((stats.utilisation() - 60.0 / 95.0).abs() < 1e-9);
    }

    #[test]
    fn utilisation_guards_zero_capacity() {
        let sim = Simulation::new(LatLng::new(0.0, 0.0), 25.0);
        assert_eq!(sim.stats().utilisation(), 0.0);
        assert_eq!(sim.stats().average_accuracy, 0.0);
    }

    #[test]
    fn find_vehicle_by_device_id() {
        let mut sim = Simulation::new(LatLng::new(13.0827, 80.2707), 25.0);
        let id = sim.add_vehicle(&bus("GPS_001", 87.0, 32, 50));
        assert_eq!(sim.find_vehicle("GPS_001").map(Vehicle::id), Some(id));
        assert!(sim.find_vehicle("GPS_404").is_none());
    }
}
