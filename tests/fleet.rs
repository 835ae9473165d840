//! Tests that drive the whole fleet simulation.

use std::time::Duration;

use fleet_sim::{
    geo, AlertKind, DeviceStatus, LatLng, Severity, Simulation, Tracker, VehicleAttributes,
    ALERT_LOG_CAPACITY,
};

/// Chennai city centre, matching the demo fleet.
const CENTRE: LatLng = LatLng::new(13.0827, 80.2707);

fn bus(device_id: &str) -> VehicleAttributes {
    VehicleAttributes {
        device_id: device_id.into(),
        position: CENTRE,
        heading: 85.5,
        speed: 24.8,
        accuracy: 2.8,
        altitude: 8.2,
        battery: 87.0,
        satellites: 8,
        signal_strength: 5,
        status: DeviceStatus::Online,
        passengers: 32,
        capacity: 50,
    }
}

#[test]
fn kinematics_stay_in_range() {
    let mut sim = Simulation::new(CENTRE, 25.0);
    let id = sim.add_vehicle(&bus("MTC_GPS_001"));

    let mut battery = sim.get_vehicle(id).battery();
    for _ in 0..200 {
        sim.tick();
        let vehicle = sim.get_vehicle(id);
        assert!((5.0..=45.0).contains(&vehicle.speed()));
        assert!((0.0..360.0).contains(&vehicle.heading()));
        assert!((2.0..4.0).contains(&vehicle.accuracy()));
        assert!(vehicle.battery() <= battery);
        assert!(vehicle.battery() >= 0.0);
        battery = vehicle.battery();
    }
}

#[test]
fn fleet_stays_within_coverage() {
    let mut sim = Simulation::new(CENTRE, 25.0);
    let id = sim.add_vehicle(&bus("MTC_GPS_001"));

    for _ in 0..500 {
        sim.tick();
        let vehicle = sim.get_vehicle(id);
        assert!(geo::distance(vehicle.position(), CENTRE) <= 25.0);
    }
}

#[test]
fn battery_crossing_emits_exactly_one_alert() {
    let mut sim = Simulation::new(CENTRE, 25.0);
    let mut seed = bus("MTC_GPS_004");
    seed.battery = 26.0;
    let id = sim.add_vehicle(&seed);

    let mut emitted = Vec::new();
    for _ in 0..25 {
        emitted.extend(sim.tick());
    }

    let vehicle = sim.get_vehicle(id);
    assert!(vehicle.battery() <= 25.0);
    assert_eq!(vehicle.status(), DeviceStatus::LowBattery);
    assert!(geo::distance(vehicle.position(), CENTRE) <= 25.0);

    assert_eq!(emitted.len(), 1);
    let alert = &emitted[0];
    assert_eq!(alert.device_id(), Some("MTC_GPS_004"));
    assert_eq!(alert.severity(), Severity::Warning);
    assert!(matches!(alert.kind(), AlertKind::LowBattery { level } if *level <= 25.0));
    assert_eq!(sim.alerts().len(), 1);
}

#[test]
fn latched_vehicle_stops_moving_but_keeps_draining() {
    let mut sim = Simulation::new(CENTRE, 25.0);
    let mut seed = bus("MTC_GPS_004");
    seed.battery = 24.0;
    seed.status = DeviceStatus::LowBattery;
    let id = sim.add_vehicle(&seed);

    let before = sim.get_vehicle(id).clone();
    let emitted = sim.tick();
    let after = sim.get_vehicle(id);

    assert!(emitted.is_empty());
    assert_eq!(after.position(), before.position());
    assert_eq!(after.heading(), before.heading());
    assert_eq!(after.speed(), before.speed());
    assert_eq!(after.accuracy(), before.accuracy());
    assert!(after.battery() < before.battery());
}

#[test]
fn offline_vehicle_only_drains_battery() {
    let mut sim = Simulation::new(CENTRE, 25.0);
    let id = sim.add_vehicle(&bus("MTC_GPS_001"));
    sim.set_vehicle_status(id, DeviceStatus::Offline);

    let before = sim.get_vehicle(id).clone();
    sim.tick();
    let after = sim.get_vehicle(id);

    assert_eq!(after.position(), before.position());
    assert_eq!(after.speed(), before.speed());
    assert!(after.battery() < before.battery());
}

#[test]
fn out_of_radius_proposal_retains_position() {
    // A vanishing coverage radius rejects every proposed move, but the
    // other channels keep updating.
    let mut sim = Simulation::new(CENTRE, 1e-6);
    let mut seed = bus("MTC_GPS_001");
    seed.accuracy = 5.0;
    let id = sim.add_vehicle(&seed);

    let start = sim.get_vehicle(id).position();
    for _ in 0..50 {
        sim.tick();
    }
    let vehicle = sim.get_vehicle(id);
    assert_eq!(vehicle.position(), start);
    assert!((2.0..4.0).contains(&vehicle.accuracy()));
    assert!(vehicle.battery() < 87.0);
}

#[test]
fn refresh_improves_online_vehicles_only() {
    let mut sim = Simulation::new(CENTRE, 25.0);
    let mut online = bus("MTC_GPS_001");
    online.accuracy = 4.0;
    let online = sim.add_vehicle(&online);
    let mut offline = bus("MTC_GPS_002");
    offline.accuracy = 4.0;
    let offline = sim.add_vehicle(&offline);
    sim.set_vehicle_status(offline, DeviceStatus::Offline);

    sim.refresh(None);
    assert!((sim.get_vehicle(online).accuracy() - 3.7).abs() < 1e-9);
    assert!((sim.get_vehicle(offline).accuracy() - 4.0).abs() < 1e-9);

    // Repeated single-vehicle refreshes bottom out at the accuracy floor
    // and the satellite cap.
    for _ in 0..30 {
        sim.refresh(Some(online));
    }
    let vehicle = sim.get_vehicle(online);
    assert!((vehicle.accuracy() - 1.0).abs() < 1e-9);
    assert!(vehicle.satellites() <= 12);
}

#[test]
fn alert_log_keeps_latest_ten() {
    let mut sim = Simulation::new(CENTRE, 25.0);
    let mut ids = Vec::new();
    for _ in 0..ALERT_LOG_CAPACITY + 2 {
        ids.push(sim.raise_advisory(Severity::Info).id().to_owned());
    }

    let log = sim.alerts();
    assert_eq!(log.len(), ALERT_LOG_CAPACITY);
    // Newest first, with the two oldest evicted.
    let logged: Vec<_> = log.iter().map(|alert| alert.id().to_owned()).collect();
    let expected: Vec<_> = ids.iter().rev().take(ALERT_LOG_CAPACITY).cloned().collect();
    assert_eq!(logged, expected);
    assert!(log.iter().all(|alert| alert.device_id().is_none()));
}

#[test]
fn tracker_ticks_until_stopped() {
    let mut tracker = Tracker::new(Simulation::new(CENTRE, 25.0), Duration::from_millis(10));
    let simulation = tracker.simulation();

    tracker.start();
    assert!(tracker.is_running());
    std::thread::sleep(Duration::from_millis(100));
    tracker.stop();
    assert!(!tracker.is_running());

    let frame = simulation.lock().unwrap().frame();
    assert!(frame >= 1);

    // No further ticks run while stopped.
    std::thread::sleep(Duration::from_millis(50));
    assert_eq!(simulation.lock().unwrap().frame(), frame);

    // Restarting resumes from a fresh interval.
    tracker.start();
    std::thread::sleep(Duration::from_millis(100));
    tracker.stop();
    assert!(simulation.lock().unwrap().frame() > frame);
}
