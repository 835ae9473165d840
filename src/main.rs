use std::time::{Duration, Instant};

use fleet_sim::{DeviceStatus, LatLng, Simulation, Tracker, Vehicle, VehicleAttributes};
use itertools::Itertools;
use once_cell::sync::Lazy;

/// Chennai city centre, the fleet's simulation centre.
const CHENNAI_CENTRE: LatLng = LatLng::new(13.0827, 80.2707);

/// Coverage radius around the centre, in km.
const COVERAGE_RADIUS_KM: f64 = 25.0;

/// Seed records for the five-bus Chennai MTC demo fleet.
static CHENNAI_FLEET: Lazy<Vec<VehicleAttributes>> = Lazy::new(|| {
    vec![
        VehicleAttributes {
            device_id: "MTC_GPS_001".into(),
            position: LatLng::new(13.0418, 80.2341),
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
        },
        VehicleAttributes {
            device_id: "MTC_GPS_002".into(),
            position: LatLng::new(13.0850, 80.2101),
            heading: 165.2,
            speed: 18.3,
            accuracy: 3.5,
            altitude: 12.5,
            battery: 72.0,
            satellites: 7,
            signal_strength: 4,
            status: DeviceStatus::Online,
            passengers: 28,
            capacity: 45,
        },
        VehicleAttributes {
            device_id: "MTC_GPS_003".into(),
            position: LatLng::new(13.0501, 80.2060),
            heading: 135.8,
            speed: 31.5,
            accuracy: 2.2,
            altitude: 15.8,
            battery: 91.0,
            satellites: 9,
            signal_strength: 5,
            status: DeviceStatus::Online,
            passengers: 35,
            capacity: 52,
        },
        VehicleAttributes {
            device_id: "MTC_GPS_004".into(),
            position: LatLng::new(12.9816, 80.2201),
            heading: 25.3,
            speed: 22.7,
            accuracy: 4.1,
            altitude: 18.3,
            battery: 28.0,
            satellites: 6,
            signal_strength: 3,
            status: DeviceStatus::LowBattery,
            passengers: 41,
            capacity: 55,
        },
        VehicleAttributes {
            device_id: "MTC_GPS_005".into(),
            position: LatLng::new(12.9249, 80.1000),
            heading: 45.7,
            speed: 35.2,
            accuracy: 3.8,
            altitude: 22.1,
            battery: 64.0,
            satellites: 8,
            signal_strength: 4,
            status: DeviceStatus::Online,
            passengers: 47,
            capacity: 60,
        },
    ]
});

fn main() {
    let mut sim = Simulation::new(CHENNAI_CENTRE, COVERAGE_RADIUS_KM);
    for attributes in CHENNAI_FLEET.iter() {
        sim.add_vehicle(attributes);
    }
    println!(
        "Tracking {} buses: {}",
        sim.stats().total,
        sim.iter_vehicles().map(Vehicle::device_id).join(", ")
    );

    // Headless soak: drive the fleet directly and time the frames.
    const NUM_FRAMES: u32 = 1000;
    let start = Instant::now();
    for _ in 0..NUM_FRAMES {
        sim.tick();
    }
    println!(
        "Simulated {} frames, avg. {:?} per frame",
        NUM_FRAMES,
        start.elapsed() / NUM_FRAMES
    );

    let stats = sim.stats();
    println!(
        "{}/{} online, {} low battery, {:.0}% seats occupied, avg accuracy {:.1} m",
        stats.online,
        stats.total,
        stats.low_battery,
        100.0 * stats.utilisation(),
        stats.average_accuracy,
    );
    let snapshot = sim.iter_vehicles().collect::<Vec<_>>();
    println!("{}", serde_json::to_string_pretty(&snapshot).unwrap());

    // Hand the fleet to the periodic tracker for a short live run.
    let mut tracker = Tracker::new(sim, Duration::from_millis(250));
    tracker.start();
    std::thread::sleep(Duration::from_secs(2));
    tracker.stop();

    let simulation = tracker.simulation();
    let simulation = simulation.lock().unwrap();
    println!(
        "Tracker left the fleet at frame {} with {} alerts logged",
        simulation.frame(),
        simulation.alerts().len()
    );
}
