use crate::Simulation;
use log::info;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

/// Default interval between simulation ticks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(3);

/// Drives a [Simulation] with a recurring tick on a worker thread.
///
/// The simulation stays behind a mutex, so a tick is atomic with respect to
/// any reader and only one tick can ever be in flight. Stopping guarantees
/// no further ticks; starting again begins a fresh interval rather than
/// resuming a paused one.
pub struct Tracker {
    /// The simulation being driven.
    simulation: Arc<Mutex<Simulation>>,
    /// Time between ticks.
    interval: Duration,
    /// The running worker, if tracking is active.
    worker: Option<Worker>,
}

struct Worker {
    stop: Sender<()>,
    handle: JoinHandle<()>,
}

impl Tracker {
    /// Creates a stopped tracker around the given simulation.
    pub fn new(simulation: Simulation, interval: Duration) -> Self {
        Self {
            simulation: Arc::new(Mutex::new(simulation)),
            interval,
            worker: None,
        }
    }

    /// Shared handle to the simulation. Lock it to read snapshots or to
    /// apply manual operations between ticks.
    pub fn simulation(&self) -> Arc<Mutex<Simulation>> {
        Arc::clone(&self.simulation)
    }

    /// Whether the periodic tick is currently running.
    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Starts periodic ticking. If already running, the worker is restarted
    /// and the interval timer reset.
    pub fn start(&mut self) {
        self.stop();
        let (stop, stop_rx) = mpsc::channel();
        let simulation = Arc::clone(&self.simulation);
        let interval = self.interval;
        let handle = std::thread::spawn(move || loop {
            match stop_rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {
                    let mut simulation = simulation.lock().expect("simulation lock poisoned");
                    simulation.tick();
                }
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        });
        self.worker = Some(Worker { stop, handle });
        info!("tracking started, ticking every {:?}", interval);
    }

    /// Stops periodic ticking. Once this returns, no further ticks will
    /// run until [Tracker::start] is called again.
    pub fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            // A send failure means the worker already exited.
            let _ = worker.stop.send(());
            let _ = worker.handle.join();
            info!("tracking stopped");
        }
    }
}

impl Drop for Tracker {
    fn drop(&mut self) {
        self.stop();
    }
}
