use std::{collections::BTreeMap, time::Duration};

use fleetpath_core::{Coordinate, InputValidationError, geodesy};
use fleetpath_matrix_providers::cost_matrix::CostMatrix;
use serde::Serialize;
use tracing::{debug, info};

use crate::{checkpoints::CumulativeCheckpoints, route::Route, vehicle::VehicleIdx};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatorConfig {
    /// Simulated seconds covered by one nominal step.
    pub base_timestep: f64,

    /// Wall-clock seconds slept per simulated second of a nominal step.
    pub pace_factor: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            base_timestep: 100.0,
            pace_factor: 0.01,
        }
    }
}

impl SimulatorConfig {
    fn validate(&self) -> Result<(), InputValidationError> {
        if !self.base_timestep.is_finite() || self.base_timestep <= 0.0 {
            return Err(InputValidationError::InvalidConfiguration(format!(
                "base_timestep must be positive, got {}",
                self.base_timestep
            )));
        }

        if !self.pace_factor.is_finite() || self.pace_factor < 0.0 {
            return Err(InputValidationError::InvalidConfiguration(format!(
                "pace_factor must be non-negative, got {}",
                self.pace_factor
            )));
        }

        if Duration::try_from_secs_f64(self.pause_secs()).is_err() {
            return Err(InputValidationError::InvalidConfiguration(format!(
                "pause of {} x {} seconds per step is out of range",
                self.pace_factor, self.base_timestep
            )));
        }

        Ok(())
    }

    /// Wall-clock seconds slept before each snapshot.
    fn pause_secs(&self) -> f64 {
        self.pace_factor * self.base_timestep
    }
}

/// Positions of every vehicle at one instant of simulated time.
///
/// Serializes as the bare `{vehicle -> coordinate}` map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Snapshot {
    /// Simulated seconds since playback started.
    #[serde(skip)]
    pub elapsed: f64,
    pub positions: BTreeMap<VehicleIdx, Coordinate>,
}

/// Result of one [`RoutePlaybackSimulator::advance`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    Snapshot(Snapshot),
    /// Every vehicle has finished; no further snapshots will be produced.
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Running,
    Done,
}

/// Result of a point query with [`RoutePlaybackSimulator::locate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Located {
    EnRoute(Coordinate),
    /// The timestamp is at or past the last checkpoint; holds the final coordinate.
    Ended(Coordinate),
}

impl Located {
    pub fn coordinate(&self) -> &Coordinate {
        match self {
            Located::EnRoute(coordinate) | Located::Ended(coordinate) => coordinate,
        }
    }

    pub fn has_ended(&self) -> bool {
        matches!(self, Located::Ended(_))
    }
}

#[derive(Debug, Clone)]
pub struct VehicleState {
    segment: usize,
    finished_at: Option<f64>,
    position: Coordinate,
}

impl VehicleState {
    /// Index of the node the vehicle last reached.
    pub fn segment(&self) -> usize {
        self.segment
    }

    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    pub fn finished_at(&self) -> Option<f64> {
        self.finished_at
    }

    pub fn position(&self) -> &Coordinate {
        &self.position
    }
}

#[derive(Debug, Clone)]
pub struct SimulationState {
    vehicles: Vec<VehicleState>,
    elapsed: f64,
}

impl SimulationState {
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn vehicle(&self, vehicle: VehicleIdx) -> Option<&VehicleState> {
        self.vehicles.get(vehicle.get())
    }

    fn all_finished(&self) -> bool {
        self.vehicles.iter().all(VehicleState::is_finished)
    }
}

/// Replays solved routes as a lock-step stream of interpolated positions.
///
/// Pull-based: each [`advance`](Self::advance) moves simulated time forward by at
/// most `base_timestep`, shrinking the step so that no vehicle skips past the next
/// node on its route. Routes and matrix are only read, so several simulators may
/// share them. A simulator cannot be rewound; build a new one to replay.
pub struct RoutePlaybackSimulator<'a> {
    routes: &'a [Route],
    checkpoints: Vec<CumulativeCheckpoints>,
    config: SimulatorConfig,
    state: SimulationState,
    playback_state: PlaybackState,
}

impl<'a> RoutePlaybackSimulator<'a> {
    pub fn new(
        routes: &'a [Route],
        matrix: &CostMatrix,
        config: SimulatorConfig,
    ) -> Result<Self, InputValidationError> {
        config.validate()?;

        for (index, route) in routes.iter().enumerate() {
            route.validate(VehicleIdx::new(index), matrix)?;
        }

        let checkpoints: Vec<CumulativeCheckpoints> = routes
            .iter()
            .map(|route| CumulativeCheckpoints::new(route, matrix))
            .collect();

        let vehicles = routes
            .iter()
            .map(|route| VehicleState {
                segment: 0,
                finished_at: None,
                position: route.coordinates()[0],
            })
            .collect();

        debug!(
            "Playback prepared for {} vehicles, longest route takes {:.1}s",
            routes.len(),
            checkpoints
                .iter()
                .map(CumulativeCheckpoints::last)
                .fold(0.0, f64::max)
        );

        Ok(Self {
            routes,
            checkpoints,
            config,
            state: SimulationState {
                vehicles,
                elapsed: 0.0,
            },
            playback_state: PlaybackState::Running,
        })
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.playback_state
    }

    pub fn is_done(&self) -> bool {
        self.playback_state == PlaybackState::Done
    }

    /// Simulated time of the next snapshot.
    pub fn elapsed(&self) -> f64 {
        self.state.elapsed
    }

    pub fn checkpoints(&self, vehicle: VehicleIdx) -> Option<&CumulativeCheckpoints> {
        self.checkpoints.get(vehicle.get())
    }

    /// Simulated time at which `vehicle` was marked finished, if it has been.
    pub fn finished_at(&self, vehicle: VehicleIdx) -> Option<f64> {
        self.state.vehicle(vehicle).and_then(VehicleState::finished_at)
    }

    /// Produces the positions at the current simulated time, then moves time forward.
    pub fn advance(&mut self) -> Advance {
        if self.is_done() {
            return Advance::Done;
        }

        if self.state.all_finished() {
            info!(
                "Playback done after {:.1} simulated seconds",
                self.state.elapsed
            );
            self.playback_state = PlaybackState::Done;
            return Advance::Done;
        }

        self.pace();

        let now = self.state.elapsed;

        for index in 0..self.routes.len() {
            self.update_vehicle(VehicleIdx::new(index), now);
        }

        let positions = self
            .state
            .vehicles
            .iter()
            .enumerate()
            .map(|(index, vehicle)| (VehicleIdx::new(index), vehicle.position))
            .collect();

        self.state.elapsed = self.next_time(now);

        Advance::Snapshot(Snapshot {
            elapsed: now,
            positions,
        })
    }

    /// Position of `vehicle` at `timestamp` without touching the playback state.
    ///
    /// Timestamps before zero resolve to the start of the route. Returns `None` for
    /// an unknown vehicle.
    pub fn locate(&self, vehicle: VehicleIdx, timestamp: f64) -> Option<Located> {
        let route = self.routes.get(vehicle.get())?;
        let checkpoints = self.checkpoints.get(vehicle.get())?;

        match checkpoints.segment_at(timestamp.max(0.0)) {
            Some(segment) => {
                let coordinates = route.coordinates();
                let elapsed_in_segment = timestamp.max(0.0) - checkpoints.as_slice()[segment];

                Some(Located::EnRoute(geodesy::interpolate(
                    &coordinates[segment],
                    &coordinates[segment + 1],
                    route.velocity(),
                    elapsed_in_segment,
                )))
            }
            None => route.last_coordinate().copied().map(Located::Ended),
        }
    }

    fn pace(&self) {
        match Duration::try_from_secs_f64(self.config.pause_secs()) {
            Ok(pause) if !pause.is_zero() => std::thread::sleep(pause),
            _ => {}
        }
    }

    /// Registers node arrivals up to `now` and interpolates the vehicle's position.
    fn update_vehicle(&mut self, vehicle: VehicleIdx, now: f64) {
        let route = &self.routes[vehicle.get()];
        let checkpoints = self.checkpoints[vehicle.get()].as_slice();
        let last = checkpoints.len() - 1;
        let state = &mut self.state.vehicles[vehicle.get()];

        if state.is_finished() {
            return;
        }

        while state.segment < last && checkpoints[state.segment + 1] <= now {
            state.segment += 1;
            debug!(
                "Vehicle {} reached node {} at {:.1}s",
                vehicle,
                route.nodes()[state.segment],
                now
            );
        }

        if state.segment == last {
            debug!("Vehicle {} finished its route at {:.1}s", vehicle, now);
            state.finished_at = Some(now);
            state.position = route.coordinates()[last];
            return;
        }

        let coordinates = route.coordinates();
        state.position = geodesy::interpolate(
            &coordinates[state.segment],
            &coordinates[state.segment + 1],
            route.velocity(),
            now - checkpoints[state.segment],
        );
    }

    /// `now + base_timestep`, cut short at the earliest upcoming checkpoint.
    fn next_time(&self, now: f64) -> f64 {
        self.state
            .vehicles
            .iter()
            .zip(&self.checkpoints)
            .filter(|(vehicle, _)| !vehicle.is_finished())
            .filter_map(|(vehicle, checkpoints)| checkpoints.get(vehicle.segment + 1))
            .fold(now + self.config.base_timestep, f64::min)
    }
}

impl Iterator for RoutePlaybackSimulator<'_> {
    type Item = Snapshot;

    fn next(&mut self) -> Option<Self::Item> {
        match self.advance() {
            Advance::Snapshot(snapshot) => Some(snapshot),
            Advance::Done => None,
        }
    }
}
