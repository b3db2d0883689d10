//! The per-event record filled by the simulation loop.
//!
//! One [`EventRecord`] captures everything downstream analysis needs from a
//! single simulated event: identity, energy deposit, optical photon counts
//! and timing, and the state of the primary (vertex) particle.
//!
//! # Lifecycle
//!
//! ```text
//! new() / initialize()  -->  setters, appends (any order)  -->  serialize
//!        ^                                                         |
//!        +---------------------------- reuse ----------------------+
//! ```
//!
//! The record validates nothing. Non-negative energies, ordered timestamps
//! and agreement between photon counts and timestamp sequences are the
//! producer's responsibility.

use serde::{Deserialize, Serialize};

use crate::schema::{FieldVisitor, fields};
use crate::vector::Vector3;

/// Event-level data of one simulated detector interaction.
///
/// Field declaration order is the serialization order of schema version 1
/// (see [`FIELDS`](crate::FIELDS)).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventRecord {
    event_id: i32,
    run_id: i32,
    total_energy_deposited: f64,
    photons_created: i32,
    photons_detected: i32,
    photon_creation_times: Vec<f64>,
    photon_detection_times: Vec<f64>,
    vertex_position: Vector3,
    vertex_momentum_direction: Vector3,
    vertex_kinetic_energy: f64,
    vertex_particle_code: i32,
}

impl EventRecord {
    /// Create a record with every scalar zeroed and both sequences empty.
    pub const fn new() -> Self {
        Self {
            event_id: 0,
            run_id: 0,
            total_energy_deposited: 0.0,
            photons_created: 0,
            photons_detected: 0,
            photon_creation_times: Vec::new(),
            photon_detection_times: Vec::new(),
            vertex_position: Vector3::ZERO,
            vertex_momentum_direction: Vector3::ZERO,
            vertex_kinetic_energy: 0.0,
            vertex_particle_code: 0,
        }
    }

    /// Reset every field to its zero value so the record can hold the next
    /// event.
    ///
    /// The timestamp sequences are cleared in place and keep their allocated
    /// capacity.
    pub fn initialize(&mut self) {
        self.event_id = 0;
        self.run_id = 0;
        self.total_energy_deposited = 0.0;
        self.photons_created = 0;
        self.photons_detected = 0;
        self.photon_creation_times.clear();
        self.photon_detection_times.clear();
        self.vertex_position = Vector3::ZERO;
        self.vertex_momentum_direction = Vector3::ZERO;
        self.vertex_kinetic_energy = 0.0;
        self.vertex_particle_code = 0;
    }

    // -------------------------------------------------------------------
    // Event metadata
    // -------------------------------------------------------------------

    /// Set the index of the event within its run.
    pub const fn set_event_id(&mut self, event_id: i32) {
        self.event_id = event_id;
    }

    /// Index of the event within its run.
    pub const fn event_id(&self) -> i32 {
        self.event_id
    }

    /// Set the index of the simulation run.
    pub const fn set_run_id(&mut self, run_id: i32) {
        self.run_id = run_id;
    }

    /// Index of the simulation run.
    pub const fn run_id(&self) -> i32 {
        self.run_id
    }

    // -------------------------------------------------------------------
    // Detector response
    // -------------------------------------------------------------------

    /// Set the total ionizing energy deposited in the event.
    pub const fn set_total_energy_deposited(&mut self, energy: f64) {
        self.total_energy_deposited = energy;
    }

    /// Total ionizing energy deposited in the event.
    pub const fn total_energy_deposited(&self) -> f64 {
        self.total_energy_deposited
    }

    /// Set the number of scintillation/Cerenkov photons created.
    pub const fn set_photons_created(&mut self, count: i32) {
        self.photons_created = count;
    }

    /// Number of scintillation/Cerenkov photons created.
    pub const fn photons_created(&self) -> i32 {
        self.photons_created
    }

    /// Set the number of photons registered by a sensor.
    pub const fn set_photons_detected(&mut self, count: i32) {
        self.photons_detected = count;
    }

    /// Number of photons registered by a sensor.
    pub const fn photons_detected(&self) -> i32 {
        self.photons_detected
    }

    /// Append one photon creation timestamp.
    pub fn add_photon_creation_time(&mut self, time: f64) {
        self.photon_creation_times.push(time);
    }

    /// Remove all photon creation timestamps.
    pub fn clear_photon_creation_times(&mut self) {
        self.photon_creation_times.clear();
    }

    /// Copy of the photon creation timestamps, in emission order.
    pub fn photon_creation_times(&self) -> Vec<f64> {
        self.photon_creation_times.clone()
    }

    /// Append one photon detection timestamp.
    pub fn add_photon_detection_time(&mut self, time: f64) {
        self.photon_detection_times.push(time);
    }

    /// Remove all photon detection timestamps.
    pub fn clear_photon_detection_times(&mut self) {
        self.photon_detection_times.clear();
    }

    /// Copy of the photon detection timestamps, in insertion order.
    pub fn photon_detection_times(&self) -> Vec<f64> {
        self.photon_detection_times.clone()
    }

    // -------------------------------------------------------------------
    // Vertex (primary) particle
    // -------------------------------------------------------------------

    /// Set all three components of the vertex position at once.
    pub const fn set_vertex_position(&mut self, x: f64, y: f64, z: f64) {
        self.vertex_position = Vector3::new(x, y, z);
    }

    /// Position of the vertex particle.
    pub const fn vertex_position(&self) -> Vector3 {
        self.vertex_position
    }

    /// Set all three components of the vertex momentum direction at once.
    pub const fn set_vertex_momentum_direction(&mut self, px: f64, py: f64, pz: f64) {
        self.vertex_momentum_direction = Vector3::new(px, py, pz);
    }

    /// Momentum direction of the vertex particle.
    pub const fn vertex_momentum_direction(&self) -> Vector3 {
        self.vertex_momentum_direction
    }

    /// Set the kinetic energy of the vertex particle.
    pub const fn set_vertex_kinetic_energy(&mut self, energy: f64) {
        self.vertex_kinetic_energy = energy;
    }

    /// Kinetic energy of the vertex particle.
    pub const fn vertex_kinetic_energy(&self) -> f64 {
        self.vertex_kinetic_energy
    }

    /// Set the particle-species code of the vertex particle.
    pub const fn set_vertex_particle_code(&mut self, code: i32) {
        self.vertex_particle_code = code;
    }

    /// Particle-species code of the vertex particle.
    pub const fn vertex_particle_code(&self) -> i32 {
        self.vertex_particle_code
    }

    // -------------------------------------------------------------------
    // Field enumeration
    // -------------------------------------------------------------------

    /// Report every field to `visitor` in schema layout order.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first error produced by the visitor.
    pub fn visit_fields<V: FieldVisitor>(&self, visitor: &mut V) -> Result<(), V::Error> {
        visitor.visit_int(fields::EVENT_ID, self.event_id)?;
        visitor.visit_int(fields::RUN_ID, self.run_id)?;
        visitor.visit_float(fields::TOTAL_ENERGY_DEPOSITED, self.total_energy_deposited)?;
        visitor.visit_int(fields::PHOTONS_CREATED, self.photons_created)?;
        visitor.visit_int(fields::PHOTONS_DETECTED, self.photons_detected)?;
        visitor.visit_float_seq(fields::PHOTON_CREATION_TIMES, &self.photon_creation_times)?;
        visitor.visit_float_seq(fields::PHOTON_DETECTION_TIMES, &self.photon_detection_times)?;
        visitor.visit_vec3(fields::VERTEX_POSITION, self.vertex_position)?;
        visitor.visit_vec3(fields::VERTEX_MOMENTUM_DIRECTION, self.vertex_momentum_direction)?;
        visitor.visit_float(fields::VERTEX_KINETIC_ENERGY, self.vertex_kinetic_energy)?;
        visitor.visit_int(fields::VERTEX_PARTICLE_CODE, self.vertex_particle_code)
    }
}

impl Default for EventRecord {
    fn default() -> Self {
        Self::new()
    }
}
