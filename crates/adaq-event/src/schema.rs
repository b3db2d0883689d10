//! Schema version and stable field enumeration for [`EventRecord`].
//!
//! Persistence code never reaches into the record's storage. It walks the
//! record through [`EventRecord::visit_fields`], which reports every field in
//! the order listed in [`FIELDS`]. That order is the version-1 layout and
//! must not change without bumping [`SCHEMA_VERSION`].
//!
//! [`EventRecord`]: crate::EventRecord
//! [`EventRecord::visit_fields`]: crate::EventRecord::visit_fields

use crate::vector::Vector3;

/// Current on-disk schema version of the event record.
///
/// Stored alongside every serialized record. Readers reject any version they
/// do not know rather than guess at the field layout.
pub const SCHEMA_VERSION: u32 = 1;

/// Shape of a single record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// 32-bit signed integer.
    Int,
    /// 64-bit IEEE-754 float.
    Float,
    /// Ordered sequence of 64-bit floats.
    FloatSeq,
    /// Three 64-bit floats written as one unit.
    Vec3,
}

/// Name and kind of one record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    /// Stable field name, also used as the JSON key.
    pub name: &'static str,
    /// Value shape.
    pub kind: FieldKind,
}

impl FieldDescriptor {
    const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

/// Descriptors for each field, in layout order.
pub mod fields {
    use super::{FieldDescriptor, FieldKind};

    /// Index of the event within its run.
    pub const EVENT_ID: FieldDescriptor = FieldDescriptor::new("event_id", FieldKind::Int);
    /// Index of the simulation run.
    pub const RUN_ID: FieldDescriptor = FieldDescriptor::new("run_id", FieldKind::Int);
    /// Summed ionizing energy deposit.
    pub const TOTAL_ENERGY_DEPOSITED: FieldDescriptor =
        FieldDescriptor::new("total_energy_deposited", FieldKind::Float);
    /// Scintillation/Cerenkov photons created.
    pub const PHOTONS_CREATED: FieldDescriptor =
        FieldDescriptor::new("photons_created", FieldKind::Int);
    /// Photons registered by a sensor.
    pub const PHOTONS_DETECTED: FieldDescriptor =
        FieldDescriptor::new("photons_detected", FieldKind::Int);
    /// Per-photon creation timestamps.
    pub const PHOTON_CREATION_TIMES: FieldDescriptor =
        FieldDescriptor::new("photon_creation_times", FieldKind::FloatSeq);
    /// Per-photon detection timestamps.
    pub const PHOTON_DETECTION_TIMES: FieldDescriptor =
        FieldDescriptor::new("photon_detection_times", FieldKind::FloatSeq);
    /// Origin of the primary particle.
    pub const VERTEX_POSITION: FieldDescriptor =
        FieldDescriptor::new("vertex_position", FieldKind::Vec3);
    /// Momentum direction of the primary particle.
    pub const VERTEX_MOMENTUM_DIRECTION: FieldDescriptor =
        FieldDescriptor::new("vertex_momentum_direction", FieldKind::Vec3);
    /// Kinetic energy of the primary particle.
    pub const VERTEX_KINETIC_ENERGY: FieldDescriptor =
        FieldDescriptor::new("vertex_kinetic_energy", FieldKind::Float);
    /// Particle-species code of the primary particle.
    pub const VERTEX_PARTICLE_CODE: FieldDescriptor =
        FieldDescriptor::new("vertex_particle_code", FieldKind::Int);
}

/// Every field of the record, in version-1 layout order.
pub const FIELDS: [FieldDescriptor; 11] = [
    fields::EVENT_ID,
    fields::RUN_ID,
    fields::TOTAL_ENERGY_DEPOSITED,
    fields::PHOTONS_CREATED,
    fields::PHOTONS_DETECTED,
    fields::PHOTON_CREATION_TIMES,
    fields::PHOTON_DETECTION_TIMES,
    fields::VERTEX_POSITION,
    fields::VERTEX_MOMENTUM_DIRECTION,
    fields::VERTEX_KINETIC_ENERGY,
    fields::VERTEX_PARTICLE_CODE,
];

/// Receives record fields one at a time during [`visit_fields`].
///
/// Each method is called with the descriptor of the field being reported.
/// Returning an error stops the walk and propagates the error to the caller.
///
/// [`visit_fields`]: crate::EventRecord::visit_fields
pub trait FieldVisitor {
    /// Error produced by this visitor.
    type Error;

    /// Visit an integer field.
    fn visit_int(&mut self, field: FieldDescriptor, value: i32) -> Result<(), Self::Error>;

    /// Visit a scalar float field.
    fn visit_float(&mut self, field: FieldDescriptor, value: f64) -> Result<(), Self::Error>;

    /// Visit a float sequence field.
    fn visit_float_seq(
        &mut self,
        field: FieldDescriptor,
        values: &[f64],
    ) -> Result<(), Self::Error>;

    /// Visit a three-component vector field.
    fn visit_vec3(&mut self, field: FieldDescriptor, value: Vector3) -> Result<(), Self::Error>;
}
