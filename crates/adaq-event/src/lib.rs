//! Per-event data record for Monte Carlo detector simulations.
//!
//! An [`EventRecord`] holds the outcome of one simulated event: event and run
//! identity, total deposited energy, scintillation/Cerenkov photon counts and
//! timestamps, and the kinematics of the primary (vertex) particle. It is a
//! passive value type. The simulation loop fills it, a persistence layer
//! writes it out, and the loop resets it for the next event.
//!
//! # Modules
//!
//! - [`record`] -- The [`EventRecord`] itself: reset contract and accessors
//! - [`vector`] -- [`Vector3`], the copy-on-read vertex vector type
//! - [`schema`] -- [`SCHEMA_VERSION`], the [`FIELDS`] layout table, and the
//!   [`FieldVisitor`] trait used by encoders
//!
//! # Usage
//!
//! ```
//! use adaq_event::{EventRecord, Vector3};
//!
//! let mut record = EventRecord::new();
//! record.set_event_id(42);
//! record.set_run_id(7);
//! record.add_photon_creation_time(0.0);
//! record.add_photon_creation_time(1.5e-9);
//! record.set_vertex_position(1.0, 2.0, -3.0);
//!
//! assert_eq!(record.photon_creation_times().len(), 2);
//! assert_eq!(record.vertex_position(), Vector3::new(1.0, 2.0, -3.0));
//!
//! record.initialize();
//! assert_eq!(record, EventRecord::default());
//! ```

pub mod record;
pub mod schema;
pub mod vector;

// Re-export primary types at crate root.
pub use record::EventRecord;
pub use schema::{FIELDS, FieldDescriptor, FieldKind, FieldVisitor, SCHEMA_VERSION, fields};
pub use vector::Vector3;
