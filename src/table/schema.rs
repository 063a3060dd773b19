//! Arrow schema for the ancestry table.
//!
//! Each row holds one accepted neutrino:
//! - `ancestry` - list of particle structs, neutrino first
//! - `evt_id` - originating event
//!
//! Particle struct fields keep the generator's conventions: mother and
//! daughter indices refer to the event record (0 = none), momenta are in GeV
//! and production vertices in mm.

use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Fields, Schema};

/// Fields of one particle snapshot, in column order.
pub fn particle_fields() -> Fields {
    Fields::from(vec![
        Field::new("pdg", DataType::Int32, false),
        Field::new("status", DataType::Int32, false),
        Field::new("mother1", DataType::Int32, false),
        Field::new("mother2", DataType::Int32, false),
        Field::new("daughter1", DataType::Int32, false),
        Field::new("daughter2", DataType::Int32, false),
        Field::new("px", DataType::Float64, false),
        Field::new("py", DataType::Float64, false),
        Field::new("pz", DataType::Float64, false),
        Field::new("e", DataType::Float64, false),
        Field::new("x", DataType::Float64, false),
        Field::new("y", DataType::Float64, false),
        Field::new("z", DataType::Float64, false),
        Field::new("t", DataType::Float64, false),
    ])
}

/// List element field for the `ancestry` column.
pub fn ancestry_item_field() -> Arc<Field> {
    Arc::new(Field::new("item", DataType::Struct(particle_fields()), false))
}

/// Schema for the ancestry table
pub fn ancestry_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("ancestry", DataType::List(ancestry_item_field()), false),
        Field::new("evt_id", DataType::Int64, false),
    ]))
}
