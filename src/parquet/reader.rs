//! Reading ancestry tables back into rows.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use arrow::array::{Array, AsArray, RecordBatch, StructArray};
use arrow::datatypes::{Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::table::{AncestryRecord, ParticleSnapshot};

/// Read every row of an ancestry table, in file order.
pub fn read_ancestry_table(path: &Path) -> Result<Vec<AncestryRecord>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open table: {}", path.display()))?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .with_context(|| format!("Not a Parquet file: {}", path.display()))?
        .build()?;

    let mut records = Vec::new();
    for batch in reader {
        append_batch(&batch?, &mut records)?;
    }
    Ok(records)
}

fn append_batch(batch: &RecordBatch, records: &mut Vec<AncestryRecord>) -> Result<()> {
    let ancestry = batch
        .column_by_name("ancestry")
        .context("Missing 'ancestry' column")?
        .as_list_opt::<i32>()
        .context("'ancestry' column is not a list")?;
    let evt_ids = batch
        .column_by_name("evt_id")
        .context("Missing 'evt_id' column")?
        .as_primitive_opt::<Int64Type>()
        .context("'evt_id' column is not Int64")?;

    for row in 0..batch.num_rows() {
        let chain = ancestry.value(row);
        let particles = chain
            .as_struct_opt()
            .context("'ancestry' items are not structs")?;
        records.push(AncestryRecord {
            ancestry: read_particles(particles)?,
            evt_id: evt_ids.value(row),
        });
    }
    Ok(())
}

fn read_particles(particles: &StructArray) -> Result<Vec<ParticleSnapshot>> {
    let int = move |name: &str| -> Result<_> {
        particles
            .column_by_name(name)
            .with_context(|| format!("Missing particle field '{name}'"))?
            .as_primitive_opt::<Int32Type>()
            .with_context(|| format!("Particle field '{name}' is not Int32"))
    };
    let float = move |name: &str| -> Result<_> {
        particles
            .column_by_name(name)
            .with_context(|| format!("Missing particle field '{name}'"))?
            .as_primitive_opt::<Float64Type>()
            .with_context(|| format!("Particle field '{name}' is not Float64"))
    };

    let (pdg, status) = (int("pdg")?, int("status")?);
    let (mother1, mother2) = (int("mother1")?, int("mother2")?);
    let (daughter1, daughter2) = (int("daughter1")?, int("daughter2")?);
    let (px, py, pz, e) = (float("px")?, float("py")?, float("pz")?, float("e")?);
    let (x, y, z, t) = (float("x")?, float("y")?, float("z")?, float("t")?);

    Ok((0..particles.len())
        .map(|i| ParticleSnapshot {
            pdg: pdg.value(i),
            status: status.value(i),
            mother1: mother1.value(i),
            mother2: mother2.value(i),
            daughter1: daughter1.value(i),
            daughter2: daughter2.value(i),
            px: px.value(i),
            py: py.value(i),
            pz: pz.value(i),
            e: e.value(i),
            x: x.value(i),
            y: y.value(i),
            z: z.value(i),
            t: t.value(i),
        })
        .collect())
}
