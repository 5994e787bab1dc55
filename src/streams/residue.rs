use serde::Deserialize;

use super::{Interpolate, PeriodicObservation, lerp};
use crate::clock::Timestamp;
use crate::readers::utils::day_fields;
use crate::readers::{RowParser, require_columns};

/// Kilograms per hectare to kilograms per square metre
const KG_HA_TO_KG_M2: f64 = 1.0 / 10_000.0;

/// Surface residue (mulch) layer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResidueState {
    pub thickness: f64, // [m]
    pub load: f64,      // [kg/m2]
    pub cover: f64,     // Fraction of surface covered
    pub albedo: f64,
    pub vapor_resistance: f64,
    pub convection: f64,
}

impl ResidueState {
    pub const COLUMNS: usize = 8;

    /// Parses `day year thickness load cover albedo vapor_resistance convection` with the
    /// thickness in cm and the load in kg/ha.
    pub fn from_row(row: &[f64]) -> Result<PeriodicObservation<Self>, String> {
        require_columns(row, Self::COLUMNS)?;
        Ok(PeriodicObservation::new(
            Timestamp::start_of(day_fields(row[0], row[1])?),
            ResidueState {
                thickness: row[2] / 100.0,
                load: row[3] * KG_HA_TO_KG_M2,
                cover: row[4],
                albedo: row[5],
                vapor_resistance: row[6],
                convection: row[7],
            },
        ))
    }

    pub fn parser() -> RowParser<PeriodicObservation<Self>> {
        Box::new(ResidueState::from_row)
    }
}

impl Interpolate for ResidueState {
    fn interpolate(&self, next: &Self, fraction: f64) -> Self {
        ResidueState {
            thickness: lerp(self.thickness, next.thickness, fraction),
            load: lerp(self.load, next.load, fraction),
            cover: lerp(self.cover, next.cover, fraction),
            albedo: lerp(self.albedo, next.albedo, fraction),
            vapor_resistance: lerp(self.vapor_resistance, next.vapor_resistance, fraction),
            convection: lerp(self.convection, next.convection, fraction),
        }
    }
}
