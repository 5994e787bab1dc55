use serde::Deserialize;

use super::{Interpolate, PeriodicObservation, lerp};
use crate::clock::Timestamp;
use crate::readers::utils::day_fields;
use crate::readers::{RowParser, require_columns};

/// Half-width of the leaf-on and leaf-off LAI ramps [days]
pub const LAI_RAMP_HALF_WIDTH: f64 = 15.0;

/// Column layout of a plant growth file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum PlantLayout {
    /// `day year height leaf_dim weight lai root_depth`; clumping is taken as 1
    #[serde(rename(deserialize = "legacy"))]
    Legacy,
    /// `day year height leaf_dim clumping weight lai root_depth`
    #[serde(rename(deserialize = "current"))]
    Current,
}

impl PlantLayout {
    pub fn columns(self) -> usize {
        match self {
            PlantLayout::Legacy => 7,
            PlantLayout::Current => 8,
        }
    }
}

/// Canopy of one plant species on one day.
#[derive(Debug, Clone, PartialEq)]
pub struct PlantState {
    pub height: f64,         // [m]
    pub leaf_dimension: f64, // Characteristic leaf dimension [m]
    pub clumping: f64,
    pub dry_weight: f64,     // [kg/m2]
    pub leaf_area_index: f64,
    pub root_depth: f64,     // [m]
}

impl PlantState {
    /// Parses a growth record. Leaf dimensions are given in cm.
    pub fn from_row(row: &[f64], layout: PlantLayout) -> Result<PeriodicObservation<Self>, String> {
        require_columns(row, layout.columns())?;
        let stamp = Timestamp::start_of(day_fields(row[0], row[1])?);

        let state = match layout {
            PlantLayout::Legacy => PlantState {
                height: row[2],
                leaf_dimension: row[3] / 100.0,
                clumping: 1.0,
                dry_weight: row[4],
                leaf_area_index: row[5],
                root_depth: row[6],
            },
            PlantLayout::Current => PlantState {
                height: row[2],
                leaf_dimension: row[3] / 100.0,
                clumping: row[4],
                dry_weight: row[5],
                leaf_area_index: row[6],
                root_depth: row[7],
            },
        };
        Ok(PeriodicObservation::new(stamp, state))
    }

    pub fn parser(layout: PlantLayout) -> RowParser<PeriodicObservation<Self>> {
        Box::new(move |row| PlantState::from_row(row, layout))
    }
}

impl Interpolate for PlantState {
    fn interpolate(&self, next: &Self, fraction: f64) -> Self {
        PlantState {
            height: lerp(self.height, next.height, fraction),
            leaf_dimension: lerp(self.leaf_dimension, next.leaf_dimension, fraction),
            clumping: lerp(self.clumping, next.clumping, fraction),
            dry_weight: lerp(self.dry_weight, next.dry_weight, fraction),
            leaf_area_index: lerp(self.leaf_area_index, next.leaf_area_index, fraction),
            root_depth: lerp(self.root_depth, next.root_depth, fraction),
        }
    }
}

/// Seasonal LAI of a plant with constant canopy values: zero until 15 days before leaf-on,
/// a linear ramp up to `full_lai` 15 days after, full LAI until 15 days before leaf-off and a
/// ramp back to zero 15 days after it.
pub fn leaf_area_index(julian: u32, leaf_on: u32, leaf_off: u32, full_lai: f64) -> f64 {
    let julian = julian as f64;
    let leaf_on = leaf_on as f64;
    let leaf_off = leaf_off as f64;
    let half = LAI_RAMP_HALF_WIDTH;

    if julian < leaf_on - half {
        0.0
    } else if julian <= leaf_on + half {
        0.5 * ((julian - leaf_on) / half + 1.0) * full_lai
    } else if julian <= leaf_off - half {
        full_lai
    } else if julian <= leaf_off + half {
        0.5 * (1.0 - (julian - leaf_off) / half) * full_lai
    } else {
        0.0
    }
}
