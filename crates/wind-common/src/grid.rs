//! Wind grid payload types.
//!
//! The wind-data endpoint serves a two-element JSON array of grid
//! components, ordered [U, V]. Only the grid dimensions and the parameter
//! number are interpreted here; every other provider field (origin,
//! resolution, reference time, ...) is carried through untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// GRIB parameter number identifying the U (eastward) wind component.
pub const PARAMETER_NUMBER_U: u8 = 2;

/// GRIB parameter number identifying the V (northward) wind component.
pub const PARAMETER_NUMBER_V: u8 = 3;

/// Header of one grid component as delivered by the wind-data endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridHeader {
    /// Number of points in X (longitude) direction
    pub nx: usize,
    /// Number of points in Y (latitude) direction
    pub ny: usize,
    /// GRIB parameter number (2 = UGRD, 3 = VGRD)
    #[serde(rename = "parameterNumber", default)]
    pub parameter_number: u8,
    /// Provider metadata passed through verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GridHeader {
    /// Sample count the declared dimensions imply.
    pub fn expected_len(&self) -> usize {
        self.nx * self.ny
    }
}

/// One component of the vector field: a header plus its flat sample array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridComponent {
    pub header: GridHeader,
    pub data: Vec<f64>,
}

impl GridComponent {
    /// Whether the sample count matches the dimensions the header declares.
    pub fn len_matches(&self) -> bool {
        self.data.len() == self.header.expected_len()
    }

    /// Exact zero test across all samples. A grid where every value is
    /// `0.0` carries no flow to animate.
    pub fn is_all_zero(&self) -> bool {
        self.data.iter().all(|&v| v == 0.0)
    }

    /// Clone of this component with the parameter number overridden.
    pub fn tagged(&self, parameter_number: u8) -> GridComponent {
        let mut header = self.header.clone();
        header.parameter_number = parameter_number;
        GridComponent {
            header,
            data: self.data.clone(),
        }
    }
}

/// The two-component wind field, ordered [U, V] by endpoint convention.
///
/// Constructed fresh per fetch, never mutated after validation; the tagging
/// step produces a new payload rather than editing this one in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindPayload {
    pub u: GridComponent,
    pub v: GridComponent,
}

impl WindPayload {
    /// Split a wire-ordered component list into [U, V]. Returns `None`
    /// unless exactly two components are present.
    pub fn from_components(components: Vec<GridComponent>) -> Option<Self> {
        let mut iter = components.into_iter();
        match (iter.next(), iter.next(), iter.next()) {
            (Some(u), Some(v), None) => Some(Self { u, v }),
            _ => None,
        }
    }

    /// Re-tag both headers with the standard U/V parameter numbers; data is
    /// passed through unchanged.
    pub fn tagged(&self) -> WindPayload {
        WindPayload {
            u: self.u.tagged(PARAMETER_NUMBER_U),
            v: self.v.tagged(PARAMETER_NUMBER_V),
        }
    }
}
