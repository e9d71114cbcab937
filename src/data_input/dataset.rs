// src/data_input/dataset.rs

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{ISO_GRID_SPACING, TRA_INTERPOLATION_HEIGHT};
use crate::error::{LineFreqError, LineFreqResult};

/// Physical setup a dataset was simulated with. Line position, grid spacing
/// and field layout are defined per family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFamily {
    /// Transonic cylinder flow (Tra), interpolated onto a 12x6 area.
    Transonic,
    /// Incompressible wake flow (Inc).
    Incompressible,
    /// Isotropic turbulence (Iso), 2pi x 2pi domain with strided queries.
    Isotropic,
}

/// Every dataset the analysis knows. Parsing any other name fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DatasetName {
    Extrap,
    Interp,
    Longer,
    HighRey,
    LowRey,
    VarReyIn,
    ZInterp,
}

/// Spacing used to turn FFT bin indices into wavenumbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridSpacing {
    Physical(f64),
    /// No physical spacing is known for the dataset; bins are reported in
    /// cycles per grid cell.
    Index,
}

impl GridSpacing {
    pub fn value(self) -> f64 {
        match self {
            GridSpacing::Physical(d) => d,
            GridSpacing::Index => 1.0,
        }
    }
}

impl DatasetName {
    pub const ALL: [DatasetName; 7] = [
        DatasetName::Extrap,
        DatasetName::Interp,
        DatasetName::Longer,
        DatasetName::HighRey,
        DatasetName::LowRey,
        DatasetName::VarReyIn,
        DatasetName::ZInterp,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DatasetName::Extrap => "extrap",
            DatasetName::Interp => "interp",
            DatasetName::Longer => "longer",
            DatasetName::HighRey => "highRey",
            DatasetName::LowRey => "lowRey",
            DatasetName::VarReyIn => "varReyIn",
            DatasetName::ZInterp => "zInterp",
        }
    }

    pub fn family(self) -> DatasetFamily {
        match self {
            DatasetName::Extrap | DatasetName::Interp | DatasetName::Longer => {
                DatasetFamily::Transonic
            }
            DatasetName::HighRey | DatasetName::LowRey | DatasetName::VarReyIn => {
                DatasetFamily::Incompressible
            }
            DatasetName::ZInterp => DatasetFamily::Isotropic,
        }
    }

    /// Label shown in the figure corner.
    pub fn display_name(self) -> &'static str {
        match self {
            DatasetName::Extrap => "Tra_ext",
            DatasetName::Interp => "Tra_int",
            DatasetName::Longer => "Tra_long",
            DatasetName::HighRey => "Inc_high",
            DatasetName::LowRey => "Inc_low",
            DatasetName::VarReyIn => "Inc_var",
            DatasetName::ZInterp => "Iso",
        }
    }

    /// Grid spacing along the vertical line for a line of `n` samples.
    pub fn grid_spacing(self, n: usize) -> GridSpacing {
        match self.family() {
            DatasetFamily::Transonic => GridSpacing::Physical(TRA_INTERPOLATION_HEIGHT / n as f64),
            DatasetFamily::Isotropic => GridSpacing::Physical(ISO_GRID_SPACING),
            DatasetFamily::Incompressible => GridSpacing::Index,
        }
    }

    /// Channel layout of the field axis, in storage order.
    pub fn field_names(self) -> &'static [&'static str] {
        match self.family() {
            DatasetFamily::Incompressible => &["velX", "velY", "pres", "rey"],
            DatasetFamily::Transonic => &["velX", "velY", "dens", "pres", "rey", "mach"],
            DatasetFamily::Isotropic => &["velX", "velY", "velZ", "pres"],
        }
    }

    /// Index of `field` on the field axis.
    pub fn field_index(self, field: &str) -> LineFreqResult<usize> {
        self.field_names()
            .iter()
            .position(|&name| name == field)
            .ok_or_else(|| LineFreqError::UnknownField {
                dataset: self.as_str().to_string(),
                field: field.to_string(),
            })
    }

    /// Fields the models are trained on; simulation parameters stored
    /// behind them are dropped before analysis.
    pub fn loss_relevant_fields(self) -> Range<usize> {
        match self.family() {
            DatasetFamily::Incompressible => 0..3,
            DatasetFamily::Transonic => 0..4,
            DatasetFamily::Isotropic => 0..4,
        }
    }
}

impl fmt::Display for DatasetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatasetName {
    type Err = LineFreqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DatasetName::ALL
            .iter()
            .copied()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| LineFreqError::UnknownDataset(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_names() {
        for dataset in DatasetName::ALL {
            assert_eq!(dataset.as_str().parse::<DatasetName>().unwrap(), dataset);
        }
    }

    #[test]
    fn test_unknown_dataset_is_rejected() {
        let err = "midRey".parse::<DatasetName>().unwrap_err();
        assert!(matches!(err, LineFreqError::UnknownDataset(ref name) if name == "midRey"));
    }

    #[test]
    fn test_serde_uses_camel_case_names() {
        let json = serde_json::to_string(&DatasetName::VarReyIn).unwrap();
        assert_eq!(json, "\"varReyIn\"");
        let parsed: DatasetName = serde_json::from_str("\"zInterp\"").unwrap();
        assert_eq!(parsed, DatasetName::ZInterp);
    }

    #[test]
    fn test_families() {
        assert_eq!(DatasetName::Longer.family(), DatasetFamily::Transonic);
        assert_eq!(DatasetName::LowRey.family(), DatasetFamily::Incompressible);
        assert_eq!(DatasetName::ZInterp.family(), DatasetFamily::Isotropic);
    }

    #[test]
    fn test_grid_spacing() {
        assert_eq!(DatasetName::Extrap.grid_spacing(64), GridSpacing::Physical(6.0 / 64.0));
        assert_eq!(DatasetName::LowRey.grid_spacing(128), GridSpacing::Index);
        assert_eq!(GridSpacing::Index.value(), 1.0);
        let iso = DatasetName::ZInterp.grid_spacing(512).value();
        assert!((iso - 2.0 * (2.0 * 3.1415 / 1024.0)).abs() < 1e-15);
    }

    #[test]
    fn test_field_lookup() {
        assert_eq!(DatasetName::LowRey.field_index("velX").unwrap(), 0);
        assert_eq!(DatasetName::Interp.field_index("pres").unwrap(), 3);
        assert_eq!(DatasetName::ZInterp.field_index("velZ").unwrap(), 2);
        assert!(DatasetName::LowRey.field_index("velZ").is_err());
    }

    #[test]
    fn test_loss_relevant_fields_exclude_parameters() {
        for dataset in DatasetName::ALL {
            let range = dataset.loss_relevant_fields();
            assert!(range.end <= dataset.field_names().len());
            assert!(range.contains(&dataset.field_index("velX").unwrap()));
        }
        assert_eq!(DatasetName::HighRey.loss_relevant_fields(), 0..3);
    }
}

// src/data_input/dataset.rs
