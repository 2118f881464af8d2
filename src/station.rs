//! Geodetic station description
use std::path::Path;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::enu::ReferencePoint;

/// Prefix of all component file names
pub(crate) const COMPONENT_PREFIX: &str = "mb_";

/// [Station] is a site identified by a short code, with its nominal position.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Station {
    /// Station code
    pub name: String,
    /// Nominal ECEF position [m]
    pub ecef: (f64, f64, f64),
}

impl Station {
    /// Builds a new [Station]
    pub fn new(name: &str, ecef: (f64, f64, f64)) -> Self {
        Self {
            name: name.to_string(),
            ecef,
        }
    }
    /// Builds a [Station] from one of its component files, following the
    /// `mb_<name>_<tag>.datN` naming convention. We fall back to the file
    /// stem when the name does not follow this convention.
    pub fn from_component_path(path: &Path, ecef: (f64, f64, f64)) -> Self {
        let filename = path
            .file_name()
            .map(|f| f.to_string_lossy().to_string())
            .unwrap_or_default();
        let name = match filename.strip_prefix(COMPONENT_PREFIX) {
            Some(stripped) => stripped.split('_').next().unwrap_or(stripped).to_string(),
            None => path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or(filename),
        };
        Self { name, ecef }
    }
    /// Nominal position, as a [ReferencePoint]
    pub fn reference(&self) -> ReferencePoint {
        ReferencePoint::from(self.ecef)
    }
    /// Component file name, for given tag and component index (1 to 3)
    pub fn component_filename(&self, tag: &str, nth: usize) -> String {
        format!("{}{}_{}.dat{}", COMPONENT_PREFIX, self.name, tag, nth)
    }
}

impl std::fmt::Display for Station {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} {}", self.name, self.reference())
    }
}
