//! Simulator configuration
//!
//! Uses RON (Rusty Object Notation) for human-readable config files.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Viewport and pipeline configuration, fixed for a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    pub width: u32,
    pub height: u32,
    /// Near clipping plane distance (positive; camera looks down -z)
    pub near: f32,
    /// Far clipping plane distance
    pub far: f32,
    /// Vertex table capacity
    pub table_capacity: usize,
    /// Per-stage FIFO bound driving the ready wire. `None` means
    /// unbounded buffering: consumers are always ready.
    pub fifo_capacity: Option<usize>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            near: 1.0,
            far: 10.0,
            table_capacity: crate::table::DEFAULT_CAPACITY,
            fifo_capacity: None,
        }
    }
}

/// Load a config from a RON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SimConfig, SimError> {
    let contents = fs::read_to_string(path)?;
    let config: SimConfig = ron::from_str(&contents)?;
    Ok(config)
}

/// Save a config to a RON file
pub fn save_config<P: AsRef<Path>>(config: &SimConfig, path: P) -> Result<(), SimError> {
    let pretty = ron::ser::PrettyConfig::new().indentor("  ".to_string());
    let contents = ron::ser::to_string_pretty(config, pretty)?;
    fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_reference_viewport() {
        let c = SimConfig::default();
        assert_eq!(c.width, 1280);
        assert_eq!(c.height, 720);
        assert_eq!(c.near, 1.0);
        assert_eq!(c.far, 10.0);
        assert_eq!(c.table_capacity, 48);
        assert!(c.fifo_capacity.is_none());
    }

    #[test]
    fn test_ron_round_trip() {
        let c = SimConfig {
            width: 640,
            height: 480,
            near: 0.5,
            far: 100.0,
            table_capacity: 16,
            fifo_capacity: Some(4),
        };
        let text = ron::ser::to_string(&c).unwrap();
        let back: SimConfig = ron::from_str(&text).unwrap();
        assert_eq!(back.width, 640);
        assert_eq!(back.fifo_capacity, Some(4));
    }
}
