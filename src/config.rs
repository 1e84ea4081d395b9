//! Engine configuration

use std::path::PathBuf;

use rand::Rng;

/// Bounding region within which newly created nodes are placed.
///
/// The layout engine owns node positions after creation; this region only
/// keeps fresh nodes inside the visible canvas until the first layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRegion {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl SpawnRegion {
    /// Sample a random position inside the region.
    pub fn sample(&self) -> (f64, f64) {
        let mut rng = rand::thread_rng();
        (
            rng.gen_range(self.x_min..self.x_max),
            rng.gen_range(self.y_min..self.y_max),
        )
    }
}

impl Default for SpawnRegion {
    fn default() -> Self {
        Self {
            x_min: 200.0,
            x_max: 600.0,
            y_min: 100.0,
            y_max: 500.0,
        }
    }
}

/// Configuration for one engine instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Key the session snapshot is stored under in the blob store.
    pub snapshot_key: String,
    /// Where newly created nodes are placed.
    pub spawn_region: SpawnRegion,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snapshot_key: "brainstorm".to_string(),
            spawn_region: SpawnRegion::default(),
        }
    }
}

impl Config {
    /// Use a different snapshot key (one key per session).
    pub fn with_snapshot_key(mut self, key: impl Into<String>) -> Self {
        self.snapshot_key = key.into();
        self
    }

    /// Default on-disk location for the snapshot database.
    pub fn default_db_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mindmesh")
            .join("snapshots.db")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_region_samples_stay_in_bounds() {
        let region = SpawnRegion::default();
        for _ in 0..100 {
            let (x, y) = region.sample();
            assert!(x >= region.x_min && x < region.x_max);
            assert!(y >= region.y_min && y < region.y_max);
        }
    }
}
