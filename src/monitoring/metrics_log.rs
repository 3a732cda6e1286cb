use crate::error::RenderResult;
use crate::models::snapshot::{RoadId, Snapshot};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    pub step: u64,
    pub road: String,
    pub density: f64,
    pub average_speed: f64,
    pub stopped_vehicles: u64,
}

/// Appends one CSV row per road per rendered frame.
#[derive(Debug, Clone)]
pub struct MetricsLog {
    path: PathBuf,
}

impl MetricsLog {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Roads without metrics are left out. Returns the number of rows written.
    pub fn append(&self, snapshot: &Snapshot) -> RenderResult<usize> {
        let records: Vec<MetricsRecord> = RoadId::ALL
            .iter()
            .filter_map(|&road| {
                snapshot.road_metrics(road).map(|m| MetricsRecord {
                    step: snapshot.step,
                    road: road.key().to_string(),
                    density: m.density,
                    average_speed: m.average_speed,
                    stopped_vehicles: m.stopped_vehicles,
                })
            })
            .collect();
        if records.is_empty() {
            return Ok(0);
        }

        // Header only goes into a fresh file.
        let file_exists = self.path.exists();
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(!file_exists)
            .from_writer(file);
        for record in &records {
            wtr.serialize(record)?;
        }
        wtr.flush()?;
        Ok(records.len())
    }

    pub fn read_all(&self) -> RenderResult<Vec<MetricsRecord>> {
        let mut rdr = csv::Reader::from_path(&self.path)?;
        let mut records = Vec::new();
        for result in rdr.deserialize() {
            records.push(result?);
        }
        Ok(records)
    }
}
