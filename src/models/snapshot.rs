use crate::error::{RenderError, RenderResult};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;

/// The two roads every snapshot carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoadId {
    Road1,
    Road2,
}

impl RoadId {
    pub const ALL: [RoadId; 2] = [RoadId::Road1, RoadId::Road2];

    pub fn index(self) -> usize {
        match self {
            RoadId::Road1 => 0,
            RoadId::Road2 => 1,
        }
    }

    /// Key used for this road in the snapshot payload and its `metrics` map.
    pub fn key(self) -> &'static str {
        match self {
            RoadId::Road1 => "road1",
            RoadId::Road2 => "road2",
        }
    }
}

impl fmt::Display for RoadId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Road {}", self.index() + 1)
    }
}

/// One vehicle as the simulation reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub position: f64,
    pub velocity: f64,
    #[serde(default)]
    pub adaptive_cruise_control: bool,
}

/// Aggregate statistics for one road.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadMetrics {
    pub density: f64,
    pub average_speed: f64,
    pub stopped_vehicles: u64,
}

/// One simulation step, consumed by a single frame and then dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub step: u64,
    /// Vehicles per road, front-to-back (index 0 is the leader).
    pub roads: [Vec<Vehicle>; 2],
    /// `None` when the payload had no usable metrics for that road.
    pub metrics: [Option<RoadMetrics>; 2],
    /// Vehicle records dropped during parsing.
    pub skipped_vehicles: usize,
}

impl Snapshot {
    pub fn vehicles(&self, road: RoadId) -> &[Vehicle] {
        &self.roads[road.index()]
    }

    pub fn road_metrics(&self, road: RoadId) -> Option<&RoadMetrics> {
        self.metrics[road.index()].as_ref()
    }

    /// Parses a raw message body. Invalid JSON counts as a malformed snapshot.
    pub fn from_slice(body: &[u8]) -> RenderResult<Self> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| RenderError::MalformedSnapshot(format!("invalid JSON: {}", e)))?;
        Self::from_value(value)
    }

    /// Validates a payload. `step` and both road arrays are mandatory; bad
    /// vehicle records and bad metrics are dropped individually.
    pub fn from_value(value: Value) -> RenderResult<Self> {
        let mut fields = match value {
            Value::Object(fields) => fields,
            other => {
                return Err(RenderError::MalformedSnapshot(format!(
                    "expected an object, got {}",
                    json_kind(&other)
                )))
            }
        };

        let step = match fields.get("step") {
            Some(Value::Number(n)) => step_from_number(n),
            Some(other) => {
                return Err(RenderError::MalformedSnapshot(format!(
                    "step must be a number, got {}",
                    json_kind(other)
                )))
            }
            None => return Err(RenderError::MalformedSnapshot("missing step".into())),
        };

        let mut skipped_vehicles = 0;
        let road1 = take_road(&mut fields, RoadId::Road1, step, &mut skipped_vehicles)?;
        let road2 = take_road(&mut fields, RoadId::Road2, step, &mut skipped_vehicles)?;

        let mut metrics_map = match fields.remove("metrics") {
            Some(Value::Object(map)) => map,
            _ => {
                warn!("Snapshot {} carries no metrics object", step);
                Map::new()
            }
        };
        let metrics = RoadId::ALL.map(|road| take_metrics(&mut metrics_map, road, step));

        Ok(Snapshot {
            step,
            roads: [road1, road2],
            metrics,
            skipped_vehicles,
        })
    }
}

// Integers pass through; fractional steps truncate, negative ones saturate to 0.
fn step_from_number(n: &Number) -> u64 {
    n.as_u64()
        .unwrap_or_else(|| n.as_f64().map(|f| f as u64).unwrap_or(0))
}

fn take_road(
    fields: &mut Map<String, Value>,
    road: RoadId,
    step: u64,
    skipped: &mut usize,
) -> RenderResult<Vec<Vehicle>> {
    let items = match fields.remove(road.key()) {
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(RenderError::MalformedSnapshot(format!(
                "{} must be an array, got {}",
                road.key(),
                json_kind(&other)
            )))
        }
        None => {
            return Err(RenderError::MalformedSnapshot(format!(
                "missing {} array",
                road.key()
            )))
        }
    };

    let mut vehicles = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<Vehicle>(item) {
            Ok(vehicle) => vehicles.push(vehicle),
            Err(e) => {
                *skipped += 1;
                warn!(
                    "Snapshot {}: skipping vehicle {} on {}: {}",
                    step,
                    index,
                    road.key(),
                    e
                );
            }
        }
    }
    Ok(vehicles)
}

fn take_metrics(map: &mut Map<String, Value>, road: RoadId, step: u64) -> Option<RoadMetrics> {
    let raw = map.remove(road.key())?;
    match serde_json::from_value::<RoadMetrics>(raw) {
        Ok(metrics) => Some(metrics),
        Err(e) => {
            warn!("Snapshot {}: unusable metrics for {}: {}", step, road.key(), e);
            None
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload() -> Value {
        json!({
            "step": 7,
            "road1": [
                {"position": 0, "velocity": 0, "adaptive_cruise_control": true},
                {"position": 12, "velocity": 2, "adaptive_cruise_control": true}
            ],
            "road2": [{"position": 50, "velocity": 3, "adaptive_cruise_control": false}],
            "metrics": {
                "road1": {"density": 0.5, "average_speed": 1.0, "stopped_vehicles": 1},
                "road2": {"density": 0.5, "average_speed": 3.0, "stopped_vehicles": 0}
            }
        })
    }

    #[test]
    fn parses_a_complete_payload() {
        let snapshot = Snapshot::from_value(payload()).unwrap();
        assert_eq!(snapshot.step, 7);
        assert_eq!(snapshot.vehicles(RoadId::Road1).len(), 2);
        assert!(snapshot.vehicles(RoadId::Road1)[0].adaptive_cruise_control);
        assert_eq!(snapshot.vehicles(RoadId::Road2)[0].position, 50.0);
        assert_eq!(
            snapshot.road_metrics(RoadId::Road2).map(|m| m.stopped_vehicles),
            Some(0)
        );
        assert_eq!(snapshot.skipped_vehicles, 0);
    }

    #[test]
    fn missing_or_textual_step_is_malformed() {
        let mut value = payload();
        value.as_object_mut().unwrap().remove("step");
        assert!(matches!(
            Snapshot::from_value(value),
            Err(RenderError::MalformedSnapshot(_))
        ));

        let mut value = payload();
        value["step"] = json!("7");
        assert!(matches!(
            Snapshot::from_value(value),
            Err(RenderError::MalformedSnapshot(_))
        ));
    }

    #[test]
    fn missing_road_array_is_malformed() {
        let mut value = payload();
        value.as_object_mut().unwrap().remove("road2");
        assert!(Snapshot::from_value(value).is_err());

        let mut value = payload();
        value["road1"] = json!({"position": 1});
        assert!(Snapshot::from_value(value).is_err());
    }

    #[test]
    fn non_object_payloads_and_bad_json_are_malformed() {
        assert!(Snapshot::from_value(json!(null)).is_err());
        assert!(Snapshot::from_value(json!([1, 2])).is_err());
        assert!(Snapshot::from_slice(b"{\"step\": 1,").is_err());
    }

    #[test]
    fn fractional_and_negative_steps_are_coerced() {
        let mut value = payload();
        value["step"] = json!(4.75);
        assert_eq!(Snapshot::from_value(value).unwrap().step, 4);

        let mut value = payload();
        value["step"] = json!(-3);
        assert_eq!(Snapshot::from_value(value).unwrap().step, 0);
    }

    #[test]
    fn bad_vehicles_are_skipped_without_failing_the_road() {
        let mut value = payload();
        value["road1"] = json!([
            {"position": 3, "velocity": 1},
            "not a vehicle",
            {"position": 9},
            {"position": 20, "velocity": 2, "adaptive_cruise_control": false}
        ]);
        let snapshot = Snapshot::from_value(value).unwrap();
        let road = snapshot.vehicles(RoadId::Road1);
        assert_eq!(road.len(), 2);
        assert!(!road[0].adaptive_cruise_control);
        assert_eq!(road[1].position, 20.0);
        assert_eq!(snapshot.skipped_vehicles, 2);
    }

    #[test]
    fn missing_metrics_do_not_reject_the_snapshot() {
        let mut value = payload();
        value.as_object_mut().unwrap().remove("metrics");
        let snapshot = Snapshot::from_value(value).unwrap();
        assert!(snapshot.road_metrics(RoadId::Road1).is_none());
        assert!(snapshot.road_metrics(RoadId::Road2).is_none());

        let mut value = payload();
        value["metrics"]["road2"] = json!({"density": "high"});
        let snapshot = Snapshot::from_value(value).unwrap();
        assert!(snapshot.road_metrics(RoadId::Road1).is_some());
        assert!(snapshot.road_metrics(RoadId::Road2).is_none());
    }

    #[test]
    fn road_labels() {
        assert_eq!(RoadId::Road1.to_string(), "Road 1");
        assert_eq!(RoadId::Road2.key(), "road2");
    }
}
