//! Snapshot exporter: frames as JSON for an external renderer.
//!
//! A renderer draws each agent's trail in its phase colour and each visible
//! field cell as a square with the cell's opacity. Everything it needs is in
//! the snapshot, so the exporter only serializes.

use crate::simulation::SimulationSnapshot;
use std::io::Write;
use swarmfield_core::error::{Result, SwarmError};

/// Serialize a snapshot to a JSON string.
pub fn snapshot_to_json(snapshot: &SimulationSnapshot) -> Result<String> {
    Ok(serde_json::to_string(snapshot)?)
}

/// Write a snapshot as one line of JSON (JSON Lines framing).
pub fn write_snapshot<W: Write>(writer: &mut W, snapshot: &SimulationSnapshot) -> Result<()> {
    serde_json::to_writer(&mut *writer, snapshot)?;
    writer
        .write_all(b"\n")
        .map_err(|e| SwarmError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::simulation::Simulation;
    use serde_json::Value;
    use swarmfield_core::field::ChemicalField;
    use swarmfield_core::types::Position;

    #[test]
    fn json_carries_render_hints() {
        let mut sim = Simulation::new(SimulationConfig::new(200.0, 200.0, 12).with_seed(2)).unwrap();
        sim.field_mut().deposit(Position::new(50.0, 50.0), 1.0);
        sim.tick();

        let json = snapshot_to_json(&sim.snapshot()).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["tick"], 1);
        let agents = value["agents"].as_array().unwrap();
        assert_eq!(agents.len(), 12);
        assert!(agents[0]["style"]["hue"].is_number());
        assert!(agents[0]["trail_width"].as_f64().unwrap() >= 1.0);
        assert!(!value["cells"].as_array().unwrap().is_empty());
    }

    #[test]
    fn frames_are_newline_delimited() {
        let mut sim = Simulation::new(SimulationConfig::new(100.0, 100.0, 4).with_seed(3)).unwrap();
        let mut out = Vec::new();
        for _ in 0..3 {
            sim.tick();
            write_snapshot(&mut out, &sim.snapshot()).unwrap();
        }
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        let last: Value = serde_json::from_str(lines[2]).unwrap();
        assert_eq!(last["tick"], 3);
    }
}
