use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::graph::random_graph::{Connectivity, GraphParams};

/// Scalar knobs for one training run, keyed exactly as in a settings file:
///
/// ```json
/// {
///   "numIterations": 5,
///   "batchSize": 100,
///   "pulseLength": 1,
///   "learnRate": 0.01,
///   "cullThresh": 1e-8,
///   "minVerts": 794,
///   "maxVerts": 1294,
///   "minEdgeWeight": 1e-6,
///   "maxEdgeWeight": 100.0,
///   "edgeProbability": 0.7
/// }
/// ```
///
/// `pulseLength` is validated and carried through, but associations are
/// always applied as one pulse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainSettings {
    pub num_iterations: usize,
    pub batch_size: usize,
    pub pulse_length: usize,
    pub learn_rate: f64,
    pub cull_thresh: f64,
    pub min_verts: usize,
    pub max_verts: usize,
    pub min_edge_weight: f64,
    pub max_edge_weight: f64,
    pub edge_probability: f64,
    #[serde(default)]
    pub connectivity: Connectivity,
}

impl Default for TrainSettings {
    fn default() -> Self {
        TrainSettings {
            num_iterations: 5,
            batch_size: 100,
            pulse_length: 1,
            learn_rate: 0.01,
            cull_thresh: 1e-8,
            min_verts: 794,
            max_verts: 1294,
            min_edge_weight: 1e-6,
            max_edge_weight: 100.0,
            edge_probability: 0.7,
            connectivity: Connectivity::BestEffort,
        }
    }
}

impl TrainSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("numIterations", self.num_iterations),
            ("batchSize", self.batch_size),
            ("pulseLength", self.pulse_length),
        ] {
            if value == 0 {
                return Err(ConfigError::Zero { field });
            }
        }
        for (field, value) in [("learnRate", self.learn_rate), ("cullThresh", self.cull_thresh)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidRate { field, value });
            }
        }
        self.graph_params().validate()
    }

    /// Graph generator parameters carried by these settings.
    pub fn graph_params(&self) -> GraphParams {
        GraphParams {
            min_verts: self.min_verts,
            max_verts: self.max_verts,
            edge_probability: self.edge_probability,
            min_edge_weight: self.min_edge_weight,
            max_edge_weight: self.max_edge_weight,
            connectivity: self.connectivity,
        }
    }

    /// Serializes the settings to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> std::io::Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }

    /// Deserializes settings from a JSON file.
    pub fn load_json(path: &str) -> std::io::Result<TrainSettings> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(TrainSettings::default().validate(), Ok(()));
    }

    #[test]
    fn json_keys_match_settings_names() {
        let json = serde_json::to_value(TrainSettings::default()).unwrap();
        for key in [
            "numIterations", "batchSize", "pulseLength", "learnRate", "cullThresh",
            "minVerts", "maxVerts", "minEdgeWeight", "maxEdgeWeight", "edgeProbability",
        ] {
            assert!(json.get(key).is_some(), "missing key {}", key);
        }
    }

    #[test]
    fn connectivity_defaults_when_absent() {
        let mut json = serde_json::to_value(TrainSettings::default()).unwrap();
        json.as_object_mut().unwrap().remove("connectivity");
        let parsed: TrainSettings = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.connectivity, Connectivity::BestEffort);
    }

    #[test]
    fn rejects_zero_pulse_length() {
        let settings = TrainSettings { pulse_length: 0, ..TrainSettings::default() };
        assert_eq!(settings.validate(), Err(ConfigError::Zero { field: "pulseLength" }));
    }

    #[test]
    fn rejects_inverted_vertex_range() {
        let settings = TrainSettings { min_verts: 10, max_verts: 5, ..TrainSettings::default() };
        assert_eq!(settings.validate(), Err(ConfigError::VertexRange { min: 10, max: 5 }));
    }

    #[test]
    fn rejects_negative_learn_rate() {
        let settings = TrainSettings { learn_rate: -0.1, ..TrainSettings::default() };
        assert!(matches!(settings.validate(), Err(ConfigError::InvalidRate { field: "learnRate", .. })));
    }
}
