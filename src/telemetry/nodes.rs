//! Virtual sensor nodes deployed around the site.
//!
//! Every node reports the same ground-truth PM10 plus its own jitter,
//! which simulates a distributed network drifting around one value.

use core::fmt;

use serde::Serialize;

use crate::app::ports::NoiseSource;

/// Maximum number of deployed nodes.
pub const MAX_NODES: usize = 32;

const NODE_JITTER_PM10: f32 = 10.0;
/// Half-width of the square in which new nodes are placed.
const PLACEMENT_HALF_EXTENT: f32 = 9.0;

/// Air-quality tier derived from PM10.  No hysteresis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityTier {
    Good,
    Moderate,
    Unhealthy,
    Hazardous,
}

impl SeverityTier {
    pub fn from_pm10(pm10: f32) -> Self {
        if pm10 < 50.0 {
            Self::Good
        } else if pm10 < 150.0 {
            Self::Moderate
        } else if pm10 < 250.0 {
            Self::Unhealthy
        } else {
            Self::Hazardous
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodePosition {
    pub x: f32,
    pub z: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorNode {
    pub id: String,
    pub location: String,
    pub pm25: f32,
    pub pm10: f32,
    pub predicted_pm10: f32,
    pub status: SeverityTier,
    pub position: NodePosition,
}

/// Reasons a deploy request is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeError {
    EmptyId,
    EmptyLocation,
    DuplicateId(String),
    RegistryFull,
}

impl fmt::Display for NodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "node id is empty"),
            Self::EmptyLocation => write!(f, "node location is empty"),
            Self::DuplicateId(id) => write!(f, "node {id} already deployed"),
            Self::RegistryFull => write!(f, "node registry full ({MAX_NODES} nodes)"),
        }
    }
}

impl std::error::Error for NodeError {}

pub struct NodeRegistry {
    nodes: heapless::Vec<SensorNode, MAX_NODES>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self {
            nodes: heapless::Vec::new(),
        }
    }

    /// The two gateway nodes every site starts with.
    pub fn with_site_defaults() -> Self {
        let mut registry = Self::new();
        for node in [
            SensorNode {
                id: "DV-NODE-01".to_owned(),
                location: "North Gate Sector".to_owned(),
                pm25: 45.2,
                pm10: 180.5,
                predicted_pm10: 265.2,
                status: SeverityTier::Unhealthy,
                position: NodePosition { x: -7.0, z: -7.0 },
            },
            SensorNode {
                id: "DV-NODE-02".to_owned(),
                location: "East Construction Zone".to_owned(),
                pm25: 12.0,
                pm10: 35.5,
                predicted_pm10: 38.0,
                status: SeverityTier::Good,
                position: NodePosition { x: 7.0, z: 7.0 },
            },
        ] {
            let pushed = registry.nodes.push(node).is_ok();
            debug_assert!(pushed);
        }
        registry
    }

    /// Register a new node at a random position on the site.
    pub fn deploy(
        &mut self,
        id: &str,
        location: &str,
        noise: &mut impl NoiseSource,
    ) -> Result<&SensorNode, NodeError> {
        let id = id.trim();
        let location = location.trim();
        if id.is_empty() {
            return Err(NodeError::EmptyId);
        }
        if location.is_empty() {
            return Err(NodeError::EmptyLocation);
        }
        if self.nodes.iter().any(|n| n.id == id) {
            return Err(NodeError::DuplicateId(id.to_owned()));
        }
        if self.nodes.is_full() {
            return Err(NodeError::RegistryFull);
        }

        let position = NodePosition {
            x: noise.uniform(-PLACEMENT_HALF_EXTENT, PLACEMENT_HALF_EXTENT),
            z: noise.uniform(-PLACEMENT_HALF_EXTENT, PLACEMENT_HALF_EXTENT),
        };
        let node = SensorNode {
            id: id.to_owned(),
            location: location.to_owned(),
            pm25: 15.0,
            pm10: 30.0,
            predicted_pm10: 45.0,
            status: SeverityTier::Good,
            position,
        };
        self.nodes
            .push(node)
            .map_err(|_| NodeError::RegistryFull)?;
        let deployed = self.nodes.last().ok_or(NodeError::RegistryFull)?;
        log::info!(
            "Node {} deployed at ({:.1}, {:.1}) in {}",
            deployed.id,
            deployed.position.x,
            deployed.position.z,
            deployed.location
        );
        Ok(deployed)
    }

    /// Re-read every node around `actual_pm10` and recompute its tier.
    pub fn apply_jitter(&mut self, actual_pm10: f32, noise: &mut impl NoiseSource) {
        for node in &mut self.nodes {
            node.pm10 = actual_pm10 + noise.uniform(-NODE_JITTER_PM10, NODE_JITTER_PM10);
            node.status = SeverityTier::from_pm10(node.pm10);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &SensorNode> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&SensorNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
