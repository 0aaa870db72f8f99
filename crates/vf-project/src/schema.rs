//! Project schema definitions.

use serde::{Deserialize, Serialize};

/// Waypoints of a wire path, `[x, y, z]` in scene units.
pub type PathDef = Vec<[f64; 3]>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub scenes: Vec<SceneDef>,
}

impl Project {
    pub fn scene(&self, id: &str) -> Option<&SceneDef> {
        self.scenes.iter().find(|s| s.id == id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SceneDef {
    pub id: String,
    pub name: String,
    pub topology: TopologyDef,
    pub source_voltage_v: f64,
    #[serde(default = "default_clamp_ohm")]
    pub clamp_ohm: f64,
    #[serde(default)]
    pub resistors: Vec<ResistorDef>,
    /// Main wire carrying the total current.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trunk_path: Option<PathDef>,
    #[serde(default)]
    pub animation: AnimationDef,
    #[serde(default)]
    pub router: RouterDef,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TopologyDef {
    /// One resistor; solved as a one-branch series circuit.
    Single,
    Series,
    Parallel,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResistorDef {
    pub id: String,
    pub name: String,
    pub resistance_ohm: f64,
    #[serde(default = "default_min_ohm")]
    pub min_ohm: f64,
    #[serde(default = "default_max_ohm")]
    pub max_ohm: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnimationDef {
    #[serde(default = "default_speed_factor")]
    pub speed_factor: f64,
    #[serde(default = "default_arrival_tolerance")]
    pub arrival_tolerance: f64,
    #[serde(default = "default_min_speed")]
    pub min_speed: f64,
    #[serde(default = "default_marker_lifetime_s")]
    pub marker_lifetime_s: f64,
    #[serde(default = "default_max_markers")]
    pub max_markers: usize,
}

impl Default for AnimationDef {
    fn default() -> Self {
        Self {
            speed_factor: default_speed_factor(),
            arrival_tolerance: default_arrival_tolerance(),
            min_speed: default_min_speed(),
            marker_lifetime_s: default_marker_lifetime_s(),
            max_markers: default_max_markers(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouterDef {
    #[serde(default = "default_min_current_a")]
    pub min_current_a: f64,
    #[serde(default = "default_min_rate_a")]
    pub min_rate_a: f64,
}

impl Default for RouterDef {
    fn default() -> Self {
        Self {
            min_current_a: default_min_current_a(),
            min_rate_a: default_min_rate_a(),
        }
    }
}

fn default_clamp_ohm() -> f64 {
    0.01
}

fn default_min_ohm() -> f64 {
    1.0
}

fn default_max_ohm() -> f64 {
    50.0
}

fn default_speed_factor() -> f64 {
    0.5
}

fn default_arrival_tolerance() -> f64 {
    0.001
}

fn default_min_speed() -> f64 {
    0.001
}

fn default_marker_lifetime_s() -> f64 {
    5.0
}

fn default_max_markers() -> usize {
    256
}

fn default_min_current_a() -> f64 {
    0.001
}

fn default_min_rate_a() -> f64 {
    0.01
}
