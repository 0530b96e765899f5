use serde::{Deserialize, Serialize};

/// Largest number of weighted rectangles a single feature may own.
pub const MAX_RECTS_PER_FEATURE: usize = 3;

/// Detection window dimensions declared by the cascade document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

/// Weighted rectangle of a Haar feature. Coordinates are relative to
/// the detection window; the weight is stored raw (the runtime scales
/// it by 4096 on load, the converter never does).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rectangle {
    pub x: u8,
    pub y: u8,
    pub width: u8,
    pub height: u8,
    pub weight: i8,
}

/// Weak classifier: a threshold, two output values, 1..=3 rectangles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub threshold: f32,
    pub alpha1: f32,
    pub alpha2: f32,
    pub rectangles: Vec<Rectangle>,
}

/// Boosted ensemble of features with a combined pass/reject threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub threshold: f32,
    pub features: Vec<Feature>,
}

/// Single-owner value tree describing a whole cascade. Built once per
/// invocation, immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadeDescriptor {
    pub window: WindowSize,
    pub stages: Vec<Stage>,
}

impl CascadeDescriptor {
    pub fn new(window: WindowSize, stages: Vec<Stage>) -> Self {
        Self { window, stages }
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    pub fn feature_count(&self) -> usize {
        self.stages.iter().map(|stage| stage.features.len()).sum()
    }

    pub fn rectangle_count(&self) -> usize {
        self.stages
            .iter()
            .flat_map(|stage| stage.features.iter())
            .map(|feature| feature.rectangles.len())
            .sum()
    }

    pub fn summary(&self) -> CascadeSummary {
        CascadeSummary {
            window: self.window,
            stages: self.stage_count(),
            features: self.feature_count(),
            rectangles: self.rectangle_count(),
        }
    }
}

/// Read-only statistics reported by the info mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeSummary {
    pub window: WindowSize,
    pub stages: usize,
    pub features: usize,
    pub rectangles: usize,
}
