use crate::model::CascadeDescriptor;
use log::warn;

/// Fixed-point scale for stage thresholds and alphas (Q8.8).
pub const STAGE_THRESHOLD_SCALE: f32 = 256.0;
/// Fixed-point scale for feature thresholds (Q4.12).
pub const FEATURE_THRESHOLD_SCALE: f32 = 4096.0;
pub const ALPHA_SCALE: f32 = 256.0;

/// Columnar fixed-point image of a cascade.
///
/// Holds one contiguous array per field, in the exact order both
/// emitters traverse it. Binary and header output read from the same
/// instance, which is what keeps the two forms numerically identical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizedCascade {
    pub window_width: i32,
    pub window_height: i32,
    /// One entry per stage.
    pub feature_counts: Vec<u8>,
    pub stage_thresholds: Vec<i16>,
    /// One entry per feature, across all stages in stage order.
    pub feature_thresholds: Vec<i16>,
    pub alpha1: Vec<i16>,
    pub alpha2: Vec<i16>,
    pub rect_counts: Vec<u8>,
    /// One entry per rectangle, in feature order.
    pub rect_weights: Vec<i8>,
    /// x, y, width, height per rectangle, flattened.
    pub rect_coords: Vec<u8>,
}

impl QuantizedCascade {
    pub fn stage_count(&self) -> usize {
        self.feature_counts.len()
    }

    pub fn feature_count(&self) -> usize {
        self.feature_thresholds.len()
    }

    pub fn rectangle_count(&self) -> usize {
        self.rect_weights.len()
    }
}

/// Maps a descriptor to fixed-point columnar arrays.
///
/// Rounding is half-away-from-zero; a scaled value that falls outside
/// int16 is clamped with a warning rather than wrapped. Rectangle
/// weights are already 8-bit integers and pass through unscaled.
pub fn quantize(descriptor: &CascadeDescriptor) -> QuantizedCascade {
    let feature_count = descriptor.feature_count();
    let rectangle_count = descriptor.rectangle_count();

    let mut quantized = QuantizedCascade {
        window_width: descriptor.window.width as i32,
        window_height: descriptor.window.height as i32,
        feature_counts: Vec::with_capacity(descriptor.stage_count()),
        stage_thresholds: Vec::with_capacity(descriptor.stage_count()),
        feature_thresholds: Vec::with_capacity(feature_count),
        alpha1: Vec::with_capacity(feature_count),
        alpha2: Vec::with_capacity(feature_count),
        rect_counts: Vec::with_capacity(feature_count),
        rect_weights: Vec::with_capacity(rectangle_count),
        rect_coords: Vec::with_capacity(rectangle_count * 4),
    };

    for stage in &descriptor.stages {
        quantized.feature_counts.push(stage.features.len() as u8);
        quantized
            .stage_thresholds
            .push(scale_to_i16(stage.threshold, STAGE_THRESHOLD_SCALE, "stage threshold"));
    }

    for feature in descriptor.stages.iter().flat_map(|s| s.features.iter()) {
        quantized.feature_thresholds.push(scale_to_i16(
            feature.threshold,
            FEATURE_THRESHOLD_SCALE,
            "feature threshold",
        ));
        quantized
            .alpha1
            .push(scale_to_i16(feature.alpha1, ALPHA_SCALE, "alpha1"));
        quantized
            .alpha2
            .push(scale_to_i16(feature.alpha2, ALPHA_SCALE, "alpha2"));
        quantized.rect_counts.push(feature.rectangles.len() as u8);
    }

    for rect in descriptor
        .stages
        .iter()
        .flat_map(|s| s.features.iter())
        .flat_map(|f| f.rectangles.iter())
    {
        quantized.rect_weights.push(rect.weight);
        quantized
            .rect_coords
            .extend_from_slice(&[rect.x, rect.y, rect.width, rect.height]);
    }

    quantized
}

fn scale_to_i16(value: f32, scale: f32, field: &str) -> i16 {
    // f64::round is half-away-from-zero.
    let scaled = (f64::from(value) * f64::from(scale)).round();
    if scaled < f64::from(i16::MIN) {
        warn!("{} {} underflows int16 after scaling, clamping", field, value);
        i16::MIN
    } else if scaled > f64::from(i16::MAX) {
        warn!("{} {} overflows int16 after scaling, clamping", field, value);
        i16::MAX
    } else {
        scaled as i16
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Feature, Rectangle, Stage, WindowSize};

    fn sample_descriptor() -> CascadeDescriptor {
        CascadeDescriptor::new(
            WindowSize {
                width: 24,
                height: 24,
            },
            vec![Stage {
                threshold: 0.5,
                features: vec![Feature {
                    threshold: 0.25,
                    alpha1: -1.0,
                    alpha2: 1.0,
                    rectangles: vec![
                        Rectangle {
                            x: 6,
                            y: 4,
                            width: 12,
                            height: 9,
                            weight: -1,
                        },
                        Rectangle {
                            x: 6,
                            y: 7,
                            width: 12,
                            height: 3,
                            weight: 3,
                        },
                    ],
                }],
            }],
        )
    }

    #[test]
    fn quantizer_applies_documented_scale_factors() {
        let quantized = quantize(&sample_descriptor());
        assert_eq!(quantized.stage_thresholds, vec![128]);
        assert_eq!(quantized.feature_thresholds, vec![1024]);
        assert_eq!(quantized.alpha1, vec![-256]);
        assert_eq!(quantized.alpha2, vec![256]);
    }

    #[test]
    fn quantizer_keeps_rectangles_unscaled() {
        let quantized = quantize(&sample_descriptor());
        assert_eq!(quantized.rect_counts, vec![2]);
        assert_eq!(quantized.rect_weights, vec![-1, 3]);
        assert_eq!(quantized.rect_coords, vec![6, 4, 12, 9, 6, 7, 12, 3]);
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        // 0.001953125 * 256 = 0.5 exactly.
        assert_eq!(scale_to_i16(0.001953125, STAGE_THRESHOLD_SCALE, "t"), 1);
        assert_eq!(scale_to_i16(-0.001953125, STAGE_THRESHOLD_SCALE, "t"), -1);
    }

    #[test]
    fn out_of_range_values_clamp_to_i16() {
        assert_eq!(scale_to_i16(200.0, STAGE_THRESHOLD_SCALE, "t"), i16::MAX);
        assert_eq!(scale_to_i16(-200.0, STAGE_THRESHOLD_SCALE, "t"), i16::MIN);
        assert_eq!(scale_to_i16(9.0, FEATURE_THRESHOLD_SCALE, "t"), i16::MAX);
    }

    #[test]
    fn window_dimensions_pass_through() {
        let quantized = quantize(&sample_descriptor());
        assert_eq!(quantized.window_width, 24);
        assert_eq!(quantized.window_height, 24);
        assert_eq!(quantized.stage_count(), 1);
        assert_eq!(quantized.feature_count(), 1);
        assert_eq!(quantized.rectangle_count(), 2);
    }
}
