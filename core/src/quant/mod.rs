pub mod fixed;

pub use fixed::{
    quantize, QuantizedCascade, ALPHA_SCALE, FEATURE_THRESHOLD_SCALE, STAGE_THRESHOLD_SCALE,
};
