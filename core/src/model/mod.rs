pub mod cascade;

pub use cascade::{
    CascadeDescriptor, CascadeSummary, Feature, Rectangle, Stage, WindowSize,
    MAX_RECTS_PER_FEATURE,
};
