use crate::model::{
    CascadeDescriptor, Feature, Rectangle, Stage, WindowSize, MAX_RECTS_PER_FEATURE,
};
use crate::parse::cursor::FeatureCursor;
use crate::prelude::{ConvertError, ConvertResult};
use log::{debug, warn};
use std::fs;
use std::path::Path;

/// Flat, document-ordered view of a cascade XML export.
///
/// The training tool stores one global list per field (all feature
/// thresholds in a row, all alphas in a row, ...) rather than nesting
/// them per stage. The document keeps that shape verbatim; [`build`]
/// converts it into the nested descriptor tree with a prefix-sum
/// cursor so the slicing arithmetic exists in exactly one place.
///
/// [`build`]: CascadeDocument::build
#[derive(Debug)]
pub struct CascadeDocument {
    window: WindowSize,
    stage_feature_counts: Vec<usize>,
    stage_thresholds: Vec<f32>,
    feature_thresholds: Vec<f32>,
    alpha1: Vec<f32>,
    alpha2: Vec<f32>,
    rect_groups: Vec<Vec<Rectangle>>,
}

impl CascadeDocument {
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConvertResult<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_str(&contents)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(xml: &str) -> ConvertResult<Self> {
        let doc = roxmltree::Document::parse(xml)
            .map_err(|err| ConvertError::Parse(format!("invalid cascade XML: {}", err)))?;

        let mut window = None;
        let mut stage_feature_counts = Vec::new();
        let mut stage_thresholds = Vec::new();
        let mut feature_thresholds = Vec::new();
        let mut alpha1 = Vec::new();
        let mut alpha2 = Vec::new();
        let mut rect_groups = Vec::new();
        let mut tilted_seen = false;

        for node in doc.descendants().filter(|n| n.is_element()) {
            match node.tag_name().name() {
                "size" => {
                    if window.is_none() {
                        window = Some(parse_window(element_text(&node, "size")?)?);
                    }
                }
                "trees" => {
                    stage_feature_counts
                        .push(node.children().filter(|child| child.is_element()).count());
                }
                "stage_threshold" => {
                    stage_thresholds.push(parse_float(&node, "stage_threshold")?);
                }
                "threshold" => {
                    feature_thresholds.push(parse_float(&node, "threshold")?);
                }
                "left_val" => {
                    alpha1.push(parse_float(&node, "left_val")?);
                }
                "right_val" => {
                    alpha2.push(parse_float(&node, "right_val")?);
                }
                "rects" => {
                    rect_groups.push(parse_rect_group(&node)?);
                }
                "tilted" => {
                    if node.text().map(str::trim) == Some("1") && !tilted_seen {
                        warn!("cascade uses tilted features, which the runtime cannot evaluate");
                        tilted_seen = true;
                    }
                }
                _ => {}
            }
        }

        let window = window
            .ok_or_else(|| ConvertError::Parse("cascade is missing a size element".to_string()))?;

        let document = Self {
            window,
            stage_feature_counts,
            stage_thresholds,
            feature_thresholds,
            alpha1,
            alpha2,
            rect_groups,
        };
        document.validate()?;

        debug!(
            "parsed cascade document: {} stages, {} features",
            document.stage_count(),
            document.feature_thresholds.len()
        );
        Ok(document)
    }

    pub fn stage_count(&self) -> usize {
        self.stage_feature_counts.len()
    }

    /// Builds the nested descriptor tree for the first `limit` stages
    /// (`limit == 0` selects every stage in the document).
    ///
    /// Features and rectangles are consumed strictly in document
    /// order; the cursor's prefix sum decides how many entries of each
    /// flat list belong to the selected stages.
    pub fn build(&self, limit: usize) -> ConvertResult<CascadeDescriptor> {
        let available = self.stage_count();
        if limit > available {
            return Err(ConvertError::Config(format!(
                "requested {} stages but the cascade has {}",
                limit, available
            )));
        }
        let selected = if limit == 0 { available } else { limit };

        let mut cursor = FeatureCursor::new();
        let mut stages = Vec::with_capacity(selected);
        for (stage_index, &count) in self.stage_feature_counts[..selected].iter().enumerate() {
            let range = cursor.advance(count, self.feature_thresholds.len())?;
            let mut features = Vec::with_capacity(count);
            for feature_index in range {
                features.push(Feature {
                    threshold: self.feature_thresholds[feature_index],
                    alpha1: self.alpha1[feature_index],
                    alpha2: self.alpha2[feature_index],
                    rectangles: self.rect_groups[feature_index].clone(),
                });
            }
            stages.push(Stage {
                threshold: self.stage_thresholds[stage_index],
                features,
            });
        }

        debug!(
            "built descriptor: {} of {} stages, {} features",
            selected,
            available,
            cursor.consumed()
        );
        Ok(CascadeDescriptor::new(self.window, stages))
    }

    /// Schema checks that do not depend on the requested stage limit.
    fn validate(&self) -> ConvertResult<()> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConvertError::Parse(
                "detection window dimensions must be positive".to_string(),
            ));
        }
        if self.window.width > i32::MAX as u32 || self.window.height > i32::MAX as u32 {
            return Err(ConvertError::Parse(
                "detection window dimensions exceed int32".to_string(),
            ));
        }
        if self.stage_thresholds.len() != self.stage_feature_counts.len() {
            return Err(ConvertError::Parse(format!(
                "{} stages but {} stage thresholds",
                self.stage_feature_counts.len(),
                self.stage_thresholds.len()
            )));
        }

        let total: usize = self.stage_feature_counts.iter().sum();
        for (field, len) in [
            ("threshold", self.feature_thresholds.len()),
            ("left_val", self.alpha1.len()),
            ("right_val", self.alpha2.len()),
            ("rects", self.rect_groups.len()),
        ] {
            if len != total {
                return Err(ConvertError::Parse(format!(
                    "expected {} {} entries for {} features, found {}",
                    total, field, total, len
                )));
            }
        }

        for (stage_index, &count) in self.stage_feature_counts.iter().enumerate() {
            if count > u8::MAX as usize {
                return Err(ConvertError::Parse(format!(
                    "stage {} holds {} features, more than fit in uint8",
                    stage_index, count
                )));
            }
        }
        Ok(())
    }
}

fn element_text<'a>(node: &roxmltree::Node<'a, '_>, tag: &str) -> ConvertResult<&'a str> {
    node.text()
        .ok_or_else(|| ConvertError::Parse(format!("{} element is empty", tag)))
}

fn parse_float(node: &roxmltree::Node, tag: &str) -> ConvertResult<f32> {
    let text = element_text(node, tag)?;
    text.trim()
        .parse::<f32>()
        .map_err(|_| ConvertError::Parse(format!("{} value {:?} is not a number", tag, text)))
}

fn parse_window(text: &str) -> ConvertResult<WindowSize> {
    let mut parts = text.split_whitespace();
    let width = parse_dimension(parts.next(), text)?;
    let height = parse_dimension(parts.next(), text)?;
    Ok(WindowSize { width, height })
}

fn parse_dimension(token: Option<&str>, text: &str) -> ConvertResult<u32> {
    token
        .and_then(|t| t.parse::<u32>().ok())
        .ok_or_else(|| ConvertError::Parse(format!("size value {:?} is not two integers", text)))
}

/// Parses one `<rects>` group: 1..=3 entries of "x y w h weight". The
/// weight may carry a trailing decimal point in the export (`-1.`).
fn parse_rect_group(node: &roxmltree::Node) -> ConvertResult<Vec<Rectangle>> {
    let mut rectangles = Vec::new();
    for child in node.children().filter(|c| c.is_element()) {
        rectangles.push(parse_rect(element_text(&child, "rect")?)?);
    }
    if rectangles.is_empty() || rectangles.len() > MAX_RECTS_PER_FEATURE {
        return Err(ConvertError::Parse(format!(
            "feature holds {} rectangles, expected 1 to {}",
            rectangles.len(),
            MAX_RECTS_PER_FEATURE
        )));
    }
    Ok(rectangles)
}

fn parse_rect(text: &str) -> ConvertResult<Rectangle> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() != 5 {
        return Err(ConvertError::Parse(format!(
            "rectangle {:?} does not hold 4 coordinates and a weight",
            text
        )));
    }

    let coord = |token: &str| -> ConvertResult<u8> {
        token.parse::<u8>().map_err(|_| {
            ConvertError::Parse(format!(
                "rectangle coordinate {:?} is not an unsigned 8-bit integer",
                token
            ))
        })
    };

    let weight_value = tokens[4].parse::<f64>().map_err(|_| {
        ConvertError::Parse(format!("rectangle weight {:?} is not a number", tokens[4]))
    })?;
    let weight_value = weight_value.round();
    if weight_value < f64::from(i8::MIN) || weight_value > f64::from(i8::MAX) {
        return Err(ConvertError::Parse(format!(
            "rectangle weight {} does not fit in int8",
            weight_value
        )));
    }

    Ok(Rectangle {
        x: coord(tokens[0])?,
        y: coord(tokens[1])?,
        width: coord(tokens[2])?,
        height: coord(tokens[3])?,
        weight: weight_value as i8,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::testdata::SAMPLE_XML;

    #[test]
    fn document_reads_flat_lists_in_order() {
        let document = CascadeDocument::from_str(SAMPLE_XML).unwrap();
        assert_eq!(document.stage_count(), 2);
        assert_eq!(document.stage_feature_counts, vec![2, 3]);
        assert_eq!(document.feature_thresholds[0], 0.25);
        assert_eq!(document.alpha1[4], 0.75);
    }

    #[test]
    fn build_full_cascade_by_default() {
        let document = CascadeDocument::from_str(SAMPLE_XML).unwrap();
        let descriptor = document.build(0).unwrap();
        assert_eq!(descriptor.stage_count(), 2);
        assert_eq!(descriptor.feature_count(), 5);
        assert_eq!(descriptor.rectangle_count(), 10);
        assert_eq!(descriptor.window.width, 24);
        assert_eq!(descriptor.window.height, 24);
    }

    #[test]
    fn build_stage_prefix_slices_flat_lists() {
        let document = CascadeDocument::from_str(SAMPLE_XML).unwrap();
        let descriptor = document.build(1).unwrap();
        assert_eq!(descriptor.stage_count(), 1);
        assert_eq!(descriptor.feature_count(), 2);
        assert_eq!(descriptor.rectangle_count(), 4);

        // Prefix slicing must keep features aligned with their stage.
        let stage = &descriptor.stages[0];
        assert_eq!(stage.threshold, 0.5);
        assert_eq!(stage.features[0].threshold, 0.25);
        assert_eq!(stage.features[1].threshold, -0.0625);
        assert_eq!(stage.features[1].rectangles[1].weight, 2);
    }

    #[test]
    fn feature_count_is_monotone_in_stage_limit() {
        let document = CascadeDocument::from_str(SAMPLE_XML).unwrap();
        let mut previous = 0;
        for limit in 1..=document.stage_count() {
            let count = document.build(limit).unwrap().feature_count();
            assert!(count >= previous);
            previous = count;
        }
        assert_eq!(previous, 5);
    }

    #[test]
    fn oversized_stage_limit_is_a_config_error() {
        let document = CascadeDocument::from_str(SAMPLE_XML).unwrap();
        let err = document.build(3).unwrap_err();
        assert!(matches!(err, ConvertError::Config(_)));
    }

    #[test]
    fn malformed_xml_is_a_parse_error() {
        let err = CascadeDocument::from_str("<stages><trees>").unwrap_err();
        assert!(matches!(err, ConvertError::Parse(_)));
    }

    #[test]
    fn missing_size_is_a_parse_error() {
        let err = CascadeDocument::from_str("<stages></stages>").unwrap_err();
        assert!(matches!(err, ConvertError::Parse(_)));
    }

    #[test]
    fn mismatched_flat_lists_are_a_parse_error() {
        // One trees block claiming a feature, but no threshold list.
        let xml = r#"<c><size>8 8</size><stages><_>
            <trees><_><x/></_></trees>
            <stage_threshold>0.5</stage_threshold>
        </_></stages></c>"#;
        let err = CascadeDocument::from_str(xml).unwrap_err();
        assert!(matches!(err, ConvertError::Parse(_)));
    }

    #[test]
    fn rectangle_group_larger_than_three_is_rejected() {
        let xml = r#"<c><size>8 8</size><stages><_>
            <trees><_><_>
              <feature><rects>
                <_>0 0 1 1 -1.</_>
                <_>0 0 1 1 1.</_>
                <_>0 0 1 1 1.</_>
                <_>0 0 1 1 1.</_>
              </rects></feature>
              <threshold>0.1</threshold>
              <left_val>1.0</left_val>
              <right_val>-1.0</right_val>
            </_></_></trees>
            <stage_threshold>0.5</stage_threshold>
        </_></stages></c>"#;
        let err = CascadeDocument::from_str(xml).unwrap_err();
        assert!(matches!(err, ConvertError::Parse(_)));
    }

    #[test]
    fn rectangle_weight_with_trailing_dot_parses() {
        let rect = parse_rect("6 4 12 9 -1.").unwrap();
        assert_eq!((rect.x, rect.y, rect.width, rect.height), (6, 4, 12, 9));
        assert_eq!(rect.weight, -1);
    }

    #[test]
    fn rectangle_weight_out_of_int8_range_is_rejected() {
        let err = parse_rect("0 0 1 1 300.").unwrap_err();
        assert!(matches!(err, ConvertError::Parse(_)));
    }
}
