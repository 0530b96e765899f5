use crate::quant::QuantizedCascade;

/// Encodes a quantized cascade as the packed byte stream the runtime
/// memory-maps at load time.
///
/// The layout is field-major: all values of one field are contiguous
/// so the consumer can alias each region as a typed array without
/// padding. Every multi-byte value is little-endian regardless of
/// host order.
///
/// ```text
/// i32 window_width | i32 window_height | i32 stage_count
/// u8 [stages]   feature counts
/// i16[stages]   stage thresholds      (x256)
/// i16[features] feature thresholds    (x4096)
/// i16[features] alpha1                (x256)
/// i16[features] alpha2                (x256)
/// u8 [features] rectangle counts
/// i8 [rects]    rectangle weights
/// u8 [rects*4]  rectangle x, y, w, h
/// ```
pub fn encode(quantized: &QuantizedCascade) -> Vec<u8> {
    let mut out = Vec::with_capacity(encoded_len(quantized));

    out.extend_from_slice(&quantized.window_width.to_le_bytes());
    out.extend_from_slice(&quantized.window_height.to_le_bytes());
    out.extend_from_slice(&(quantized.stage_count() as i32).to_le_bytes());

    out.extend_from_slice(&quantized.feature_counts);
    for threshold in &quantized.stage_thresholds {
        out.extend_from_slice(&threshold.to_le_bytes());
    }
    for threshold in &quantized.feature_thresholds {
        out.extend_from_slice(&threshold.to_le_bytes());
    }
    for alpha in &quantized.alpha1 {
        out.extend_from_slice(&alpha.to_le_bytes());
    }
    for alpha in &quantized.alpha2 {
        out.extend_from_slice(&alpha.to_le_bytes());
    }
    out.extend_from_slice(&quantized.rect_counts);
    for weight in &quantized.rect_weights {
        out.extend_from_slice(&weight.to_le_bytes());
    }
    out.extend_from_slice(&quantized.rect_coords);

    out
}

/// Exact size in bytes of the encoded stream.
pub fn encoded_len(quantized: &QuantizedCascade) -> usize {
    let stages = quantized.stage_count();
    let features = quantized.feature_count();
    let rects = quantized.rectangle_count();
    12 + stages * 3 + features * 7 + rects * 5
}
