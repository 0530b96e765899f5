use crate::quant::QuantizedCascade;
use std::fmt::Display;

/// Renders a quantized cascade as C array declarations.
///
/// Same traversal and same values as the binary emitter; only the
/// surface differs. The runtime links the arrays directly instead of
/// loading a `.cascade` file from storage.
pub fn render(quantized: &QuantizedCascade, name: &str) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "const int {}_window_w={};\n",
        name, quantized.window_width
    ));
    out.push_str(&format!(
        "const int {}_window_h={};\n",
        name, quantized.window_height
    ));
    out.push_str(&format!(
        "const int {}_n_stages={};\n",
        name,
        quantized.stage_count()
    ));
    out.push_str(&array("uint8_t", name, "stages", &quantized.feature_counts));
    out.push_str(&array(
        "int16_t",
        name,
        "stages_thresh",
        &quantized.stage_thresholds,
    ));
    out.push_str(&array(
        "int16_t",
        name,
        "tree_thresh",
        &quantized.feature_thresholds,
    ));
    out.push_str(&array("int16_t", name, "alpha1", &quantized.alpha1));
    out.push_str(&array("int16_t", name, "alpha2", &quantized.alpha2));
    out.push_str(&array(
        "uint8_t",
        name,
        "num_rectangles",
        &quantized.rect_counts,
    ));
    out.push_str(&array("int8_t", name, "weights", &quantized.rect_weights));
    out.push_str(&array(
        "uint8_t",
        name,
        "rectangles",
        &quantized.rect_coords,
    ));

    out
}

/// Maps an arbitrary cascade name to a valid C identifier prefix.
pub fn sanitize_identifier(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if out.is_empty() {
        out.push_str("cascade");
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

fn array<T: Display>(c_type: &str, name: &str, field: &str, values: &[T]) -> String {
    let joined = values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("const {} {}_{}_array[]={{{}}};\n", c_type, name, field, joined)
}
