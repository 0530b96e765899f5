use crate::model::CascadeSummary;

/// Renders the info-mode statistics block. The same block is printed
/// after a conversion so the output can be eyeballed against the
/// source document.
pub fn render(summary: &CascadeSummary) -> String {
    format!(
        "size:{}x{}\nstages:{}\nfeatures:{}\nrectangles:{}\n",
        summary.window.width,
        summary.window.height,
        summary.stages,
        summary.features,
        summary.rectangles
    )
}
