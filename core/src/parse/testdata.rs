//! Shared cascade fixture for loader and emitter tests.

/// Two stages of 2 and 3 features, two rectangles per feature, in the
/// training tool's export schema.
pub(crate) const SAMPLE_XML: &str = r#"<?xml version="1.0"?>
<opencv_storage>
<test_cascade type_id="opencv-haar-classifier">
  <size>24 24</size>
  <stages>
    <_>
      <trees>
        <_><_>
          <feature>
            <rects>
              <_>6 4 12 9 -1.</_>
              <_>6 7 12 3 3.</_>
            </rects>
            <tilted>0</tilted>
          </feature>
          <threshold>0.25</threshold>
          <left_val>1.0</left_val>
          <right_val>-1.0</right_val>
        </_></_>
        <_><_>
          <feature>
            <rects>
              <_>0 0 8 8 -1.</_>
              <_>4 0 4 8 2.</_>
            </rects>
            <tilted>0</tilted>
          </feature>
          <threshold>-0.0625</threshold>
          <left_val>0.5</left_val>
          <right_val>-0.5</right_val>
        </_></_>
      </trees>
      <stage_threshold>0.5</stage_threshold>
    </_>
    <_>
      <trees>
        <_><_>
          <feature>
            <rects>
              <_>1 1 4 4 -1.</_>
              <_>1 3 4 2 2.</_>
            </rects>
            <tilted>0</tilted>
          </feature>
          <threshold>0.125</threshold>
          <left_val>2.0</left_val>
          <right_val>-2.0</right_val>
        </_></_>
        <_><_>
          <feature>
            <rects>
              <_>2 2 6 6 -1.</_>
              <_>2 4 6 2 3.</_>
            </rects>
            <tilted>0</tilted>
          </feature>
          <threshold>0.5</threshold>
          <left_val>1.5</left_val>
          <right_val>-1.5</right_val>
        </_></_>
        <_><_>
          <feature>
            <rects>
              <_>3 3 9 9 -1.</_>
              <_>3 6 9 3 3.</_>
            </rects>
            <tilted>0</tilted>
          </feature>
          <threshold>-0.25</threshold>
          <left_val>0.75</left_val>
          <right_val>-0.75</right_val>
        </_></_>
      </trees>
      <stage_threshold>-1.25</stage_threshold>
    </_>
  </stages>
</test_cascade>
</opencv_storage>
"#;
