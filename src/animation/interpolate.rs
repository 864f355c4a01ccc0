/// Behavior outside the input range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extrapolate {
    /// Continue the edge segment linearly.
    #[default]
    Extend,
    /// Hold the edge output value.
    Clamp,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InterpolateOpts {
    pub left: Extrapolate,
    pub right: Extrapolate,
}

impl InterpolateOpts {
    pub const CLAMP: Self = Self {
        left: Extrapolate::Clamp,
        right: Extrapolate::Clamp,
    };
}

/// Two-point linear map from `[x0, x1]` onto `[y0, y1]`.
///
/// A collapsed input range yields `y0`.
pub fn interpolate2(x: f64, input: [f64; 2], output: [f64; 2], opts: InterpolateOpts) -> f64 {
    let [x0, x1] = input;
    let [y0, y1] = output;
    let span = x1 - x0;
    if span == 0.0 || !span.is_finite() {
        return y0;
    }

    if x < x0 && opts.left == Extrapolate::Clamp {
        return y0;
    }
    if x > x1 && opts.right == Extrapolate::Clamp {
        return y1;
    }

    let t = (x - x0) / span;
    y0 + (y1 - y0) * t
}
