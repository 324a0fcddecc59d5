#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Value-to-color scale derivation.
//!
//! A [`LinearScale`] maps a numeric domain onto a [`ColorRamp`] of two or
//! more stops. The domain is always derived from the currently visible
//! record subset ([`derive_scale`]), not the full dataset, so color
//! meaning is relative to the active filter view. Scales are plain
//! values: deriving one is cheap and done on every filter change rather
//! than cached.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use vital_map_metric_models::{MetricField, MetricRecord};

/// Errors that can occur constructing scale inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScaleError {
    /// A color string was not `#rgb` or `#rrggbb` hex.
    #[error("invalid color {input:?}: expected #rgb or #rrggbb hex")]
    InvalidColor {
        /// The rejected input.
        input: String,
    },

    /// A ramp needs at least two stops to interpolate between.
    #[error("color ramp needs at least 2 stops, got {count}")]
    TooFewStops {
        /// Number of stops supplied.
        count: usize,
    },
}

/// An RGB color, parsed from and displayed as CSS hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Creates a color from raw channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channel-wise linear interpolation toward `other`; `t` is clamped
    /// to `[0, 1]`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let mix = |a: u8, b: u8| -> u8 {
            let blended = f64::from(a) + (f64::from(b) - f64::from(a)) * t;
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                blended.round().clamp(0.0, 255.0) as u8
            }
        };
        Self::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl std::str::FromStr for Rgb {
    type Err = ScaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ScaleError::InvalidColor {
            input: s.to_string(),
        };
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        // Length checks below count bytes, and from_str_radix accepts
        // leading `+`; only pure hex digits may get through.
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |sub: &str| u8::from_str_radix(sub, 16).map_err(|_| invalid());
        match hex.len() {
            3 => {
                // #rgb expands each nibble: #f0a -> #ff00aa
                let nibble = |sub: &str| channel(sub).map(|n| n * 16 + n);
                Ok(Self::new(
                    nibble(&hex[0..1])?,
                    nibble(&hex[1..2])?,
                    nibble(&hex[2..3])?,
                ))
            }
            6 => Ok(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Rgb {
    type Error = ScaleError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

/// An ordered sequence of color stops spread evenly over a scale's
/// domain. Two stops give a plain gradient; three anchor the domain
/// midpoint to the middle color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorRamp {
    stops: Vec<Rgb>,
}

impl ColorRamp {
    /// Creates a ramp from explicit stops.
    ///
    /// # Errors
    ///
    /// Returns [`ScaleError::TooFewStops`] for fewer than two stops.
    pub fn new(stops: Vec<Rgb>) -> Result<Self, ScaleError> {
        if stops.len() < 2 {
            return Err(ScaleError::TooFewStops { count: stops.len() });
        }
        Ok(Self { stops })
    }

    /// Sequential light-to-dark reds, the default for case counts.
    #[must_use]
    pub fn sequential_reds() -> Self {
        Self {
            stops: vec![Rgb::new(0xff, 0xf5, 0xf0), Rgb::new(0x67, 0x00, 0x0d)],
        }
    }

    /// White-to-red two-stop ramp used by the mortality map view.
    #[must_use]
    pub fn white_red() -> Self {
        Self {
            stops: vec![Rgb::new(0xff, 0xff, 0xff), Rgb::new(0xb3, 0x00, 0x00)],
        }
    }

    /// Diverging blue-white-red three-stop ramp; the domain midpoint
    /// maps to the neutral middle color.
    #[must_use]
    pub fn diverging() -> Self {
        Self {
            stops: vec![
                Rgb::new(0x21, 0x66, 0xac),
                Rgb::new(0xf7, 0xf7, 0xf7),
                Rgb::new(0xb2, 0x18, 0x2b),
            ],
        }
    }

    /// The ramp's color stops in order.
    #[must_use]
    pub fn stops(&self) -> &[Rgb] {
        &self.stops
    }
}

/// A pure value→color mapping over a fixed numeric domain.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearScale {
    domain_min: f64,
    domain_max: f64,
    ramp: ColorRamp,
}

/// Neutral gray for values a scale cannot place (NaN, infinities).
const FALLBACK: Rgb = Rgb::new(0x96, 0x96, 0x96);

impl LinearScale {
    /// Creates a scale over `[domain_min, domain_max]`. A reversed or
    /// degenerate domain collapses to the ramp's first stop rather than
    /// producing NaN positions.
    #[must_use]
    pub const fn new(domain_min: f64, domain_max: f64, ramp: ColorRamp) -> Self {
        Self {
            domain_min,
            domain_max,
            ramp,
        }
    }

    /// Lower domain endpoint.
    #[must_use]
    pub const fn domain_min(&self) -> f64 {
        self.domain_min
    }

    /// Upper domain endpoint.
    #[must_use]
    pub const fn domain_max(&self) -> f64 {
        self.domain_max
    }

    /// The ramp this scale interpolates over.
    #[must_use]
    pub const fn ramp(&self) -> &ColorRamp {
        &self.ramp
    }

    /// Maps a value to a color. Values outside the domain clamp to the
    /// endpoints; non-finite values map to a neutral gray.
    #[must_use]
    pub fn color(&self, value: f64) -> Rgb {
        if !value.is_finite() {
            return FALLBACK;
        }
        let span = self.domain_max - self.domain_min;
        let t = if span > 0.0 {
            ((value - self.domain_min) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let stops = self.ramp.stops();
        let segments = stops.len() - 1;
        #[allow(clippy::cast_precision_loss)]
        let position = t * segments as f64;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let i = (position.floor() as usize).min(segments - 1);
        #[allow(clippy::cast_precision_loss)]
        stops[i].lerp(stops[i + 1], position - i as f64)
    }
}

/// Derives a scale whose domain is the min/max of `field` over
/// `records`, ignoring records where the field is absent.
///
/// An empty (or all-absent) subset defaults the domain to `[0, 1]` so a
/// later `color()` call can never see a NaN position.
#[must_use]
pub fn derive_scale(records: &[&MetricRecord], field: MetricField, ramp: ColorRamp) -> LinearScale {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for record in records {
        if let Some(v) = record.field(field)
            && v.is_finite()
        {
            min = min.min(v);
            max = max.max(v);
        }
    }
    if min > max {
        return LinearScale::new(0.0, 1.0, ramp);
    }
    LinearScale::new(min, max, ramp)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(value: f64, rate: Option<f64>) -> MetricRecord {
        MetricRecord {
            region: "Iowa".to_string(),
            period: 2020,
            category: "ALL".to_string(),
            value,
            rate,
        }
    }

    #[test]
    fn parses_six_digit_hex() {
        let c: Rgb = "#b30000".parse().unwrap();
        assert_eq!(c, Rgb::new(0xb3, 0, 0));
        assert_eq!(c.to_string(), "#b30000");
    }

    #[test]
    fn parses_three_digit_hex() {
        let c: Rgb = "#f0a".parse().unwrap();
        assert_eq!(c, Rgb::new(0xff, 0x00, 0xaa));
    }

    #[test]
    fn rejects_malformed_colors() {
        for bad in ["b30000", "#b300", "#xyzxyz", "", "#", "#+1+2+3", "+12345"] {
            assert!(matches!(
                bad.parse::<Rgb>(),
                Err(ScaleError::InvalidColor { .. })
            ));
        }
    }

    #[test]
    fn rejects_multibyte_input_without_panicking() {
        for bad in ["#\u{e9}a", "#caf\u{e9}\u{e9}", "#\u{1f600}", "\u{e9}#ab"] {
            assert!(matches!(
                bad.parse::<Rgb>(),
                Err(ScaleError::InvalidColor { .. })
            ));
        }
    }

    #[test]
    fn deserializing_a_malformed_color_is_an_error_not_a_panic() {
        assert!(serde_json::from_str::<Rgb>("\"#caf\u{e9}\u{e9}\"").is_err());
        assert!(serde_json::from_str::<Rgb>("\"#+1+2+3\"").is_err());
        let ok: Rgb = serde_json::from_str("\"#b30000\"").unwrap();
        assert_eq!(ok, Rgb::new(0xb3, 0, 0));
    }

    #[test]
    fn ramp_requires_two_stops() {
        assert!(matches!(
            ColorRamp::new(vec![Rgb::new(0, 0, 0)]),
            Err(ScaleError::TooFewStops { count: 1 })
        ));
        assert!(ColorRamp::new(vec![Rgb::new(0, 0, 0), Rgb::new(1, 1, 1)]).is_ok());
    }

    #[test]
    fn endpoints_map_to_first_and_last_stop() {
        let ramp = ColorRamp::white_red();
        let first = ramp.stops()[0];
        let last = ramp.stops()[1];
        let scale = LinearScale::new(5.0, 10.0, ramp);

        assert_eq!(scale.color(5.0), first);
        assert_eq!(scale.color(10.0), last);
    }

    #[test]
    fn out_of_domain_values_clamp() {
        let ramp = ColorRamp::white_red();
        let first = ramp.stops()[0];
        let last = ramp.stops()[1];
        let scale = LinearScale::new(0.0, 100.0, ramp);

        assert_eq!(scale.color(-50.0), first);
        assert_eq!(scale.color(1e9), last);
    }

    #[test]
    fn three_stop_midpoint_maps_to_middle_color() {
        let ramp = ColorRamp::diverging();
        let middle = ramp.stops()[1];
        let scale = LinearScale::new(0.0, 100.0, ramp);

        assert_eq!(scale.color(50.0), middle);
    }

    #[test]
    fn non_finite_values_map_to_neutral_gray() {
        let scale = LinearScale::new(0.0, 1.0, ColorRamp::white_red());
        assert_eq!(scale.color(f64::NAN), FALLBACK);
        assert_eq!(scale.color(f64::INFINITY), FALLBACK);
    }

    #[test]
    fn derives_domain_from_value_field() {
        let a = record(10.0, None);
        let b = record(5.0, None);
        let scale = derive_scale(&[&a, &b], MetricField::Value, ColorRamp::white_red());

        assert!((scale.domain_min() - 5.0).abs() < f64::EPSILON);
        assert!((scale.domain_max() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ignores_records_missing_the_field() {
        let a = record(10.0, Some(2.0));
        let b = record(5.0, None);
        let scale = derive_scale(&[&a, &b], MetricField::Rate, ColorRamp::white_red());

        assert!((scale.domain_min() - 2.0).abs() < f64::EPSILON);
        assert!((scale.domain_max() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_subset_defaults_domain_to_unit_interval() {
        let scale = derive_scale(&[], MetricField::Value, ColorRamp::white_red());

        assert!((scale.domain_min() - 0.0).abs() < f64::EPSILON);
        assert!((scale.domain_max() - 1.0).abs() < f64::EPSILON);
        // And coloring still never yields a bogus position.
        let _ = scale.color(0.5);
    }

    #[test]
    fn degenerate_domain_collapses_to_first_stop() {
        let ramp = ColorRamp::white_red();
        let first = ramp.stops()[0];
        let scale = LinearScale::new(7.0, 7.0, ramp);

        assert_eq!(scale.color(7.0), first);
    }
}
