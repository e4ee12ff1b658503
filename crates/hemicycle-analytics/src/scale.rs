//! Score-to-presentation mapping.
//!
//! Two independent renderings of a sentiment score in [-1, 1]:
//!
//! - a discrete three-way class ([`Sentiment`]) for badges and CSS classes
//! - a continuous red→green gradient ([`color_of`]) for heatmaps and bars
//!
//! Every threshold and colour lives here.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Scores strictly above this are positive.
pub const POSITIVE_THRESHOLD: f64 = 0.3;
/// Scores strictly below this are negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.3;

/// Discrete sentiment class. Boundary values are neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn classify(score: f64) -> Self {
        if score > POSITIVE_THRESHOLD {
            Self::Positive
        } else if score < NEGATIVE_THRESHOLD {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Neutral => "Neutral",
            Self::Negative => "Negative",
        }
    }

    /// Class name for threshold-styled surfaces.
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Positive => "sentiment-positive",
            Self::Neutral => "sentiment-neutral",
            Self::Negative => "sentiment-negative",
        }
    }

    /// Fixed badge colour for the class.
    pub fn badge_color(&self) -> Rgb {
        match self {
            Self::Positive => Rgb::new(34, 197, 94),
            Self::Neutral => Rgb::new(156, 163, 175),
            Self::Negative => Rgb::new(239, 68, 68),
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a score against the fixed thresholds.
pub fn classify(score: f64) -> Sentiment {
    Sentiment::classify(score)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Continuous red→green colour for a score.
///
/// `n = clamp((score + 1) / 2, 0, 1)`, red = round((1 - n) · 255),
/// green = round(n · 255), blue = 0. Non-finite scores map like 0.
pub fn color_of(score: f64) -> Rgb {
    let score = if score.is_finite() { score } else { 0.0 };
    let n = ((score + 1.0) / 2.0).clamp(0.0, 1.0);
    Rgb {
        r: ((1.0 - n) * 255.0).round() as u8,
        g: (n * 255.0).round() as u8,
        b: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_exclusive() {
        assert_eq!(classify(0.3), Sentiment::Neutral);
        assert_eq!(classify(0.31), Sentiment::Positive);
        assert_eq!(classify(-0.3), Sentiment::Neutral);
        assert_eq!(classify(-0.31), Sentiment::Negative);
        assert_eq!(classify(0.0), Sentiment::Neutral);
    }

    #[test]
    fn extremes() {
        assert_eq!(classify(1.0), Sentiment::Positive);
        assert_eq!(classify(-1.0), Sentiment::Negative);
        assert_eq!(classify(f64::NAN), Sentiment::Neutral);
    }

    #[test]
    fn gradient_endpoints() {
        assert_eq!(color_of(-1.0), Rgb::new(255, 0, 0));
        assert_eq!(color_of(1.0), Rgb::new(0, 255, 0));
    }

    #[test]
    fn gradient_midpoint_rounds_consistently() {
        let mid = color_of(0.0);
        assert_eq!(mid, Rgb::new(128, 128, 0));
        assert_eq!(mid.r, mid.g);
    }

    #[test]
    fn gradient_clamps_out_of_range() {
        assert_eq!(color_of(-3.0), color_of(-1.0));
        assert_eq!(color_of(7.5), color_of(1.0));
        assert_eq!(color_of(f64::NAN), color_of(0.0));
    }

    #[test]
    fn gradient_is_monotonic() {
        let mut prev = color_of(-1.0);
        for step in 1..=20 {
            let c = color_of(-1.0 + step as f64 * 0.1);
            assert!(c.g >= prev.g && c.r <= prev.r, "{prev} -> {c}");
            prev = c;
        }
    }

    #[test]
    fn class_and_gradient_are_independent() {
        // Just above the positive cut: badge says positive, gradient is still mostly yellow.
        let c = color_of(0.31);
        assert_eq!(classify(0.31), Sentiment::Positive);
        assert!(c.r > 80 && c.g > 160);
    }

    #[test]
    fn presentation_strings() {
        assert_eq!(Sentiment::Positive.css_class(), "sentiment-positive");
        assert_eq!(Sentiment::Negative.to_string(), "Negative");
        assert_eq!(Rgb::new(255, 0, 16).to_hex(), "#ff0010");
        assert_eq!(color_of(1.0).to_string(), "rgb(0, 255, 0)");
    }
}
