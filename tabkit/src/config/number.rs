//! Numeric formatting directives.

use serde::{Deserialize, Serialize};

use crate::data::Scalar;
use crate::error::TabkitError;
use crate::Result;

/// Largest accepted `decimals` setting.
pub const MAX_DECIMALS: usize = 20;

/// How to print a numeric value.
///
/// Applies only to numeric-typed scalars. [`NumberFormat::apply`] returns
/// `None` for anything else so the caller can pass the raw value through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberFormat {
    /// Digits after the decimal separator
    pub decimals: usize,
    /// Separator inserted between groups of three integer digits
    pub group_separator: Option<String>,
    /// Separator between integer and fractional digits
    pub decimal_separator: String,
    /// Multiplier applied before formatting (100 for percentages)
    pub scale: f64,
    /// Text placed before the digits (after any minus sign)
    pub prefix: String,
    /// Text placed after the digits
    pub suffix: String,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            decimals: 2,
            group_separator: None,
            decimal_separator: ".".to_string(),
            scale: 1.0,
            prefix: String::new(),
            suffix: String::new(),
        }
    }
}

impl NumberFormat {
    /// Two decimals, no grouping
    pub fn new() -> Self {
        Self::default()
    }

    /// Whole numbers with comma grouping, e.g. `1,234,567`
    pub fn integer() -> Self {
        Self::new().decimals(0).group_separator(",")
    }

    /// Percentages: scales by 100 and appends `%`
    pub fn percent(decimals: usize) -> Self {
        Self::new().decimals(decimals).scale(100.0).suffix("%")
    }

    /// Builder: set number of decimals
    pub fn decimals(mut self, decimals: usize) -> Self {
        self.decimals = decimals;
        self
    }

    /// Builder: set group separator
    pub fn group_separator(mut self, sep: impl Into<String>) -> Self {
        self.group_separator = Some(sep.into());
        self
    }

    /// Builder: set decimal separator
    pub fn decimal_separator(mut self, sep: impl Into<String>) -> Self {
        self.decimal_separator = sep.into();
        self
    }

    /// Builder: set scale multiplier
    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Builder: set prefix
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Builder: set suffix
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Check that `decimals` is within [`MAX_DECIMALS`]
    pub fn validate(&self) -> Result<()> {
        if self.decimals > MAX_DECIMALS {
            return Err(TabkitError::config(format!(
                "number format decimals must be at most {}, got {}",
                MAX_DECIMALS, self.decimals
            )));
        }
        Ok(())
    }

    fn precision(&self) -> usize {
        self.decimals.min(MAX_DECIMALS)
    }

    /// Format a scalar, or `None` if it is not numeric-typed.
    pub fn apply(&self, value: &Scalar) -> Option<String> {
        match value {
            // Integers skip the float path so large values keep every digit.
            Scalar::Integer(v) if self.scale == 1.0 => Some(self.format_integer(*v)),
            Scalar::Integer(v) => Some(self.format_f64(*v as f64)),
            Scalar::Float(v) => Some(self.format_f64(*v)),
            _ => None,
        }
    }

    /// Format a float according to this directive
    pub fn format_f64(&self, value: f64) -> String {
        let scaled = value * self.scale;
        if !scaled.is_finite() {
            return format!("{}{}{}", self.prefix, scaled, self.suffix);
        }

        let fixed = format!("{:.*}", self.precision(), scaled.abs());
        let (int_part, frac_part) = match fixed.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (fixed.as_str(), None),
        };
        let is_zero = fixed.bytes().all(|b| b == b'0' || b == b'.');
        self.assemble(scaled < 0.0 && !is_zero, int_part, frac_part)
    }

    fn format_integer(&self, value: i64) -> String {
        let digits = value.unsigned_abs().to_string();
        let frac = "0".repeat(self.precision());
        let frac_part = if !frac.is_empty() {
            Some(frac.as_str())
        } else {
            None
        };
        self.assemble(value < 0, &digits, frac_part)
    }

    fn assemble(&self, negative: bool, int_part: &str, frac_part: Option<&str>) -> String {
        let mut out = String::new();
        if negative {
            out.push('-');
        }
        out.push_str(&self.prefix);
        match &self.group_separator {
            Some(sep) => out.push_str(&group_digits(int_part, sep)),
            None => out.push_str(int_part),
        }
        if let Some(frac) = frac_part {
            out.push_str(&self.decimal_separator);
            out.push_str(frac);
        }
        out.push_str(&self.suffix);
        out
    }
}

/// Insert `sep` between groups of three digits, counting from the right.
fn group_digits(digits: &str, sep: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * sep.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(sep);
        }
        out.push(ch);
    }
    out
}
