//! Configuration management and validation.
//!
//! Provides the flight-rule thresholds and the missing-value policy used by
//! the flight-category classifier.

use crate::constants::{UNRESTRICTED_CEILING_FT, UNRESTRICTED_VISIBILITY_SM, thresholds};
use crate::error::{DecodeError, Result};
use crate::models::FlightCategory;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Lowest visibility and ceiling at which a category still applies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryMinimums {
    /// Minimum visibility in statute miles (inclusive)
    pub visibility_sm: f64,

    /// Minimum ceiling in feet (inclusive)
    pub ceiling_ft: u32,
}

impl CategoryMinimums {
    pub fn new(visibility_sm: f64, ceiling_ft: u32) -> Self {
        Self {
            visibility_sm,
            ceiling_ft,
        }
    }

    fn from_pair((visibility_sm, ceiling_ft): (f64, u32)) -> Self {
        Self::new(visibility_sm, ceiling_ft)
    }

    fn is_met_by(&self, visibility_sm: f64, ceiling_ft: u32) -> bool {
        visibility_sm >= self.visibility_sm && ceiling_ft >= self.ceiling_ft
    }
}

/// VFR / MVFR / IFR minimums; anything below IFR is LIFR
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlightRuleThresholds {
    pub vfr: CategoryMinimums,
    pub mvfr: CategoryMinimums,
    pub ifr: CategoryMinimums,
}

impl Default for FlightRuleThresholds {
    fn default() -> Self {
        Self {
            vfr: CategoryMinimums::from_pair(thresholds::VFR),
            mvfr: CategoryMinimums::from_pair(thresholds::MVFR),
            ifr: CategoryMinimums::from_pair(thresholds::IFR),
        }
    }
}

impl FlightRuleThresholds {
    /// Bucket a visibility/ceiling pair, best category first
    pub fn categorize(&self, visibility_sm: f64, ceiling_ft: u32) -> FlightCategory {
        if self.vfr.is_met_by(visibility_sm, ceiling_ft) {
            FlightCategory::Vfr
        } else if self.mvfr.is_met_by(visibility_sm, ceiling_ft) {
            FlightCategory::Mvfr
        } else if self.ifr.is_met_by(visibility_sm, ceiling_ft) {
            FlightCategory::Ifr
        } else {
            FlightCategory::Lifr
        }
    }

    /// Thresholds must decrease from VFR to IFR
    pub fn validate(&self) -> Result<()> {
        let ordered = [self.vfr, self.mvfr, self.ifr];

        for minimums in &ordered {
            if !minimums.visibility_sm.is_finite() || minimums.visibility_sm < 0.0 {
                return Err(DecodeError::invalid_config(format!(
                    "visibility threshold must be a non-negative number, got {}",
                    minimums.visibility_sm
                )));
            }
        }

        for pair in ordered.windows(2) {
            let (higher, lower) = (pair[0], pair[1]);
            if higher.visibility_sm < lower.visibility_sm || higher.ceiling_ft < lower.ceiling_ft {
                return Err(DecodeError::invalid_config(format!(
                    "thresholds must not increase from VFR to IFR: {:?} is below {:?}",
                    higher, lower
                )));
            }
        }

        Ok(())
    }
}

/// Classifier configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Visibility assumed when a report carries none (statute miles)
    pub default_visibility_sm: f64,

    /// Ceiling assumed when a report has no broken/overcast layer (feet)
    pub default_ceiling_ft: u32,

    /// Category minimums
    pub thresholds: FlightRuleThresholds,

    /// Treat a `NIL` report like a missing one (Unknown, score 0).
    /// Off by default: any report with text is scored.
    pub nil_is_unknown: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            default_visibility_sm: UNRESTRICTED_VISIBILITY_SM,
            default_ceiling_ft: UNRESTRICTED_CEILING_FT,
            thresholds: FlightRuleThresholds::default(),
            nil_is_unknown: false,
        }
    }
}

impl DecoderConfig {
    /// Create configuration with a custom default visibility
    pub fn with_default_visibility(mut self, visibility_sm: f64) -> Self {
        self.default_visibility_sm = visibility_sm;
        self
    }

    /// Create configuration with a custom default ceiling
    pub fn with_default_ceiling(mut self, ceiling_ft: u32) -> Self {
        self.default_ceiling_ft = ceiling_ft;
        self
    }

    /// Configure category minimums
    pub fn with_thresholds(mut self, thresholds: FlightRuleThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Classify NIL reports as Unknown instead of scoring them
    pub fn with_nil_reports_unknown(mut self) -> Self {
        self.nil_is_unknown = true;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.default_visibility_sm.is_finite() || self.default_visibility_sm < 0.0 {
            return Err(DecodeError::invalid_config(format!(
                "default visibility must be a non-negative number, got {}",
                self.default_visibility_sm
            )));
        }
        self.thresholds.validate()?;

        debug!(
            "Decoder config: defaults {} sm / {} ft, VFR {:?}, MVFR {:?}, IFR {:?}",
            self.default_visibility_sm,
            self.default_ceiling_ft,
            self.thresholds.vfr,
            self.thresholds.mvfr,
            self.thresholds.ifr
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = DecoderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_visibility_sm, 10.0);
        assert_eq!(config.default_ceiling_ft, 10_000);
        assert_eq!(config.thresholds.mvfr, CategoryMinimums::new(3.0, 1000));
    }

    #[test]
    fn test_categorize_boundaries_are_inclusive() {
        let thresholds = FlightRuleThresholds::default();
        assert_eq!(thresholds.categorize(5.0, 3000), FlightCategory::Vfr);
        assert_eq!(thresholds.categorize(4.99, 3000), FlightCategory::Mvfr);
        assert_eq!(thresholds.categorize(10.0, 999), FlightCategory::Ifr);
        assert_eq!(thresholds.categorize(1.0, 500), FlightCategory::Ifr);
        assert_eq!(thresholds.categorize(0.5, 10_000), FlightCategory::Lifr);
    }

    #[test]
    fn test_builder_methods() {
        let config = DecoderConfig::default()
            .with_default_visibility(6.0)
            .with_default_ceiling(5000)
            .with_nil_reports_unknown();
        assert_eq!(config.default_visibility_sm, 6.0);
        assert_eq!(config.default_ceiling_ft, 5000);
        assert!(config.nil_is_unknown);
        assert!(!DecoderConfig::default().nil_is_unknown);
    }

    #[test]
    fn test_validate_rejects_non_monotonic_thresholds() {
        let thresholds = FlightRuleThresholds {
            vfr: CategoryMinimums::new(3.0, 3000),
            mvfr: CategoryMinimums::new(5.0, 1000),
            ifr: CategoryMinimums::new(1.0, 500),
        };
        let config = DecoderConfig::default().with_thresholds(thresholds);
        assert!(matches!(
            config.validate(),
            Err(DecodeError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_negative_visibility() {
        let config = DecoderConfig::default().with_default_visibility(-1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serde_round_trip() {
        let config = DecoderConfig::default().with_default_ceiling(8000);
        let json = serde_json::to_string(&config).unwrap();
        let parsed: DecoderConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
