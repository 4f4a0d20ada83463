//! Flight-category classification.
//!
//! Buckets a decoded report into CAVOK/VFR/MVFR/IFR/LIFR from its visibility
//! and ceiling. A report that exists but mentions neither is scored with the
//! configured defaults; a report with no text at all is Unknown.

use crate::config::DecoderConfig;
use crate::models::{DecodedReport, FlightCategory, PeriodConditions};
use tracing::trace;

/// Classify with the default thresholds and missing-value policy
pub fn classify_flight_category(report: &DecodedReport) -> (FlightCategory, u8) {
    classify_with_config(report, &DecoderConfig::default())
}

/// Classify a report, returning the category and its score (5..=0)
pub fn classify_with_config(report: &DecodedReport, config: &DecoderConfig) -> (FlightCategory, u8) {
    let category = if !report.has_text() || (report.nil && config.nil_is_unknown) {
        FlightCategory::Unknown
    } else if report.cavok {
        FlightCategory::Cavok
    } else {
        categorize(report.visibility_sm(), report.ceiling_ft(), config)
    };

    trace!(
        "{}: visibility {:?} sm, ceiling {:?} ft -> {}",
        report.station.as_deref().unwrap_or("????"),
        report.visibility_sm(),
        report.ceiling_ft(),
        category
    );

    (category, category.score())
}

/// Classify the conditions of a single forecast period
pub fn classify_period(conditions: &PeriodConditions, config: &DecoderConfig) -> FlightCategory {
    if conditions.cavok {
        return FlightCategory::Cavok;
    }
    categorize(
        conditions.visibility.map(|v| v.statute_miles()),
        conditions.ceiling_ft(),
        config,
    )
}

fn categorize(
    visibility_sm: Option<f64>,
    ceiling_ft: Option<u32>,
    config: &DecoderConfig,
) -> FlightCategory {
    config.thresholds.categorize(
        visibility_sm.unwrap_or(config.default_visibility_sm),
        ceiling_ft.unwrap_or(config.default_ceiling_ft),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metar::decode_metar;
    use crate::models::{CloudCoverage, CloudLayer, Visibility};

    #[test]
    fn test_cavok() {
        let report = decode_metar("LFRB 151200Z 00000KT CAVOK 22/14 Q1018");
        assert_eq!(
            classify_flight_category(&report),
            (FlightCategory::Cavok, 5)
        );
    }

    #[test]
    fn test_missing_fields_default_to_vfr() {
        let report = decode_metar("LFRN 151200Z 28012KT 17/12 Q1015");
        assert_eq!(classify_flight_category(&report), (FlightCategory::Vfr, 4));
    }

    #[test]
    fn test_no_text_is_unknown() {
        assert_eq!(
            classify_flight_category(&DecodedReport::default()),
            (FlightCategory::Unknown, 0)
        );
        assert_eq!(
            classify_flight_category(&decode_metar("   ")),
            (FlightCategory::Unknown, 0)
        );
    }

    #[test]
    fn test_categories_by_visibility_and_ceiling() {
        let cases = [
            ("LFRN 151200Z 9999 BKN035", FlightCategory::Vfr),
            ("LFRN 151200Z 9999 BKN020", FlightCategory::Mvfr),
            ("LFRN 151200Z 3000 BKN005 RA", FlightCategory::Ifr),
            ("LFRN 151200Z 0800 FG", FlightCategory::Lifr),
            ("LFRN 151200Z 9999 OVC004", FlightCategory::Lifr),
            ("KJFK 151200Z 4SM BR SCT020", FlightCategory::Mvfr),
        ];
        for (raw, expected) in cases {
            let (category, score) = classify_flight_category(&decode_metar(raw));
            assert_eq!(category, expected, "{raw}");
            assert_eq!(score, expected.score());
        }
    }

    #[test]
    fn test_nil_report_policy() {
        let report = decode_metar("METAR LFRN 151200Z NIL");
        assert!(report.nil);
        assert_eq!(classify_flight_category(&report), (FlightCategory::Vfr, 4));

        let config = DecoderConfig::default().with_nil_reports_unknown();
        assert_eq!(
            classify_with_config(&report, &config),
            (FlightCategory::Unknown, 0)
        );
    }

    #[test]
    fn test_custom_defaults() {
        let report = decode_metar("LFRN 151200Z 28012KT");
        let config = DecoderConfig::default().with_default_ceiling(800);
        assert_eq!(
            classify_with_config(&report, &config),
            (FlightCategory::Ifr, 2)
        );
    }

    #[test]
    fn test_classify_period() {
        let config = DecoderConfig::default();
        let conditions = PeriodConditions {
            visibility: Some(Visibility::Metres {
                metres: 4000,
                no_directional_variation: false,
            }),
            clouds: vec![CloudLayer::new(CloudCoverage::Broken, 8, None)],
            ..Default::default()
        };
        assert_eq!(classify_period(&conditions, &config), FlightCategory::Ifr);
        assert_eq!(
            classify_period(&PeriodConditions::default(), &config),
            FlightCategory::Vfr
        );
    }
}
