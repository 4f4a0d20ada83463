//! Integration tests for METAR/TAF decoding through the public API
//!
//! These tests exercise the crate-root entry points end to end with
//! realistic reports.

use metar_taf::models::{
    CloudCoverage, CloudType, PeriodKind, PeriodValidity, Visibility, WindDirection,
};
use metar_taf::{
    DecodeError, DecodedReport, FlightCategory, StationWeather, classify_flight_category,
    decode_metar, decode_taf, rank_stations, try_decode_metar, try_decode_taf,
};

const CAVOK_REPORTS: &[&str] = &[
    "LFRB 151200Z 00000KT CAVOK 22/14 Q1018",
    "METAR EDDF 151220Z AUTO 25008KT CAVOK 24/11 Q1016 NOSIG",
    "LFRN 151200Z 28012KT CAVOK BKN003 17/12 Q1015",
    "SPECI LEMD 151245Z VRB02KT CAVOK 30/05 Q1019 RMK BKN001",
    "LFRN 151200Z 24010KT 4000 BKN008 12/10 Q1010 BECMG CAVOK",
];

const REPORTS_WITHOUT_VISIBILITY_OR_CEILING: &[&str] = &[
    "LFRN 151200Z 28012KT 17/12 Q1015",
    "LFRN 151200Z",
    "LFRN",
    "KJFK 151251Z 31015KT FEW250 M02/M04 A2992",
    "EGLL 151220Z SCT010 -RA",
    "XXXX YYYY ZZZZ",
    "METAR LFRN 151200Z NIL",
];

/// Purpose: every report with CAVOK classifies as CAVOK with no ceiling
#[test]
fn test_cavok_reports_are_cavok_without_ceiling() {
    for raw in CAVOK_REPORTS {
        let report = decode_metar(raw);
        assert_eq!(
            classify_flight_category(&report),
            (FlightCategory::Cavok, 5),
            "{raw}"
        );
        assert_eq!(report.ceiling_ft(), None, "{raw}");
    }
}

/// Purpose: a report that exists but mentions neither visibility nor
/// ceiling is scored with the unrestricted defaults, never Unknown
#[test]
fn test_missing_visibility_and_ceiling_default_to_vfr() {
    for raw in REPORTS_WITHOUT_VISIBILITY_OR_CEILING {
        let report = decode_metar(raw);
        assert_eq!(report.visibility, None, "{raw}");
        assert_eq!(report.ceiling_ft(), None, "{raw}");
        assert_eq!(
            classify_flight_category(&report),
            (FlightCategory::Vfr, 4),
            "{raw}"
        );
    }
}

#[test]
fn test_missing_report_is_unknown() {
    assert_eq!(
        classify_flight_category(&decode_metar("")),
        (FlightCategory::Unknown, 0)
    );
    assert_eq!(
        classify_flight_category(&DecodedReport::default()),
        (FlightCategory::Unknown, 0)
    );
}

#[test]
fn test_ceiling_is_lowest_ceiling_layer_in_any_order() {
    let cases = [
        ("LFRN 151200Z 9999 FEW005 BKN040 OVC020", Some(2000)),
        ("LFRN 151200Z 9999 OVC020 BKN040 FEW005", Some(2000)),
        ("LFRN 151200Z 9999 BKN040 VV008 OVC100", Some(800)),
        ("LFRN 151200Z 9999 FEW005 SCT010", None),
        ("LFRN 151200Z 9999", None),
    ];
    for (raw, expected) in cases {
        assert_eq!(decode_metar(raw).ceiling_ft(), expected, "{raw}");
    }
}

#[test]
fn test_cloud_layers_keep_source_order() {
    let report = decode_metar("LFRN 151200Z 9999 OVC080 FEW010CB SCT030TCU BKN020");
    let layers: Vec<String> = report.clouds.iter().map(|l| l.to_string()).collect();
    assert_eq!(layers, vec!["OVC080", "FEW010CB", "SCT030TCU", "BKN020"]);
    assert_eq!(report.clouds[1].cloud_type, Some(CloudType::Cumulonimbus));
}

/// Purpose: unrelated unrecognized tokens never change the period structure
#[test]
fn test_taf_periods_stable_under_unrecognized_tokens() {
    let plain = "TAF LFRN 151100Z 1512/1612 26010KT 9999 SCT020 TEMPO 1514/1518 4000 SHRA BECMG 1518/1520 22015KT PROB30 1600/1604 BR";
    let noisy = "TAF LFRN 151100Z 1512/1612 ABC 26010KT 9999 ??? SCT020 TEMPO 1514/1518 XYZ 4000 SHRA BECMG 1518/1520 22015KT /// PROB30 1600/1604 BR QQQ";

    let signature = |raw: &str| -> Vec<(PeriodKind, PeriodValidity)> {
        decode_taf(raw)
            .periods
            .iter()
            .map(|p| (p.kind, p.validity))
            .collect()
    };

    assert_eq!(signature(plain).len(), 4);
    assert_eq!(signature(plain), signature(noisy));
}

#[test]
fn test_taf_periods_never_overlap() {
    let raw = "TAF KJFK 151130Z 1512/1618 18010KT P6SM SCT040 TEMPO 1514/1518 3SM -SHRA BKN025 FM151800 22015G25KT 5SM BR OVC015 PROB40 TEMPO 1520/1524 1SM +TSRA OVC008CB FM160300 30010KT P6SM SKC";
    let forecast = decode_taf(raw);
    assert_eq!(forecast.periods.len(), 5);

    let mut cursor = 0;
    for period in &forecast.periods {
        let offset = raw[cursor..].find(&period.condition_text).unwrap() + cursor;
        assert!(offset >= cursor);
        cursor = offset + period.condition_text.len();
    }
}

#[test]
fn test_raw_text_round_trip() {
    let inputs = [
        "LFRN 151200Z 28012KT 9999 FEW030 17/12 Q1015",
        "  padded   report\twith\ttabs  ",
        "",
        "garbage !!! 123",
        "KJFK 151251Z 1 1/2SM BR",
    ];
    for raw in inputs {
        assert_eq!(decode_metar(raw).raw_text, raw);
        assert_eq!(decode_taf(raw).raw_text, raw);
    }
}

#[test]
fn test_example_vfr_observation() {
    let report = decode_metar("LFRN 151200Z 28012KT 9999 FEW030 17/12 Q1015");
    let wind = report.wind.unwrap();
    assert_eq!(wind.direction, WindDirection::Degrees(280));
    assert_eq!(wind.speed, 12);
    assert!((report.visibility_sm().unwrap() - 6.21).abs() < 0.01);
    assert_eq!(report.clouds.len(), 1);
    assert_eq!(report.clouds[0].coverage, CloudCoverage::Few);
    assert_eq!(report.clouds[0].height_ft, 3000);
    assert_eq!(report.ceiling_ft(), None);
    assert_eq!(report.temperature_c(), Some(17));
    assert_eq!(report.dewpoint_c(), Some(12));
    assert_eq!(report.pressure.unwrap().hectopascals, 1015.0);
    assert_eq!(classify_flight_category(&report), (FlightCategory::Vfr, 4));
}

#[test]
fn test_example_cavok_observation() {
    let report = decode_metar("LFRB 151200Z 00000KT CAVOK 22/14 Q1018");
    assert_eq!(classify_flight_category(&report), (FlightCategory::Cavok, 5));
    assert_eq!(report.ceiling_ft(), None);
    assert!(report.wind.unwrap().is_calm());
}

#[test]
fn test_example_ifr_observation() {
    let report = decode_metar("LFRN 151000Z 3000 BKN005 RA");
    assert!(report.wind.is_none());
    assert!(report.temperature.is_none());
    assert!((report.visibility_sm().unwrap() - 1.86).abs() < 0.01);
    assert_eq!(report.ceiling_ft(), Some(500));
    assert_eq!(report.phenomena.len(), 1);
    assert_eq!(report.phenomena[0].code(), "RA");
    assert_eq!(classify_flight_category(&report), (FlightCategory::Ifr, 2));
}

#[test]
fn test_example_taf_timeline() {
    let forecast = decode_taf(
        "LFRN 151100Z 1512/1612 26010KT 9999 SCT020 TEMPO 1514/1518 4000 SHRA BKN008 BECMG 1518/1520 22015KT",
    );
    assert_eq!(forecast.header.station.as_deref(), Some("LFRN"));
    assert_eq!(
        forecast.header.validity.map(|w| w.to_string()),
        Some("1512/1612".to_string())
    );

    let periods = &forecast.periods;
    assert_eq!(periods.len(), 3);

    assert_eq!(periods[0].kind, PeriodKind::Base);
    assert_eq!(periods[0].validity.window().unwrap().to_string(), "1512/1612");
    let wind = periods[0].conditions.wind.unwrap();
    assert_eq!((wind.direction, wind.speed), (WindDirection::Degrees(260), 10));
    assert_eq!(
        periods[0].conditions.visibility,
        Some(Visibility::Metres {
            metres: 9999,
            no_directional_variation: false
        })
    );
    assert_eq!(periods[0].conditions.clouds[0].to_string(), "SCT020");

    assert_eq!(periods[1].kind, PeriodKind::Tempo);
    assert_eq!(periods[1].validity.window().unwrap().to_string(), "1514/1518");
    assert_eq!(
        periods[1].conditions.visibility,
        Some(Visibility::Metres {
            metres: 4000,
            no_directional_variation: false
        })
    );
    assert_eq!(periods[1].conditions.phenomena[0].code(), "SHRA");
    assert_eq!(periods[1].conditions.clouds[0].to_string(), "BKN008");

    assert_eq!(periods[2].kind, PeriodKind::Becmg);
    assert_eq!(periods[2].validity.window().unwrap().to_string(), "1518/1520");
    let wind = periods[2].conditions.wind.unwrap();
    assert_eq!((wind.direction, wind.speed), (WindDirection::Degrees(220), 15));
}

#[test]
fn test_validity_window_and_issue_time_never_visibility() {
    let forecast = decode_taf("TAF LFRN 151100Z 1512/1612 1500 BR OVC003");
    let base = &forecast.periods[0];
    assert_eq!(
        base.conditions.visibility,
        Some(Visibility::Metres {
            metres: 1500,
            no_directional_variation: false
        })
    );
}

#[test]
fn test_try_decode_rejects_contract_violations() {
    assert!(matches!(try_decode_metar(b""), Err(DecodeError::EmptyInput)));
    assert!(matches!(
        try_decode_taf(b"   \n"),
        Err(DecodeError::EmptyInput)
    ));
    assert!(matches!(
        try_decode_metar(b"LFRN\x07151200Z"),
        Err(DecodeError::NonTextContent { offset: 4, .. })
    ));
    assert!(matches!(
        try_decode_metar(&[0xc3, 0x28]),
        Err(DecodeError::InvalidUtf8 { .. })
    ));

    let report = try_decode_metar(b"LFRN 151200Z 28012KT 9999 FEW030 17/12 Q1015").unwrap();
    assert_eq!(report.station.as_deref(), Some("LFRN"));
    let forecast = try_decode_taf(b"TAF LFRN 151100Z 1512/1612 26010KT 9999").unwrap();
    assert_eq!(forecast.periods.len(), 1);
}

#[test]
fn test_rank_stations_missing_reports_last() {
    let ranked = rank_stations(vec![
        StationWeather::new("LFRN", None, None),
        StationWeather::new("LFRB", Some("LFRB 151200Z 3000 BKN005"), None),
        StationWeather::new("LFPG", Some("LFPG 151200Z 9999 SCT030"), None),
    ]);
    let order: Vec<_> = ranked.iter().map(|s| s.icao.as_str()).collect();
    assert_eq!(order, vec!["LFPG", "LFRB", "LFRN"]);
}

#[test]
fn test_decoded_report_serializes_to_json() {
    let report = decode_metar("LFRN 151200Z 28012KT 9999 FEW030 17/12 Q1015");
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["station"], "LFRN");
    assert_eq!(json["temperature"]["temperature"], 17);

    let parsed: DecodedReport = serde_json::from_value(json).unwrap();
    assert_eq!(parsed, report);
}
