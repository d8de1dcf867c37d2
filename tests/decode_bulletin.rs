use metar_decoder::decode::decode_bulletin;
use metar_decoder::display::StationSummary;
use metar_decoder::report::{StationRecord, WindDirection, WindInfo};
use metar_decoder::units::{celsius_to_fahrenheit, knots_to_mph};

const BULLETIN: &str = "\
KTYS 211751Z 24008KT 10SM 28/19 A2992 RMK AO2 SLP125
KBOS 211754Z 24015G25KT 1 1/2SM -RA BR 18/16 A2978 RMK AO2
KDEN METAR 211753Z VRB04KT 1/2SM FG M05/M10 A3012

KORD 211751Z 00000KT 10SM 22/14 A3001
";

#[test]
fn test_bulletin_station_order() {
    let batch = decode_bulletin(BULLETIN);
    assert_eq!(vec!["KTYS", "KBOS", "KDEN", "KORD"], batch.station_ids());
}

#[test]
fn test_bulletin_end_to_end_record() {
    let batch = decode_bulletin(BULLETIN);

    assert_eq!(
        Some(&StationRecord {
            station_id: "KTYS".to_owned(),
            report_day: Some("21".to_owned()),
            report_time_utc: Some("1751".to_owned()),
            wind: Some(WindInfo {
                direction: WindDirection::Degrees(240),
                speed_knots: 8,
                gust_knots: None,
            }),
            visibility_statute_miles: Some(10.0),
            temperature_c: Some(28),
            dewpoint_c: Some(19),
            altimeter_in_hg: Some(29.92),
        }),
        batch.get("KTYS")
    );
}

#[test]
fn test_bulletin_gusts_and_mixed_visibility() {
    let batch = decode_bulletin(BULLETIN);
    let kbos = batch.get("KBOS").unwrap();

    assert_eq!(Some(25), kbos.wind.as_ref().and_then(|w| w.gust_knots));
    assert_eq!(Some(1.5), kbos.visibility_statute_miles);
    assert_eq!(Some(18), kbos.temperature_c);
    assert_eq!(Some(29.78), kbos.altimeter_in_hg);
}

#[test]
fn test_bulletin_irregular_timestamp_and_negative_temperature() {
    let batch = decode_bulletin(BULLETIN);
    let kden = batch.get("KDEN").unwrap();

    assert_eq!(Some("1753"), kden.report_time_utc.as_deref());
    assert_eq!(Some(WindDirection::Variable), kden.wind.as_ref().map(|w| w.direction));
    assert_eq!(Some(0.5), kden.visibility_statute_miles);
    assert_eq!(Some(-5), kden.temperature_c);
    assert_eq!(Some(-10), kden.dewpoint_c);
}

#[test]
fn test_bulletin_calm_wind() {
    let batch = decode_bulletin(BULLETIN);
    let summary = StationSummary::from_record(batch.get("KORD").unwrap(), -5);

    assert_eq!("Calm", summary.wind_direction);
    assert_eq!("Calm", summary.wind_speed);
}

#[test]
fn test_bulletin_repeated_station_last_wins() {
    let batch = decode_bulletin("KTYS 211751Z 24008KT 10SM 28/19 A2992\nKTYS 211851Z 25012KT 9SM 29/18 A2990");

    assert_eq!(1, batch.len());
    assert_eq!(Some(29), batch.get("KTYS").and_then(|r| r.temperature_c));
    assert_eq!(Some("1851"), batch.get("KTYS").and_then(|r| r.report_time_utc.as_deref()));
}

#[test]
fn test_bulletin_idempotent() {
    assert_eq!(decode_bulletin(BULLETIN), decode_bulletin(BULLETIN));
}

#[test]
fn test_empty_bulletin() {
    let batch = decode_bulletin("");
    assert!(batch.is_empty());
    assert!(batch.first().is_none());
}

#[test]
fn test_unit_conversions() {
    assert_eq!(11, knots_to_mph(10));
    assert_eq!(32, celsius_to_fahrenheit(0));
    assert_eq!(23, celsius_to_fahrenheit(-5));
}
