use s1feature::types::keys;
use s1feature::{FeatureError, FeatureTransform, LonLat, ProductTransformer, SchemaVariant, XmlDocument};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn grid_point(line: u32, pixel: u32, latitude: f64, longitude: f64) -> String {
    format!(
        "<geolocationGridPoint>\
            <azimuthTime>2014-10-03T18:47:39.842455</azimuthTime>\
            <slantRangeTime>5.364633780973990e-03</slantRangeTime>\
            <line>{}</line><pixel>{}</pixel>\
            <latitude>{:e}</latitude><longitude>{:e}</longitude>\
            <height>0.0</height>\
        </geolocationGridPoint>",
        line, pixel, latitude, longitude
    )
}

fn legacy_product(pass: &str, points: &[(u32, u32, f64, f64)]) -> String {
    let grid: String = points
        .iter()
        .map(|&(line, pixel, lat, lon)| grid_point(line, pixel, lat, lon))
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<product>
  <title>S1A_IW_GRDH_1SDV_20141003T184739_20141003T184808_002669_002F95_9D4A</title>
  <resourceSize>891552634</resourceSize>
  <adsHeader>
    <missionId>S1A</missionId>
    <productType>GRD</productType>
    <polarisation>VV</polarisation>
    <mode>IW</mode>
    <swath>IW</swath>
    <startTime>2014-10-03T18:47:39.842715</startTime>
    <stopTime>2014-10-03T18:48:08.834276</stopTime>
    <absoluteOrbitNumber>2669</absoluteOrbitNumber>
    <missionDataTakeId>12181</missionDataTakeId>
    <imageNumber>001</imageNumber>
  </adsHeader>
  <generalAnnotation>
    <productInformation>
      <pass>{}</pass>
      <timelinessCategory>Fast-24h</timelinessCategory>
    </productInformation>
  </generalAnnotation>
  <geolocationGrid>
    <geolocationGridPointList count="{}">{}</geolocationGridPointList>
  </geolocationGrid>
</product>"#,
        pass,
        points.len(),
        grid
    )
}

/// Grid straddling the antimeridian
const DATELINE_GRID: &[(u32, u32, f64, f64)] = &[
    (0, 0, 65.887784, 178.500298),
    (0, 6000, 66.203512, -178.812244),
    (0, 12000, 66.512391, -176.120854),
    (4000, 0, 64.794513, 177.870132),
    (4000, 12000, 65.412907, -176.731004),
    (8000, 0, 63.701722, 177.251634),
    (8000, 6000, 64.010215, -179.963808),
    (8000, 12000, 64.313546, -177.330517),
];

#[test]
fn test_legacy_descending_across_antimeridian() {
    init_logging();

    let xml = legacy_product("DESCENDING", DATELINE_GRID);
    let doc = XmlDocument::parse(&xml).unwrap();
    assert_eq!(s1feature::detect_schema(&doc), SchemaVariant::Legacy);

    let record = ProductTransformer::default().transform(&xml).unwrap();
    println!("Feature: {}", record.to_geojson().unwrap());

    assert_eq!(record.text(keys::ORBIT_DIRECTION), Some("descending"));
    assert_eq!(record.text(keys::PROCESSING_LEVEL), Some("LEVEL1"));
    assert_eq!(record.text(keys::MISSION_TAKE_ID), Some("12181"));
    assert_eq!(record.text(keys::PLATFORM), Some("S1A"));
    assert_eq!(record.text(keys::ORBIT_NUMBER), Some("2669"));
    assert!(record.property(keys::INSTRUMENT).is_none());
    assert_eq!(
        record.text(keys::LOCATION),
        Some("2014/10/03/S1A/S1A_IW_GRDH_1SDV_20141003T184739_20141003T184808_002669_002F95_9D4A")
    );

    assert_eq!(
        record.ring(),
        &[
            LonLat(178.500298, 65.887784),
            LonLat(177.251634, 63.701722),
            LonLat(-177.330517, 64.313546),
            LonLat(-176.120854, 66.512391),
            LonLat(178.500298, 65.887784),
        ]
    );
}

#[test]
fn test_legacy_ascending_grid() {
    // Clockwise corner order forces the winding correction
    let points = [
        (0, 0, 10.0, 20.0),
        (0, 200, 9.5, 23.0),
        (900, 0, 13.0, 20.5),
        (900, 200, 12.5, 23.5),
    ];
    let xml = legacy_product("Ascending", &points);
    let record = ProductTransformer::default().transform(&xml).unwrap();

    assert_eq!(record.text(keys::ORBIT_DIRECTION), Some("ascending"));
    // SAFE order: (20.5,13) (23.5,12.5) (23,9.5) (20,10) is clockwise;
    // reflected to (20.5,13) (20,10) (23,9.5) (23.5,12.5) then rotated by one
    assert_eq!(
        record.ring(),
        &[
            LonLat(20.0, 10.0),
            LonLat(23.0, 9.5),
            LonLat(23.5, 12.5),
            LonLat(20.5, 13.0),
            LonLat(20.0, 10.0),
        ]
    );
}

#[test]
fn test_invariants_hold_for_every_product() {
    let transformer = ProductTransformer::default();
    let products = [
        legacy_product("DESCENDING", DATELINE_GRID),
        legacy_product("ascending", DATELINE_GRID),
        legacy_product("Descending", &[(0, 0, 1.0, 1.0), (0, 5, 1.0, 2.0), (7, 0, 2.0, 1.0), (7, 5, 2.5, 2.5)]),
    ];

    for xml in &products {
        let record = transformer.transform(xml).unwrap();
        let ring = record.ring();

        assert!(ring.len() >= 4);
        assert_eq!(ring.first(), ring.last());
        assert!(matches!(
            record.text(keys::ORBIT_DIRECTION),
            Some("ascending") | Some("descending")
        ));
        assert_eq!(record.text(keys::PROCESSING_LEVEL), Some("LEVEL1"));
        assert!(record.property(keys::INSTRUMENT).is_none());
        assert_eq!(record.properties[keys::CLOUD_COVER].as_i64(), Some(0));
    }
}

#[test]
fn test_missing_pass() {
    let xml = legacy_product("DESCENDING", DATELINE_GRID).replace("<pass>DESCENDING</pass>", "");
    match ProductTransformer::default().transform(&xml) {
        Err(FeatureError::MissingField(field)) => assert_eq!(field, "pass"),
        other => panic!("expected MissingField(pass), got {:?}", other),
    }
}

#[test]
fn test_grid_errors() {
    let transformer = ProductTransformer::default();

    let empty = legacy_product("ASCENDING", &[]);
    assert!(matches!(
        transformer.transform(&empty),
        Err(FeatureError::GeometryExtraction(_))
    ));

    let single_line = legacy_product("ASCENDING", &[(0, 0, 1.0, 1.0), (0, 10, 1.0, 2.0)]);
    assert!(matches!(
        transformer.transform(&single_line),
        Err(FeatureError::GeometryExtraction(_))
    ));

    let broken = legacy_product("ASCENDING", DATELINE_GRID)
        .replacen("<latitude>", "<latitude>x", 1);
    assert!(matches!(
        transformer.transform(&broken),
        Err(FeatureError::GeometryExtraction(_))
    ));

    let no_longitude = legacy_product("ASCENDING", DATELINE_GRID)
        .replacen("<longitude>", "<lon>", 1)
        .replacen("</longitude>", "</lon>", 1);
    assert!(matches!(
        transformer.transform(&no_longitude),
        Err(FeatureError::GeometryExtraction(_))
    ));
}
