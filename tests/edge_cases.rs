use trackmap::{
    Command, FeatureStore, MemorySink, PositionPolicy, Session, TimestampIndex, TrackMapError,
};

fn feature(id: u64, time: i64, length: &str, lon: f64, lat: f64) -> String {
    format!(
        r#"{{
            "type": "Feature",
            "geometry": {{ "type": "Point", "coordinates": [{lon}, {lat}] }},
            "properties": {{
                "OBJECTID": {id},
                "croc name": "Ryan",
                "total length (cm)": {length},
                "GPS Fix Time": {time}
            }}
        }}"#
    )
}

fn collection(features: &[String]) -> String {
    format!(
        r#"{{ "type": "FeatureCollection", "features": [{}] }}"#,
        features.join(",")
    )
}

/// Test 1: A dataset where every record has a broken measurement still loads,
/// but has no minimum and renders nothing.
#[test]
fn test_all_measurements_invalid() {
    let payload = collection(&[
        feature(1, 100, "\"big\"", 142.0, -12.0),
        feature(2, 200, "null", 142.1, -12.1),
    ]);

    let store = FeatureStore::from_geojson(&payload).unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(store.min_measurement(), None);
    assert_eq!(store.renderable_count(), 0);

    // The index still exists (the records have timestamps), snapshots are
    // simply empty.
    let session = Session::builder().geojson(payload).build().unwrap();
    let mut sink = MemorySink::new();
    session.attach(&mut sink).unwrap();
    assert!(sink.markers().is_empty());
}

/// Test 2: A single-timestamp dataset pins playback to position 0 from both
/// directions.
#[test]
fn test_single_timestamp_dataset() {
    let payload = collection(&[feature(1, 100, "4505", 142.0, -12.0)]);
    let mut session = Session::builder().geojson(payload).build().unwrap();
    let mut sink = MemorySink::new();
    session.attach(&mut sink).unwrap();

    assert_eq!(session.timestamp_count(), 1);
    session.dispatch(Command::StepForward, &mut sink).unwrap();
    assert_eq!(session.position(), Some(0));
    session.dispatch(Command::StepBackward, &mut sink).unwrap();
    assert_eq!(session.position(), Some(0));
}

/// Test 3: Extreme but legal coordinates render; out-of-range ones do not.
#[test]
fn test_extreme_coordinates() {
    let payload = collection(&[
        feature(1, 100, "4505", 180.0, 90.0),
        feature(2, 100, "4505", -180.0, -90.0),
        feature(3, 100, "4505", 180.1, 0.0),
    ]);

    let store = FeatureStore::from_geojson(&payload).unwrap();
    assert_eq!(store.len(), 3);
    assert_eq!(store.renderable_count(), 2);
}

/// Test 4: An empty feature collection cannot start a session.
#[test]
fn test_empty_collection_rejected_at_build() {
    let payload = r#"{ "type": "FeatureCollection", "features": [] }"#;
    let err = Session::builder().geojson(payload).build().unwrap_err();
    assert!(matches!(err, TrackMapError::EmptyDataset));
}

/// Test 5: Out-of-order duplicate-heavy timestamps still index cleanly.
#[test]
fn test_large_unordered_timestamp_set() {
    let features: Vec<String> = (0u64..500)
        .map(|i| feature(i, ((i * 37) % 100) as i64, "4505", 142.0, -12.0))
        .collect();

    let store = FeatureStore::from_geojson(&collection(&features)).unwrap();
    let index = TimestampIndex::build(&store).unwrap();

    let times: Vec<i64> = index.iter().map(|t| t.millis()).collect();
    assert!(times.windows(2).all(|w| w[0] < w[1]));
    assert!(index.len() <= 100);
}

/// Test 6: Competing reloads; only the newest request may change state,
/// regardless of completion order.
#[test]
fn test_reload_race_newest_wins() {
    let initial = collection(&[feature(1, 100, "4505", 142.0, -12.0)]);
    let mut session = Session::builder().geojson(initial).build().unwrap();

    let slow = session.begin_reload();
    let fast = session.begin_reload();

    let fast_payload = collection(&[feature(2, 900, "4505", 142.0, -12.0)]);
    assert!(
        session
            .commit_reload(fast, &fast_payload, PositionPolicy::Reset)
            .unwrap()
    );

    // The slow request from before finishes now; it must be discarded.
    let slow_payload = collection(&[feature(3, 111, "4505", 142.0, -12.0)]);
    assert!(
        !session
            .commit_reload(slow, &slow_payload, PositionPolicy::Reset)
            .unwrap()
    );

    assert_eq!(
        session.current_timestamp().map(|t| t.millis()),
        Some(900)
    );
}

/// Test 7: A zero minimum halts rendering for that dataset instead of
/// producing nonsense radii.
#[test]
fn test_zero_minimum_halts_redraw() {
    let payload = collection(&[
        feature(1, 100, "0", 142.0, -12.0),
        feature(2, 100, "4505", 142.1, -12.1),
    ]);

    let session = Session::builder().geojson(payload).build().unwrap();
    let mut sink = MemorySink::new();

    let err = session.attach(&mut sink).unwrap_err();
    assert!(matches!(err, TrackMapError::InvalidScale(_)));
    assert!(sink.markers().is_empty());
}

/// Test 8: Mixed numeric and string timestamps normalize into one order.
#[test]
fn test_mixed_timestamp_encodings() {
    let payload = format!(
        r#"{{ "type": "FeatureCollection", "features": [
            {},
            {{
                "type": "Feature",
                "geometry": {{ "type": "Point", "coordinates": [142.0, -12.0] }},
                "properties": {{
                    "OBJECTID": 2,
                    "croc name": "Hamish",
                    "total length (cm)": 3890,
                    "GPS Fix Time": "50"
                }}
            }}
        ] }}"#,
        feature(1, 100, "4505", 142.0, -12.0)
    );

    let store = FeatureStore::from_geojson(&payload).unwrap();
    let index = TimestampIndex::build(&store).unwrap();
    let times: Vec<i64> = index.iter().map(|t| t.millis()).collect();
    assert_eq!(times, vec![50, 100]);
}
