use action_annotator::store::ANNOTATION_COLUMNS;
use action_annotator::{AnnotationCollection, AnnotationRecord, DisplayRegion, Error};
use std::fs;
use tempfile::tempdir;

fn make_test_record(action: &str, subject_id: i64, start: u64, stop: u64) -> AnnotationRecord {
    AnnotationRecord {
        video_name: "game1.mp4".to_string(),
        action_label: action.to_string(),
        subject_id,
        start_time_seconds: start,
        stop_time_seconds: stop,
        start_frame: start * 30,
        stop_frame: stop * 30,
        click_frame_geometry: DisplayRegion::new(10, 20, 650, 380).to_string(),
        click_x: 200,
        click_y: 150,
    }
}

#[test]
fn test_load_missing_file_is_empty() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("game1.csv");

    let collection = AnnotationCollection::load(&path).unwrap();
    assert!(collection.is_empty());
    assert_eq!(collection.path(), path.as_path());
    assert!(!path.exists());
}

#[test]
fn test_append_persists_and_reloads_in_order() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("game1.csv");

    let mut collection = AnnotationCollection::load(&path).unwrap();
    collection.append(make_test_record("shot", 3, 5, 8)).unwrap();
    collection.append(make_test_record("pass", 7, 10, 10)).unwrap();
    collection.append(make_test_record("faceoff", 1, 2, 4)).unwrap();

    let reloaded = AnnotationCollection::load(&path).unwrap();
    assert_eq!(reloaded.records(), collection.records());
    assert_eq!(reloaded.len(), 3);
    assert_eq!(reloaded.get(2).unwrap().action_label, "faceoff");
    assert_eq!(
        reloaded.get(0).unwrap().click_frame_geometry,
        "(10, 20, 650, 380)"
    );
}

#[test]
fn test_persisted_header_matches_schema() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("game1.csv");

    let mut collection = AnnotationCollection::load(&path).unwrap();
    collection.append(make_test_record("shot", 3, 5, 8)).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let header = text.lines().next().unwrap();
    assert_eq!(header, ANNOTATION_COLUMNS.join(","));
    assert_eq!(
        text.lines().nth(1).unwrap(),
        "game1.mp4,shot,3,5,8,150,240,\"(10, 20, 650, 380)\",200,150"
    );
}

#[test]
fn test_delete_persists() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("game1.csv");

    let mut collection = AnnotationCollection::load(&path).unwrap();
    collection.append(make_test_record("shot", 3, 5, 8)).unwrap();
    collection.append(make_test_record("pass", 7, 10, 12)).unwrap();

    let removed = collection.delete(0).unwrap();
    assert_eq!(removed.action_label, "shot");

    let reloaded = AnnotationCollection::load(&path).unwrap();
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded.get(0).unwrap().action_label, "pass");
}

#[test]
fn test_delete_last_record_keeps_header() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("game1.csv");

    let mut collection = AnnotationCollection::load(&path).unwrap();
    collection.append(make_test_record("shot", 3, 5, 8)).unwrap();
    collection.delete(0).unwrap();

    let reloaded = AnnotationCollection::load(&path).unwrap();
    assert!(reloaded.is_empty());
}

#[test]
fn test_delete_out_of_range_leaves_collection_unchanged() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("game1.csv");

    let mut collection = AnnotationCollection::load(&path).unwrap();
    collection.append(make_test_record("shot", 3, 5, 8)).unwrap();
    let before = fs::read_to_string(&path).unwrap();

    let result = collection.delete(1);
    assert!(matches!(result, Err(Error::Range { index: 1, len: 1 })));
    assert_eq!(collection.len(), 1);
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn test_append_rejects_inverted_interval() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("game1.csv");

    let mut collection = AnnotationCollection::load(&path).unwrap();
    let result = collection.append(make_test_record("shot", 3, 9, 8));
    assert!(matches!(result, Err(Error::State(_))));
    assert!(collection.is_empty());
    assert!(!path.exists());
}

#[test]
fn test_failed_write_rolls_back_append() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("no_such_dir").join("game1.csv");

    let mut collection = AnnotationCollection::load(&path).unwrap();
    let result = collection.append(make_test_record("shot", 3, 5, 8));
    assert!(matches!(result, Err(Error::Io(_))));
    assert!(collection.is_empty());
}

#[test]
fn test_load_rejects_schema_mismatch() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("old.csv");

    // Earlier layout without frame columns.
    fs::write(
        &path,
        "vidname,action,player_id,start_t,stop_t,frame_coords,x_raw,y_raw\n\
         game1.mp4,shot,3,5,8,\"(0, 0, 10, 10)\",1,1\n",
    )
    .unwrap();

    assert!(matches!(
        AnnotationCollection::load(&path),
        Err(Error::Data(_))
    ));
}

#[test]
fn test_load_rejects_malformed_row() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("bad.csv");
    fs::write(
        &path,
        format!(
            "{}\ngame1.mp4,shot,three,5,8,150,240,\"(0, 0, 1, 1)\",1,1\n",
            ANNOTATION_COLUMNS.join(",")
        ),
    )
    .unwrap();

    assert!(matches!(
        AnnotationCollection::load(&path),
        Err(Error::Data(_))
    ));
}

#[test]
fn test_load_rejects_padded_header() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("padded.csv");
    fs::write(
        &path,
        format!(
            "{}\ngame1.mp4,pass,2,1,3,30,90,\"(0, 0, 1, 1)\",4,5\n",
            ANNOTATION_COLUMNS.join(", ")
        ),
    )
    .unwrap();

    assert!(matches!(
        AnnotationCollection::load(&path),
        Err(Error::Data(_))
    ));
}

#[test]
fn test_load_rejects_inverted_interval_row() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("inverted.csv");
    fs::write(
        &path,
        format!(
            "{}\ngame1.mp4,shot,3,1,2,30,60,\"(0, 0, 1, 1)\",1,1\n\
             game1.mp4,shot,3,9,2,270,60,\"(0, 0, 1, 1)\",1,1\n",
            ANNOTATION_COLUMNS.join(",")
        ),
    )
    .unwrap();

    match AnnotationCollection::load(&path) {
        Err(Error::Data(msg)) => assert!(msg.contains("row 1"), "{}", msg),
        other => panic!("expected data error, got {:?}", other),
    }
}

#[cfg(unix)]
#[test]
fn test_rewrite_keeps_file_mode() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = tempdir().unwrap();
    let path = tmp.path().join("game1.csv");

    let mut collection = AnnotationCollection::load(&path).unwrap();
    collection.append(make_test_record("shot", 3, 5, 8)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();

    collection.delete(0).unwrap();
    assert_eq!(fs::metadata(&path).unwrap().permissions().mode() & 0o777, 0o640);

    collection.append(make_test_record("pass", 7, 10, 12)).unwrap();
    assert_eq!(fs::metadata(&path).unwrap().permissions().mode() & 0o777, 0o640);
}

#[test]
fn test_display_strings() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("game1.csv");

    let mut collection = AnnotationCollection::load(&path).unwrap();
    collection.append(make_test_record("shot", 3, 5, 8)).unwrap();
    collection.append(make_test_record("pass", 12, 61, 64)).unwrap();

    assert_eq!(
        collection.display_strings(),
        vec!["shot, 3, 5, 8".to_string(), "pass, 12, 61, 64".to_string()]
    );
}
