use action_annotator::{Error, NormalizedPoint, TrackedBox, TrackingIndex};
use std::fs;
use tempfile::tempdir;

fn tracked(frame_index: u64, subject_id: i64, x: f64, y: f64, width: f64, height: f64) -> TrackedBox {
    TrackedBox {
        frame_index,
        subject_id,
        x,
        y,
        width,
        height,
    }
}

#[test]
fn test_hit_inside_and_outside_normalized_box() {
    let index = TrackingIndex::new(vec![tracked(10, 3, 0.1, 0.1, 0.2, 0.2)]).unwrap();

    assert_eq!(index.hit_test(NormalizedPoint::new(0.2, 0.2), 10, 1.0, 1.0), Some(3));
    assert_eq!(index.hit_test(NormalizedPoint::new(0.05, 0.05), 10, 1.0, 1.0), None);
}

#[test]
fn test_hit_requires_exact_frame() {
    let index = TrackingIndex::new(vec![tracked(10, 3, 0.1, 0.1, 0.2, 0.2)]).unwrap();

    assert_eq!(index.hit_test(NormalizedPoint::new(0.2, 0.2), 9, 1.0, 1.0), None);
    assert_eq!(index.hit_test(NormalizedPoint::new(0.2, 0.2), 11, 1.0, 1.0), None);
}

#[test]
fn test_edges_are_misses() {
    let index = TrackingIndex::new(vec![tracked(0, 1, 0.0, 0.0, 100.0, 100.0)]).unwrap();
    let (w, h) = (100.0, 100.0);

    for point in [
        NormalizedPoint::new(0.0, 0.5),
        NormalizedPoint::new(1.0, 0.5),
        NormalizedPoint::new(0.5, 0.0),
        NormalizedPoint::new(0.5, 1.0),
    ] {
        assert_eq!(index.hit_test(point, 0, w, h), None, "{:?}", point);
    }

    // One pixel inside each edge of a full-frame box.
    for point in [
        NormalizedPoint::new(0.01, 0.5),
        NormalizedPoint::new(0.99, 0.5),
        NormalizedPoint::new(0.5, 0.01),
        NormalizedPoint::new(0.5, 0.99),
    ] {
        assert_eq!(index.hit_test(point, 0, w, h), Some(1), "{:?}", point);
    }
}

#[test]
fn test_boxes_scale_by_video_dimensions() {
    // 1280x720 video, box from (640, 360) to (768, 504).
    let index = TrackingIndex::new(vec![tracked(4, 7, 640.0, 360.0, 128.0, 144.0)]).unwrap();

    assert_eq!(index.hit_test(NormalizedPoint::new(0.55, 0.6), 4, 1280.0, 720.0), Some(7));
    assert_eq!(index.hit_test(NormalizedPoint::new(0.45, 0.6), 4, 1280.0, 720.0), None);
    assert_eq!(index.hit_test(NormalizedPoint::new(0.55, 0.75), 4, 1280.0, 720.0), None);
}

#[test]
fn test_overlapping_boxes_first_in_table_order_wins() {
    let index = TrackingIndex::new(vec![
        tracked(2, 8, 0.0, 0.0, 0.5, 0.5),
        tracked(2, 4, 0.1, 0.1, 0.5, 0.5),
        tracked(3, 1, 0.0, 0.0, 1.0, 1.0),
    ])
    .unwrap();

    assert_eq!(index.hit_test(NormalizedPoint::new(0.3, 0.3), 2, 1.0, 1.0), Some(8));
    assert_eq!(index.hit_test(NormalizedPoint::new(0.55, 0.55), 2, 1.0, 1.0), Some(4));
    assert_eq!(index.boxes_at(2).count(), 2);
}

#[test]
fn test_rejects_non_positive_box() {
    let result = TrackingIndex::new(vec![tracked(0, 1, 0.0, 0.0, 0.0, 10.0)]);
    assert!(matches!(result, Err(Error::Data(_))));
}

#[test]
fn test_parse_table_ignores_extra_columns() {
    let text = "\
frame,id,x,y,w,h,conf,cls
1,3,10.5,20,30,40,0.9,0
1.0,4.0,100,100,50,50,0.8,0
2,3,12,22,30,40,0.9,0
";
    let index = TrackingIndex::from_reader(text.as_bytes()).unwrap();
    assert_eq!(index.len(), 3);

    let frame_one: Vec<_> = index.boxes_at(1).collect();
    assert_eq!(frame_one.len(), 2);
    assert_eq!(frame_one[0].subject_id, 3);
    assert_eq!(frame_one[0].x, 10.5);
    assert_eq!(frame_one[1].subject_id, 4);
}

#[test]
fn test_parse_rejects_missing_columns() {
    let text = "frame,id,x,y,w\n1,3,10,20,30\n";
    assert!(matches!(
        TrackingIndex::from_reader(text.as_bytes()),
        Err(Error::Data(_))
    ));

    let short_row = "frame,id,x,y,w,h\n1,3,10,20,30\n";
    assert!(matches!(
        TrackingIndex::from_reader(short_row.as_bytes()),
        Err(Error::Data(_))
    ));
}

#[test]
fn test_parse_rejects_non_numeric_geometry() {
    let text = "frame,id,x,y,w,h\n1,3,ten,20,30,40\n";
    assert!(matches!(
        TrackingIndex::from_reader(text.as_bytes()),
        Err(Error::Data(_))
    ));

    let fractional_frame = "frame,id,x,y,w,h\n1.5,3,10,20,30,40\n";
    assert!(matches!(
        TrackingIndex::from_reader(fractional_frame.as_bytes()),
        Err(Error::Data(_))
    ));
}

#[test]
fn test_parse_rejects_out_of_range_ids() {
    for row in ["1,1e30,10,20,30,40", "1,-1e30,10,20,30,40", "1e30,3,10,20,30,40"] {
        let text = format!("frame,id,x,y,w,h\n{}\n", row);
        assert!(
            matches!(TrackingIndex::from_reader(text.as_bytes()), Err(Error::Data(_))),
            "{}",
            row
        );
    }

    let large_id = "frame,id,x,y,w,h\n1,4294967296,10,20,30,40\n";
    let index = TrackingIndex::from_reader(large_id.as_bytes()).unwrap();
    assert_eq!(index.boxes_at(1).next().unwrap().subject_id, 4_294_967_296);
}

#[test]
fn test_open_missing_file_is_data_error() {
    let tmp = tempdir().unwrap();
    let result = TrackingIndex::open(&tmp.path().join("missing.txt"));
    assert!(matches!(result, Err(Error::Data(_))));
}

#[test]
fn test_open_from_disk() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("game1.txt");
    fs::write(&path, "frame,id,x,y,w,h\n0,1,0,0,10,10\n").unwrap();

    let index = TrackingIndex::open(&path).unwrap();
    assert_eq!(index.len(), 1);
    assert!(!index.is_empty());
}
