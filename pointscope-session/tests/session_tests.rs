//! End-to-end session tests: import, save, workers and event draining

use pointscope_core::object_color;
use pointscope_session::{Modifiers, Session, SessionEvent, ToolKind};
use std::fs;
use std::path::Path;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn write_line_cloud(path: &str, xs: &[f32]) {
    let mut body = String::new();
    for &x in xs {
        body.push_str(&format!("{x} 0 0\n"));
    }
    fs::write(path, body).unwrap();
}

#[test]
fn test_import_skips_unrecognized_files() {
    let dir = "session_import_mixed_dir";
    fs::create_dir_all(dir).unwrap();
    write_line_cloud(&format!("{dir}/a.xyz"), &[0.0, 1.0, 2.0]);
    write_line_cloud(&format!("{dir}/b.xyz"), &[0.0, 1.0]);
    fs::write(format!("{dir}/c.txt"), "not a cloud\n").unwrap();

    let mut session = Session::new();
    let imported = session.import_directory(Path::new(dir)).unwrap();
    assert_eq!(imported, 2);

    let rows = session.rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].index, 0);
    assert_eq!(rows[1].index, 1);
    assert_eq!(rows[0].vertex_count, 3);
    assert_eq!(rows[1].vertex_count, 2);
    assert_eq!(rows[0].color, object_color(0));
    assert_eq!(rows[1].color, object_color(1));

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn test_import_keeps_indices_dense_past_bad_files() {
    let dir = "session_import_dense_dir";
    fs::create_dir_all(dir).unwrap();
    write_line_cloud(&format!("{dir}/a.xyz"), &[0.0]);
    fs::write(format!("{dir}/m.xyz"), "this is not numeric\n").unwrap();
    write_line_cloud(&format!("{dir}/z.xyz"), &[0.0, 1.0]);

    let mut session = Session::new();
    assert_eq!(session.import_directory(Path::new(dir)).unwrap(), 2);

    // the bad file is skipped without burning an index
    let set = session.sample_set();
    assert_eq!(set.get(0).unwrap().name(), "a");
    assert_eq!(set.get(1).unwrap().name(), "z");

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn test_import_missing_dir_leaves_session_untouched() {
    let dir = "session_import_first_dir";
    fs::create_dir_all(dir).unwrap();
    write_line_cloud(&format!("{dir}/a.xyz"), &[0.0, 1.0]);

    let mut session = Session::new();
    session.import_directory(Path::new(dir)).unwrap();
    session.select_sample(0).unwrap();

    assert!(session
        .import_directory(Path::new("no_such_import_dir"))
        .is_err());
    assert_eq!(session.sample_set().len(), 1);
    assert_eq!(session.selected_sample(), Some(0));

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn test_save_and_reimport_roundtrip() {
    let dir = "session_save_src_dir";
    let out = "session_save_out_dir";
    fs::create_dir_all(dir).unwrap();
    fs::create_dir_all(out).unwrap();
    write_line_cloud(&format!("{dir}/scan0.xyz"), &[0.0, 1.0, 2.0]);
    write_line_cloud(&format!("{dir}/scan1.xyz"), &[5.0]);

    let mut session = Session::new();
    session.import_directory(Path::new(dir)).unwrap();
    session.save_to_directory(Path::new(out)).unwrap();

    let mut reloaded = Session::new();
    assert_eq!(reloaded.import_directory(Path::new(out)).unwrap(), 2);
    let rows = reloaded.rows();
    assert_eq!(rows[0].vertex_count, 3);
    assert_eq!(rows[1].vertex_count, 1);

    fs::remove_dir_all(dir).unwrap();
    fs::remove_dir_all(out).unwrap();
}

#[test]
fn test_scan_worker_appends_through_poll() {
    init_logging();
    let dir = "session_scan_dir";
    fs::create_dir_all(dir).unwrap();
    write_line_cloud(&format!("{dir}/a.xyz"), &[0.0, 1.0]);
    write_line_cloud(&format!("{dir}/b.xyz"), &[0.0]);

    let mut session = Session::new();
    let handle = session.spawn_directory_scan(dir.into());
    handle.join().expect("scan worker panicked");

    let events = session.poll_events();
    assert_eq!(events, vec![SessionEvent::SamplesScanned { added: 2 }]);
    assert_eq!(session.sample_set().len(), 2);
    // nothing left in the channel
    assert!(session.poll_events().is_empty());

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn test_clustering_worker_end_to_end() {
    init_logging();
    let dir = "session_cluster_dir";
    fs::create_dir_all(dir).unwrap();
    let xs: Vec<f32> = (0..8)
        .map(|i| i as f32 * 0.01)
        .chain((0..8).map(|i| 100.0 + i as f32 * 0.01))
        .collect();
    write_line_cloud(&format!("{dir}/blob.xyz"), &xs);

    let mut session = Session::new();
    session.import_directory(Path::new(dir)).unwrap();

    // refused without a selection
    assert!(session.spawn_clustering(2).is_none());

    session.select_sample(0).unwrap();
    let handle = session.spawn_clustering(2).expect("no worker spawned");
    handle.join().expect("clustering worker panicked");

    let events = session.poll_events();
    assert_eq!(
        events,
        vec![SessionEvent::ClusteringFinished {
            sample_idx: 0,
            clusters: 2
        }]
    );

    let sample = session.sample_set().get(0).unwrap();
    let guard = sample.lock();
    assert!(guard.points().iter().all(|p| p.label < 2));

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn test_normal_worker_end_to_end() {
    init_logging();
    let dir = "session_normals_dir";
    fs::create_dir_all(dir).unwrap();
    let mut body = String::new();
    for i in 0..5 {
        for j in 0..5 {
            body.push_str(&format!("{i} {j} 0\n"));
        }
    }
    fs::write(format!("{dir}/plane.xyz"), body).unwrap();

    let mut session = Session::new();
    session.import_directory(Path::new(dir)).unwrap();
    session.select_sample(0).unwrap();

    let handle = session.spawn_normal_estimation(6).expect("no worker spawned");
    handle.join().expect("normal worker panicked");

    assert_eq!(
        session.poll_events(),
        vec![SessionEvent::NormalsFinished { sample_idx: 0 }]
    );

    let sample = session.sample_set().get(0).unwrap();
    let guard = sample.lock();
    // flat plane, so every normal is parallel to z
    assert!(guard.points().iter().all(|p| p.normal.z.abs() > 0.9));

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn test_delete_picked_vertices_through_session() {
    let dir = "session_delete_dir";
    fs::create_dir_all(dir).unwrap();
    write_line_cloud(&format!("{dir}/line.xyz"), &[0.0, 1.0, 2.0, 3.0]);

    let mut session = Session::new();
    session.import_directory(Path::new(dir)).unwrap();

    // no Select tool active yet
    assert_eq!(session.delete_picked_vertices().unwrap(), 0);

    session.select_sample(0).unwrap();
    session.set_tool_mode(ToolKind::Select);
    let press = pointscope_session::CursorEvent {
        screen: (0.0, 0.0),
        world: Some(pointscope_core::Point3f::new(1.1, 0.0, 0.0)),
    };
    let release = pointscope_session::CursorEvent {
        screen: (0.0, 0.0),
        world: Some(pointscope_core::Point3f::new(2.9, 0.0, 0.0)),
    };
    session.handle_mouse_press(&press);
    session.handle_mouse_release(&release);

    assert_eq!(session.delete_picked_vertices().unwrap(), 2);
    assert_eq!(session.rows()[0].vertex_count, 2);

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn test_wheel_chords_route_through_session() {
    let mut session = Session::new();
    session.handle_wheel(
        3,
        Modifiers {
            ctrl: true,
            alt: false,
            shift: false,
        },
    );
    assert_eq!(session.canvas().config().point_size(), 5.0);

    session.handle_wheel(
        2,
        Modifiers {
            ctrl: false,
            alt: true,
            shift: false,
        },
    );
    assert!((session.canvas().config().step().z - 0.2).abs() < 1e-6);
}
