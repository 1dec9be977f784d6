use retrojukebox::app::render_snapshot;
use retrojukebox::config::Settings;

fn seeded() -> Settings {
    let mut settings = Settings::default();
    settings.visualizer.seed = Some(42);
    settings
}

#[test]
fn snapshot_writes_png_of_requested_size() {
    let mut settings = seeded();
    settings.visualizer.mode = "equalizer".into();
    let frame = render_snapshot(&settings, 160, 90, 20, true).unwrap();
    assert_eq!((frame.width(), frame.height()), (160, 90));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("eq.png");
    frame.save_png(&path).unwrap();
    let decoded = image::open(&path).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (160, 90));
}

#[test]
fn seeded_snapshots_are_reproducible() {
    let mut settings = seeded();
    settings.visualizer.mode = "particles".into();
    settings.visualizer.effects = vec!["motion_blur".into()];
    let a = render_snapshot(&settings, 64, 64, 30, true).unwrap();
    let b = render_snapshot(&settings, 64, 64, 30, true).unwrap();
    assert_eq!(a.to_rgba_image(), b.to_rgba_image());
}

#[test]
fn zero_ticks_is_rejected_and_zero_size_is_empty() {
    assert!(render_snapshot(&seeded(), 64, 64, 0, true).is_err());
    assert!(render_snapshot(&seeded(), 0, 64, 3, true).unwrap().is_empty());
}
