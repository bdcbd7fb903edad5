use ndarray as nd;
use num_complex::Complex64 as C64;
use xyspace::{
    config::{ Boundary, SimConfig },
    engine::{ Engine, Snapshot },
    error::{ PotentialError, SimError },
    grid::ComplexGrid,
    potential::{ Bump, Potential, PotentialKind },
    wavepacket::Wavepacket,
};

fn max_diff(a: &ComplexGrid, b: &ComplexGrid) -> f64 {
    nd::Zip::from(a.view()).and(b.view())
        .fold(0.0, |acc: f64, p, q| acc.max((p - q).norm()))
}

fn running_engine() -> Engine {
    let config = SimConfig { grid_size: 32, dx: 0.2, ..Default::default() };
    let potential = Potential::default_for(PotentialKind::DoubleWell, &config);
    let mut engine = Engine::new(config, potential).unwrap().with_seed(4);
    engine.initialize(&Wavepacket::default().center(2.0, 3.0).momentum(2.0, 1.0)).unwrap();
    engine.step_n(25);
    engine
}

#[test]
fn snapshot_survives_json_and_continues() {
    let mut engine = running_engine();
    let json = serde_json::to_string(&engine.snapshot()).unwrap();
    let snapshot: Snapshot = serde_json::from_str(&json).unwrap();
    let mut restored = Engine::from_snapshot(snapshot).unwrap();

    assert_eq!(restored.config(), engine.config());
    assert_eq!(restored.potential().kind(), PotentialKind::DoubleWell);
    assert!((restored.time() - engine.time()).abs() < 1e-15);
    assert!(max_diff(restored.psi(), engine.psi()) < 1e-14);

    engine.step_n(25);
    restored.step_n(25);
    assert!(max_diff(restored.psi(), engine.psi()) < 1e-12);
    assert!((restored.time() - engine.time()).abs() < 1e-12);
}

#[test]
fn snapshot_in_memory_restores_state() {
    let engine = running_engine();
    let snapshot = engine.snapshot();
    let restored = Engine::from_snapshot(snapshot.clone()).unwrap().snapshot();
    assert_eq!(restored.config, snapshot.config);
    assert_eq!(restored.potential, snapshot.potential);
    assert_eq!(restored.potential_values, snapshot.potential_values);
    assert_eq!(restored.time, snapshot.time);
    let psi = ComplexGrid::from_array(snapshot.psi).unwrap();
    let restored_psi = ComplexGrid::from_array(restored.psi).unwrap();
    assert!(max_diff(&restored_psi, &psi) < 1e-15);
}

#[test]
fn snapshot_rejects_mismatched_buffers() {
    let good = running_engine().snapshot();

    let mut bad = good.clone();
    bad.psi = nd::Array2::from_elem((16, 16), C64::new(1.0, 0.0));
    assert!(matches!(Engine::from_snapshot(bad), Err(SimError::Shape(_))));

    let mut bad = good.clone();
    bad.potential_values = nd::Array2::zeros((32, 16));
    assert!(matches!(Engine::from_snapshot(bad), Err(SimError::Shape(_))));

    let mut bad = good.clone();
    bad.psi.fill(C64::new(0.0, 0.0));
    assert!(matches!(Engine::from_snapshot(bad), Err(SimError::DegenerateWavepacket(_))));

    let mut bad = good;
    bad.config.grid_size = 24;
    assert!(matches!(Engine::from_snapshot(bad), Err(SimError::Config(_))));
}

#[test]
fn snapshot_state_is_renormalized() {
    let mut snapshot = running_engine().snapshot();
    let expected = ComplexGrid::from_array(snapshot.psi.clone()).unwrap();
    snapshot.psi.mapv_inplace(|q| q * 3.0);
    let mut restored = Engine::from_snapshot(snapshot).unwrap();
    assert!((restored.total_probability() - 1.0).abs() < 1e-12);
    assert!(max_diff(restored.psi(), &expected) < 1e-14);
    restored.step();
    assert!((restored.total_probability() - 1.0).abs() < 1e-12);
}

#[test]
fn snapshot_rejects_bad_clock() {
    let good = running_engine().snapshot();
    for time in [-5.0, f64::NAN, f64::INFINITY] {
        let mut bad = good.clone();
        bad.time = time;
        assert!(
            matches!(Engine::from_snapshot(bad), Err(SimError::BadSnapshotTime(_))),
            "time = {}", time,
        );
    }
    let mut zero = good;
    zero.time = 0.0;
    assert!(Engine::from_snapshot(zero).is_ok());
}

#[test]
fn snapshot_rejects_bad_potential() {
    let good = running_engine().snapshot();

    let mut bad = good.clone();
    bad.potential_values[[0, 0]] = f64::NAN;
    assert!(matches!(
        Engine::from_snapshot(bad),
        Err(SimError::Potential(PotentialError::NonFinite(_))),
    ));

    let mut bad = good.clone();
    bad.potential_values[[7, 3]] += 1.0;
    match Engine::from_snapshot(bad) {
        Err(SimError::SnapshotPotentialMismatch { x, y, .. }) => assert_eq!((x, y), (3, 7)),
        other => panic!("expected a potential mismatch, got {:?}", other.map(|_| ())),
    }

    // descriptor and values swapped for another kind
    let mut bad = good.clone();
    bad.potential = Potential::None;
    assert!(matches!(
        Engine::from_snapshot(bad),
        Err(SimError::SnapshotPotentialMismatch { .. }),
    ));

    let mut bad = good;
    bad.potential = Potential::Barrier(Bump { center: (1.0, 1.0), width: -0.5, strength: 1.0 });
    assert!(matches!(
        Engine::from_snapshot(bad),
        Err(SimError::Potential(PotentialError::BadWidth(_))),
    ));
}

#[test]
fn config_fills_in_defaults() {
    let config: SimConfig = serde_json::from_str(r#"{ "grid_size": 32, "dt": 0.005 }"#).unwrap();
    assert_eq!(
        config,
        SimConfig { grid_size: 32, dt: 0.005, ..Default::default() },
    );
    assert_eq!(config.boundary, Boundary::Periodic);

    let json = serde_json::to_string(&SimConfig::default()).unwrap();
    assert!(json.contains(r#""boundary":"periodic""#), "{}", json);
    let back: SimConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, SimConfig::default());
}

#[test]
fn potential_is_tagged_by_type() {
    let barrier: Potential = serde_json::from_str(
        r#"{ "type": "barrier", "center": [1.0, 2.0], "width": 0.25, "strength": 5.0 }"#
    ).unwrap();
    assert_eq!(
        barrier,
        Potential::Barrier(Bump { center: (1.0, 2.0), width: 0.25, strength: 5.0 }),
    );

    let none: Potential = serde_json::from_str(r#"{ "type": "none" }"#).unwrap();
    assert_eq!(none, Potential::None);

    let config = SimConfig::default();
    let well = Potential::default_for(PotentialKind::DoubleWell, &config);
    let json = serde_json::to_string(&well).unwrap();
    assert!(json.contains(r#""type":"doubleWell""#), "{}", json);

    assert!(serde_json::from_str::<Potential>(r#"{ "type": "coulomb" }"#).is_err());
}
