use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use xyspace::{
    config::SimConfig,
    engine::Engine,
    error::SimError,
    potential::Potential,
    wavepacket::Wavepacket,
};

fn engine_with(packet: Wavepacket, seed: u64) -> Engine {
    let mut engine = Engine::new(SimConfig::default(), Potential::None)
        .unwrap()
        .with_seed(seed);
    engine.initialize(&packet).unwrap();
    engine
}

#[test]
fn narrow_packet_is_found_under_the_detector() {
    // peaked on grid cell (32, 32)
    let packet = Wavepacket::default().center(3.2, 3.2).width(0.05);
    let base = engine_with(packet, 7);
    let p = base.measurement_probability(3.2, 3.2, 0.3).unwrap();
    assert!(p > 0.9, "p = {}", p);

    let mut engine = base.clone();
    let trials = 1000;
    let mut found = 0;
    for _ in 0..trials {
        engine.load_wavefunction(base.psi()).unwrap();
        let m = engine.measure(3.2, 3.2, 0.3).unwrap();
        assert!((m.probability - p).abs() < 1e-12);
        if m.found { found += 1; }
    }
    assert!(found as f64 > 0.85 * trials as f64, "found {} / {}", found, trials);
}

#[test]
fn found_rate_matches_born_probability() {
    let base = engine_with(Wavepacket::default(), 20240611);
    let (x, y, radius) = (3.3, 3.1, 0.2);
    let p = base.measurement_probability(x, y, radius).unwrap();
    assert!(p > 0.1 && p < 0.9, "p = {}", p);

    let mut engine = base.clone();
    let trials = 10_000;
    let mut found = 0_usize;
    for _ in 0..trials {
        engine.load_wavefunction(base.psi()).unwrap();
        if engine.measure(x, y, radius).unwrap().found { found += 1; }
    }
    let rate = found as f64 / trials as f64;
    let sigma = (p * (1.0 - p) / trials as f64).sqrt();
    assert!((rate - p).abs() < 5.0 * sigma, "rate {} vs p {} (σ = {})", rate, p, sigma);
}

#[test]
fn external_rng_is_deterministic() {
    let base = engine_with(Wavepacket::default(), 0);
    let run = || {
        let mut engine = base.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        (0..20)
            .map(|k| {
                let x = 1.0 + 0.25 * k as f64;
                engine.measure_with(x, 3.2, 0.4, &mut rng).unwrap().found
            })
            .collect::<Vec<bool>>()
    };
    assert_eq!(run(), run());
}

#[test]
fn repeated_measurements_keep_state_normalized() {
    let mut engine = engine_with(Wavepacket::default().momentum(3.0, -2.0), 5);
    for k in 0..50 {
        let x = 0.13 * k as f64;
        let y = 6.4 - 0.11 * k as f64;
        let m = engine.measure(x, y, 0.5).unwrap();
        assert!((0.0..=1.0).contains(&m.probability));
        assert_eq!(engine.last_measurement(), Some(m));
        assert!((engine.total_probability() - 1.0).abs() < 1e-9);
        engine.step_n(5);
    }
    assert!((engine.time() - 0.25).abs() < 1e-9);
}

#[test]
fn positive_collapse_localizes_at_the_detector() {
    let mut engine = engine_with(Wavepacket::default(), 1);
    // a hit far out in the tail of the packet
    engine.collapse(4.2, 3.2, 0.2, true).unwrap();
    assert!(engine.measurement_probability(4.2, 3.2, 0.2).unwrap() > 0.4);
    let near_origin = engine.measurement_probability(3.2, 3.2, 0.2).unwrap();
    assert!(near_origin < 0.01, "{}", near_origin);
}

#[test]
fn measurement_wraps_around_the_boundary() {
    // a packet sitting on the corner is seen by a detector at the opposite
    // corner of the domain
    let engine = engine_with(Wavepacket::default().center(6.3, 6.3).width(0.2), 3);
    let here = engine.measurement_probability(6.3, 6.3, 0.3).unwrap();
    let wrapped = engine.measurement_probability(6.3 - 6.4, 6.3 + 6.4, 0.3).unwrap();
    assert!((here - wrapped).abs() < 1e-12);
    let across = engine.measurement_probability(0.0, 0.0, 0.3).unwrap();
    assert!(across > 0.1, "{}", across);
}

#[test]
fn degenerate_collapse_is_reported() {
    let mut engine = engine_with(Wavepacket::default(), 2);
    let before = engine.psi().clone();
    match engine.collapse(3.2, 3.2, 1e9, false) {
        Err(SimError::CollapseDegenerate(err)) => assert!(err.0 < 1e-12),
        other => panic!("expected a degenerate collapse, got {:?}", other),
    }
    assert_eq!(engine.psi(), &before);
}
