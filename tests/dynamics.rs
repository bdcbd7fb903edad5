use proptest::prelude::*;
use xyspace::{
    config::SimConfig,
    engine::Engine,
    observables::{ periodic_mean_position, position_variance, probability_where },
    potential::{ Potential, PotentialKind },
    wavepacket::Wavepacket,
};

fn scenario_config() -> SimConfig {
    SimConfig { grid_size: 64, dx: 0.1, dt: 0.001, hbar: 1.0, mass: 1.0, ..Default::default() }
}

fn spread(engine: &Engine) -> f64 {
    let (vx, vy) = position_variance(engine.psi(), engine.dx());
    vx + vy
}

#[test]
fn initialize_normalizes() {
    let mut engine = Engine::new(scenario_config(), Potential::None).unwrap();
    engine.initialize(
        &Wavepacket::default().center(3.2, 3.2).width(1.0).momentum(0.0, 0.0)
    ).unwrap();
    assert!((engine.total_probability() - 1.0).abs() < 1e-9);
    assert_eq!(engine.time(), 0.0);
}

#[test]
fn free_packet_disperses_without_losing_norm() {
    let mut engine = Engine::new(scenario_config(), Potential::None).unwrap();
    engine.initialize(&Wavepacket::default().center(3.2, 3.2).width(1.0)).unwrap();
    let norm0 = engine.total_probability();
    let start = spread(&engine);
    engine.step_n(100);
    assert!((engine.total_probability() - norm0).abs() < 1e-6);
    let end = spread(&engine);
    assert!(end > start, "variance did not grow: {} -> {}", start, end);
    assert!((engine.time() - 0.1).abs() < 1e-9);
}

#[test]
fn packet_wraps_around_the_boundary() {
    let mut engine = Engine::new(scenario_config(), Potential::None).unwrap();
    // v = p / m = 20; after t = 0.1 the center moves from 4.8 to 6.8 ≡ 0.4
    engine.initialize(
        &Wavepacket::default().center(4.8, 3.2).width(0.32).momentum(20.0, 0.0)
    ).unwrap();
    let norm0 = engine.total_probability();
    engine.step_n(100);
    assert!((engine.total_probability() - norm0).abs() < 1e-9);
    let (mx, my) = periodic_mean_position(engine.psi(), engine.dx());
    assert!((mx - 0.4).abs() < 0.05, "mean x = {}", mx);
    assert!((my - 3.2).abs() < 0.05, "mean y = {}", my);
    let near_left_edge = probability_where(engine.psi(), engine.dx(), |x, _| x < 1.6 || x >= 6.0);
    assert!(near_left_edge > 0.95, "{}", near_left_edge);
    let near_start = probability_where(engine.psi(), engine.dx(), |x, _| (4.0..5.6).contains(&x));
    assert!(near_start < 0.01, "{}", near_start);
}

#[test]
fn bound_packet_stays_bound() {
    // t = 2: a free packet spreads over the whole domain, a trapped one does not
    let config = SimConfig { time_scale: 10.0, ..scenario_config() };
    let packet = Wavepacket::default().center(3.2, 3.2).width(0.3);
    let inner = |engine: &Engine| {
        probability_where(engine.psi(), engine.dx(), |x, y| {
            (x - 3.2).powi(2) + (y - 3.2).powi(2) < 3.0_f64.powi(2)
        })
    };

    let mut trapped
        = Engine::new(config, Potential::default_for(PotentialKind::Harmonic, &config))
        .unwrap();
    trapped.initialize(&packet).unwrap();
    trapped.step_n(200);
    assert!(inner(&trapped) > 0.99, "{}", inner(&trapped));

    let mut free = Engine::new(config, Potential::None).unwrap();
    free.initialize(&packet).unwrap();
    free.step_n(200);
    assert!(inner(&free) < 0.9, "{}", inner(&free));
}

fn kind_strategy() -> impl Strategy<Value = PotentialKind> {
    prop::sample::select(PotentialKind::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    // any center in the domain and any width down to one grid spacing
    #[test]
    fn initialize_normalizes_any_packet(
        cx in 0.0_f64..6.4,
        cy in 0.0_f64..6.4,
        width in 0.1_f64..3.0,
        px in -30.0_f64..30.0,
        py in -30.0_f64..30.0,
    ) {
        let mut engine = Engine::new(scenario_config(), Potential::None).unwrap();
        engine.step_n(3);
        engine.initialize(
            &Wavepacket::default().center(cx, cy).width(width).momentum(px, py)
        ).unwrap();
        prop_assert!((engine.total_probability() - 1.0).abs() < 1e-9);
        prop_assert_eq!(engine.time(), 0.0);
    }

    #[test]
    fn steps_are_unitary(
        kind in kind_strategy(),
        steps in 1_usize..=500,
        px in -15.0_f64..15.0,
        py in -15.0_f64..15.0,
        time_scale in 0.5_f64..4.0,
    ) {
        let config = SimConfig { grid_size: 32, dx: 0.2, time_scale, ..Default::default() };
        let mut engine = Engine::new(config, Potential::default_for(kind, &config)).unwrap();
        engine.initialize(&Wavepacket::default().momentum(px, py)).unwrap();
        let before = engine.total_probability();
        engine.step_n(steps);
        prop_assert!((engine.total_probability() - before).abs() < 1e-6);
    }
}
