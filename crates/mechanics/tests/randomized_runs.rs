use mechanics::Simulator;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use simcore::{
    ControllerConfig, InitialConditions, InputSignal, ModelType, PlantParams, SimulationConfig,
    Waveform,
};

fn random_config(rng: &mut StdRng, model: ModelType) -> SimulationConfig {
    let plant = PlantParams {
        trolley_mass: rng.gen_range(5.0..20.0),
        load_mass: rng.gen_range(20.0..100.0),
        trolley_damping: rng.gen_range(0.0..20.0),
        pendulum_damping: rng.gen_range(0.0..1.0),
        gravity: 9.81,
        rope_length: rng.gen_range(0.5..3.0),
        support_fraction: rng.gen_range(0.0..1.0),
    };
    let mut controller = ControllerConfig::pi(rng.gen_range(0.5..5.0), rng.gen_range(0.0..2.0));
    if rng.gen_bool(0.5) {
        controller = controller.with_anti_sway();
    }

    SimulationConfig::new(plant, 0.01, rng.gen_range(2.0..10.0))
        .with_model(model)
        .with_initial(InitialConditions {
            position: rng.gen_range(-1.0..1.0),
            angle: rng.gen_range(-0.2..0.2),
            angular_velocity: 0.0,
        })
        .with_controller(controller)
        .with_velocity_setpoint(InputSignal::waveform(
            Waveform::Piecewise,
            rng.gen_range(0.5..2.0),
        ))
        .with_applied_force(InputSignal::waveform(Waveform::Sine, rng.gen_range(-0.5..0.5)))
}

#[test]
fn test_random_anti_sway_runs_are_complete_and_finite() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..48 {
        let config = random_config(&mut rng, ModelType::AntiSway);
        let n = config.prepare().unwrap().len();
        let out = Simulator::run(&config).unwrap();

        for (name, series) in out.named_series() {
            assert_eq!(series.len(), n, "{} in {:?}", name, config);
        }
        assert_eq!(out.first_non_finite(), None, "{:?}", config);
    }
}

#[test]
fn test_runs_are_deterministic() {
    let mut rng = StdRng::seed_from_u64(7);
    let configs: Vec<SimulationConfig> = [ModelType::AntiSway, ModelType::Tracking]
        .into_iter()
        .cycle()
        .take(16)
        .map(|model| random_config(&mut rng, model))
        .collect();

    let batch = Simulator::run_batch(&configs);
    for (config, result) in configs.iter().zip(batch) {
        assert_eq!(Simulator::run(config).unwrap(), result.unwrap());
    }
}
