use mechanics::Simulator;
use plotters::prelude::*;
use simcore::{ControllerConfig, InputSignal, PlantParams, SimulationConfig, Waveform};

fn bounds(series: &[&[f64]]) -> (f64, f64) {
    let lo = series
        .iter()
        .flat_map(|s| s.iter().cloned())
        .fold(f64::INFINITY, |a, b| a.min(b));
    let hi = series
        .iter()
        .flat_map(|s| s.iter().cloned())
        .fold(f64::NEG_INFINITY, |a, b| a.max(b));
    if hi > lo {
        (lo, hi)
    } else {
        (lo - 1.0, hi + 1.0)
    }
}

fn draw_comparison(
    filename: &str,
    title: &str,
    y_label: &str,
    time: &[f64],
    plain: &[f64],
    damped: &[f64],
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(filename, (1024, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    let (y_min, y_max) = bounds(&[plain, damped]);
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("Arial", 28))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(time[0]..time[time.len() - 1], y_min..y_max)?;

    chart.configure_mesh().x_desc("time (s)").y_desc(y_label).draw()?;

    chart
        .draw_series(LineSeries::new(
            time.iter().cloned().zip(plain.iter().cloned()),
            &RED,
        ))?
        .label("PI only")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.filled()));

    chart
        .draw_series(LineSeries::new(
            time.iter().cloned().zip(damped.iter().cloned()),
            &BLUE,
        ))?
        .label("PI + anti-sway")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.filled()));

    chart.configure_series_labels().border_style(&BLACK).draw()?;

    root.present()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 70 kg rig on a 2 m rope, trolley asked to reach 1 m/s a quarter of the way in
    let base = SimulationConfig::new(PlantParams::default(), 0.01, 20.0)
        .with_velocity_setpoint(InputSignal::waveform(Waveform::Step, 1.0));

    let plain = Simulator::run(&base.clone().with_controller(ControllerConfig::pi(5.0, 2.0)))?;
    let damped = Simulator::run(
        &base.with_controller(ControllerConfig::pi(5.0, 2.0).with_anti_sway()),
    )?;

    draw_comparison(
        "anti_sway_angle.png",
        "Rope angle",
        "theta (rad)",
        plain.time(),
        plain.angle(),
        damped.angle(),
    )?;
    draw_comparison(
        "anti_sway_velocity.png",
        "Trolley velocity",
        "dX (m/s)",
        plain.time(),
        plain.trolley_velocity(),
        damped.trolley_velocity(),
    )?;
    draw_comparison(
        "anti_sway_force.png",
        "Motor force",
        "F (N)",
        plain.time(),
        plain.trolley_force(),
        damped.trolley_force(),
    )?;

    println!(
        "peak swing: {:.4} rad without anti-sway, {:.4} rad with",
        simcore::peak_abs(plain.angle()),
        simcore::peak_abs(damped.angle())
    );
    Ok(())
}
