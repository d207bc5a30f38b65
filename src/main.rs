use csv::Writer;
use hifitime::Epoch;
use log::info;
use nalgebra as na;
use orbprop::coordinates::coordinate_transformation::{itrs_to_geodetic, j2000_to_itrs};
use orbprop::models::State;
use orbprop::physics::force_model::{ForceModel, Perturbation};
use orbprop::propagators::{KeplerPropagator, Propagator, RungeKutta4Propagator};
use std::error::Error;
use std::fs::{self, File};
use std::path::Path;

fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();

    // Sun-synchronous LEO, ~710 km altitude
    let initial_state = State::new(
        Epoch::from_gregorian_utc_at_midnight(2018, 12, 21),
        na::Vector3::new(-1117.913276, 73.093299, -7000.018272),
        na::Vector3::new(3.531365461, 6.583914964, -0.495649656),
    );

    let elements = initial_state.to_classical_elements();
    info!(
        "Initial orbit: a = {:.3} km, e = {:.6}, i = {:.3} deg, period = {:.1} s",
        elements.semi_major_axis,
        elements.eccentricity,
        elements.inclination.to_degrees(),
        elements.period()
    );

    let force_model = ForceModel::new()
        .with(Perturbation::J2)
        .with(Perturbation::J3)
        .with(Perturbation::J4)
        .with(Perturbation::SunGravity)
        .with(Perturbation::MoonGravity);

    let mut rk4 = RungeKutta4Propagator::with_force_model(initial_state, force_model);
    let mut kepler = KeplerPropagator::from_state(&initial_state);

    let interval = 60.0;
    let count = 24 * 60;
    let states = rk4.step(initial_state.epoch, interval, count);

    let output_dir = Path::new("output");
    fs::create_dir_all(output_dir)?;

    let file = File::create(output_dir.join("trajectory.csv"))?;
    let mut writer = Writer::from_writer(file);

    writer.write_record([
        "UTC Time",
        "Time (s)",
        "Position X (km)",
        "Position Y (km)",
        "Position Z (km)",
        "Velocity X (km/s)",
        "Velocity Y (km/s)",
        "Velocity Z (km/s)",
        "Longitude (deg)",
        "Latitude (deg)",
        "Altitude (km)",
        "Energy Error",
        "Kepler Difference (km)",
    ])?;

    let initial_energy = initial_state.specific_energy();

    for state in &states {
        let elapsed = (state.epoch - initial_state.epoch).to_seconds();
        let (itrs_position, _) = j2000_to_itrs(state);
        let (longitude, latitude, altitude) = itrs_to_geodetic(&itrs_position);

        let energy_error =
            (state.specific_energy() - initial_energy).abs() / initial_energy.abs();
        let kepler_difference = state.distance(&kepler.propagate(state.epoch));

        writer.write_record(&[
            state.epoch.to_string(),
            elapsed.to_string(),
            state.position.x.to_string(),
            state.position.y.to_string(),
            state.position.z.to_string(),
            state.velocity.x.to_string(),
            state.velocity.y.to_string(),
            state.velocity.z.to_string(),
            longitude.to_string(),
            latitude.to_string(),
            altitude.to_string(),
            energy_error.to_string(),
            kepler_difference.to_string(),
        ])?;
    }

    writer.flush()?;

    if let Some(last) = states.last() {
        info!(
            "Final state at {}: r = [{:.6}, {:.6}, {:.6}] km",
            last.epoch, last.position.x, last.position.y, last.position.z
        );
        info!(
            "RK4 vs two-body Kepler after 24 h: {:.3} km",
            last.distance(kepler.state())
        );
    }
    info!("Trajectory written to {}", output_dir.join("trajectory.csv").display());

    Ok(())
}
