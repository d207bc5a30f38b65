//! Composable perturbation force model.
//!
//! Point-mass Earth gravity is always evaluated and cannot be switched off.
//! Every other term is an entry of [`Perturbations`], off by default, and the
//! enabled ones are summed in the fixed order of [`Perturbation::ALL`].
//!
//! The non-spherical Earth comes in two forms that replace each other: the
//! closed-form J2, J3 and J4 zonals, or the EGM2008 spherical-harmonic field
//! truncated to a chosen degree and order.

use super::drag::drag_acceleration;
use super::dynamics::EquationsOfMotion;
use super::geopotential::{earth_gravity_acceleration, egm2008};
use super::gravity::{gravity_acceleration, j2_acceleration, j3_acceleration, j4_acceleration};
use super::solar_radiation::solar_radiation_acceleration;
use super::third_body::{moon_gravity, sun_gravity};
use crate::config::spacecraft::SpacecraftParameters;
use hifitime::Epoch;
use log::{debug, warn};
use nalgebra as na;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Perturbation {
    /// Spherical-harmonic field; already contains the zonal terms.
    EarthGravity,
    J2,
    J3,
    J4,
    SunGravity,
    MoonGravity,
    SolarRadiation,
    AtmosphericDrag,
}

impl Perturbation {
    /// Evaluation order of the optional terms.
    pub const ALL: [Perturbation; 8] = [
        Perturbation::EarthGravity,
        Perturbation::J2,
        Perturbation::J3,
        Perturbation::J4,
        Perturbation::SunGravity,
        Perturbation::MoonGravity,
        Perturbation::SolarRadiation,
        Perturbation::AtmosphericDrag,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Perturbation::EarthGravity => "Earth gravity field",
            Perturbation::J2 => "J2",
            Perturbation::J3 => "J3",
            Perturbation::J4 => "J4",
            Perturbation::SunGravity => "Sun gravity",
            Perturbation::MoonGravity => "Moon gravity",
            Perturbation::SolarRadiation => "Solar radiation pressure",
            Perturbation::AtmosphericDrag => "Atmospheric drag",
        }
    }

    fn term(&self) -> TermFn {
        match self {
            Perturbation::EarthGravity => earth_gravity_term,
            Perturbation::J2 => j2_term,
            Perturbation::J3 => j3_term,
            Perturbation::J4 => j4_term,
            Perturbation::SunGravity => sun_term,
            Perturbation::MoonGravity => moon_term,
            Perturbation::SolarRadiation => radiation_term,
            Perturbation::AtmosphericDrag => drag_term,
        }
    }
}

impl fmt::Display for Perturbation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

type TermFn = fn(&ForceModel, &Epoch, &na::Vector3<f64>, &na::Vector3<f64>) -> na::Vector3<f64>;

fn earth_gravity_term(
    model: &ForceModel,
    epoch: &Epoch,
    r: &na::Vector3<f64>,
    _: &na::Vector3<f64>,
) -> na::Vector3<f64> {
    earth_gravity_acceleration(epoch, r, model.gravity_degree, model.gravity_order)
}

fn j2_term(
    _: &ForceModel,
    _: &Epoch,
    r: &na::Vector3<f64>,
    _: &na::Vector3<f64>,
) -> na::Vector3<f64> {
    j2_acceleration(r)
}

fn j3_term(
    _: &ForceModel,
    _: &Epoch,
    r: &na::Vector3<f64>,
    _: &na::Vector3<f64>,
) -> na::Vector3<f64> {
    j3_acceleration(r)
}

fn j4_term(
    _: &ForceModel,
    _: &Epoch,
    r: &na::Vector3<f64>,
    _: &na::Vector3<f64>,
) -> na::Vector3<f64> {
    j4_acceleration(r)
}

fn sun_term(
    _: &ForceModel,
    epoch: &Epoch,
    r: &na::Vector3<f64>,
    _: &na::Vector3<f64>,
) -> na::Vector3<f64> {
    sun_gravity(epoch, r)
}

fn moon_term(
    _: &ForceModel,
    epoch: &Epoch,
    r: &na::Vector3<f64>,
    _: &na::Vector3<f64>,
) -> na::Vector3<f64> {
    moon_gravity(epoch, r)
}

fn radiation_term(
    model: &ForceModel,
    epoch: &Epoch,
    r: &na::Vector3<f64>,
    _: &na::Vector3<f64>,
) -> na::Vector3<f64> {
    solar_radiation_acceleration(&model.spacecraft, epoch, r)
}

fn drag_term(
    model: &ForceModel,
    _: &Epoch,
    r: &na::Vector3<f64>,
    v: &na::Vector3<f64>,
) -> na::Vector3<f64> {
    drag_acceleration(&model.spacecraft, r, v)
}

/// Switches for the optional force terms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Perturbations {
    pub earth_gravity: bool,
    pub j2: bool,
    pub j3: bool,
    pub j4: bool,
    pub sun_gravity: bool,
    pub moon_gravity: bool,
    pub solar_radiation: bool,
    pub atmospheric_drag: bool,
}

impl Perturbations {
    pub fn is_enabled(&self, perturbation: Perturbation) -> bool {
        match perturbation {
            Perturbation::EarthGravity => self.earth_gravity,
            Perturbation::J2 => self.j2,
            Perturbation::J3 => self.j3,
            Perturbation::J4 => self.j4,
            Perturbation::SunGravity => self.sun_gravity,
            Perturbation::MoonGravity => self.moon_gravity,
            Perturbation::SolarRadiation => self.solar_radiation,
            Perturbation::AtmosphericDrag => self.atmospheric_drag,
        }
    }

    pub fn set(&mut self, perturbation: Perturbation, enabled: bool) {
        let flag = match perturbation {
            Perturbation::EarthGravity => &mut self.earth_gravity,
            Perturbation::J2 => &mut self.j2,
            Perturbation::J3 => &mut self.j3,
            Perturbation::J4 => &mut self.j4,
            Perturbation::SunGravity => &mut self.sun_gravity,
            Perturbation::MoonGravity => &mut self.moon_gravity,
            Perturbation::SolarRadiation => &mut self.solar_radiation,
            Perturbation::AtmosphericDrag => &mut self.atmospheric_drag,
        };
        *flag = enabled;
    }
}

/// Force model configuration: which terms are summed, the truncation of the
/// harmonic field, and the spacecraft parameters the non-gravitational terms
/// need.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceModel {
    perturbations: Perturbations,
    gravity_degree: usize,
    gravity_order: usize,
    spacecraft: SpacecraftParameters,
}

impl ForceModel {
    /// Two-body gravity only.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_perturbations(perturbations: Perturbations) -> Self {
        Self {
            perturbations,
            ..Self::default()
        }
    }

    /// Builder form of [`ForceModel::enable`].
    pub fn with(mut self, perturbation: Perturbation) -> Self {
        self.enable(perturbation);
        self
    }

    pub fn perturbations(&self) -> &Perturbations {
        &self.perturbations
    }

    pub fn spacecraft(&self) -> &SpacecraftParameters {
        &self.spacecraft
    }

    pub fn set_spacecraft(&mut self, spacecraft: SpacecraftParameters) {
        debug!("Force model spacecraft set to {:?}", spacecraft);
        self.spacecraft = spacecraft;
    }

    pub fn is_enabled(&self, perturbation: Perturbation) -> bool {
        self.perturbations.is_enabled(perturbation)
    }

    pub fn enable(&mut self, perturbation: Perturbation) {
        debug!("Enabling force model term: {}", perturbation);
        self.perturbations.set(perturbation, true);
    }

    pub fn disable(&mut self, perturbation: Perturbation) {
        debug!("Disabling force model term: {}", perturbation);
        self.perturbations.set(perturbation, false);
    }

    /// Back to two-body gravity only. Spacecraft parameters are kept.
    pub fn clear(&mut self) {
        debug!("Clearing force model");
        self.perturbations = Perturbations::default();
        self.gravity_degree = 0;
        self.gravity_order = 0;
    }

    /// Zonal harmonics up to `degree`: 2 enables J2, 3 adds J3, 4 and above
    /// add J4. Lower degrees disable all three. Switches the harmonic field off.
    pub fn set_zonal_harmonics(&mut self, degree: usize) {
        self.perturbations.set(Perturbation::EarthGravity, false);
        self.perturbations.set(Perturbation::J2, degree >= 2);
        self.perturbations.set(Perturbation::J3, degree >= 3);
        self.perturbations.set(Perturbation::J4, degree >= 4);
        debug!("Zonal harmonics set to degree {}", degree.min(4));
    }

    /// EGM2008 field truncated to `degree` and `order` (order is capped at the
    /// degree, both at the model's maximum of 70). Degrees below 2 leave
    /// two-body gravity only. Switches the closed-form zonals off.
    pub fn set_earth_gravity(&mut self, degree: usize, order: usize) {
        let max_degree = egm2008().max_degree();
        if degree > max_degree {
            warn!(
                "Gravity degree {} exceeds the model maximum, using {}",
                degree, max_degree
            );
        }
        self.gravity_degree = degree.min(max_degree);
        self.gravity_order = order.min(self.gravity_degree);

        self.perturbations.set(Perturbation::EarthGravity, self.gravity_degree >= 2);
        for zonal in [Perturbation::J2, Perturbation::J3, Perturbation::J4] {
            self.perturbations.set(zonal, false);
        }
        debug!(
            "Earth gravity set to degree {} order {}",
            self.gravity_degree, self.gravity_order
        );
    }

    /// Degree and order of the harmonic field.
    pub fn earth_gravity(&self) -> (usize, usize) {
        (self.gravity_degree, self.gravity_order)
    }

    pub fn set_third_body(&mut self, sun: bool, moon: bool) {
        self.perturbations.set(Perturbation::SunGravity, sun);
        self.perturbations.set(Perturbation::MoonGravity, moon);
        debug!("Third body gravity: sun = {}, moon = {}", sun, moon);
    }

    pub fn set_solar_radiation(&mut self, enabled: bool) {
        self.perturbations.set(Perturbation::SolarRadiation, enabled);
    }

    pub fn set_atmospheric_drag(&mut self, enabled: bool) {
        self.perturbations.set(Perturbation::AtmosphericDrag, enabled);
    }

    /// Enabled optional terms in evaluation order.
    pub fn enabled_terms(&self) -> Vec<Perturbation> {
        Perturbation::ALL
            .iter()
            .copied()
            .filter(|p| self.is_enabled(*p))
            .collect()
    }

    /// Total acceleration in km/s².
    pub fn acceleration(
        &self,
        epoch: &Epoch,
        position: &na::Vector3<f64>,
        velocity: &na::Vector3<f64>,
    ) -> na::Vector3<f64> {
        Perturbation::ALL
            .iter()
            .filter(|p| self.is_enabled(**p))
            .map(|p| p.term()(self, epoch, position, velocity))
            .fold(gravity_acceleration(position), |acc, a| acc + a)
    }

    /// Per-term contributions, two-body first.
    pub fn acceleration_breakdown(
        &self,
        epoch: &Epoch,
        position: &na::Vector3<f64>,
        velocity: &na::Vector3<f64>,
    ) -> Vec<(&'static str, na::Vector3<f64>)> {
        let mut terms = vec![("Two-body", gravity_acceleration(position))];
        terms.extend(
            self.enabled_terms()
                .into_iter()
                .map(|p| (p.name(), p.term()(self, epoch, position, velocity))),
        );
        terms
    }

    /// State derivative: the velocity followed by the total acceleration.
    pub fn derivative(&self, epoch: &Epoch, posvel: &na::Vector6<f64>) -> na::Vector6<f64> {
        let position: na::Vector3<f64> = posvel.fixed_rows::<3>(0).into_owned();
        let velocity: na::Vector3<f64> = posvel.fixed_rows::<3>(3).into_owned();
        let acceleration = self.acceleration(epoch, &position, &velocity);
        na::Vector6::new(
            velocity.x,
            velocity.y,
            velocity.z,
            acceleration.x,
            acceleration.y,
            acceleration.z,
        )
    }
}

impl EquationsOfMotion for ForceModel {
    type State = na::Vector6<f64>;

    fn compute_derivative(&self, epoch: &Epoch, state: &na::Vector6<f64>) -> na::Vector6<f64> {
        self.derivative(epoch, state)
    }
}
