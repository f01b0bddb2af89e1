use crate::WaterConfig;
use bevy::asset::Handle;
use bevy::ecs::resource::Resource;
use bevy::image::Image;
use bevy::math::Vec2;
use rand::Rng;
use std::f32::consts::TAU;
use thiserror::Error;

/// Shader uniform slots reserved for wave components.
pub const MAX_WAVES: usize = 4;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum WaveError {
    #[error("wave direction must have non-zero length")]
    DegenerateDirection,
    #[error("wave amplitude must be strictly positive, got {0}")]
    NonPositiveAmplitude(f32),
    #[error("wave wavelength must be strictly positive, got {0}")]
    NonPositiveWavelength(f32),
    #[error("a wave set holds at most {MAX_WAVES} components, got {0}")]
    TooManyWaves(usize),
}

/// One wave component. The direction is unit length and frequency/phase
/// speed are derived once at construction; descriptors never mutate
/// afterwards - the time-dependent phase term is evaluated by consumers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveDescriptor {
    direction: Vec2,
    amplitude: f32,
    wavelength: f32,
    speed: f32,
    phase: f32,
    frequency: f32,
    phase_speed: f32,
}

impl WaveDescriptor {
    pub fn new(
        direction: Vec2,
        amplitude: f32,
        wavelength: f32,
        speed: f32,
        phase: f32,
    ) -> Result<Self, WaveError> {
        let Some(direction) = direction.try_normalize() else {
            return Err(WaveError::DegenerateDirection);
        };
        if !(amplitude > 0.0) {
            return Err(WaveError::NonPositiveAmplitude(amplitude));
        }
        if !(wavelength > 0.0) {
            return Err(WaveError::NonPositiveWavelength(wavelength));
        }

        let frequency = TAU / wavelength;
        Ok(Self {
            direction,
            amplitude,
            wavelength,
            speed,
            phase: phase.rem_euclid(TAU),
            frequency,
            phase_speed: speed * frequency,
        })
    }

    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    pub fn wavelength(&self) -> f32 {
        self.wavelength
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn phase_speed(&self) -> f32 {
        self.phase_speed
    }

    /// Vertical displacement contributed by this wave at `p` and `time`.
    /// Mirror of the vertex-shader term.
    pub fn displacement(&self, p: Vec2, time: f32) -> f32 {
        self.amplitude * self.theta(p, time).sin()
    }

    /// Analytic height gradient (dh/dx, dh/dz) at `p` and `time`.
    pub fn gradient(&self, p: Vec2, time: f32) -> Vec2 {
        self.direction * (self.amplitude * self.frequency * self.theta(p, time).cos())
    }

    fn theta(&self, p: Vec2, time: f32) -> f32 {
        self.direction.dot(p) * self.frequency + self.phase_speed * time + self.phase
    }
}

/// Ordered, fixed-capacity list of wave components. Order is significant:
/// it determines which uniform array slot carries which wave.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaveSet {
    waves: Vec<WaveDescriptor>,
}

impl WaveSet {
    pub fn new(waves: Vec<WaveDescriptor>) -> Result<Self, WaveError> {
        if waves.len() > MAX_WAVES {
            return Err(WaveError::TooManyWaves(waves.len()));
        }
        Ok(Self { waves })
    }

    /// The canonical three-component set, rotated into the wind direction
    /// and with propagation speeds scaled by wind speed. Phases are zero;
    /// scatter them with [`WaveSet::with_scattered_phases`].
    pub fn default_for(config: &WaterConfig) -> Self {
        let wind = config
            .wind_direction
            .try_normalize()
            .unwrap_or(Vec2::X);
        let speed_scale = config.wind_speed / crate::DEFAULT_WIND_SPEED;

        let base = [
            (Vec2::new(1.0, 0.3), 1.2, 20.0, 20.0),
            (Vec2::new(-0.4, 1.0), 0.8, 30.0, 10.0),
            (Vec2::new(0.2, -1.0), 0.5, 25.0, 13.0),
        ];
        let waves = base
            .into_iter()
            .map(|(dir, amplitude, wavelength, speed)| {
                WaveDescriptor::new(
                    wind.rotate(dir),
                    amplitude,
                    wavelength,
                    speed * speed_scale,
                    0.0,
                )
                .expect("canonical wave set is valid")
            })
            .collect();

        Self { waves }
    }

    /// Rebuild the set with phases scattered uniformly over [0, 2pi).
    /// Construction-time only; the returned set is as immutable as any other.
    pub fn with_scattered_phases<R: Rng>(self, rng: &mut R) -> Self {
        let waves = self
            .waves
            .into_iter()
            .map(|w| {
                WaveDescriptor::new(
                    w.direction,
                    w.amplitude,
                    w.wavelength,
                    w.speed,
                    rng.random_range(0.0..TAU),
                )
                .expect("descriptor was already validated")
            })
            .collect();
        Self { waves }
    }

    pub fn len(&self) -> usize {
        self.waves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waves.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &WaveDescriptor> {
        self.waves.iter()
    }

    /// Total surface height at `p` and `time`: the sum over components.
    pub fn surface_height(&self, p: Vec2, time: f32) -> f32 {
        self.waves.iter().map(|w| w.displacement(p, time)).sum()
    }

    /// Total analytic height gradient at `p` and `time`.
    pub fn surface_gradient(&self, p: Vec2, time: f32) -> Vec2 {
        self.waves
            .iter()
            .fold(Vec2::ZERO, |acc, w| acc + w.gradient(p, time))
    }
}

/// Aggregate state of the water surface: the wave set, monotonically
/// increasing simulation time, the fixed domain geometry and a read-only
/// handle to the solver-owned height-field texture.
#[derive(Resource, Debug, Clone)]
pub struct WaterSurfaceState {
    waves: WaveSet,
    time: f32,
    domain_size: f32,
    resolution: u32,
    height_field: Handle<Image>,
}

impl WaterSurfaceState {
    pub fn new(waves: WaveSet, config: &WaterConfig, height_field: Handle<Image>) -> Self {
        Self {
            waves,
            time: 0.0,
            domain_size: config.domain_size,
            resolution: config.resolution,
            height_field,
        }
    }

    /// Advance simulation time. Negative deltas are ignored; time never
    /// moves backwards.
    pub fn advance(&mut self, dt: f32) {
        self.time += dt.max(0.0);
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn waves(&self) -> &WaveSet {
        &self.waves
    }

    pub fn domain_size(&self) -> f32 {
        self.domain_size
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn height_field(&self) -> &Handle<Image> {
        &self.height_field
    }

    pub fn surface_height(&self, p: Vec2) -> f32 {
        self.waves.surface_height(p, self.time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn wave(dir: Vec2, amplitude: f32, wavelength: f32, speed: f32) -> WaveDescriptor {
        WaveDescriptor::new(dir, amplitude, wavelength, speed, 0.0).unwrap()
    }

    #[test]
    fn direction_is_normalized() {
        for dir in [
            Vec2::new(3.0, 4.0),
            Vec2::new(-0.001, 0.002),
            Vec2::new(1000.0, -2000.0),
        ] {
            let w = wave(dir, 1.0, 10.0, 1.0);
            assert!((w.direction().length() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn zero_direction_is_rejected() {
        let err = WaveDescriptor::new(Vec2::ZERO, 1.0, 10.0, 1.0, 0.0).unwrap_err();
        assert_eq!(err, WaveError::DegenerateDirection);
    }

    #[test]
    fn non_positive_parameters_are_rejected() {
        assert!(matches!(
            WaveDescriptor::new(Vec2::X, 0.0, 10.0, 1.0, 0.0),
            Err(WaveError::NonPositiveAmplitude(_))
        ));
        assert!(matches!(
            WaveDescriptor::new(Vec2::X, -1.0, 10.0, 1.0, 0.0),
            Err(WaveError::NonPositiveAmplitude(_))
        ));
        assert!(matches!(
            WaveDescriptor::new(Vec2::X, 1.0, 0.0, 1.0, 0.0),
            Err(WaveError::NonPositiveWavelength(_))
        ));
        assert!(matches!(
            WaveDescriptor::new(Vec2::X, 1.0, f32::NAN, 1.0, 0.0),
            Err(WaveError::NonPositiveWavelength(_))
        ));
    }

    #[test]
    fn derived_fields() {
        let w = wave(Vec2::X, 1.0, 10.0, 5.0);
        assert!((w.frequency() - TAU / 10.0).abs() < 1e-6);
        assert!((w.phase_speed() - 5.0 * TAU / 10.0).abs() < 1e-6);
    }

    #[test]
    fn capacity_is_enforced() {
        let waves = vec![wave(Vec2::X, 1.0, 10.0, 1.0); MAX_WAVES + 1];
        assert_eq!(
            WaveSet::new(waves).unwrap_err(),
            WaveError::TooManyWaves(MAX_WAVES + 1)
        );
    }

    /// Reordering components must not change the summed displacement.
    #[test]
    fn displacement_is_permutation_invariant() {
        let a = wave(Vec2::new(1.0, 0.0), 1.2, 20.0, 20.0);
        let b = wave(Vec2::new(-0.4, 1.0), 0.8, 30.0, 10.0);
        let c = wave(Vec2::new(0.2, -1.0), 0.5, 25.0, 13.0);

        let original = WaveSet::new(vec![a, b, c]).unwrap();
        let permutations = [
            WaveSet::new(vec![c, a, b]).unwrap(),
            WaveSet::new(vec![b, c, a]).unwrap(),
        ];

        for (x, z, t) in [(0.0, 0.0, 0.0), (3.7, -12.5, 1.4), (-80.0, 40.0, 9.9)] {
            let p = Vec2::new(x, z);
            let reference = original.surface_height(p, t);
            for permuted in &permutations {
                assert!((permuted.surface_height(p, t) - reference).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn time_accumulates_monotonically() {
        let mut state = WaterSurfaceState::new(
            WaveSet::default(),
            &WaterConfig::default(),
            Handle::default(),
        );
        let deltas = [0.016, 0.033, 0.008, 0.25, 0.016];
        let total: f32 = deltas.iter().sum();
        for dt in deltas {
            state.advance(dt);
        }
        assert!((state.time() - total).abs() < 1e-6);

        // Negative deltas must not rewind.
        state.advance(-5.0);
        assert!((state.time() - total).abs() < 1e-6);
    }

    /// Two-wave scenario: zero displacement at the origin at t = 0, and
    /// wave A peaking at a quarter of its phase period with wave B's
    /// independent contribution summed on top.
    #[test]
    fn two_wave_scenario() {
        let a = wave(Vec2::new(1.0, 0.0), 1.0, 10.0, 5.0);
        let b = wave(Vec2::new(0.0, 1.0), 0.5, 20.0, 2.0);
        let set = WaveSet::new(vec![a, b]).unwrap();
        let origin = Vec2::ZERO;

        assert!(set.surface_height(origin, 0.0).abs() < 1e-6);

        let t_peak = PI / (2.0 * a.phase_speed());
        assert!((a.displacement(origin, t_peak) - 1.0).abs() < 1e-5);

        let expected = a.displacement(origin, t_peak) + b.displacement(origin, t_peak);
        assert!((set.surface_height(origin, t_peak) - expected).abs() < 1e-6);
    }

    #[test]
    fn default_set_follows_wind() {
        let config = WaterConfig {
            wind_speed: 40.0,
            ..Default::default()
        };
        let set = WaveSet::default_for(&config);
        assert_eq!(set.len(), 3);
        for (w, base_speed) in set.iter().zip([20.0, 10.0, 13.0]) {
            assert!((w.direction().length() - 1.0).abs() < 1e-6);
            assert!((w.speed() - base_speed * 2.0).abs() < 1e-5);
        }

        // Degenerate wind falls back to +X rather than poisoning directions.
        let degenerate = WaterConfig {
            wind_direction: Vec2::ZERO,
            ..Default::default()
        };
        for w in WaveSet::default_for(&degenerate).iter() {
            assert!(w.direction().length().is_finite());
            assert!((w.direction().length() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn scattered_phases_stay_in_range() {
        let mut rng = rand::rng();
        let set = WaveSet::default_for(&WaterConfig::default()).with_scattered_phases(&mut rng);
        for w in set.iter() {
            assert!((0.0..TAU).contains(&w.phase()));
        }
    }
}
