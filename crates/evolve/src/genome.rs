use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of genes in a [`Genome`].
pub const GENE_COUNT: usize = 8;

/// A named design parameter and the range its gene is scaled to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gene {
    pub name: &'static str,
    pub lo: f64,
    pub hi: f64,
}

impl Gene {
    const fn new(name: &'static str, lo: f64, hi: f64) -> Self {
        Self { name, lo, hi }
    }

    /// Maps a gene in `[0, 1]` onto `[lo, hi]`.
    #[must_use]
    pub fn scale(&self, gene: f64) -> f64 {
        scale((0.0, 1.0), (self.lo, self.hi), gene)
    }

    /// Maps a value in `[lo, hi]` back onto `[0, 1]`.
    #[must_use]
    pub fn unscale(&self, value: f64) -> f64 {
        scale((self.lo, self.hi), (0.0, 1.0), value)
    }
}

/// The design space, in genome order.
pub const GENES: [Gene; GENE_COUNT] = [
    Gene::new("wheel_radius", 0.5, 1.5),
    Gene::new("chassis_length", 1.0, 4.0),
    Gene::new("suspension_frequency", 1.0, 8.0),
    Gene::new("suspension_damping", 0.3, 0.9),
    Gene::new("sensor_limit", 1.0, 15.0),
    Gene::new("speed_max", 0.0, 10.0),
    Gene::new("speed_slope", 0.0, 10.0),
    Gene::new("speed_intercept", -20.0, 20.0),
];

/// Index of the speed limit gene, whose upper bound normalizes the final speed.
pub(crate) const SPEED_MAX: usize = 5;

fn scale(from: (f64, f64), to: (f64, f64), value: f64) -> f64 {
    to.0 + (to.1 - to.0) * (value - from.0) / (from.1 - from.0)
}

/// Eight genes in `[0, 1]`, one per entry of [`GENES`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Genome([f64; GENE_COUNT]);

impl Genome {
    /// Creates a genome, clamping each gene into `[0, 1]`.
    #[must_use]
    pub fn new(genes: [f64; GENE_COUNT]) -> Self {
        Self(genes.map(|g| g.clamp(0.0, 1.0)))
    }

    /// A genome with uniformly random genes.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(std::array::from_fn(|_| rng.r#gen::<f64>()))
    }

    /// The genome that scales to `design`.
    #[must_use]
    pub fn from_design(design: &Design) -> Self {
        let values = design.values();
        Self::new(std::array::from_fn(|i| GENES[i].unscale(values[i])))
    }

    #[must_use]
    pub fn genes(&self) -> &[f64; GENE_COUNT] {
        &self.0
    }

    pub(crate) fn genes_mut(&mut self) -> &mut [f64; GENE_COUNT] {
        &mut self.0
    }

    /// Scales every gene onto its design range.
    #[must_use]
    pub fn design(&self) -> Design {
        let [
            wheel_radius,
            chassis_length,
            suspension_frequency,
            suspension_damping,
            sensor_limit,
            speed_max,
            speed_slope,
            speed_intercept,
        ] = std::array::from_fn(|i| GENES[i].scale(self.0[i]));

        Design {
            wheel_radius,
            chassis_length,
            suspension_frequency,
            suspension_damping,
            sensor_limit,
            speed_max,
            speed_slope,
            speed_intercept,
        }
    }
}

/// Design parameters decoded from a [`Genome`].
///
/// The suspension parameters set the spring and damper between the chassis
/// and each wheel in the engine world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Design {
    pub wheel_radius: f64,
    pub chassis_length: f64,
    pub suspension_frequency: f64,
    pub suspension_damping: f64,
    pub sensor_limit: f64,
    pub speed_max: f64,
    pub speed_slope: f64,
    pub speed_intercept: f64,
}

impl Default for Design {
    /// The hand-tuned demo robot.
    fn default() -> Self {
        Self {
            wheel_radius: 1.2,
            chassis_length: 3.0,
            suspension_frequency: 4.0,
            suspension_damping: 0.7,
            sensor_limit: 10.0,
            speed_max: 3.0,
            speed_slope: 2.0,
            speed_intercept: -15.0,
        }
    }
}

impl Design {
    /// Values in genome order.
    #[must_use]
    pub fn values(&self) -> [f64; GENE_COUNT] {
        [
            self.wheel_radius,
            self.chassis_length,
            self.suspension_frequency,
            self.suspension_damping,
            self.sensor_limit,
            self.speed_max,
            self.speed_slope,
            self.speed_intercept,
        ]
    }

    /// How far the wheels fit inside half the chassis; negative when they
    /// would overlap.
    #[must_use]
    pub fn wheel_overlap(&self) -> f64 {
        self.chassis_length / 2.0 - self.wheel_radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn genes_scale_onto_their_ranges() {
        let low = Genome::new([0.0; GENE_COUNT]).design();
        let high = Genome::new([1.0; GENE_COUNT]).design();

        assert_relative_eq!(low.wheel_radius, 0.5);
        assert_relative_eq!(high.chassis_length, 4.0);
        assert_relative_eq!(low.speed_intercept, -20.0);
        assert_relative_eq!(high.speed_intercept, 20.0);
    }

    #[test]
    fn demo_design_survives_encoding() {
        let design = Design::default();
        let decoded = Genome::from_design(&design).design();

        for (a, b) in design.values().into_iter().zip(decoded.values()) {
            assert_relative_eq!(a, b, epsilon = 1e-12);
        }
        assert_relative_eq!(Genome::from_design(&design).genes()[0], 0.7, epsilon = 1e-12);
    }

    #[test]
    fn new_clamps_genes() {
        let genome = Genome::new([-0.5, 1.5, 0.5, 0.0, 1.0, 0.25, 0.75, 2.0]);
        assert_eq!(genome.genes(), &[0.0, 1.0, 0.5, 0.0, 1.0, 0.25, 0.75, 1.0]);
    }

    #[test]
    fn random_genes_are_in_the_unit_interval() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..20 {
            let genome = Genome::random(&mut rng);
            assert!(genome.genes().iter().all(|g| (0.0..1.0).contains(g)));
        }
    }

    #[test]
    fn overlap_compares_half_chassis_to_radius() {
        let design = Design {
            wheel_radius: 1.5,
            chassis_length: 2.0,
            ..Design::default()
        };
        assert_relative_eq!(design.wheel_overlap(), -0.5);
        assert_relative_eq!(Design::default().wheel_overlap(), 0.3, epsilon = 1e-12);
    }
}
