use nalgebra::Vector3;

/// First-order exponential smoother, `y = (1 - a) * y + a * x`.
///
/// The state starts at zero, so the first few outputs lag towards the input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LowPass {
    coefficient: f64,
    state: Vector3<f64>,
}

impl LowPass {
    /// `coefficient` is the weight given to each new sample and is clamped to [0, 1].
    pub fn new(coefficient: f64) -> Self {
        Self {
            coefficient: coefficient.clamp(0.0, 1.0),
            state: Vector3::zeros(),
        }
    }

    pub fn update(&mut self, input: &Vector3<f64>) -> Vector3<f64> {
        self.state = (1.0 - self.coefficient) * self.state + self.coefficient * input;
        self.state
    }

    pub fn value(&self) -> &Vector3<f64> {
        &self.state
    }

    pub fn coefficient(&self) -> f64 {
        self.coefficient
    }

    pub fn reset(&mut self) {
        self.state = Vector3::zeros();
    }
}
