use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Bounds and step size of a user-adjustable parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl ParamSpec {
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

/// Identifies one of the render parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
    Mu,
    Sigma,
    Frequency,
    StressLevel,
}

impl Param {
    pub const ALL: [Param; 4] = [
        Param::Mu,
        Param::Sigma,
        Param::Frequency,
        Param::StressLevel,
    ];

    /// Control bounds exposed to whatever drives the parameters.
    pub fn spec(self) -> ParamSpec {
        match self {
            Param::Mu => ParamSpec {
                min: 0.0,
                max: 1.0,
                step: 0.01,
            },
            Param::Sigma => ParamSpec {
                min: 0.001,
                max: 0.5,
                step: 0.005,
            },
            Param::Frequency => ParamSpec {
                min: 1.0,
                max: 20.0,
                step: 1.0,
            },
            Param::StressLevel => ParamSpec {
                min: 0.0,
                max: 20.0,
                step: 1.0,
            },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Param::Mu => "mu",
            Param::Sigma => "sigma",
            Param::Frequency => "frequency",
            Param::StressLevel => "stress",
        }
    }

    fn is_integral(self) -> bool {
        matches!(self, Param::Frequency | Param::StressLevel)
    }

    /// Checks a value against the parameter's domain.
    ///
    /// Sigma is open at zero: the controls stop at 0.001 but any positive
    /// value is a valid width.
    fn admits(self, value: f32) -> bool {
        if !value.is_finite() {
            return false;
        }
        let spec = self.spec();
        match self {
            Param::Sigma => value > 0.0 && value <= spec.max,
            _ => value >= spec.min && value <= spec.max,
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParameterError {
    #[error("{param} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        param: Param,
        value: f32,
        min: f32,
        max: f32,
    },
    #[error("{param} must be a whole number, got {value}")]
    NotIntegral { param: Param, value: f32 },
}

/// Values driving the fullscreen pattern.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderParameters {
    pub mu: f32,
    pub sigma: f32,
    pub frequency: f32,
    pub stress_level: u32,
}

impl Default for RenderParameters {
    fn default() -> Self {
        Self {
            mu: 0.5,
            sigma: 0.2,
            frequency: 1.0,
            stress_level: 0,
        }
    }
}

impl RenderParameters {
    /// Builds a parameter set, rejecting any value outside its domain.
    pub fn new(
        mu: f32,
        sigma: f32,
        frequency: f32,
        stress_level: u32,
    ) -> Result<Self, ParameterError> {
        let params = Self {
            mu,
            sigma,
            frequency,
            stress_level,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        for param in Param::ALL {
            let value = self.get(param);
            if !param.admits(value) {
                let spec = param.spec();
                return Err(ParameterError::OutOfRange {
                    param,
                    value,
                    min: spec.min,
                    max: spec.max,
                });
            }
            if param.is_integral() && value.fract() != 0.0 {
                return Err(ParameterError::NotIntegral { param, value });
            }
        }
        Ok(())
    }

    pub fn get(&self, param: Param) -> f32 {
        match param {
            Param::Mu => self.mu,
            Param::Sigma => self.sigma,
            Param::Frequency => self.frequency,
            Param::StressLevel => self.stress_level as f32,
        }
    }

    /// Returns a copy with `param` set to `value`, clamped to the control bounds.
    pub fn with(mut self, param: Param, value: f32) -> Self {
        let spec = param.spec();
        let mut value = spec.clamp(value);
        if param.is_integral() {
            value = value.round();
        }
        match param {
            Param::Mu => self.mu = value,
            Param::Sigma => self.sigma = value,
            Param::Frequency => self.frequency = value,
            Param::StressLevel => self.stress_level = value as u32,
        }
        self
    }

    /// Moves `param` by `steps` control steps, saturating at the bounds.
    pub fn nudge(self, param: Param, steps: i32) -> Self {
        let spec = param.spec();
        self.with(param, self.get(param) + spec.step * steps as f32)
    }

    pub fn variant_key(&self) -> VariantKey {
        if self.stress_level > 0 {
            VariantKey::Stress
        } else {
            VariantKey::Standard
        }
    }
}

/// Selects the shader generation in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantKey {
    Standard,
    Stress,
}

impl fmt::Display for VariantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariantKey::Standard => f.write_str("standard"),
            VariantKey::Stress => f.write_str("stress"),
        }
    }
}

/// Latest parameter values, shared between the controls and the session.
///
/// Writers and the per-frame reader run on the same event loop thread, so a
/// plain cell is enough: the reader sees whichever value was written last.
#[derive(Debug, Clone, Default)]
pub struct ParameterStore {
    inner: Rc<Cell<RenderParameters>>,
}

impl ParameterStore {
    pub fn new(initial: RenderParameters) -> Self {
        Self {
            inner: Rc::new(Cell::new(initial)),
        }
    }

    pub fn get(&self) -> RenderParameters {
        self.inner.get()
    }

    pub fn update(&self, f: impl FnOnce(RenderParameters) -> RenderParameters) -> RenderParameters {
        let next = f(self.inner.get());
        self.inner.set(next);
        next
    }
}
