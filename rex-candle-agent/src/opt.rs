//! Optimizers of the main estimator.
use anyhow::{ensure, Result};
use candle_core::{Tensor, Var};
use candle_nn::{AdamW, Optimizer as _, ParamsAdamW};
use candle_optimisers::adam::{Adam, ParamsAdam};
use serde::{Deserialize, Serialize};

/// Configuration of the optimizer.
///
/// Moments and epsilon keep the defaults of the underlying implementations,
/// only the learning rate and the weight decay are exposed.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub enum OptimizerConfig {
    /// Adam.
    Adam {
        /// Learning rate.
        lr: f64,
    },

    /// Adam with decoupled weight decay.
    AdamW {
        /// Learning rate.
        lr: f64,

        /// Weight decay, the default of candle if not given.
        #[serde(default)]
        weight_decay: Option<f64>,
    },
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self::Adam { lr: 0.001 }
    }
}

impl OptimizerConfig {
    /// Learning rate.
    pub fn lr(&self) -> f64 {
        match self {
            Self::Adam { lr } | Self::AdamW { lr, .. } => *lr,
        }
    }

    /// Overrides the learning rate.
    pub fn learning_rate(mut self, v: f64) -> Self {
        match &mut self {
            Self::Adam { lr } | Self::AdamW { lr, .. } => *lr = v,
        }
        self
    }

    /// Constructs an optimizer updating the given variables.
    pub fn build(&self, vars: Vec<Var>) -> Result<Optimizer> {
        let lr = self.lr();
        ensure!(lr > 0.0, "The learning rate must be positive, got {}", lr);

        let opt = match self {
            Self::Adam { .. } => {
                let params = ParamsAdam {
                    lr,
                    ..ParamsAdam::default()
                };
                Optimizer::Adam(Adam::new(vars, params)?)
            }
            Self::AdamW { weight_decay, .. } => {
                let defaults = ParamsAdamW::default();
                let params = ParamsAdamW {
                    lr,
                    weight_decay: weight_decay.unwrap_or(defaults.weight_decay),
                    ..defaults
                };
                Optimizer::AdamW(AdamW::new(vars, params)?)
            }
        };
        Ok(opt)
    }
}

/// An optimizer built from [`OptimizerConfig`].
pub enum Optimizer {
    /// Adam.
    Adam(Adam),

    /// AdamW.
    AdamW(AdamW),
}

impl Optimizer {
    /// Computes the gradients of `loss` and updates the variables.
    pub fn backward_step(&mut self, loss: &Tensor) -> Result<()> {
        match self {
            Self::Adam(opt) => opt.backward_step(loss)?,
            Self::AdamW(opt) => opt.backward_step(loss)?,
        }
        Ok(())
    }

    /// Current learning rate.
    pub fn learning_rate(&self) -> f64 {
        match self {
            Self::Adam(opt) => opt.learning_rate(),
            Self::AdamW(opt) => opt.learning_rate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::Device;

    fn var() -> Result<Var> {
        Ok(Var::from_tensor(&Tensor::new(&[2.0f32, -1.0], &Device::Cpu)?)?)
    }

    #[test]
    fn test_build_and_step() -> Result<()> {
        for config in [
            OptimizerConfig::Adam { lr: 0.1 },
            OptimizerConfig::AdamW {
                lr: 0.1,
                weight_decay: Some(0.0),
            },
        ] {
            let x = var()?;
            let mut opt = config.build(vec![x.clone()])?;
            assert!((opt.learning_rate() - 0.1).abs() < 1e-12);

            let before = x.as_tensor().sqr()?.sum_all()?.to_scalar::<f32>()?;
            let loss = x.as_tensor().sqr()?.sum_all()?;
            opt.backward_step(&loss)?;
            let after = x.as_tensor().sqr()?.sum_all()?.to_scalar::<f32>()?;
            assert!(after < before);
        }
        Ok(())
    }

    #[test]
    fn test_learning_rate() {
        let config = OptimizerConfig::AdamW {
            lr: 0.1,
            weight_decay: None,
        }
        .learning_rate(0.5);
        assert_eq!(config.lr(), 0.5);
        assert!(OptimizerConfig::Adam { lr: 0.0 }.build(vec![]).is_err());
    }
}
