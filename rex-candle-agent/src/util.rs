//! Utilities.
use anyhow::{anyhow, ensure, Context, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarMap;
use rex_core::StackedFrames;
use serde::{Deserialize, Serialize};

/// Loss of the regression toward the training targets.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub enum CriticLoss {
    /// Mean squared error.
    Mse,

    /// Smooth L1 loss.
    SmoothL1,
}

impl Default for CriticLoss {
    fn default() -> Self {
        Self::Mse
    }
}

/// Interface for handling output dimensions.
pub trait OutDim {
    /// Returns the output dimension.
    fn get_out_dim(&self) -> usize;

    /// Sets the  output dimension.
    fn set_out_dim(&mut self, v: usize);
}

/// Overwrites every variable of `dest` with the variable of the same name in `src`.
pub fn copy_vars(dest: &VarMap, src: &VarMap) -> Result<()> {
    let dest = dest
        .data()
        .lock()
        .map_err(|_| anyhow!("The destination parameters are poisoned"))?;
    let src = src
        .data()
        .lock()
        .map_err(|_| anyhow!("The source parameters are poisoned"))?;
    ensure!(
        dest.len() == src.len(),
        "Parameter sets differ in size ({} and {})",
        dest.len(),
        src.len()
    );

    for (name, v_dest) in dest.iter() {
        let v_src = src
            .get(name)
            .with_context(|| format!("Parameter {} is missing in the source", name))?;
        v_dest.set(v_src.as_tensor())?;
    }

    Ok(())
}

/// See <https://pytorch.org/docs/stable/generated/torch.nn.SmoothL1Loss.html>.
pub fn smooth_l1_loss(x: &Tensor, y: &Tensor) -> Result<Tensor> {
    let d = (x - y)?.abs()?;
    let m1 = d.lt(1.0)?.to_dtype(DType::F32)?;
    let m2 = m1.affine(-1.0, 1.0)?;
    let l1 = (m1.mul(&d.sqr()?)? * 0.5)?;
    let l2 = m2.mul(&d.affine(1.0, -0.5)?)?;
    Ok(l1.add(&l2)?.mean_all()?)
}

/// Flattens each state into a row of a `(batch, depth * frame_len)` tensor.
pub fn states_to_tensor(states: &[StackedFrames<Vec<f32>>], device: &Device) -> Result<Tensor> {
    ensure!(!states.is_empty(), "No state is given");
    let dim: usize = states[0].frames().iter().map(|f| f.len()).sum();
    let mut data = Vec::with_capacity(states.len() * dim);

    for state in states.iter() {
        let n = data.len();
        for frame in state.frames() {
            data.extend_from_slice(frame);
        }
        ensure!(
            data.len() - n == dim,
            "States differ in size ({} and {})",
            dim,
            data.len() - n
        );
    }

    Ok(Tensor::from_vec(data, (states.len(), dim), device)?)
}
