//! Interface of the networks used as action-value functions.
use anyhow::Result;
use candle_core::Tensor;
use candle_nn::VarBuilder;

/// Neural network model not owing its [`VarMap`] internally.
///
/// The parameters are created through the given [`VarBuilder`], so that the
/// owner of the [`VarMap`] can train, copy and save them.
///
/// [`VarMap`]: candle_nn::VarMap
pub trait SubModel {
    /// Configuration from which [`SubModel`] is constructed.
    type Config;

    /// Builds [`SubModel`] with [`VarBuilder`] and [`SubModel::Config`].
    fn build(vb: VarBuilder, config: Self::Config) -> Result<Self>
    where
        Self: Sized;

    /// Maps a batch of flattened states to a batch of action values.
    fn forward(&self, xs: &Tensor) -> Result<Tensor>;
}
