use super::CandleEstimatorConfig;
use crate::{
    model::SubModel,
    opt::Optimizer,
    util::{copy_vars, smooth_l1_loss, states_to_tensor, CriticLoss, OutDim},
};
use anyhow::{ensure, Context, Result};
use candle_core::{DType, Device, Tensor, D};
use candle_nn::{loss::mse, VarBuilder, VarMap};
use log::{info, trace};
use rex_core::{error::RexError, record::Record, Estimator, StackedFrames};
use serde::{de::DeserializeOwned, Serialize};
use std::{convert::TryFrom, path::Path};

/// Action-value estimator on flattened stacks of `f32` frames.
///
/// The network maps a batch of states of shape `(batch, depth * frame_len)`
/// to action values of shape `(batch, num_actions)`.
pub struct CandleEstimator<Q>
where
    Q: SubModel,
    Q::Config: DeserializeOwned + Serialize + OutDim + Clone,
{
    device: Device,
    varmap: VarMap,

    // Action-value function
    q: Q,

    opt: Optimizer,
    num_actions: usize,
    critic_loss: CriticLoss,
}

impl<Q> CandleEstimator<Q>
where
    Q: SubModel,
    Q::Config: DeserializeOwned + Serialize + OutDim + Clone,
{
    /// Constructs [`CandleEstimator`] with randomly initialized parameters.
    pub fn build(config: CandleEstimatorConfig<Q::Config>) -> Result<Self> {
        let q_config = config.q_config.context("q_config is not set.")?;
        let num_actions = q_config.get_out_dim();
        let device = Device::try_from(config.device.unwrap_or_default())?;
        let varmap = VarMap::new();
        let q = {
            let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
            Q::build(vb, q_config)?
        };
        let opt = config.opt_config.build(varmap.all_vars())?;

        Ok(Self {
            device,
            varmap,
            q,
            opt,
            num_actions,
            critic_loss: config.critic_loss,
        })
    }

    /// Outputs the action values of a batch of flattened states.
    pub fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        self.q.forward(xs)
    }

    /// Outputs the action values of the given states.
    pub fn q_values(&self, states: &[StackedFrames<Vec<f32>>]) -> Result<Tensor> {
        let xs = states_to_tensor(states, &self.device)?;
        self.forward(&xs)
    }

    /// The parameters of the network.
    pub fn varmap(&self) -> &VarMap {
        &self.varmap
    }

    fn loss(&self, pred: &Tensor, tgt: &Tensor) -> Result<Tensor> {
        match self.critic_loss {
            CriticLoss::Mse => Ok(mse(pred, tgt)?),
            CriticLoss::SmoothL1 => smooth_l1_loss(pred, tgt),
        }
    }
}

impl<Q> Estimator for CandleEstimator<Q>
where
    Q: SubModel,
    Q::Config: DeserializeOwned + Serialize + OutDim + Clone,
{
    type State = StackedFrames<Vec<f32>>;

    fn num_actions(&self) -> usize {
        self.num_actions
    }

    fn best_action(&self, state: &Self::State) -> Result<usize> {
        let (actions, _) = self.best_action_and_value(std::slice::from_ref(state))?;
        Ok(actions[0])
    }

    fn best_action_and_value(&self, states: &[Self::State]) -> Result<(Vec<usize>, Vec<f32>)> {
        let q = self.q_values(states)?;
        let values = q.max(D::Minus1)?.to_vec1::<f32>()?;
        let actions = q
            .argmax(D::Minus1)?
            .to_vec1::<u32>()?
            .into_iter()
            .map(|a| a as usize)
            .collect();
        Ok((actions, values))
    }

    fn train(
        &mut self,
        states: &[Self::State],
        actions: &[usize],
        targets: &[f32],
        step_counter: usize,
    ) -> Result<Record> {
        let n = states.len();
        ensure!(
            actions.len() == n && targets.len() == n,
            "Batch sizes differ: {} states, {} actions, {} targets",
            n,
            actions.len(),
            targets.len()
        );
        if let Some(&a) = actions.iter().find(|&&a| a >= self.num_actions) {
            return Err(RexError::InvalidAction(a).into());
        }

        let loss = {
            let actions = actions.iter().map(|&a| a as u32).collect::<Vec<_>>();
            let actions = Tensor::from_vec(actions, (n, 1), &self.device)?;
            let tgt = Tensor::from_slice(targets, (n,), &self.device)?;
            let pred = self
                .q_values(states)?
                .gather(&actions, D::Minus1)?
                .squeeze(D::Minus1)?;
            self.loss(&pred, &tgt)?
        };
        self.opt.backward_step(&loss)?;

        let loss = loss.to_scalar::<f32>()?;
        trace!("Training step {}: loss = {}", step_counter, loss);
        Ok(Record::from_scalar("loss", loss))
    }

    fn copy_parameters_from(&mut self, other: &Self) -> Result<()> {
        copy_vars(&self.varmap, &other.varmap)
    }

    fn save(&self, path: &Path) -> Result<()> {
        self.varmap.save(path)?;
        info!("Save estimator to {:?}", path);
        Ok(())
    }

    fn load(&mut self, path: &Path) -> Result<()> {
        self.varmap.load(path)?;
        info!("Load estimator from {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{mlp::Mlp, mlp::MlpConfig, opt::OptimizerConfig};
    use rex_core::{replay_memory::ReplayMemoryConfig, DdqnAgent, DdqnConfig};
    use tempdir::TempDir;

    const FRAME_LEN: usize = 3;
    const DEPTH: usize = 2;
    const N_ACTIONS: usize = 2;

    fn config() -> CandleEstimatorConfig<MlpConfig> {
        CandleEstimatorConfig::default()
            .q_config(MlpConfig::new(FRAME_LEN, DEPTH, N_ACTIONS).hidden(vec![16]))
            .opt_config(OptimizerConfig::Adam { lr: 0.01 })
    }

    fn estimator() -> CandleEstimator<Mlp> {
        CandleEstimator::build(config()).unwrap()
    }

    fn states() -> Vec<StackedFrames<Vec<f32>>> {
        (0..4)
            .map(|i| {
                let x = i as f32 / 4.0;
                StackedFrames::filled(vec![x, 1.0 - x, 0.5], DEPTH).unwrap()
            })
            .collect()
    }

    fn outputs(q: &CandleEstimator<Mlp>) -> Vec<Vec<f32>> {
        q.q_values(&states()).unwrap().to_vec2::<f32>().unwrap()
    }

    #[test]
    fn test_best_action_and_value_match_forward() -> Result<()> {
        let q = estimator();
        let (actions, values) = q.best_action_and_value(&states())?;

        for (i, row) in outputs(&q).iter().enumerate() {
            let best = row.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
            assert_eq!(values[i], best);
            assert_eq!(row[actions[i]], best);
        }
        assert_eq!(q.best_action(&states()[2])?, actions[2]);

        Ok(())
    }

    #[test]
    fn test_copy_parameters() -> Result<()> {
        let src = estimator();
        let mut dest = estimator();
        dest.copy_parameters_from(&src)?;
        assert_eq!(outputs(&src), outputs(&dest));

        // Training the copy leaves the source untouched.
        let before = outputs(&src);
        dest.train(&states(), &[0, 1, 0, 1], &[1.0, -1.0, 2.0, 0.0], 0)?;
        assert_eq!(outputs(&src), before);
        assert_ne!(outputs(&dest), before);

        Ok(())
    }

    #[test]
    fn test_train_reduces_loss() -> Result<()> {
        for critic_loss in [CriticLoss::Mse, CriticLoss::SmoothL1] {
            let mut q = CandleEstimator::<Mlp>::build(config().critic_loss(critic_loss))?;
            let (actions, targets) = ([0, 1, 1, 0], [1.0, -1.0, 0.5, 2.0]);

            let first = q.train(&states(), &actions, &targets, 0)?.get_scalar("loss")?;
            let mut last = first;
            for step in 1..200 {
                last = q
                    .train(&states(), &actions, &targets, step)?
                    .get_scalar("loss")?;
            }
            assert!(last < first, "{} >= {}", last, first);
        }

        Ok(())
    }

    #[test]
    fn test_train_rejects_invalid_action() {
        let mut q = estimator();
        assert!(q.train(&states(), &[0, 1, 2, 0], &[0.0; 4], 0).is_err());
        assert!(q.train(&states(), &[0, 1], &[0.0; 4], 0).is_err());
    }

    #[test]
    fn test_save_and_load() -> Result<()> {
        let dir = TempDir::new("candle_estimator")?;
        let path = dir.path().join("q");
        let src = estimator();
        src.save(&path)?;

        let mut dest = estimator();
        assert_ne!(outputs(&src), outputs(&dest));
        dest.load(&path)?;
        assert_eq!(outputs(&src), outputs(&dest));

        Ok(())
    }

    #[test]
    fn test_ddqn_agent_with_candle_estimator() -> Result<()> {
        let config = DdqnConfig::default()
            .batch_size(4)
            .frame_depth(DEPTH)
            .replay_memory(ReplayMemoryConfig::default().capacity(16));
        let mut agent = DdqnAgent::build(config, estimator(), estimator())?;
        assert_eq!(outputs(agent.main()), outputs(agent.target()));

        let states = states();
        for i in 0..3 {
            agent.remember(states[i].clone(), i % 2, 1.0, states[i + 1].clone(), i == 2);
        }
        assert!(agent.train_step()?.is_none());

        agent.remember(states[3].clone(), 0, 0.0, states[0].clone(), false);
        let record = agent.train_step()?.expect("a full batch is stored");
        assert!(record.get_scalar("loss")?.is_finite());
        assert_ne!(outputs(agent.main()), outputs(agent.target()));

        agent.sync_target()?;
        assert_eq!(outputs(agent.main()), outputs(agent.target()));

        let dir = TempDir::new("ddqn_candle")?;
        agent.save(dir.path())?;
        assert!(dir.path().join("main").exists());
        assert!(dir.path().join("target").exists());

        Ok(())
    }
}
