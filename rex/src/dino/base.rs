use super::DinoRunConfig;
use anyhow::{bail, Result};
use log::trace;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rex_core::{error::RexError, Environment};

/// Column of the track the runner stands on.
pub(super) const RUNNER_COL: usize = 2;

const NOOP: usize = 0;
const JUMP: usize = 1;
const OBSTACLE_PIXEL: u8 = 255;
const RUNNER_PIXEL: u8 = 128;

/// Reward of a step survived.
pub const SURVIVAL_REWARD: f32 = 0.1;

/// Reward of a crash.
pub const CRASH_REWARD: f32 = -1.0;

/// A runner on a track of `width` cells with obstacles moving toward it.
///
/// Every step the obstacles move one cell to the left and a new one may enter
/// at the right end. The runner crashes if an obstacle reaches its column
/// while it is on the ground; a jump keeps it in the air for
/// `jump_duration` steps. Obstacles are spaced so that every one of them can
/// be jumped over.
///
/// Frames have two rows of `width` pixels, the air then the ground, with
/// obstacles drawn in the ground row and the runner in the row it occupies.
///
/// Actions are `0` (noop) and `1` (jump). A survived step earns `0.1`, a
/// crash earns `-1` and ends the episode. Episodes are also cut after
/// `max_steps` steps. The sequence of obstacles is determined by the seed.
pub struct DinoRun {
    config: DinoRunConfig,
    rng: StdRng,
    track: Vec<bool>,
    airtime: usize,
    since_obstacle: usize,
    steps: usize,
    episodes: usize,
    over: bool,
}

impl DinoRun {
    /// Constructs the environment.
    pub fn build(config: &DinoRunConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: config.clone(),
            rng: StdRng::seed_from_u64(config.seed),
            track: vec![false; config.width],
            airtime: 0,
            since_obstacle: 0,
            steps: 0,
            episodes: 0,
            over: true,
        })
    }

    /// Length of frames.
    pub fn frame_len(&self) -> usize {
        self.config.frame_len()
    }

    /// Cells of the track holding an obstacle.
    pub fn track(&self) -> &[bool] {
        &self.track
    }

    /// Returns `true` while the runner is in the air.
    pub fn is_airborne(&self) -> bool {
        self.airtime > 0
    }

    fn frame(&self) -> Vec<u8> {
        let width = self.config.width;
        let mut frame = vec![0u8; 2 * width];
        for (col, &obstacle) in self.track.iter().enumerate() {
            if obstacle {
                frame[width + col] = OBSTACLE_PIXEL;
            }
        }
        let row = if self.is_airborne() { 0 } else { 1 };
        frame[row * width + RUNNER_COL] = RUNNER_PIXEL;
        frame
    }

    fn spawn(&mut self) -> bool {
        // Leave room to land and take off again between obstacles.
        let min_gap = self.config.jump_duration + 1;
        if self.since_obstacle >= min_gap && self.rng.gen::<f64>() < self.config.obstacle_prob {
            self.since_obstacle = 0;
            true
        } else {
            self.since_obstacle += 1;
            false
        }
    }
}

impl Environment for DinoRun {
    type Frame = Vec<u8>;

    /// Episode index.
    type Info = usize;

    fn start_episode(&mut self) -> Result<(Vec<u8>, usize, bool)> {
        self.track.iter_mut().for_each(|c| *c = false);
        self.airtime = 0;
        self.since_obstacle = 0;
        self.steps = 0;
        self.over = false;
        self.episodes += 1;
        Ok((self.frame(), self.episodes, false))
    }

    fn apply_action(&mut self, action: usize) -> Result<(Vec<u8>, f32, bool)> {
        if action >= self.num_actions() {
            return Err(RexError::InvalidAction(action).into());
        }
        if self.over {
            bail!("The episode is over, start a new one");
        }

        if action == JUMP && self.airtime == 0 {
            self.airtime = self.config.jump_duration;
        }
        self.track.rotate_left(1);
        let new_obstacle = self.spawn();
        if let Some(last) = self.track.last_mut() {
            *last = new_obstacle;
        }

        let airborne = self.airtime > 0;
        let crashed = self.track[RUNNER_COL] && !airborne;
        let frame = self.frame();
        if airborne {
            self.airtime -= 1;
        }
        self.steps += 1;

        let reward = if crashed { CRASH_REWARD } else { SURVIVAL_REWARD };
        self.over = crashed || self.steps >= self.config.max_steps;
        trace!(
            "step {}: action = {}, crashed = {}",
            self.steps,
            self.action_name(action),
            crashed
        );

        Ok((frame, reward, self.over))
    }

    fn num_actions(&self) -> usize {
        2
    }

    fn action_name(&self, action: usize) -> &str {
        match action {
            NOOP => "noop",
            JUMP => "jump",
            _ => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DinoRunConfig {
        DinoRunConfig::default().width(8).obstacle_prob(1.0).max_steps(50)
    }

    fn play(env: &mut DinoRun, policy: impl Fn(&DinoRun) -> usize) -> Result<(usize, f32)> {
        env.start_episode()?;
        let (mut steps, mut total) = (0, 0.0);
        loop {
            let action = policy(env);
            let (_, reward, terminated) = env.apply_action(action)?;
            steps += 1;
            total += reward;
            if terminated {
                return Ok((steps, total));
            }
        }
    }

    #[test]
    fn test_runner_crashes_without_jumping() -> Result<()> {
        let mut env = DinoRun::build(&config())?;
        let (steps, total) = play(&mut env, |_| NOOP)?;

        // The first obstacle enters at step `jump_duration + 2` and reaches
        // the runner column `width - 1 - RUNNER_COL` steps later.
        assert_eq!(steps, 5 + 8 - 1 - RUNNER_COL);
        let expected = (steps - 1) as f32 * SURVIVAL_REWARD + CRASH_REWARD;
        assert!((total - expected).abs() < 1e-5);
        assert!(env.apply_action(NOOP).is_err());
        Ok(())
    }

    #[test]
    fn test_jumping_in_time_survives() -> Result<()> {
        let mut env = DinoRun::build(&config())?;
        let jump_if_close = |env: &DinoRun| {
            if env.track()[RUNNER_COL + 1] {
                JUMP
            } else {
                NOOP
            }
        };
        let (steps, total) = play(&mut env, jump_if_close)?;
        assert_eq!(steps, 50);
        assert!((total - 50.0 * SURVIVAL_REWARD).abs() < 1e-4);
        Ok(())
    }

    #[test]
    fn test_frames() -> Result<()> {
        let mut env = DinoRun::build(&DinoRunConfig::default().width(6).obstacle_prob(0.0))?;
        let (frame, episode, terminated) = env.start_episode()?;
        assert_eq!(episode, 1);
        assert!(!terminated);
        assert_eq!(frame.len(), env.frame_len());
        assert_eq!(frame[6 + RUNNER_COL], RUNNER_PIXEL);

        let (frame, reward, _) = env.apply_action(JUMP)?;
        assert_eq!(reward, SURVIVAL_REWARD);
        assert_eq!(frame[RUNNER_COL], RUNNER_PIXEL);
        assert_eq!(frame[6 + RUNNER_COL], 0);

        assert!(env.apply_action(2).is_err());
        Ok(())
    }

    #[test]
    fn test_deterministic_given_seed() -> Result<()> {
        let config = DinoRunConfig::default().width(10).obstacle_prob(0.3);
        let tracks = |seed| -> Result<Vec<Vec<bool>>> {
            let mut env = DinoRun::build(&config.clone().seed(seed))?;
            env.start_episode()?;
            let mut tracks = vec![];
            for _ in 0..30 {
                env.apply_action(JUMP)?;
                tracks.push(env.track().to_vec());
            }
            Ok(tracks)
        };
        assert_eq!(tracks(7)?, tracks(7)?);
        assert_ne!(tracks(7)?, tracks(8)?);
        Ok(())
    }

    #[test]
    fn test_invalid_config() {
        assert!(DinoRun::build(&DinoRunConfig::default().width(3)).is_err());
        assert!(DinoRun::build(&DinoRunConfig::default().jump_duration(0)).is_err());
        assert!(DinoRun::build(&DinoRunConfig::default().obstacle_prob(1.5)).is_err());
    }
}
