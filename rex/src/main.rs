use anyhow::Result;
use clap::{Parser, Subcommand};
use rex::{play, rex_core::record::LogRecorder, train, RexConfig};

/// Double DQN agent playing a runner game.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Train an agent
    Train {
        /// YAML configuration of the training run, defaults are used if not given
        #[arg(long)]
        config: Option<String>,

        /// Directory of checkpoints
        #[arg(long, default_value_t = String::from("./model/rex"))]
        model_dir: String,
    },

    /// Play episodes greedily with a trained agent
    Play {
        /// Directory of checkpoints
        #[arg(long, default_value_t = String::from("./model/rex"))]
        model_dir: String,

        /// Checkpoint in the model directory
        #[arg(long, default_value_t = String::from("final"))]
        checkpoint: String,

        /// Number of episodes
        #[arg(long, default_value_t = 5)]
        episodes: usize,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match args.command {
        Command::Train { config, model_dir } => {
            let config = match config {
                Some(path) => RexConfig::load(path)?,
                None => RexConfig::default(),
            };
            train(&config, &model_dir, &mut LogRecorder::new())?;
        }
        Command::Play {
            model_dir,
            checkpoint,
            episodes,
        } => {
            play(&model_dir, &checkpoint, episodes, &mut LogRecorder::new())?;
        }
    }

    Ok(())
}
