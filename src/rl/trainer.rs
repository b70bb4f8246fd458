//! One-step Q-learning trainer
//!
//! For every transition `(s, a, r, s', done)` in a batch the trainer builds a
//! target vector equal to the network's own prediction `Q(s)`, except at the
//! taken action where it holds
//!
//! ```text
//! r                          if done
//! r + gamma * max_a' Q(s', a')   otherwise
//! ```
//!
//! The target is assembled from plain data, so it is a constant with respect
//! to the parameters. The untouched entries equal the prediction exactly and
//! contribute no gradient, leaving only the taken action's error to drive the
//! single Adam step on the mean squared error.

use burn::{
    module::{AutodiffModule, Module},
    nn::loss::{MseLoss, Reduction},
    optim::{Adam, AdamConfig, GradientsParams, Optimizer, adaptor::OptimizerAdaptor},
    tensor::{
        ElementConversion, Tensor, TensorData,
        backend::{AutodiffBackend, Backend},
    },
};
use tracing::trace;

use super::config::TrainerConfig;
use super::error::TrainError;
use super::network::{QNetwork, QNetworkConfig, QNetworkRecord};
use crate::game::RelativeAction;

/// A single experience tuple `(state, action, reward, next_state, done)`
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: Vec<f32>,
    pub action: RelativeAction,
    pub reward: f32,
    pub next_state: Vec<f32>,
    pub done: bool,
}

impl Transition {
    pub fn new(
        state: Vec<f32>,
        action: RelativeAction,
        reward: f32,
        next_state: Vec<f32>,
        done: bool,
    ) -> Self {
        Self {
            state,
            action,
            reward,
            next_state,
            done,
        }
    }
}

/// Owns the value network and its optimizer
///
/// # Type Parameters
///
/// * `B` - Autodiff backend for gradient computation
pub struct QTrainer<B: AutodiffBackend> {
    /// Value network being trained
    model: QNetwork<B>,

    /// Adam optimizer for network parameters
    optim: OptimizerAdaptor<Adam, QNetwork<B>, B>,

    /// Layer sizes of `model`
    network_config: QNetworkConfig,

    /// Learning rate and discount
    config: TrainerConfig,

    /// Number of optimizer steps taken
    training_steps: usize,

    /// Device for tensor operations
    device: B::Device,
}

impl<B: AutodiffBackend> QTrainer<B> {
    /// Create a trainer around a freshly initialised network.
    ///
    /// The network must produce exactly one score per [`RelativeAction`].
    pub fn new(
        network_config: QNetworkConfig,
        config: TrainerConfig,
        device: B::Device,
    ) -> Result<Self, TrainError> {
        config.validate()?;

        if network_config.input_size == 0 {
            return Err(TrainError::InvalidConfig(
                "network input_size must be at least 1".to_string(),
            ));
        }

        if network_config.output_size != RelativeAction::COUNT {
            return Err(TrainError::InvalidConfig(format!(
                "network must output {} action scores, got {}",
                RelativeAction::COUNT,
                network_config.output_size
            )));
        }

        let model = network_config.init::<B>(&device);
        let optim = AdamConfig::new().init();

        Ok(Self {
            model,
            optim,
            network_config,
            config,
            training_steps: 0,
            device,
        })
    }

    pub fn network(&self) -> &QNetwork<B> {
        &self.model
    }

    pub fn network_config(&self) -> QNetworkConfig {
        self.network_config
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn training_steps(&self) -> usize {
        self.training_steps
    }

    /// Copy of the current parameters
    pub fn parameters(&self) -> QNetworkRecord<B> {
        self.model.clone().into_record()
    }

    /// Replace the current parameters
    pub fn load_parameters(&mut self, record: QNetworkRecord<B>) {
        self.model = self.model.clone().load_record(record);
    }

    /// Q-value estimates for a single observation, without gradient tracking
    pub fn q_values(&self, state: &[f32]) -> Result<Vec<f32>, TrainError> {
        self.check_dim("state", state.len())?;

        let input = Tensor::<B::InnerBackend, 2>::from_data(
            TensorData::new(state.to_vec(), [1, state.len()]),
            &self.device,
        );

        to_vec(self.model.valid().forward(input))
    }

    /// Greedy action for a single observation
    pub fn best_action(&self, state: &[f32]) -> Result<RelativeAction, TrainError> {
        let q = self.q_values(state)?;
        let idx = argmax(&q);
        RelativeAction::from_index(idx)
            .map_err(|e| TrainError::InvalidConfig(e.to_string()))
    }

    /// Predictions and Q-learning targets for a batch, row-major `[batch, 3]`
    pub fn targets(&self, batch: &[Transition]) -> Result<(Vec<f32>, Vec<f32>), TrainError> {
        self.check_batch(batch)?;

        let states = self.batch_tensor::<B::InnerBackend>(
            batch.iter().map(|t| t.state.as_slice()),
            batch.len(),
        );
        let predictions = to_vec(self.model.valid().forward(states))?;
        let targets = self.build_targets(batch, &predictions)?;

        Ok((predictions, targets))
    }

    /// Train on one transition (a batch of size 1)
    pub fn train_step(&mut self, transition: &Transition) -> Result<f32, TrainError> {
        self.train_batch(std::slice::from_ref(transition))
    }

    /// One gradient step on a batch of transitions.
    ///
    /// Returns the mean squared error measured before the update.
    pub fn train_batch(&mut self, batch: &[Transition]) -> Result<f32, TrainError> {
        self.check_batch(batch)?;

        let batch_size = batch.len();
        let output_size = self.network_config.output_size;

        let states =
            self.batch_tensor::<B>(batch.iter().map(|t| t.state.as_slice()), batch_size);
        let pred = self.model.forward(states);

        let predictions = to_vec(pred.clone())?;
        let targets = self.build_targets(batch, &predictions)?;
        let target = Tensor::<B, 2>::from_data(
            TensorData::new(targets, [batch_size, output_size]),
            &self.device,
        );

        let loss = MseLoss::new().forward(pred, target, Reduction::Mean);
        let loss_value = loss.clone().into_scalar().elem::<f32>();

        let grads = loss.backward();
        let grads = GradientsParams::from_grads(grads, &self.model);
        self.model = self
            .optim
            .step(self.config.learning_rate, self.model.clone(), grads);

        self.training_steps += 1;
        trace!(batch_size, loss = loss_value, "q-learning update");

        Ok(loss_value)
    }

    /// Copy `predictions` and overwrite the taken action of each row with its
    /// one-step return.
    fn build_targets(
        &self,
        batch: &[Transition],
        predictions: &[f32],
    ) -> Result<Vec<f32>, TrainError> {
        let output_size = self.network_config.output_size;

        let next_states = self.batch_tensor::<B::InnerBackend>(
            batch.iter().map(|t| t.next_state.as_slice()),
            batch.len(),
        );
        let next_max = to_vec(self.model.valid().forward(next_states).max_dim(1))?;

        let mut targets = predictions.to_vec();
        for (row, transition) in batch.iter().enumerate() {
            let q_new = if transition.done {
                transition.reward
            } else {
                transition.reward + self.config.gamma * next_max[row]
            };
            targets[row * output_size + transition.action.index()] = q_new;
        }

        Ok(targets)
    }

    fn batch_tensor<'a, K: Backend<Device = B::Device>>(
        &self,
        rows: impl Iterator<Item = &'a [f32]>,
        batch_size: usize,
    ) -> Tensor<K, 2> {
        let input_size = self.network_config.input_size;
        let mut flat = Vec::with_capacity(batch_size * input_size);
        for row in rows {
            flat.extend_from_slice(row);
        }

        Tensor::from_data(TensorData::new(flat, [batch_size, input_size]), &self.device)
    }

    fn check_batch(&self, batch: &[Transition]) -> Result<(), TrainError> {
        if batch.is_empty() {
            return Err(TrainError::EmptyBatch);
        }

        for transition in batch {
            self.check_dim("state", transition.state.len())?;
            self.check_dim("next_state", transition.next_state.len())?;
        }

        Ok(())
    }

    fn check_dim(&self, field: &'static str, actual: usize) -> Result<(), TrainError> {
        let expected = self.network_config.input_size;
        if actual != expected {
            return Err(TrainError::ShapeMismatch {
                field,
                expected,
                actual,
            });
        }
        Ok(())
    }
}

fn to_vec<K: Backend, const D: usize>(tensor: Tensor<K, D>) -> Result<Vec<f32>, TrainError> {
    tensor
        .into_data()
        .convert::<f32>()
        .to_vec::<f32>()
        .map_err(|e| TrainError::TensorData(format!("{e:?}")))
}

/// Index of the largest value; the first one wins ties
pub fn argmax(values: &[f32]) -> usize {
    let mut best_idx = 0;
    for (idx, &value) in values.iter().enumerate().skip(1) {
        if value > values[best_idx] {
            best_idx = idx;
        }
    }
    best_idx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rl::{TrainingBackend, default_device};

    const INPUT: usize = 4;

    fn trainer(gamma: f32, learning_rate: f64) -> QTrainer<TrainingBackend> {
        let config = TrainerConfig {
            learning_rate,
            gamma,
            hidden_size: 16,
        };
        QTrainer::new(QNetworkConfig::new(INPUT, 16, 3), config, default_device()).unwrap()
    }

    fn terminal(action: RelativeAction, reward: f32) -> Transition {
        Transition::new(
            vec![0.5, -0.25, 1.0, 0.0],
            action,
            reward,
            vec![0.0, 0.0, 0.0, 1.0],
            true,
        )
    }

    #[test]
    fn test_terminal_target_sets_only_selected_action() {
        let trainer = trainer(0.9, 1e-3);
        let batch = [terminal(RelativeAction::TurnRight, 5.0)];

        let (predictions, targets) = trainer.targets(&batch).unwrap();

        assert_eq!(targets[0], predictions[0]);
        assert_eq!(targets[1], 5.0);
        assert_eq!(targets[2], predictions[2]);
    }

    #[test]
    fn test_terminal_loss_is_selected_error_only() {
        let mut trainer = trainer(0.9, 1e-3);
        let transition = terminal(RelativeAction::TurnRight, 5.0);

        let (predictions, _) = trainer.targets(std::slice::from_ref(&transition)).unwrap();
        let expected = (predictions[1] - 5.0).powi(2) / 3.0;

        let loss = trainer.train_step(&transition).unwrap();
        assert!((loss - expected).abs() < 1e-4, "loss {} vs {}", loss, expected);
        assert!(loss > 0.0);
        assert_eq!(trainer.training_steps(), 1);
    }

    #[test]
    fn test_bootstrap_target() {
        let trainer = trainer(0.9, 1e-3);
        let transition = Transition::new(
            vec![1.0, 0.0, 0.0, 0.0],
            RelativeAction::Straight,
            1.5,
            vec![0.0, 1.0, 0.0, 0.5],
            false,
        );

        let next_q = trainer.q_values(&transition.next_state).unwrap();
        let next_max = next_q.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

        let (predictions, targets) = trainer.targets(&[transition]).unwrap();

        assert!((targets[0] - (1.5 + 0.9 * next_max)).abs() < 1e-5);
        assert_eq!(targets[1], predictions[1]);
        assert_eq!(targets[2], predictions[2]);
    }

    #[test]
    fn test_batch_targets_row_per_transition() {
        let trainer = trainer(0.5, 1e-3);
        let batch = vec![
            terminal(RelativeAction::Straight, -10.0),
            terminal(RelativeAction::TurnLeft, 10.0),
        ];

        let (predictions, targets) = trainer.targets(&batch).unwrap();

        assert_eq!(targets.len(), 6);
        assert_eq!(targets[0], -10.0);
        assert_eq!(targets[1], predictions[1]);
        assert_eq!(targets[2], predictions[2]);
        assert_eq!(targets[3], predictions[3]);
        assert_eq!(targets[4], predictions[4]);
        assert_eq!(targets[5], 10.0);
    }

    #[test]
    fn test_training_moves_prediction_toward_target() {
        let mut trainer = trainer(0.9, 1e-2);
        let transition = terminal(RelativeAction::TurnRight, 5.0);

        let before = trainer.q_values(&transition.state).unwrap()[1];
        for _ in 0..200 {
            trainer.train_step(&transition).unwrap();
        }
        let after = trainer.q_values(&transition.state).unwrap()[1];

        assert!(
            (after - 5.0).abs() < (before - 5.0).abs(),
            "expected {} to be closer to 5 than {}",
            after,
            before
        );
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let mut trainer = trainer(0.9, 1e-3);
        let bad = Transition::new(
            vec![0.0; INPUT + 1],
            RelativeAction::Straight,
            0.0,
            vec![0.0; INPUT],
            false,
        );

        assert!(matches!(
            trainer.train_step(&bad),
            Err(TrainError::ShapeMismatch { field: "state", .. })
        ));
        assert!(trainer.q_values(&[0.0; 2]).is_err());
        assert_eq!(trainer.training_steps(), 0);
    }

    #[test]
    fn test_empty_batch_rejected() {
        let mut trainer = trainer(0.9, 1e-3);
        assert!(matches!(trainer.train_batch(&[]), Err(TrainError::EmptyBatch)));
    }

    #[test]
    fn test_wrong_output_size_rejected() {
        let result = QTrainer::<TrainingBackend>::new(
            QNetworkConfig::new(INPUT, 16, 4),
            TrainerConfig::default(),
            default_device(),
        );
        assert!(matches!(result, Err(TrainError::InvalidConfig(_))));
    }

    #[test]
    fn test_parameters_round_trip() {
        let mut first = trainer(0.9, 1e-3);
        let second = trainer(0.9, 1e-3);
        let state = [0.1, 0.2, 0.3, 0.4];

        first.load_parameters(second.parameters());

        assert_eq!(first.q_values(&state).unwrap(), second.q_values(&state).unwrap());
    }

    #[test]
    fn test_argmax() {
        assert_eq!(argmax(&[0.1, 0.6, 0.2]), 1);
        assert_eq!(argmax(&[1.0, 1.0, 0.0]), 0);
        assert_eq!(argmax(&[-3.0, -2.0, -1.0]), 2);
    }
}
