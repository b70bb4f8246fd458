//! Training statistics tracking
//!
//! Tracks per-game scores, the best score so far, and loss values from the
//! trainer updates.

use std::collections::VecDeque;

/// Training statistics tracker with rolling averages
///
/// Keeps the full score history (for the overall mean) plus rolling windows
/// of recent scores, rewards and losses.
///
/// # Example
///
/// ```rust
/// use q_snake::metrics::TrainingStats;
///
/// let mut stats = TrainingStats::new(100);
///
/// stats.record_episode(5, -3.0, 150);
/// stats.record_loss(0.42);
///
/// assert_eq!(stats.record(), 5);
/// println!("{}", stats.format_summary());
/// ```
#[derive(Debug, Clone)]
pub struct TrainingStats {
    /// Every score recorded, in order
    scores: Vec<u32>,

    /// Sum of all scores
    total_score: u64,

    /// Best score seen
    record: u32,

    /// Recent scores (rolling window)
    recent_scores: VecDeque<u32>,

    /// Recent episode rewards (rolling window)
    recent_rewards: VecDeque<f32>,

    /// Recent losses (rolling window)
    recent_losses: VecDeque<f32>,

    /// Total number of environment steps taken
    total_steps: usize,

    /// Window size for rolling averages
    window_size: usize,
}

impl TrainingStats {
    /// Create a tracker keeping the last `window_size` values for rolling means
    pub fn new(window_size: usize) -> Self {
        let window_size = window_size.max(1);
        Self {
            scores: Vec::new(),
            total_score: 0,
            record: 0,
            recent_scores: VecDeque::with_capacity(window_size),
            recent_rewards: VecDeque::with_capacity(window_size),
            recent_losses: VecDeque::with_capacity(window_size),
            total_steps: 0,
            window_size,
        }
    }

    /// Record the end of a game
    ///
    /// # Arguments
    ///
    /// * `score` - Food eaten during the game
    /// * `reward` - Total reward accumulated during the game
    /// * `steps` - Number of steps taken
    ///
    /// Returns true when `score` beats the previous record.
    pub fn record_episode(&mut self, score: u32, reward: f32, steps: usize) -> bool {
        self.scores.push(score);
        self.total_score += u64::from(score);
        self.total_steps += steps;
        push_window(&mut self.recent_scores, score, self.window_size);
        push_window(&mut self.recent_rewards, reward, self.window_size);

        if score > self.record {
            self.record = score;
            true
        } else {
            false
        }
    }

    /// Record the loss of a trainer update
    pub fn record_loss(&mut self, loss: f32) {
        push_window(&mut self.recent_losses, loss, self.window_size);
    }

    /// Mean score over every recorded game
    pub fn mean_score(&self) -> f32 {
        if self.scores.is_empty() {
            0.0
        } else {
            self.total_score as f32 / self.scores.len() as f32
        }
    }

    /// Mean score over the rolling window
    pub fn rolling_mean_score(&self) -> f32 {
        mean(self.recent_scores.iter().map(|&s| s as f32))
    }

    pub fn mean_reward(&self) -> f32 {
        mean(self.recent_rewards.iter().copied())
    }

    pub fn mean_loss(&self) -> f32 {
        mean(self.recent_losses.iter().copied())
    }

    pub fn scores(&self) -> &[u32] {
        &self.scores
    }

    pub fn total_score(&self) -> u64 {
        self.total_score
    }

    pub fn record(&self) -> u32 {
        self.record
    }

    pub fn total_episodes(&self) -> usize {
        self.scores.len()
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// One-line progress summary
    pub fn format_summary(&self) -> String {
        format!(
            "Games: {} | Steps: {} | Record: {} | Mean: {:.2} | Recent: {:.2} | Reward: {:.2} | Loss: {:.4}",
            self.total_episodes(),
            self.total_steps,
            self.record,
            self.mean_score(),
            self.rolling_mean_score(),
            self.mean_reward(),
            self.mean_loss(),
        )
    }
}

fn mean(values: impl ExactSizeIterator<Item = f32>) -> f32 {
    let len = values.len();
    if len == 0 {
        0.0
    } else {
        values.sum::<f32>() / len as f32
    }
}

fn push_window<T>(deque: &mut VecDeque<T>, value: T, window_size: usize) {
    if deque.len() >= window_size {
        deque.pop_front();
    }
    deque.push_back(value);
}
