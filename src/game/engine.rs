use super::{
    action::{Direction, RelativeAction},
    config::GameConfig,
    error::GameError,
    state::{EpisodeStatus, GameState, Position, Snake, TerminationReason},
};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use tracing::debug;

/// What happened during a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Snake moved without growing
    Moved,
    /// Snake ate the food and grew by one segment
    AteFood,
    /// Episode ended
    Terminated(TerminationReason),
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Reward for this step (for RL training)
    pub reward: f32,
    /// Whether the episode has terminated
    pub done: bool,
    /// Score after this step
    pub score: u32,
    /// Additional information about the step
    pub outcome: StepOutcome,
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine, rejecting invalid configuration
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self { config, rng })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Start a fresh episode: heading right, snake centred and trailing left,
    /// zero score and frame counter, food sampled off the snake.
    pub fn reset(&mut self) -> Result<GameState, GameError> {
        let block = self.config.block_size;
        let head = Position::new(
            (self.config.columns() / 2) * block,
            (self.config.rows() / 2) * block,
        );

        let snake = Snake::new(
            head,
            Direction::Right,
            self.config.initial_snake_length,
            block,
        );

        let food = self.sample_food(&snake.body, None)?;

        Ok(GameState::new(
            snake,
            food,
            self.config.width,
            self.config.height,
            block,
        ))
    }

    /// Execute one step of the game.
    ///
    /// Calling this on a terminated episode returns
    /// [`GameError::EpisodeTerminated`]. On any error the state is left untouched.
    pub fn step(
        &mut self,
        state: &mut GameState,
        action: RelativeAction,
    ) -> Result<StepResult, GameError> {
        if !state.is_running() {
            return Err(GameError::EpisodeTerminated);
        }

        let frame_iteration = state.frame_iteration + 1;
        let direction = action.resolve(state.snake.direction);
        let new_head = state
            .snake
            .head()
            .moved_in_direction(direction, self.config.block_size);

        // Length once the new head is prepended, before any tail pop.
        let grown_length = state.snake.len() + 1;

        let outcome = if frame_iteration > self.config.timeout_factor * grown_length {
            StepOutcome::Terminated(TerminationReason::Timeout)
        } else if !state.is_in_bounds(new_head) {
            StepOutcome::Terminated(TerminationReason::Wall)
        } else if state.is_occupied_by_snake(new_head) {
            // The whole current body is `snake[1..]` once the new head is in front.
            StepOutcome::Terminated(TerminationReason::SelfCollision)
        } else if new_head == state.food {
            StepOutcome::AteFood
        } else {
            StepOutcome::Moved
        };

        // Resolve the only fallible part before committing anything.
        let next_food = match outcome {
            StepOutcome::AteFood => Some(self.sample_food(&state.snake.body, Some(new_head))?),
            _ => None,
        };

        state.frame_iteration = frame_iteration;
        state.snake.direction = direction;
        state.snake.push_head(new_head);

        let score = state.score as f32;
        let reward = match outcome {
            StepOutcome::Terminated(reason) => {
                state.status = EpisodeStatus::Terminated(reason);
                let base = match reason {
                    TerminationReason::Timeout => self.config.timeout_penalty,
                    TerminationReason::Wall | TerminationReason::SelfCollision => {
                        self.config.collision_penalty
                    }
                };
                debug!(?reason, score = state.score, frame_iteration, "episode terminated");
                base - score
            }
            StepOutcome::AteFood => {
                state.score += 1;
                if let Some(food) = next_food {
                    state.food = food;
                }
                self.config.food_reward
            }
            StepOutcome::Moved => {
                state.snake.pop_tail();
                0.0
            }
        };

        Ok(StepResult {
            reward,
            done: !state.is_running(),
            score: state.score,
            outcome,
        })
    }

    /// Pick a uniformly random cell not covered by `body` or `extra`.
    ///
    /// Tries `max_food_attempts` random draws first, then chooses among the
    /// remaining free cells directly.
    fn sample_food(
        &mut self,
        body: &[Position],
        extra: Option<Position>,
    ) -> Result<Position, GameError> {
        let columns = self.config.columns();
        let rows = self.config.rows();
        let block = self.config.block_size;

        let is_occupied = |pos: Position| extra == Some(pos) || body.contains(&pos);

        let occupied = body.len() + extra.map_or(0, |pos| usize::from(!body.contains(&pos)));
        if occupied >= (columns * rows) as usize {
            return Err(GameError::NoFreeCell);
        }

        for _ in 0..self.config.max_food_attempts {
            let pos = Position::new(
                self.rng.gen_range(0..columns) * block,
                self.rng.gen_range(0..rows) * block,
            );

            if !is_occupied(pos) {
                return Ok(pos);
            }
        }

        let free: Vec<Position> = (0..rows)
            .flat_map(|row| (0..columns).map(move |col| Position::new(col * block, row * block)))
            .filter(|&pos| !is_occupied(pos))
            .collect();

        free.choose(&mut self.rng)
            .copied()
            .ok_or(GameError::NoFreeCell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_engine(config: GameConfig) -> GameEngine {
        GameEngine::new(config.with_seed(7)).unwrap()
    }

    #[test]
    fn test_reset() {
        let mut engine = seeded_engine(GameConfig::default());
        let state = engine.reset().unwrap();

        assert!(state.is_running());
        assert_eq!(state.score, 0);
        assert_eq!(state.frame_iteration, 0);
        assert_eq!(state.snake.direction, Direction::Right);
        assert_eq!(
            state.snake.body,
            vec![
                Position::new(320, 240),
                Position::new(300, 240),
                Position::new(280, 240)
            ]
        );
        assert!(!state.is_occupied_by_snake(state.food));
    }

    #[test]
    fn test_reset_is_repeatable() {
        let mut engine = GameEngine::new(GameConfig::default()).unwrap();
        let first = engine.reset().unwrap();
        let second = engine.reset().unwrap();

        assert_eq!(first.snake, second.snake);
        assert_eq!(first.score, second.score);
        assert_eq!(first.frame_iteration, second.frame_iteration);
        assert_eq!(first.status, second.status);
    }

    #[test]
    fn test_straight_step_from_centre() {
        let mut engine = seeded_engine(GameConfig::default());
        let mut state = engine.reset().unwrap();
        state.food = Position::new(0, 0);

        let result = engine.step(&mut state, RelativeAction::Straight).unwrap();

        assert_eq!(result.reward, 0.0);
        assert!(!result.done);
        assert_eq!(result.score, 0);
        assert_eq!(result.outcome, StepOutcome::Moved);
        assert_eq!(state.frame_iteration, 1);
        assert_eq!(
            state.snake.body,
            vec![
                Position::new(340, 240),
                Position::new(320, 240),
                Position::new(300, 240)
            ]
        );
    }

    #[test]
    fn test_turns_change_heading() {
        let mut engine = seeded_engine(GameConfig::default());
        let mut state = engine.reset().unwrap();
        state.food = Position::new(0, 0);

        engine.step(&mut state, RelativeAction::TurnRight).unwrap();
        assert_eq!(state.snake.direction, Direction::Down);
        assert_eq!(state.snake.head(), Position::new(320, 260));

        engine.step(&mut state, RelativeAction::TurnLeft).unwrap();
        assert_eq!(state.snake.direction, Direction::Right);
        assert_eq!(state.snake.head(), Position::new(340, 260));
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = seeded_engine(GameConfig::default());
        let mut state = engine.reset().unwrap();

        // Place food directly in front of snake
        state.food = Position::new(340, 240);
        let initial_length = state.snake.len();

        let result = engine.step(&mut state, RelativeAction::Straight).unwrap();

        assert_eq!(result.outcome, StepOutcome::AteFood);
        assert_eq!(result.reward, 10.0);
        assert!(!result.done);
        assert_eq!(result.score, 1);
        assert_eq!(state.snake.len(), initial_length + 1);
        assert!(!state.is_occupied_by_snake(state.food));
    }

    #[test]
    fn test_wall_collision() {
        let mut engine = seeded_engine(GameConfig::default());
        let snake = Snake::new(Position::new(620, 240), Direction::Right, 3, 20);
        let mut state = GameState::new(snake, Position::new(0, 0), 640, 480, 20);
        state.score = 3;

        let result = engine.step(&mut state, RelativeAction::Straight).unwrap();

        assert!(result.done);
        assert_eq!(result.reward, -13.0);
        assert_eq!(
            result.outcome,
            StepOutcome::Terminated(TerminationReason::Wall)
        );
        assert!(!state.is_running());
    }

    #[test]
    fn test_drive_into_right_wall() {
        let mut engine = seeded_engine(GameConfig::default());
        let mut state = engine.reset().unwrap();
        state.food = Position::new(0, 0);

        // Head starts at x=320, the last legal column is x=620.
        for _ in 0..15 {
            let result = engine.step(&mut state, RelativeAction::Straight).unwrap();
            assert!(!result.done);
        }
        assert_eq!(state.snake.head(), Position::new(620, 240));

        let result = engine.step(&mut state, RelativeAction::Straight).unwrap();
        assert!(result.done);
        assert_eq!(result.reward, -10.0);
    }

    #[test]
    fn test_self_collision() {
        let mut engine = seeded_engine(GameConfig::default());

        // Body: (100,100) (80,100) (60,100) (40,100) (20,100), heading right
        let snake = Snake::new(Position::new(100, 100), Direction::Right, 5, 20);
        let mut state = GameState::new(snake, Position::new(600, 400), 640, 480, 20);

        // Down: head (100,120)
        engine.step(&mut state, RelativeAction::TurnRight).unwrap();
        // Left: head (80,120)
        engine.step(&mut state, RelativeAction::TurnRight).unwrap();
        // Up: head (80,100), still part of the body
        let result = engine.step(&mut state, RelativeAction::TurnRight).unwrap();

        assert!(result.done);
        assert_eq!(result.reward, -10.0);
        assert_eq!(
            result.outcome,
            StepOutcome::Terminated(TerminationReason::SelfCollision)
        );
    }

    #[test]
    fn test_timeout_uses_grown_length() {
        let mut engine = seeded_engine(GameConfig::default());
        let mut state = engine.reset().unwrap();
        state.food = Position::new(0, 0);
        state.score = 2;

        // Length 3 grows to 4 with the new head: the budget is 400 frames.
        state.frame_iteration = 399;
        let result = engine.step(&mut state, RelativeAction::Straight).unwrap();
        assert!(!result.done);

        let result = engine.step(&mut state, RelativeAction::Straight).unwrap();
        assert!(result.done);
        assert_eq!(result.reward, -3.0);
        assert_eq!(
            result.outcome,
            StepOutcome::Terminated(TerminationReason::Timeout)
        );
    }

    #[test]
    fn test_timeout_takes_priority_over_collision() {
        let mut engine = seeded_engine(GameConfig::default());
        let snake = Snake::new(Position::new(620, 240), Direction::Right, 3, 20);
        let mut state = GameState::new(snake, Position::new(0, 0), 640, 480, 20);
        state.frame_iteration = 400;

        let result = engine.step(&mut state, RelativeAction::Straight).unwrap();
        assert_eq!(
            result.outcome,
            StepOutcome::Terminated(TerminationReason::Timeout)
        );
        assert_eq!(result.reward, -1.0);
    }

    #[test]
    fn test_step_after_termination_is_rejected() {
        let mut engine = seeded_engine(GameConfig::default());
        let snake = Snake::new(Position::new(620, 240), Direction::Right, 3, 20);
        let mut state = GameState::new(snake, Position::new(0, 0), 640, 480, 20);

        engine.step(&mut state, RelativeAction::Straight).unwrap();
        let snapshot = state.clone();

        let result = engine.step(&mut state, RelativeAction::Straight);
        assert_eq!(result, Err(GameError::EpisodeTerminated));
        assert_eq!(state, snapshot);
    }

    #[test]
    fn test_food_never_lands_on_snake() {
        let mut engine = seeded_engine(GameConfig::small());
        let mut state = engine.reset().unwrap();

        let actions = [
            RelativeAction::Straight,
            RelativeAction::TurnRight,
            RelativeAction::Straight,
            RelativeAction::TurnLeft,
        ];

        for i in 0..2000 {
            assert!(!state.is_occupied_by_snake(state.food));
            let result = engine.step(&mut state, actions[i % actions.len()]).unwrap();
            if result.done {
                state = engine.reset().unwrap();
            }
        }
    }

    #[test]
    fn test_length_invariants() {
        let mut engine = seeded_engine(GameConfig::default());
        let mut state = engine.reset().unwrap();
        state.food = Position::new(0, 0);

        let before = state.snake.len();
        engine.step(&mut state, RelativeAction::TurnLeft).unwrap();
        assert_eq!(state.snake.len(), before);

        let ahead = state
            .snake
            .head()
            .moved_in_direction(state.snake.direction, 20);
        state.food = ahead;
        engine.step(&mut state, RelativeAction::Straight).unwrap();
        assert_eq!(state.snake.len(), before + 1);
    }

    #[test]
    fn test_full_grid_fails_without_mutation() {
        // 4x1 cells: snake covers columns 0..=2, food must go to column 3
        let config = GameConfig::new(80, 20).with_seed(1);
        let mut engine = GameEngine::new(config).unwrap();
        let mut state = engine.reset().unwrap();
        assert_eq!(state.food, Position::new(60, 0));

        let snapshot = state.clone();
        let result = engine.step(&mut state, RelativeAction::Straight);

        assert_eq!(result, Err(GameError::NoFreeCell));
        assert_eq!(state, snapshot);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(GameEngine::new(GameConfig::new(650, 480)).is_err());
    }
}
