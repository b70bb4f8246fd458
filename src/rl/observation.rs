use crate::game::{Direction, GameState, RelativeAction};

/// Length of the feature vector produced by [`create_observation`]
pub const OBSERVATION_SIZE: usize = 11;

/// Encode the game state as 11 binary features
///
/// - 0..3: danger one block ahead after going straight, turning right, turning left
/// - 3..7: current heading (left, right, up, down)
/// - 7..11: food lies left of, right of, above, below the head
pub fn create_observation(state: &GameState) -> Vec<f32> {
    let head = state.snake.head();
    let heading = state.snake.direction;

    let mut features = Vec::with_capacity(OBSERVATION_SIZE);

    for action in RelativeAction::ALL {
        let probe = head.moved_in_direction(action.resolve(heading), state.block_size);
        features.push(flag(state.is_collision_at(probe)));
    }

    features.push(flag(heading == Direction::Left));
    features.push(flag(heading == Direction::Right));
    features.push(flag(heading == Direction::Up));
    features.push(flag(heading == Direction::Down));

    features.push(flag(state.food.x < head.x));
    features.push(flag(state.food.x > head.x));
    features.push(flag(state.food.y < head.y));
    features.push(flag(state.food.y > head.y));

    features
}

fn flag(value: bool) -> f32 {
    if value { 1.0 } else { 0.0 }
}
