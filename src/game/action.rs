use super::error::GameError;

/// Absolute heading of the snake on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Right,
    Down,
    Left,
    Up,
}

impl Direction {
    /// Clockwise ordering used for relative turning
    pub const CLOCKWISE: [Direction; 4] = [
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Up,
    ];

    /// Position of this direction in the clockwise cycle
    pub fn clockwise_index(&self) -> usize {
        match self {
            Direction::Right => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Up => 3,
        }
    }

    /// Next direction clockwise (a right turn)
    pub fn clockwise(&self) -> Direction {
        Self::CLOCKWISE[(self.clockwise_index() + 1) % 4]
    }

    /// Next direction counter-clockwise (a left turn)
    pub fn counter_clockwise(&self) -> Direction {
        Self::CLOCKWISE[(self.clockwise_index() + 3) % 4]
    }

    /// Returns the unit delta (dx, dy) for moving in this direction.
    /// Screen coordinates: y grows downward.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Turn command relative to the current heading
///
/// Encoded on the wire as a one-hot vector of length 3 with the fixed index
/// order `[straight, right, left]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelativeAction {
    Straight,
    TurnRight,
    TurnLeft,
}

impl RelativeAction {
    /// Number of discrete actions
    pub const COUNT: usize = 3;

    /// All actions in one-hot index order
    pub const ALL: [RelativeAction; 3] = [
        RelativeAction::Straight,
        RelativeAction::TurnRight,
        RelativeAction::TurnLeft,
    ];

    /// Index of this action in the one-hot encoding
    pub fn index(&self) -> usize {
        match self {
            RelativeAction::Straight => 0,
            RelativeAction::TurnRight => 1,
            RelativeAction::TurnLeft => 2,
        }
    }

    /// Action for a one-hot index
    pub fn from_index(idx: usize) -> Result<Self, GameError> {
        Self::ALL.get(idx).copied().ok_or_else(|| {
            GameError::InvalidAction(format!("action index {idx} out of range 0..3"))
        })
    }

    /// Decode a one-hot vector. Anything other than exactly one `1` among
    /// three `0`/`1` entries is rejected.
    pub fn from_one_hot(one_hot: &[f32]) -> Result<Self, GameError> {
        if one_hot.len() != Self::COUNT {
            return Err(GameError::InvalidAction(format!(
                "expected one-hot vector of length {}, got {}",
                Self::COUNT,
                one_hot.len()
            )));
        }

        let mut selected = None;
        for (idx, &value) in one_hot.iter().enumerate() {
            if value == 1.0 {
                if selected.is_some() {
                    return Err(GameError::InvalidAction(format!(
                        "more than one hot entry in {one_hot:?}"
                    )));
                }
                selected = Some(idx);
            } else if value != 0.0 {
                return Err(GameError::InvalidAction(format!(
                    "non-binary entry {value} in {one_hot:?}"
                )));
            }
        }

        match selected {
            Some(idx) => Self::from_index(idx),
            None => Err(GameError::InvalidAction(format!(
                "no hot entry in {one_hot:?}"
            ))),
        }
    }

    /// One-hot encoding `[straight, right, left]`
    pub fn to_one_hot(&self) -> [f32; 3] {
        let mut one_hot = [0.0; 3];
        one_hot[self.index()] = 1.0;
        one_hot
    }

    /// Absolute direction after applying this turn to `current`
    pub fn resolve(&self, current: Direction) -> Direction {
        match self {
            RelativeAction::Straight => current,
            RelativeAction::TurnRight => current.clockwise(),
            RelativeAction::TurnLeft => current.counter_clockwise(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_keeps_direction() {
        for direction in Direction::CLOCKWISE {
            assert_eq!(RelativeAction::Straight.resolve(direction), direction);
        }
    }

    #[test]
    fn test_four_turns_close_the_cycle() {
        for direction in Direction::CLOCKWISE {
            let mut right = direction;
            let mut left = direction;
            for _ in 0..4 {
                right = RelativeAction::TurnRight.resolve(right);
                left = RelativeAction::TurnLeft.resolve(left);
            }
            assert_eq!(right, direction);
            assert_eq!(left, direction);
        }
    }

    #[test]
    fn test_clockwise_order() {
        assert_eq!(Direction::Right.clockwise(), Direction::Down);
        assert_eq!(Direction::Down.clockwise(), Direction::Left);
        assert_eq!(Direction::Left.clockwise(), Direction::Up);
        assert_eq!(Direction::Up.clockwise(), Direction::Right);

        assert_eq!(Direction::Right.counter_clockwise(), Direction::Up);
        assert_eq!(Direction::Up.counter_clockwise(), Direction::Left);
    }

    #[test]
    fn test_direction_delta() {
        assert_eq!(Direction::Up.delta(), (0, -1));
        assert_eq!(Direction::Down.delta(), (0, 1));
        assert_eq!(Direction::Left.delta(), (-1, 0));
        assert_eq!(Direction::Right.delta(), (1, 0));
    }

    #[test]
    fn test_one_hot_decoding() {
        assert_eq!(
            RelativeAction::from_one_hot(&[1.0, 0.0, 0.0]).unwrap(),
            RelativeAction::Straight
        );
        assert_eq!(
            RelativeAction::from_one_hot(&[0.0, 1.0, 0.0]).unwrap(),
            RelativeAction::TurnRight
        );
        assert_eq!(
            RelativeAction::from_one_hot(&[0.0, 0.0, 1.0]).unwrap(),
            RelativeAction::TurnLeft
        );
        assert_eq!(RelativeAction::TurnLeft.to_one_hot(), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_invalid_one_hot_rejected() {
        assert!(RelativeAction::from_one_hot(&[0.0, 0.0, 0.0]).is_err());
        assert!(RelativeAction::from_one_hot(&[1.0, 1.0, 0.0]).is_err());
        assert!(RelativeAction::from_one_hot(&[0.5, 0.0, 0.0]).is_err());
        assert!(RelativeAction::from_one_hot(&[1.0, 0.0]).is_err());
        assert!(RelativeAction::from_index(3).is_err());
    }
}
