use super::action::Direction;

/// A cell position on the game grid, in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position one block in a direction
    pub fn moved_in_direction(&self, direction: Direction, block_size: i32) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx * block_size, dy * block_size)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Current direction of movement
    pub direction: Direction,
}

impl Snake {
    /// Create a snake whose segments trail behind `head`, opposite to `direction`
    pub fn new(head: Position, direction: Direction, length: usize, block_size: i32) -> Self {
        let mut body = vec![head];

        let (dx, dy) = direction.delta();
        let (back_dx, back_dy) = (-dx * block_size, -dy * block_size);

        for i in 1..length {
            let prev = body[i - 1];
            body.push(prev.moved_by(back_dx, back_dy));
        }

        Self { body, direction }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        &self.body[1..]
    }

    /// Check if position collides with snake body (excluding head)
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body_segments().contains(&pos)
    }

    /// Prepend a new head
    pub fn push_head(&mut self, head: Position) {
        self.body.insert(0, head);
    }

    /// Drop the last segment
    pub fn pop_tail(&mut self) -> Option<Position> {
        self.body.pop()
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Why an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// Frame counter exceeded the starvation budget
    Timeout,
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Lifecycle of a single episode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeStatus {
    Running,
    Terminated(TerminationReason),
}

/// Complete episode state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    pub width: i32,
    pub height: i32,
    pub block_size: i32,
    pub score: u32,
    /// Steps taken since the last reset
    pub frame_iteration: usize,
    pub status: EpisodeStatus,
}

impl GameState {
    /// Create a new running episode
    pub fn new(snake: Snake, food: Position, width: i32, height: i32, block_size: i32) -> Self {
        Self {
            snake,
            food,
            width,
            height,
            block_size,
            score: 0,
            frame_iteration: 0,
            status: EpisodeStatus::Running,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == EpisodeStatus::Running
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x <= self.width - self.block_size
            && pos.y >= 0
            && pos.y <= self.height - self.block_size
    }

    /// Check if a position is occupied by any snake segment, head included
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.body.contains(&pos)
    }

    /// Collision test for the current head against walls and `snake[1..]`
    pub fn is_collision(&self) -> bool {
        self.is_collision_at(self.snake.head())
    }

    /// Collision test for an arbitrary point.
    ///
    /// The body test always skips index 0, so the head never collides with
    /// itself. Callers probing a cell the snake has not moved into yet should
    /// be aware the current head is not considered an obstacle.
    pub fn is_collision_at(&self, point: Position) -> bool {
        !self.is_in_bounds(point) || self.snake.collides_with_body(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_at(head: Position) -> GameState {
        GameState::new(
            Snake::new(head, Direction::Right, 3, 20),
            Position::new(0, 0),
            640,
            480,
            20,
        )
    }

    #[test]
    fn test_position_movement() {
        let pos = Position::new(100, 100);
        assert_eq!(pos.moved_in_direction(Direction::Right, 20), Position::new(120, 100));
        assert_eq!(pos.moved_in_direction(Direction::Left, 20), Position::new(80, 100));
        assert_eq!(pos.moved_in_direction(Direction::Down, 20), Position::new(100, 120));
        assert_eq!(pos.moved_in_direction(Direction::Up, 20), Position::new(100, 80));
    }

    #[test]
    fn test_snake_creation() {
        let snake = Snake::new(Position::new(320, 240), Direction::Right, 3, 20);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Position::new(320, 240));
        assert_eq!(snake.body[1], Position::new(300, 240));
        assert_eq!(snake.body[2], Position::new(280, 240));
    }

    #[test]
    fn test_head_is_not_a_collision() {
        let state = state_at(Position::new(320, 240));
        assert!(!state.is_collision());
        assert!(!state.snake.collides_with_body(state.snake.head()));
    }

    #[test]
    fn test_body_and_walls_collide() {
        let state = state_at(Position::new(320, 240));
        assert!(state.is_collision_at(Position::new(300, 240)));
        assert!(state.is_collision_at(Position::new(280, 240)));
        assert!(!state.is_collision_at(Position::new(340, 240)));

        assert!(state.is_collision_at(Position::new(-20, 0)));
        assert!(state.is_collision_at(Position::new(640, 0)));
        assert!(state.is_collision_at(Position::new(0, 480)));
        assert!(!state.is_collision_at(Position::new(620, 460)));
    }

    #[test]
    fn test_bounds_checking() {
        let state = state_at(Position::new(320, 240));
        assert!(state.is_in_bounds(Position::new(0, 0)));
        assert!(state.is_in_bounds(Position::new(620, 460)));
        assert!(!state.is_in_bounds(Position::new(-20, 0)));
        assert!(!state.is_in_bounds(Position::new(640, 0)));
        assert!(!state.is_in_bounds(Position::new(0, -20)));
    }

    #[test]
    fn test_occupied_includes_head() {
        let state = state_at(Position::new(320, 240));
        assert!(state.is_occupied_by_snake(Position::new(320, 240)));
        assert!(!state.is_occupied_by_snake(Position::new(340, 240)));
    }
}
