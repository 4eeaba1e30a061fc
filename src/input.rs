use std::collections::HashSet;

use winit::keyboard::KeyCode;

use crate::camera::Camera;
use crate::grid::Grid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveForward,
    MoveBackward,
    RotateLeft,
    RotateRight,
}

impl Command {
    // Application order within one tick.
    const ALL: [Command; 4] = [
        Command::MoveForward,
        Command::MoveBackward,
        Command::RotateLeft,
        Command::RotateRight,
    ];

    fn keys(self) -> [KeyCode; 2] {
        match self {
            Command::MoveForward => [KeyCode::KeyW, KeyCode::ArrowUp],
            Command::MoveBackward => [KeyCode::KeyS, KeyCode::ArrowDown],
            Command::RotateLeft => [KeyCode::KeyA, KeyCode::ArrowLeft],
            Command::RotateRight => [KeyCode::KeyD, KeyCode::ArrowRight],
        }
    }

    pub fn apply(self, camera: &mut Camera, grid: &Grid) {
        match self {
            Command::MoveForward => camera.move_forward(grid),
            Command::MoveBackward => camera.move_backward(grid),
            Command::RotateLeft => camera.rotate_left(),
            Command::RotateRight => camera.rotate_right(),
        }
    }
}

/// Commands whose keys are currently held, in application order.
pub fn held_commands(keys_down: &HashSet<KeyCode>) -> impl Iterator<Item = Command> + '_ {
    Command::ALL
        .into_iter()
        .filter(|cmd| cmd.keys().iter().any(|k| keys_down.contains(k)))
}

/// Advances the camera by one tick of held input.
pub fn tick(camera: &mut Camera, grid: &Grid, keys_down: &HashSet<KeyCode>) {
    for cmd in held_commands(keys_down) {
        cmd.apply(camera, grid);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(codes: &[KeyCode]) -> HashSet<KeyCode> {
        codes.iter().copied().collect()
    }

    #[test]
    fn maps_letters_and_arrows() {
        let held: Vec<_> = held_commands(&keys(&[KeyCode::ArrowRight, KeyCode::KeyW])).collect();
        assert_eq!(held, vec![Command::MoveForward, Command::RotateRight]);

        let held: Vec<_> = held_commands(&keys(&[KeyCode::KeyS, KeyCode::ArrowLeft])).collect();
        assert_eq!(held, vec![Command::MoveBackward, Command::RotateLeft]);
    }

    #[test]
    fn unrelated_keys_are_ignored() {
        assert_eq!(held_commands(&keys(&[KeyCode::KeyQ, KeyCode::Space])).count(), 0);
    }

    #[test]
    fn both_bindings_fire_once() {
        let held: Vec<_> = held_commands(&keys(&[KeyCode::KeyW, KeyCode::ArrowUp])).collect();
        assert_eq!(held, vec![Command::MoveForward]);
    }

    #[test]
    fn opposite_commands_cancel_out() {
        let grid = Grid::default();
        let mut cam = Camera::new(0.01, 0.01);
        let start = cam.clone();
        tick(
            &mut cam,
            &grid,
            &keys(&[KeyCode::KeyW, KeyCode::KeyS, KeyCode::KeyA, KeyCode::KeyD]),
        );
        assert!((cam.pos[0] - start.pos[0]).abs() < 1e-12);
        assert!((cam.pos[1] - start.pos[1]).abs() < 1e-12);
        assert!((cam.dir[0] - start.dir[0]).abs() < 1e-12);
        assert!((cam.dir[1] - start.dir[1]).abs() < 1e-12);
    }

    #[test]
    fn forward_tick_walks_down_the_corridor() {
        let grid = Grid::default();
        let mut cam = Camera::new(0.01, 0.01);
        let held = keys(&[KeyCode::KeyW]);
        for _ in 0..100 {
            tick(&mut cam, &grid, &held);
        }
        assert!((cam.pos[0] - 2.5).abs() < 1e-9);
        assert_eq!(cam.pos[1], 3.5);
    }
}
