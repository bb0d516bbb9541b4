use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;
use std::time::Duration;

use crate::scene::CANVAS_SIZE;
use crate::sketch::Point;

/// Represents semantic game actions that can be triggered by input
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputAction {
    /// Left button pressed at a canvas position
    Click(Point),
    /// Pointer moved or dragged to a canvas position
    PointerMoved(Point),
    Back,
    PreviousSlide,
    NextSlide,
    /// Shop slot chosen from the number row, zero based
    SelectSlot(usize),
    TogglePause,
    Quit,
}

/// Manages input polling and translates raw terminal events into game actions
pub struct InputManager {
    actions: Vec<InputAction>,
    /// Terminal cells the canvas currently occupies
    canvas: Rect,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            actions: Vec::new(),
            canvas: Rect::default(),
        }
    }

    /// Updates the cell area used to map mouse positions onto the canvas.
    pub fn set_canvas(&mut self, canvas: Rect) {
        self.canvas = canvas;
    }

    /// Polls for all input events and stores the resulting actions
    /// Should be called once per frame before getting actions
    pub fn poll_events(&mut self) -> color_eyre::Result<()> {
        self.actions.clear();

        // Poll for all available events without blocking
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(key_event) => self.handle_key_event(key_event),
                Event::Mouse(mouse_event) => self.handle_mouse_event(mouse_event),
                Event::Resize(_, _) => {
                    // Canvas area is recomputed on the next draw
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Returns all actions for this frame
    /// Must be called after poll_events()
    pub fn get_actions(&self) -> Vec<InputAction> {
        self.actions.clone()
    }

    fn handle_key_event(&mut self, key_event: KeyEvent) {
        if key_event.kind != KeyEventKind::Press {
            return;
        }

        let action = match key_event.code {
            KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => InputAction::Quit,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => InputAction::Quit,
            KeyCode::Char('p') | KeyCode::Char('P') => InputAction::TogglePause,
            KeyCode::Backspace => InputAction::Back,
            KeyCode::Left => InputAction::PreviousSlide,
            KeyCode::Right => InputAction::NextSlide,
            KeyCode::Char(digit @ '1'..='9') => InputAction::SelectSlot(digit as usize - '1' as usize),
            _ => return,
        };
        self.actions.push(action);
    }

    fn handle_mouse_event(&mut self, mouse_event: MouseEvent) {
        let Some(point) = self.to_canvas(mouse_event.column, mouse_event.row) else {
            return;
        };

        match mouse_event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.actions.push(InputAction::PointerMoved(point));
                self.actions.push(InputAction::Click(point));
            }
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                self.actions.push(InputAction::PointerMoved(point));
            }
            _ => {}
        }
    }

    /// Maps a terminal cell to the centre of its patch of canvas, or `None`
    /// when the cell lies outside the canvas.
    pub fn to_canvas(&self, column: u16, row: u16) -> Option<Point> {
        let canvas = self.canvas;
        if canvas.width == 0
            || canvas.height == 0
            || column < canvas.x
            || row < canvas.y
            || column >= canvas.x + canvas.width
            || row >= canvas.y + canvas.height
        {
            return None;
        }

        let x = (f64::from(column - canvas.x) + 0.5) / f64::from(canvas.width) * CANVAS_SIZE;
        let y = (f64::from(row - canvas.y) + 0.5) / f64::from(canvas.height) * CANVAS_SIZE;
        Some(Point::new(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn manager() -> InputManager {
        let mut input = InputManager::new();
        input.set_canvas(Rect::new(10, 0, 60, 30));
        input
    }

    #[test]
    fn test_key_bindings() {
        let mut input = manager();
        input.handle_key_event(press(KeyCode::Char('q')));
        input.handle_key_event(press(KeyCode::Left));
        input.handle_key_event(press(KeyCode::Char('3')));
        input.handle_key_event(press(KeyCode::Backspace));
        input.handle_key_event(press(KeyCode::Char('x')));

        assert_eq!(
            input.get_actions(),
            vec![
                InputAction::Quit,
                InputAction::PreviousSlide,
                InputAction::SelectSlot(2),
                InputAction::Back,
            ]
        );
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut input = manager();
        let mut key = press(KeyCode::Char('c'));
        key.modifiers = KeyModifiers::CONTROL;
        input.handle_key_event(key);
        assert_eq!(input.get_actions(), vec![InputAction::Quit]);
    }

    #[test]
    fn test_key_release_ignored() {
        let mut input = manager();
        let mut key = press(KeyCode::Char('p'));
        key.kind = KeyEventKind::Release;
        input.handle_key_event(key);
        assert!(input.get_actions().is_empty());
    }

    #[test]
    fn test_to_canvas_mapping() {
        let input = manager();
        assert_eq!(input.to_canvas(9, 0), None);
        assert_eq!(input.to_canvas(70, 0), None);
        assert_eq!(input.to_canvas(10, 30), None);

        let point = input.to_canvas(10, 0).unwrap();
        assert!((point.x - 5.0).abs() < 1e-9);
        assert!((point.y - 10.0).abs() < 1e-9);

        let point = input.to_canvas(69, 29).unwrap();
        assert!((point.x - 595.0).abs() < 1e-9);
        assert!((point.y - 590.0).abs() < 1e-9);
    }

    #[test]
    fn test_click_also_moves_pointer() {
        let mut input = manager();
        input.handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 40, 15));
        let actions = input.get_actions();
        assert_eq!(actions.len(), 2);
        assert!(matches!(actions[0], InputAction::PointerMoved(_)));
        assert!(matches!(actions[1], InputAction::Click(p) if (p.x - 305.0).abs() < 1e-9));
    }

    #[test]
    fn test_mouse_outside_canvas_ignored() {
        let mut input = manager();
        input.handle_mouse_event(mouse(MouseEventKind::Moved, 2, 2));
        input.handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Right), 20, 2));
        assert!(input.get_actions().is_empty());
    }
}
