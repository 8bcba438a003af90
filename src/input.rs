use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, ModifierKeyCode};
use std::time::{Duration, Instant};

/// Logical actions the simulation reads each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Confirm,
    Fire,
    Dash,
    Pause,
}

impl Action {
    pub const COUNT: usize = 6;

    pub const ALL: [Action; Action::COUNT] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::Confirm,
        Action::Fire,
        Action::Dash,
        Action::Pause,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Snapshot of which actions are held down this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    held: [bool; Action::COUNT],
}

impl Controls {
    pub fn is_held(&self, action: Action) -> bool {
        self.held[action.index()]
    }

    pub fn set(&mut self, action: Action, down: bool) {
        self.held[action.index()] = down;
    }

    /// Convenience builder for tests and scripted input
    pub fn with(mut self, action: Action) -> Self {
        self.set(action, true);
        self
    }

    /// True when `action` is held now but was not held in `previous`
    pub fn pressed_since(&self, previous: &Controls, action: Action) -> bool {
        self.is_held(action) && !previous.is_held(action)
    }
}

/// Commands handled by the host loop rather than the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    Quit,
    ToggleMute,
}

/// Without key-release reporting a key counts as held for this long after
/// its last press or autorepeat event.
const HOLD_TIMEOUT: Duration = Duration::from_millis(200);

/// Polls crossterm and keeps the held state of every [`Action`]
pub struct InputManager {
    last_seen: [Option<Instant>; Action::COUNT],
    /// Terminal sends release events (keyboard enhancement is active)
    release_events: bool,
    commands: Vec<HostCommand>,
}

impl InputManager {
    pub fn new(release_events: bool) -> Self {
        Self {
            last_seen: [None; Action::COUNT],
            release_events,
            commands: Vec::new(),
        }
    }

    /// Drain every pending terminal event without blocking.
    /// Returns the host commands raised since the last poll.
    pub fn poll_events(&mut self) -> color_eyre::Result<Vec<HostCommand>> {
        self.commands.clear();

        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key_event) = event::read()? {
                self.handle_key_event(key_event, Instant::now());
            }
        }

        Ok(std::mem::take(&mut self.commands))
    }

    fn handle_key_event(&mut self, key_event: KeyEvent, now: Instant) {
        match key_event.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => self.handle_key_press(key_event, now),
            KeyEventKind::Release => {
                if let Some(action) = map_key(key_event.code) {
                    self.last_seen[action.index()] = None;
                }
            }
        }
    }

    fn handle_key_press(&mut self, key_event: KeyEvent, now: Instant) {
        if matches!(key_event.code, KeyCode::Char('q') | KeyCode::Char('Q'))
            || (key_event.code == KeyCode::Char('c')
                && key_event.modifiers.contains(KeyModifiers::CONTROL))
        {
            self.commands.push(HostCommand::Quit);
            return;
        }

        if matches!(key_event.code, KeyCode::Char('m') | KeyCode::Char('M')) {
            self.commands.push(HostCommand::ToggleMute);
            return;
        }

        if let Some(action) = map_key(key_event.code) {
            // Holding left cancels right and vice versa
            match action {
                Action::MoveLeft => self.last_seen[Action::MoveRight.index()] = None,
                Action::MoveRight => self.last_seen[Action::MoveLeft.index()] = None,
                _ => {}
            }
            self.last_seen[action.index()] = Some(now);
        }
    }

    /// Build the held-state snapshot for this tick
    pub fn controls(&self) -> Controls {
        self.controls_at(Instant::now())
    }

    fn controls_at(&self, now: Instant) -> Controls {
        let mut controls = Controls::default();
        for action in Action::ALL {
            let down = match self.last_seen[action.index()] {
                Some(_) if self.release_events => true,
                Some(seen) => now.duration_since(seen) < HOLD_TIMEOUT,
                None => false,
            };
            controls.set(action, down);
        }
        controls
    }
}

fn map_key(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Action::MoveLeft),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Action::MoveRight),
        KeyCode::Enter => Some(Action::Confirm),
        KeyCode::Char(' ') | KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => {
            Some(Action::Fire)
        }
        KeyCode::Modifier(ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift)
        | KeyCode::Char('x')
        | KeyCode::Char('X') => Some(Action::Dash),
        KeyCode::Esc | KeyCode::Char('p') | KeyCode::Char('P') => Some(Action::Pause),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Press)
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release)
    }

    #[test]
    fn test_controls_default_all_released() {
        let controls = Controls::default();
        assert!(Action::ALL.iter().all(|a| !controls.is_held(*a)));
    }

    #[test]
    fn test_pressed_since_detects_rising_edge_only() {
        let up = Controls::default();
        let down = Controls::default().with(Action::Pause);
        assert!(down.pressed_since(&up, Action::Pause));
        assert!(!down.pressed_since(&down, Action::Pause));
        assert!(!up.pressed_since(&down, Action::Pause));
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(map_key(KeyCode::Left), Some(Action::MoveLeft));
        assert_eq!(map_key(KeyCode::Char('d')), Some(Action::MoveRight));
        assert_eq!(map_key(KeyCode::Enter), Some(Action::Confirm));
        assert_eq!(map_key(KeyCode::Char(' ')), Some(Action::Fire));
        assert_eq!(map_key(KeyCode::Char('x')), Some(Action::Dash));
        assert_eq!(map_key(KeyCode::Esc), Some(Action::Pause));
        assert_eq!(map_key(KeyCode::Char('z')), None);
    }

    #[test]
    fn test_release_events_clear_held_state() {
        let mut input = InputManager::new(true);
        let now = Instant::now();
        input.handle_key_event(press(KeyCode::Left), now);
        assert!(input.controls_at(now + Duration::from_secs(5)).is_held(Action::MoveLeft));

        input.handle_key_event(release(KeyCode::Left), now);
        assert!(!input.controls_at(now).is_held(Action::MoveLeft));
    }

    #[test]
    fn test_hold_times_out_without_release_events() {
        let mut input = InputManager::new(false);
        let now = Instant::now();
        input.handle_key_event(press(KeyCode::Char(' ')), now);
        assert!(input.controls_at(now).is_held(Action::Fire));
        assert!(!input.controls_at(now + HOLD_TIMEOUT).is_held(Action::Fire));
    }

    #[test]
    fn test_opposite_direction_cancels() {
        let mut input = InputManager::new(true);
        let now = Instant::now();
        input.handle_key_event(press(KeyCode::Left), now);
        input.handle_key_event(press(KeyCode::Right), now);
        let controls = input.controls_at(now);
        assert!(controls.is_held(Action::MoveRight));
        assert!(!controls.is_held(Action::MoveLeft));
    }

    #[test]
    fn test_host_commands() {
        let mut input = InputManager::new(true);
        let now = Instant::now();
        input.handle_key_event(press(KeyCode::Char('m')), now);
        input.handle_key_event(
            KeyEvent::new_with_kind(KeyCode::Char('c'), KeyModifiers::CONTROL, KeyEventKind::Press),
            now,
        );
        assert_eq!(input.commands, vec![HostCommand::ToggleMute, HostCommand::Quit]);
        assert!(!input.controls_at(now).is_held(Action::Confirm));
    }
}
