use crate::entities::{CollectibleKind, EnemyKind, ProjectileOwner, Tint};
use crate::game::{GamePhase, GameState};
use rand::Rng;
use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

/// View struct that holds everything needed for one frame
pub struct RenderView<'a> {
    pub state: &'a GameState,
    pub area: Rect,
    pub edge_width: u16,
    pub fps: u32,
    pub muted: bool,
}

/// Maps playfield units onto terminal cells
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub area: Rect,
    pub field_width: f32,
    pub field_height: f32,
    /// Screen shake offset in playfield units
    pub offset: (f32, f32),
}

impl Viewport {
    pub fn new(area: Rect, field_width: f32, field_height: f32) -> Self {
        Self {
            area,
            field_width,
            field_height,
            offset: (0.0, 0.0),
        }
    }

    /// Cell for a playfield point, or None when it falls outside the area
    pub fn to_cell(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        let col = ((x + self.offset.0) * self.area.width as f32 / self.field_width).floor();
        let row = ((y + self.offset.1) * self.area.height as f32 / self.field_height).floor();
        if col < 0.0 || row < 0.0 || col >= self.area.width as f32 || row >= self.area.height as f32
        {
            return None;
        }
        Some((self.area.x + col as u16, self.area.y + row as u16))
    }

    /// Cells covered by a playfield box, clipped to the area. Always at least
    /// one cell wide and tall when any part is visible.
    pub fn to_cells(&self, x: f32, y: f32, width: f32, height: f32) -> Option<Rect> {
        let scale_x = |v: f32| (v + self.offset.0) * self.area.width as f32 / self.field_width;
        let scale_y = |v: f32| (v + self.offset.1) * self.area.height as f32 / self.field_height;
        let left = scale_x(x).floor().max(0.0);
        let top = scale_y(y).floor().max(0.0);
        let right = scale_x(x + width).ceil().min(self.area.width as f32);
        let bottom = scale_y(y + height).ceil().min(self.area.height as f32);
        if right <= left || bottom <= top {
            return None;
        }
        Some(Rect {
            x: self.area.x + left as u16,
            y: self.area.y + top as u16,
            width: (right - left) as u16,
            height: (bottom - top) as u16,
        })
    }
}

pub fn tint_color(tint: Tint) -> Color {
    match tint {
        Tint::White => Color::White,
        Tint::Red => Color::Red,
        Tint::Cyan => Color::Cyan,
        Tint::Gray => Color::Gray,
        Tint::Orange => Color::Rgb(255, 165, 0),
        Tint::Purple => Color::Rgb(160, 32, 240),
        Tint::Gold => Color::Rgb(255, 215, 0),
        Tint::Magenta => Color::Magenta,
        Tint::Blue => Color::Blue,
        Tint::Lime => Color::LightGreen,
        Tint::Yellow => Color::Yellow,
    }
}

fn enemy_symbol(kind: EnemyKind) -> &'static str {
    match kind {
        EnemyKind::Asteroid => "@",
        EnemyKind::Chaser => "V",
        EnemyKind::Shooter => "W",
        EnemyKind::Boss => "█",
    }
}

fn collectible_symbol(kind: CollectibleKind) -> &'static str {
    match kind {
        CollectibleKind::Coin => "$",
        CollectibleKind::Boost => "+",
        CollectibleKind::Life => "♥",
        CollectibleKind::Shield => "S",
        CollectibleKind::Magnet => "U",
    }
}

/// Write a string at a cell, truncated at the right edge of `area`
fn put(buffer: &mut Buffer, area: Rect, (col, row): (u16, u16), text: &str, style: Style) {
    if col < area.x || row < area.y || col >= area.right() || row >= area.bottom() {
        return;
    }
    let max_width = (area.right() - col) as usize;
    buffer.set_stringn(col, row, text, max_width, style);
}

fn fill(buffer: &mut Buffer, cells: Rect, symbol: &str, style: Style) {
    for row in cells.top()..cells.bottom() {
        for col in cells.left()..cells.right() {
            buffer.set_string(col, row, symbol, style);
        }
    }
}

/// Handles all rendering responsibilities for the game
pub struct GameRenderer {}

impl GameRenderer {
    pub fn new() -> Self {
        Self {}
    }

    /// Main render method that dispatches to phase-specific renderers
    pub fn render(&self, frame: &mut Frame, view: &RenderView) {
        match view.state.phase {
            GamePhase::Running => self.render_game(frame, view),
            GamePhase::Paused => self.render_paused(frame, view),
            GamePhase::GameOver => self.render_game_over(frame, view),
        }
    }

    /// Narrowed play area between the side borders
    fn game_area(&self, frame: &mut Frame, view: &RenderView) -> Rect {
        let area = view.area;
        // Top row holds the HUD, bottom row the key hints
        let area = Rect {
            x: area.x,
            y: area.y + 1,
            width: area.width,
            height: area.height.saturating_sub(2),
        };
        if view.edge_width == 0 || area.width <= view.edge_width * 2 + 2 {
            return area;
        }

        let centered_area = Rect {
            x: area.x + view.edge_width,
            y: area.y,
            width: area.width.saturating_sub(view.edge_width * 2),
            height: area.height,
        };
        let block = Block::default()
            .borders(Borders::LEFT | Borders::RIGHT)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(centered_area);
        frame.render_widget(block, centered_area);
        inner
    }

    /// Renders the active gameplay screen
    fn render_game(&self, frame: &mut Frame, view: &RenderView) {
        let state = view.state;
        let game_area = self.game_area(frame, view);
        if game_area.width == 0 || game_area.height == 0 {
            return;
        }

        let mut viewport = Viewport::new(game_area, state.config.width, state.config.height);
        if state.shake_timer > 0.0 {
            // Cosmetic only: jitter never feeds back into the seeded simulation
            let mut rng = rand::rng();
            let intensity = state.shake_intensity;
            viewport.offset = (
                rng.random_range(-0.5..=0.5) * intensity,
                rng.random_range(-0.5..=0.5) * intensity,
            );
        }

        let buffer = frame.buffer_mut();

        // Stars: nearer layers are brighter
        for (depth, layer) in state.starfield.layers.iter().enumerate() {
            let (symbol, color) = match depth {
                0 => (".", Color::DarkGray),
                1 => ("·", Color::Gray),
                _ => ("*", Color::White),
            };
            for star in &layer.stars {
                if let Some(cell) = viewport.to_cell(star.x, star.y) {
                    put(buffer, game_area, cell, symbol, Style::default().fg(color));
                }
            }
        }

        for item in &state.collectibles {
            if let Some(cell) = viewport.to_cell(item.x + item.width / 2.0, item.y + item.height / 2.0)
            {
                let style = Style::default()
                    .fg(tint_color(item.kind.tint()))
                    .add_modifier(Modifier::BOLD);
                put(buffer, game_area, cell, collectible_symbol(item.kind), style);
            }
        }

        for enemy in &state.enemies {
            if let Some(cells) = viewport.to_cells(enemy.x, enemy.y, enemy.width, enemy.height) {
                let style = Style::default()
                    .fg(tint_color(enemy.kind.tint()))
                    .add_modifier(Modifier::BOLD);
                fill(buffer, cells, enemy_symbol(enemy.kind), style);
            }
        }

        for projectile in state.player.projectiles.iter().chain(&state.enemy_projectiles) {
            let (symbol, color) = match projectile.owner {
                ProjectileOwner::Player => ("|", Color::Yellow),
                ProjectileOwner::Enemy => ("!", Color::Magenta),
            };
            if let Some(cell) = viewport.to_cell(
                projectile.x + projectile.width / 2.0,
                projectile.y + projectile.height / 2.0,
            ) {
                put(buffer, game_area, cell, symbol, Style::default().fg(color));
            }
        }

        // Player: blue while shielded, cyan during a dash
        let player = &state.player;
        if let Some(cells) = viewport.to_cells(player.x, player.y, player.width, player.height) {
            let color = if player.is_dashing {
                Color::Cyan
            } else if player.has_shield {
                Color::Blue
            } else {
                Color::Green
            };
            fill(
                buffer,
                cells,
                "▲",
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            );
        }

        for particle in &state.particles {
            if let Some(cell) = viewport.to_cell(particle.x, particle.y) {
                let symbol = if particle.alpha() > 0.5 { "*" } else { "." };
                put(
                    buffer,
                    game_area,
                    cell,
                    symbol,
                    Style::default().fg(tint_color(particle.tint)),
                );
            }
        }

        for text in &state.floating_texts {
            if let Some(cell) = viewport.to_cell(text.x, text.y) {
                let mut style = Style::default()
                    .fg(tint_color(text.tint))
                    .add_modifier(Modifier::BOLD);
                if text.alpha() < 0.5 {
                    style = style.add_modifier(Modifier::DIM);
                }
                put(buffer, game_area, cell, &text.text, style);
            }
        }

        self.render_hud(frame, view);
    }

    fn render_hud(&self, frame: &mut Frame, view: &RenderView) {
        let state = view.state;
        let area = view.area;
        let label = Style::default().fg(Color::DarkGray);
        let value = |color: Color| Style::default().fg(color).add_modifier(Modifier::BOLD);

        let mut spans = vec![
            Span::styled("Score: ", label),
            Span::styled(format!("{}", state.score), value(Color::Yellow)),
            Span::styled("  HI: ", label),
            Span::styled(format!("{}", state.high_score), value(Color::White)),
            Span::styled("  Lives: ", label),
            Span::styled("♥".repeat(state.lives.min(10) as usize), value(Color::Red)),
        ];
        if state.combo_count > 1 {
            spans.push(Span::styled(
                format!("  COMBO x{}", state.combo_multiplier()),
                value(Color::Magenta),
            ));
        }
        if state.player.has_shield {
            spans.push(Span::styled("  [SHIELD]", value(Color::Blue)));
        }
        if state.player.has_magnet {
            spans.push(Span::styled(
                format!("  [MAGNET {:.1}s]", state.player.magnet_timer / 1000.0),
                value(Color::LightGreen),
            ));
        }
        spans.push(if state.player.can_dash() {
            Span::styled("  DASH", value(Color::Cyan))
        } else {
            Span::styled("  dash", label)
        });
        if let Some(boss) = state.enemies.iter().find(|e| e.kind.is_boss()) {
            let filled = (boss.health_fraction() * 10.0).ceil() as usize;
            spans.push(Span::styled("  BOSS ", value(Color::Red)));
            spans.push(Span::styled(
                format!("{}{}", "#".repeat(filled), "-".repeat(10 - filled.min(10))),
                value(Color::Red),
            ));
        }
        spans.push(Span::styled("  FPS: ", label));
        spans.push(Span::styled(format!("{}", view.fps), value(Color::White)));
        if view.muted {
            spans.push(Span::styled("  [MUTED]", label));
        }

        let stats_area = Rect {
            x: area.x + 1,
            y: area.y,
            width: area.width.saturating_sub(2),
            height: 1,
        };
        frame.render_widget(Paragraph::new(Line::from(spans)), stats_area);

        let controls = Line::from(vec![Span::styled(
            "[A/D/Arrows: Move] [Space: Fire] [Shift/X: Dash] [P: Pause] [M: Mute] [Q: Quit]",
            label,
        )]);
        let controls_area = Rect {
            x: area.x + 1,
            y: area.y + area.height.saturating_sub(1),
            width: area.width.saturating_sub(2),
            height: 1,
        };
        frame.render_widget(Paragraph::new(controls).centered(), controls_area);
    }

    /// Centered box of the given size, clipped to `area`
    fn overlay_area(area: Rect, width: u16, height: u16) -> Rect {
        let width = width.min(area.width);
        let height = height.min(area.height);
        Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        }
    }

    /// Renders the pause screen with overlay
    fn render_paused(&self, frame: &mut Frame, view: &RenderView) {
        self.render_game(frame, view);

        let pause_text = vec![
            Line::from(""),
            Line::from("PAUSED").centered().bold().yellow(),
            Line::from(""),
            Line::from("Press P to resume").centered().white(),
        ];
        let pause_area = Self::overlay_area(view.area, 30, 6);

        frame.render_widget(Clear, pause_area);
        frame.render_widget(
            Paragraph::new(pause_text)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Yellow)),
                )
                .alignment(Alignment::Center),
            pause_area,
        );
    }

    /// Renders the game over screen over the frozen playfield
    fn render_game_over(&self, frame: &mut Frame, view: &RenderView) {
        self.render_game(frame, view);

        let state = view.state;
        let seconds = (state.game_time / 1000.0) as u64;
        let mut game_over_text = vec![
            Line::from(""),
            Line::from("GAME OVER").centered().red().bold(),
            Line::from(""),
            Line::from(format!("Final Score: {}", state.score))
                .centered()
                .yellow()
                .bold(),
            Line::from(format!("High Score: {}", state.high_score))
                .centered()
                .white(),
            Line::from(format!("Time Survived: {:02}:{:02}", seconds / 60, seconds % 60))
                .centered()
                .cyan(),
        ];
        if state.score > 0 && state.score == state.high_score {
            game_over_text.push(Line::from("NEW HIGH SCORE!").centered().magenta().bold());
        }
        game_over_text.push(Line::from(""));
        game_over_text.push(Line::from("Press Enter to restart").centered().white());
        game_over_text.push(Line::from("Press Q to quit").centered().white());

        let height = game_over_text.len() as u16 + 2;
        let game_over_area = Self::overlay_area(view.area, 36, height);

        frame.render_widget(Clear, game_over_area);
        frame.render_widget(
            Paragraph::new(game_over_text)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Red)),
                )
                .alignment(Alignment::Center),
            game_over_area,
        );
    }
}

impl Default for GameRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use ratatui::{Terminal, backend::TestBackend};

    fn viewport() -> Viewport {
        Viewport::new(Rect::new(0, 0, 60, 40), 600.0, 800.0)
    }

    fn draw(state: &GameState) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        let renderer = GameRenderer::new();
        terminal
            .draw(|frame| {
                let view = RenderView {
                    state,
                    area: frame.area(),
                    edge_width: 10,
                    fps: 60,
                    muted: false,
                };
                renderer.render(frame, &view);
            })
            .unwrap();
        terminal.backend().buffer().clone()
    }

    fn buffer_text(buffer: &Buffer) -> String {
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_point_mapping() {
        let viewport = viewport();
        assert_eq!(viewport.to_cell(0.0, 0.0), Some((0, 0)));
        assert_eq!(viewport.to_cell(300.0, 400.0), Some((30, 20)));
        assert_eq!(viewport.to_cell(599.0, 799.0), Some((59, 39)));
        assert_eq!(viewport.to_cell(600.0, 0.0), None);
        assert_eq!(viewport.to_cell(-1.0, 0.0), None);
    }

    #[test]
    fn test_box_mapping_is_clipped() {
        let viewport = viewport();
        let cells = viewport.to_cells(280.0, 740.0, 40.0, 40.0).unwrap();
        assert_eq!(cells, Rect::new(28, 37, 4, 2));

        // Half above the top edge
        let cells = viewport.to_cells(0.0, -25.0, 50.0, 50.0).unwrap();
        assert_eq!(cells.y, 0);
        assert!(viewport.to_cells(0.0, -100.0, 50.0, 50.0).is_none());
    }

    #[test]
    fn test_shake_offsets_mapping() {
        let mut viewport = viewport();
        viewport.offset = (10.0, 0.0);
        assert_eq!(viewport.to_cell(0.0, 0.0), Some((1, 0)));
    }

    #[test]
    fn test_render_running_shows_hud() {
        let state = GameState::new(Config::default(), 250, 7);
        let text = buffer_text(&draw(&state));
        assert!(text.contains("Score: 0"));
        assert!(text.contains("HI: 250"));
        assert!(text.contains("▲"));
    }

    #[test]
    fn test_render_overlays() {
        let mut state = GameState::new(Config::default(), 0, 7);
        state.phase = GamePhase::Paused;
        assert!(buffer_text(&draw(&state)).contains("PAUSED"));

        state.phase = GamePhase::GameOver;
        let text = buffer_text(&draw(&state));
        assert!(text.contains("GAME OVER"));
        assert!(text.contains("Press Enter to restart"));
    }

    #[test]
    fn test_tiny_terminal_does_not_panic() {
        let state = GameState::new(Config::default(), 0, 7);
        let mut terminal = Terminal::new(TestBackend::new(4, 3)).unwrap();
        terminal
            .draw(|frame| {
                let view = RenderView {
                    state: &state,
                    area: frame.area(),
                    edge_width: 10,
                    fps: 0,
                    muted: true,
                };
                GameRenderer::new().render(frame, &view);
            })
            .unwrap();
    }
}
