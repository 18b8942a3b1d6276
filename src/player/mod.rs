//! Player — the interactive terminal front end.
//!
//! Maps keys and mouse presses to direction clicks, feeds them through the
//! session and dispatcher, and draws the animated door. The player holds
//! no puzzle rules of its own.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use anyhow::{Result, bail};
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEventKind,
};
use crossterm::{cursor, execute, queue, style, terminal};
use tracing::{debug, info};

use crate::config::{GameConfig, matches_binding};
use crate::dispatch::Dispatcher;
use crate::engine::Session;
use crate::menubar::print_menu_item;
use crate::renderer::{DEFAULT_CANVAS, Renderer};
use crate::scene::Stage;
use crate::types::{Canvas, Cell, Color, Direction, NamedColor, OutcomeEvent, Style};

/// Rows reserved above the canvas for the menu bar.
const CANVAS_OFFSET: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct Player {
    session: Session,
    stage: Stage,
    config: GameConfig,
    canvas: Canvas,
    grid: Vec<Vec<Cell>>,
    status: String,
    reveal: bool,
}

impl Player {
    pub fn new(session: Session, config: GameConfig) -> Self {
        let canvas = DEFAULT_CANVAS;
        let reveal = config.reveal_combination;
        Self {
            session,
            stage: Stage::new(),
            config,
            canvas,
            grid: vec![vec![Cell::default(); canvas.width as usize]; canvas.height as usize],
            status: "Turn the handle to find the combination.".into(),
            reveal,
        }
    }

    /// Play the puzzle in the terminal.
    ///
    /// Sets up the terminal, enters the event loop, and restores the terminal
    /// on exit (even on error).
    pub fn play(&mut self) -> Result<()> {
        let (term_w, term_h) = terminal::size()?;
        let need_w = self.canvas.width;
        let need_h = self.canvas.height;
        // +2: one row for menu bar, one row for status bar
        if term_w < need_w || term_h < need_h + 2 {
            bail!(
                "Terminal too small: need {}x{}, have {}x{}",
                need_w,
                need_h + 2,
                term_w,
                term_h,
            );
        }

        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            event::EnableMouseCapture,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All),
        )?;

        let result = self.run_loop(&mut stdout);

        // Always restore terminal state.
        let _ = execute!(
            stdout,
            cursor::Show,
            event::DisableMouseCapture,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();

        result
    }

    /// Feed one direction click through the puzzle and start its effects.
    ///
    /// Returns `None` when the click was dropped by the animation lockout.
    pub fn click(&mut self, direction: Direction) -> Option<OutcomeEvent> {
        if self.config.lock_input_during_animation && self.stage.is_animating() {
            debug!(%direction, "click dropped while animating");
            return None;
        }
        let event = self.session.click(direction);
        let effects = Dispatcher::dispatch(&event, self.session.state());
        if let Some(message) = self.stage.apply(&effects) {
            self.status = message;
        }
        Some(event)
    }

    /// Draw a fresh combination and put the closed door back.
    pub fn restart(&mut self) -> Result<()> {
        self.session.restart()?;
        self.stage = Stage::at_rotation(self.session.state().total_rotation());
        self.status = "New lock. Turn the handle.".into();
        Ok(())
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Pointer presses left of the handle hub turn counterclockwise,
    /// everything else clockwise.
    fn direction_at(&self, column: u16) -> Direction {
        if (column as f64) < Renderer::handle_column(self.stage.scene(), self.canvas) {
            Direction::CounterClockwise
        } else {
            Direction::Clockwise
        }
    }

    // -----------------------------------------------------------------------
    // Event loop
    // -----------------------------------------------------------------------

    fn run_loop(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        let frame = Duration::from_secs_f64(1.0 / self.config.frame_rate.max(1) as f64);
        self.grid = Renderer::rasterize(self.stage.scene(), self.canvas);
        self.render_menubar(stdout)?;
        self.render_full(stdout)?;
        self.render_status(stdout)?;

        let mut last = Instant::now();
        loop {
            if event::poll(frame)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if self.handle_key(&key)? == Flow::Quit {
                            break;
                        }
                    }
                    Event::Mouse(mouse) => {
                        let on_canvas = mouse.row >= CANVAS_OFFSET
                            && mouse.row < CANVAS_OFFSET + self.canvas.height
                            && mouse.column < self.canvas.width;
                        if mouse.kind == MouseEventKind::Down(MouseButton::Left) && on_canvas {
                            self.click(self.direction_at(mouse.column));
                        }
                    }
                    Event::Resize(_, _) => {
                        queue!(stdout, terminal::Clear(terminal::ClearType::All))?;
                        self.render_menubar(stdout)?;
                        self.render_full(stdout)?;
                    }
                    _ => {}
                }
            }

            let now = Instant::now();
            self.stage.tick((now - last).as_secs_f64());
            last = now;
            self.render_diff(stdout)?;
            self.render_status(stdout)?;
        }

        info!("player quit");
        Ok(())
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Result<Flow> {
        let bindings = self.config.key_bindings.clone();
        if matches_binding(&bindings.quit, key) || key.code == KeyCode::Esc {
            return Ok(Flow::Quit);
        }
        if matches_binding(&bindings.clockwise, key) {
            self.click(Direction::Clockwise);
        } else if matches_binding(&bindings.counter_clockwise, key) {
            self.click(Direction::CounterClockwise);
        } else if matches_binding(&bindings.restart, key) {
            self.restart()?;
        } else if matches_binding(&bindings.reveal, key) {
            self.reveal = !self.reveal;
        }
        Ok(Flow::Continue)
    }

    // -----------------------------------------------------------------------
    // Terminal output
    // -----------------------------------------------------------------------

    fn render_menubar(&self, stdout: &mut io::Stdout) -> Result<()> {
        let bindings = &self.config.key_bindings;
        let items = [
            format!("[{}] counterclockwise", bindings.counter_clockwise),
            format!("[{}] clockwise", bindings.clockwise),
            "[click] left/right of handle".to_string(),
            format!("[{}] restart", bindings.restart),
            format!("[{}] reveal", bindings.reveal),
            format!("[{}][Esc] quit", bindings.quit),
        ];

        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::Print(" "),
        )?;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                queue!(stdout, style::Print("  "))?;
            }
            print_menu_item(stdout, item)?;
        }
        stdout.flush()?;
        Ok(())
    }

    fn render_full(&self, stdout: &mut io::Stdout) -> Result<()> {
        for (y, row) in self.grid.iter().enumerate() {
            queue!(stdout, cursor::MoveTo(0, y as u16 + CANVAS_OFFSET))?;
            for cell in row {
                let cs = to_content_style(&cell.style);
                queue!(
                    stdout,
                    style::PrintStyledContent(style::StyledContent::new(cs, cell.ch))
                )?;
            }
        }
        stdout.flush()?;
        Ok(())
    }

    fn render_diff(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        let next = Renderer::rasterize(self.stage.scene(), self.canvas);
        let changes = Renderer::diff(&self.grid, &next);
        if changes.is_empty() {
            return Ok(());
        }
        for change in &changes {
            let cs = to_content_style(&change.cell.style);
            queue!(
                stdout,
                cursor::MoveTo(change.x, change.y + CANVAS_OFFSET),
                style::PrintStyledContent(style::StyledContent::new(cs, change.cell.ch)),
            )?;
        }
        self.grid = next;
        stdout.flush()?;
        Ok(())
    }

    fn render_status(&self, stdout: &mut io::Stdout) -> Result<()> {
        let status_y = self.canvas.height + CANVAS_OFFSET;
        let (_, term_h) = terminal::size()?;
        if status_y >= term_h {
            return Ok(()); // No room for status bar.
        }

        queue!(
            stdout,
            cursor::MoveTo(0, status_y),
            terminal::Clear(terminal::ClearType::CurrentLine),
        )?;

        let mut cs = style::ContentStyle::default();
        cs.attributes.set(style::Attribute::Dim);
        queue!(
            stdout,
            style::PrintStyledContent(style::StyledContent::new(cs, self.status_line())),
        )?;
        stdout.flush()?;
        Ok(())
    }

    fn status_line(&self) -> String {
        let state = self.session.state();
        let mut line = if state.is_solved() {
            format!(" Unlocked | {} ", self.status)
        } else {
            format!(
                " Step {}/{} | {} ",
                state.step_index() + 1,
                state.combination().len(),
                self.status,
            )
        };
        if self.reveal {
            line.push_str(&format!("| {} ", state.combination()));
        }
        line
    }
}

// ---------------------------------------------------------------------------
// Style conversion
// ---------------------------------------------------------------------------

pub fn to_content_style(s: &Style) -> style::ContentStyle {
    let mut cs = style::ContentStyle::default();
    if let Some(fg) = &s.fg {
        cs.foreground_color = Some(to_ct_color(fg));
    }
    if let Some(bg) = &s.bg {
        cs.background_color = Some(to_ct_color(bg));
    }
    if s.bold {
        cs.attributes.set(style::Attribute::Bold);
    }
    if s.dim {
        cs.attributes.set(style::Attribute::Dim);
    }
    cs
}

pub fn to_ct_color(c: &Color) -> style::Color {
    match c {
        Color::Named(n) => match n {
            NamedColor::Black => style::Color::Black,
            NamedColor::Red => style::Color::Red,
            NamedColor::Green => style::Color::Green,
            NamedColor::Yellow => style::Color::Yellow,
            NamedColor::Blue => style::Color::Blue,
            NamedColor::Magenta => style::Color::Magenta,
            NamedColor::Cyan => style::Color::Cyan,
            NamedColor::White => style::Color::White,
        },
        Color::Rgb { r, g, b } => style::Color::Rgb {
            r: *r,
            g: *g,
            b: *b,
        },
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::dispatch::HANDLE_TURN_SECS;
    use crate::engine::TURN_RADIANS;
    use crate::scene::Renderable;
    use crate::types::{Layer, Property};

    fn player(lockout: bool) -> Player {
        let config = GameConfig {
            lock_input_during_animation: lockout,
            ..GameConfig::default()
        };
        let session = Session::new(3, StdRng::seed_from_u64(17)).unwrap();
        Player::new(session, config)
    }

    fn first_direction(player: &Player) -> Direction {
        player.session.state().combination().steps()[0].direction()
    }

    #[test]
    fn clicks_pass_through_without_lockout() {
        let mut player = player(false);
        let d = first_direction(&player);
        assert!(player.click(d).is_some());
        assert!(player.stage().is_animating());
        assert!(player.click(d).is_some());
    }

    #[test]
    fn lockout_drops_clicks_until_animation_ends() {
        let mut player = player(true);
        let d = first_direction(&player);
        assert!(player.click(d).is_some());
        assert!(player.click(d).is_none());

        player.stage.tick(5.0);
        assert!(player.click(d).is_some());
    }

    #[test]
    fn pointer_side_picks_direction() {
        let player = player(false);
        assert_eq!(player.direction_at(5), Direction::CounterClockwise);
        assert_eq!(player.direction_at(40), Direction::Clockwise);
    }

    #[test]
    fn status_line_reveals_combination_on_request() {
        let mut player = player(false);
        assert!(!player.status_line().contains("clockwise"));
        player.reveal = true;
        let combination = player.session.state().combination().to_string();
        assert!(player.status_line().contains(&combination));
    }

    #[test]
    fn restart_resets_stage_and_state() {
        let mut player = player(false);
        let d = first_direction(&player);
        player.click(d.opposite());
        player.restart().unwrap();
        assert_eq!(player.session.state().step_index(), 0);
        assert!(!player.stage().is_animating());
    }

    #[test]
    fn restart_keeps_the_handle_where_it_stopped() {
        let mut player = player(false);
        let d = first_direction(&player);
        player.click(d.opposite());
        player.stage.tick(5.0);
        player.restart().unwrap();

        let total = player.session.state().total_rotation();
        let rotation = |player: &Player| {
            player
                .stage()
                .scene()
                .sprite(Layer::Handle)
                .unwrap()
                .property(Property::Rotation)
        };
        assert_eq!(rotation(&player), total);

        let d = first_direction(&player);
        player.click(d);
        player.stage.tick(HANDLE_TURN_SECS / 2.0);
        assert!((rotation(&player) - total).abs() <= TURN_RADIANS);
    }
}
