use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::config::{CELL_ASPECT, PIXEL_SCALE};
use crate::entities::{Chomper, GameState, Inventory, Particle, Player};
use crate::level::Level;

/// Immediate-mode 2D drawing surface with an affine transform stack.
///
/// Entities draw themselves against this trait instead of touching the
/// terminal directly, which keeps their `draw` methods testable and keeps
/// the cell-rasterization details in one place.
pub trait Canvas {
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f32, dy: f32);
    fn rotate(&mut self, radians: f32);
    fn scale(&mut self, sx: f32, sy: f32);
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color);
    fn fill_triangle(&mut self, a: (f32, f32), b: (f32, f32), c: (f32, f32), color: Color);
}

/// View-transform parameters mapping world pixels to canvas units.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub camera_x: f32,
    pub camera_y: f32,
    pub pixel_scale: f32,
}

/// Row-major 2D affine transform: `x' = a·x + c·y + e`, `y' = b·x + d·y + f`.
#[derive(Debug, Clone, Copy)]
struct Affine {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Affine {
    const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn apply(&self, (x, y): (f32, f32)) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Composes so that `other` is applied first, then `self`.
    fn pre(self, other: Affine) -> Affine {
        Affine {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }
}

/// Rasterizes canvas calls into a ratatui buffer region. Shapes are sampled
/// at cell centers; one canvas unit is one cell horizontally, with the
/// vertical axis pre-squashed to compensate for tall terminal cells.
pub struct TermCanvas<'a> {
    buf: &'a mut ratatui::buffer::Buffer,
    area: Rect,
    current: Affine,
    stack: Vec<Affine>,
}

impl<'a> TermCanvas<'a> {
    pub fn new(buf: &'a mut ratatui::buffer::Buffer, area: Rect, y_squash: f32) -> Self {
        Self {
            buf,
            area,
            current: Affine {
                d: y_squash,
                ..Affine::IDENTITY
            },
            stack: Vec::new(),
        }
    }

    fn plot(&mut self, cx: i32, cy: i32, color: Color) {
        if cx < 0 || cy < 0 || cx >= self.area.width as i32 || cy >= self.area.height as i32 {
            return;
        }
        self.buf.set_string(
            self.area.x + cx as u16,
            self.area.y + cy as u16,
            " ",
            Style::default().bg(color),
        );
    }
}

fn edge(p: (f32, f32), a: (f32, f32), b: (f32, f32)) -> f32 {
    (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0)
}

fn point_in_triangle(p: (f32, f32), a: (f32, f32), b: (f32, f32), c: (f32, f32)) -> bool {
    let d0 = edge(p, a, b);
    let d1 = edge(p, b, c);
    let d2 = edge(p, c, a);
    let has_neg = d0 < 0.0 || d1 < 0.0 || d2 < 0.0;
    let has_pos = d0 > 0.0 || d1 > 0.0 || d2 > 0.0;
    !(has_neg && has_pos)
}

impl Canvas for TermCanvas<'_> {
    fn save(&mut self) {
        self.stack.push(self.current);
    }

    fn restore(&mut self) {
        if let Some(previous) = self.stack.pop() {
            self.current = previous;
        }
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.current = self.current.pre(Affine {
            e: dx,
            f: dy,
            ..Affine::IDENTITY
        });
    }

    fn rotate(&mut self, radians: f32) {
        let (sin, cos) = radians.sin_cos();
        self.current = self.current.pre(Affine {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        });
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.current = self.current.pre(Affine {
            a: sx,
            d: sy,
            ..Affine::IDENTITY
        });
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        // Axis-aligned under the current transform: fill the span directly
        // for crisp edges. Rotated rects go through the triangle path.
        if self.current.b == 0.0 && self.current.c == 0.0 {
            let (x0, y0) = self.current.apply((x, y));
            let (x1, y1) = self.current.apply((x + width, y + height));
            let (x0, x1) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
            let (y0, y1) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };

            let min_x = x0.floor() as i32;
            let max_x = x1.ceil() as i32;
            let min_y = y0.floor() as i32;
            let max_y = y1.ceil() as i32;
            for cy in min_y..max_y {
                for cx in min_x..max_x {
                    let center = (cx as f32 + 0.5, cy as f32 + 0.5);
                    if center.0 >= x0 && center.0 < x1 && center.1 >= y0 && center.1 < y1 {
                        self.plot(cx, cy, color);
                    }
                }
            }
        } else {
            self.fill_triangle((x, y), (x + width, y), (x + width, y + height), color);
            self.fill_triangle((x, y), (x + width, y + height), (x, y + height), color);
        }
    }

    fn fill_triangle(&mut self, a: (f32, f32), b: (f32, f32), c: (f32, f32), color: Color) {
        let p0 = self.current.apply(a);
        let p1 = self.current.apply(b);
        let p2 = self.current.apply(c);

        let doubled_area = (p1.0 - p0.0) * (p2.1 - p0.1) - (p2.0 - p0.0) * (p1.1 - p0.1);
        if doubled_area.abs() < f32::EPSILON {
            return;
        }

        let min_x = p0.0.min(p1.0).min(p2.0).floor() as i32;
        let max_x = p0.0.max(p1.0).max(p2.0).ceil() as i32;
        let min_y = p0.1.min(p1.1).min(p2.1).floor() as i32;
        let max_y = p0.1.max(p1.1).max(p2.1).ceil() as i32;

        for cy in min_y..max_y {
            for cx in min_x..max_x {
                let center = (cx as f32 + 0.5, cy as f32 + 0.5);
                if point_in_triangle(center, p0, p1, p2) {
                    self.plot(cx, cy, color);
                }
            }
        }
    }
}

/// View struct that holds all game state needed for rendering
pub struct RenderView<'a> {
    pub game_state: GameState,
    pub player: &'a Player,
    pub chompers: &'a [Chomper],
    pub particles: &'a [Particle],
    pub gems: &'a [(f32, f32)],
    pub level: &'a Level,
    pub inventory: &'a Inventory,
    pub frame_count: u64,
    pub fps: u32,
    pub area: Rect,
}

/// Handles all rendering responsibilities for the game
pub struct GameRenderer {}

impl GameRenderer {
    pub fn new() -> Self {
        Self {}
    }

    /// Main render method that dispatches to state-specific renderers
    pub fn render(&self, frame: &mut Frame, view: &RenderView) {
        match view.game_state {
            GameState::Playing => self.render_game(frame, view),
            GameState::Paused => self.render_paused(frame, view),
            GameState::GameOver => self.render_game_over(frame, view),
        }
    }

    fn render_game(&self, frame: &mut Frame, view: &RenderView) {
        let area = view.area;
        if area.width == 0 || area.height == 0 {
            return;
        }

        // Camera centered on the player, clamped to the level bounds
        let view_w = area.width as f32 / PIXEL_SCALE;
        let view_h = area.height as f32 / (PIXEL_SCALE * CELL_ASPECT);
        let camera_x = (view.player.x + view.player.width / 2.0 - view_w / 2.0)
            .clamp(0.0, (view.level.width - view_w).max(0.0));
        let camera_y = (view.player.y + view.player.height / 2.0 - view_h / 2.0)
            .clamp(0.0, (view.level.height - view_h).max(0.0));
        let viewport = Viewport {
            camera_x,
            camera_y,
            pixel_scale: PIXEL_SCALE,
        };
        let s = PIXEL_SCALE;

        {
            let buf = frame.buffer_mut();
            {
                let mut canvas = TermCanvas::new(buf, area, CELL_ASPECT);

                for platform in &view.level.platforms {
                    canvas.fill_rect(
                        (platform.x - camera_x) * s,
                        (platform.y - camera_y) * s,
                        platform.width * s,
                        platform.height * s,
                        Color::DarkGray,
                    );
                }

                for &(gx, gy) in view.gems {
                    let cx = (gx + 8.0 - camera_x) * s;
                    let cy = (gy + 8.0 - camera_y) * s;
                    let r = 5.0 * s;
                    canvas.fill_triangle(
                        (cx, cy - r),
                        (cx + r, cy),
                        (cx, cy + r),
                        Color::Yellow,
                    );
                    canvas.fill_triangle(
                        (cx, cy - r),
                        (cx, cy + r),
                        (cx - r, cy),
                        Color::Yellow,
                    );
                }

                if view.player.is_alive() {
                    let color = if view.player.is_flashing() {
                        Color::White
                    } else {
                        Color::Cyan
                    };
                    canvas.fill_rect(
                        (view.player.x - camera_x) * s,
                        (view.player.y - camera_y) * s,
                        view.player.width * s,
                        view.player.height * s,
                        color,
                    );
                }

                for chomper in view.chompers {
                    chomper.draw(&mut canvas, &viewport);
                }
            }

            // Particles skip the canvas: single glyphs, direct buffer access
            for particle in view.particles {
                let cx = ((particle.x - camera_x) * s).round() as i32;
                let cy = ((particle.y - camera_y) * s * CELL_ASPECT).round() as i32;
                if cx >= 0 && cy >= 0 && cx < area.width as i32 && cy < area.height as i32 {
                    let color = if particle.lifetime > 8 {
                        Color::Red
                    } else if particle.lifetime > 4 {
                        Color::LightRed
                    } else {
                        Color::Yellow
                    };
                    buf.set_string(
                        area.x + cx as u16,
                        area.y + cy as u16,
                        particle.glyph.to_string(),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    );
                }
            }
        }

        // Stats overlay at the top
        let stats = Line::from(vec![
            Span::styled("HP: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{}", view.player.health),
                if view.player.health > 2 {
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
                },
            ),
            Span::styled("  Gems: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{}", view.inventory.gems()),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  Chompers: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{}", view.chompers.iter().filter(|c| !c.dead).count()),
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  FPS: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{}", view.fps),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);

        let stats_area = Rect {
            x: area.x + 1,
            y: area.y,
            width: area.width.saturating_sub(2),
            height: 1,
        };
        frame.render_widget(Paragraph::new(stats), stats_area);

        // Controls hint at bottom
        let controls = Line::from(vec![Span::styled(
            "[A/D: Move] [W/Space: Jump] [S: Slam] [P: Pause] [Q: Quit]",
            Style::default().fg(Color::DarkGray),
        )]);
        let controls_area = Rect {
            x: area.x + 1,
            y: area.y + area.height.saturating_sub(1),
            width: area.width.saturating_sub(2),
            height: 1,
        };
        frame.render_widget(Paragraph::new(controls).centered(), controls_area);
    }

    /// Renders the pause screen with overlay
    fn render_paused(&self, frame: &mut Frame, view: &RenderView) {
        self.render_game(frame, view);

        let area = view.area;
        let pause_text = vec![
            Line::from(""),
            Line::from("PAUSED").centered().bold().yellow(),
            Line::from(""),
            Line::from("Press P to resume").centered().white(),
        ];

        let pause_area = Rect {
            x: area.width.saturating_sub(30) / 2,
            y: area.height.saturating_sub(6) / 2,
            width: 30.min(area.width),
            height: 6.min(area.height),
        };

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

    /// Renders the game over screen
    fn render_game_over(&self, frame: &mut Frame, view: &RenderView) {
        let area = view.area;

        let game_over_text = vec![
            Line::from(""),
            Line::from("╔═══════════════════════════╗").centered().red(),
            Line::from("║   EATEN BY THE CAVE!      ║")
                .centered()
                .red()
                .bold(),
            Line::from("╚═══════════════════════════╝").centered().red(),
            Line::from(""),
            Line::from(format!("Gems collected: {}", view.inventory.gems()))
                .centered()
                .yellow()
                .bold(),
            Line::from(""),
            Line::from("Press R to restart").centered().white(),
            Line::from("Press Q to quit").centered().white(),
        ];

        frame.render_widget(
            Paragraph::new(game_over_text)
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Center),
            area,
        );
    }
}
