use std::io::{self, Write};
use std::time::{Duration, Instant};

use crossterm::event::{self as term_event, DisableMouseCapture, EnableMouseCapture};
use crossterm::style::{Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{ExecutableCommand, QueueableCommand, cursor};
use tickcanvas::demo::Magnifier;
use tickcanvas::{
    AppControl, Canvas, CanvasError, Color, Event, FontExtents, Point, Rectangle, Result,
    Surface, TextExtents, TextMeasure, display_width, step_frame,
};

const FRAME_BUDGET: Duration = Duration::from_millis(16);

/// Cell-grid surface: one unit is one terminal cell, and text at size 1
/// advances one cell per column.
struct TerminalSurface {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    path: Option<Rectangle>,
    state: PenState,
    stack: Vec<PenState>,
    current_point: Option<Point>,
}

#[derive(Clone, Copy)]
struct Cell {
    glyph: char,
    fg: Color,
    bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            glyph: ' ',
            fg: Color::WHITE,
            bg: Color::BLACK,
        }
    }
}

#[derive(Clone, Copy)]
struct PenState {
    offset: Point,
    scale: f64,
    font_size: f64,
    color: Color,
}

impl Default for PenState {
    fn default() -> Self {
        Self {
            offset: Point::ORIGIN,
            scale: 1.0,
            font_size: 1.0,
            color: Color::WHITE,
        }
    }
}

impl TerminalSurface {
    fn new(width: u16, height: u16) -> Self {
        let (width, height) = (usize::from(width), usize::from(height));
        Self {
            width,
            height,
            cells: vec![Cell::default(); width * height],
            path: None,
            state: PenState::default(),
            stack: Vec::new(),
            current_point: None,
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::default());
        self.stack.clear();
        self.state = PenState::default();
    }

    fn to_device(&self, point: Point) -> Point {
        Point::new(
            self.state.offset.x + point.x * self.state.scale,
            self.state.offset.y + point.y * self.state.scale,
        )
    }

    fn cell_mut(&mut self, col: i64, row: i64) -> Option<&mut Cell> {
        if col < 0 || row < 0 || col as usize >= self.width || row as usize >= self.height {
            return None;
        }
        self.cells.get_mut(row as usize * self.width + col as usize)
    }

    /// Cell span covered by a device rectangle, or `None` when it has no area.
    fn cell_span(rect: Rectangle) -> Option<(i64, i64, i64, i64)> {
        if rect.is_degenerate() {
            return None;
        }
        let left = rect.x().round() as i64;
        let top = rect.y().round() as i64;
        let right = rect.right().round() as i64 - 1;
        let bottom = rect.bottom().round() as i64 - 1;
        (right >= left && bottom >= top).then_some((left, top, right, bottom))
    }

    fn take_path(&mut self) -> Option<(i64, i64, i64, i64)> {
        let rect = self.path.take()?;
        let origin = self.to_device(rect.pos);
        let device = Rectangle::from_parts(
            origin,
            Point::new(rect.width() * self.state.scale, rect.height() * self.state.scale),
        );
        Self::cell_span(device)
    }

    fn present(&self, out: &mut impl Write) -> io::Result<()> {
        for row in 0..self.height {
            out.queue(cursor::MoveTo(0, row as u16))?;
            for cell in &self.cells[row * self.width..(row + 1) * self.width] {
                out.queue(SetForegroundColor(term_color(cell.fg)))?
                    .queue(SetBackgroundColor(term_color(cell.bg)))?
                    .queue(Print(cell.glyph))?;
            }
        }
        out.queue(ResetColor)?;
        out.flush()
    }
}

fn term_color(color: Color) -> TermColor {
    TermColor::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

fn channel(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl TextMeasure for TerminalSurface {
    fn select_font_face(&mut self, _face: &str) -> Result<()> {
        Ok(())
    }

    fn set_font_size(&mut self, size: f64) -> Result<()> {
        self.state.font_size = size;
        Ok(())
    }

    fn font_extents(&self) -> Result<FontExtents> {
        let size = self.state.font_size;
        Ok(FontExtents {
            ascent: 0.8 * size,
            descent: 0.2 * size,
            height: size,
            max_x_advance: size,
        })
    }

    fn text_extents(&self, text: &str) -> Result<TextExtents> {
        let size = self.state.font_size;
        let advance = display_width(text) as f64 * size;
        Ok(TextExtents {
            x_bearing: 0.0,
            y_bearing: -0.8 * size,
            width: advance,
            height: size,
            x_advance: advance,
            y_advance: 0.0,
        })
    }
}

impl Surface for TerminalSurface {
    fn rectangle(&mut self, rect: Rectangle) -> Result<()> {
        self.path = Some(rect);
        Ok(())
    }

    fn fill(&mut self) -> Result<()> {
        let color = self.state.color;
        if let Some((left, top, right, bottom)) = self.take_path() {
            for row in top..=bottom {
                for col in left..=right {
                    if let Some(cell) = self.cell_mut(col, row) {
                        *cell = Cell {
                            glyph: ' ',
                            fg: color,
                            bg: color,
                        };
                    }
                }
            }
        }
        Ok(())
    }

    fn stroke(&mut self) -> Result<()> {
        let color = self.state.color;
        if let Some((left, top, right, bottom)) = self.take_path() {
            for row in top..=bottom {
                for col in left..=right {
                    let glyph = match (row == top || row == bottom, col == left || col == right) {
                        (true, true) => '+',
                        (true, false) => '-',
                        (false, true) => '|',
                        (false, false) => continue,
                    };
                    if let Some(cell) = self.cell_mut(col, row) {
                        cell.glyph = glyph;
                        cell.fg = color;
                    }
                }
            }
        }
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        self.stack.push(self.state);
        Ok(())
    }

    fn restore(&mut self) -> Result<()> {
        self.state = self
            .stack
            .pop()
            .ok_or_else(|| CanvasError::Surface("restore without matching save".to_string()))?;
        Ok(())
    }

    fn translate(&mut self, dx: f64, dy: f64) -> Result<()> {
        self.state.offset = self.to_device(Point::new(dx, dy));
        Ok(())
    }

    fn scale(&mut self, factor: f64) -> Result<()> {
        self.state.scale *= factor;
        Ok(())
    }

    fn set_source_rgb(&mut self, r: f64, g: f64, b: f64) -> Result<()> {
        self.state.color = Color::rgb(channel(r), channel(g), channel(b));
        Ok(())
    }

    fn move_to(&mut self, point: Point) -> Result<()> {
        self.current_point = Some(point);
        Ok(())
    }

    fn show_text(&mut self, text: &str) -> Result<()> {
        let point = self
            .current_point
            .ok_or_else(|| CanvasError::Surface("show_text without current point".to_string()))?;
        let origin = self.to_device(point);
        let color = self.state.color;
        let row = origin.y.ceil() as i64 - 1;
        let mut col = origin.x.round() as i64;
        for glyph in text.chars() {
            if let Some(cell) = self.cell_mut(col, row) {
                cell.glyph = glyph;
                cell.fg = color;
            }
            col += 1;
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout
        .execute(terminal::EnterAlternateScreen)?
        .execute(EnableMouseCapture)?
        .execute(cursor::Hide)?
        .execute(Clear(ClearType::All))?;

    let result = run_app(&mut stdout);

    // Always attempt to restore terminal state even if run_app errors.
    stdout.execute(cursor::Show).ok();
    stdout.execute(DisableMouseCapture).ok();
    stdout.execute(terminal::LeaveAlternateScreen).ok();
    terminal::disable_raw_mode().ok();

    result
}

fn run_app(stdout: &mut impl Write) -> Result<()> {
    let (width, height) = terminal::size()?;
    let mut surface = TerminalSurface::new(width, height);
    let mut app = Magnifier::new();
    let mut last_frame = Instant::now();

    loop {
        let mut events = Vec::new();
        if term_event::poll(FRAME_BUDGET)? {
            loop {
                if let Some(event) = Event::from_crossterm(&term_event::read()?) {
                    events.push(event);
                }
                if !term_event::poll(Duration::ZERO)? {
                    break;
                }
            }
        }

        if let Some(Event::Resize { width, height }) = events
            .iter()
            .rev()
            .find(|event| matches!(event, Event::Resize { .. }))
        {
            surface = TerminalSurface::new(*width as u16, *height as u16);
        }

        let viewport = Rectangle::new(0.0, 0.0, surface.width as f64, surface.height as f64);
        let elapsed = last_frame.elapsed();
        last_frame = Instant::now();

        surface.clear();
        let mut canvas = Canvas::new(&mut surface, viewport);
        let control = step_frame(&mut app, &events, elapsed, &mut canvas)?;
        drop(canvas);
        if control == AppControl::Exit {
            return Ok(());
        }
        surface.present(stdout)?;
    }
}
