// Window + software drawing for the mask editor.
// Visual layout:
// 1) A button strip on the left with SAVE (lower) and RESET (middle).
// 2) The image canvas on the right, showing the visible viewport of the composite.
// 3) While dragging: the lasso path in black, plus a crosshair at the cursor.

use std::collections::VecDeque;

use image::RgbImage;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use crate::config::Settings;
use crate::error::Error;
use crate::frontend::{Button, ButtonAction, Canvas, Frontend, ScrollInput, SelectionInput, ViewCommand};
use crate::types::{pack_rgb, unpack_rgb, FrameBuffer, Point};
use crate::viewport::{ScrollDirection, ScrollEvent, Viewport};

const BACKGROUND: u32 = 0x00_30_30_30;
const STRIP_COLOR: u32 = 0x00_E0_E0_E0;
const BUTTON_COLOR: u32 = 0x00_FF_FF_FF;
const BUTTON_HOVER: u32 = 0x00_80_80_80;
const BLACK: u32 = 0x00_00_00_00;
const CROSSHAIR: u32 = 0x00_FF_CC_33;
const LASSO_ALPHA: f32 = 0.8;
const BUTTON_HEIGHT: usize = 32;
const TEXT_SCALE: i32 = 2;

/// Screen rectangle in window pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Rect {
    x: usize,
    y: usize,
    w: usize,
    h: usize,
}

impl Rect {
    fn contains(&self, px: usize, py: usize) -> bool {
        px >= self.x && px < self.x + self.w && py >= self.y && py < self.y + self.h
    }
}

/// Canvas size that fits `image` into the space next to the strip, keeping aspect.
fn fit_canvas(image_w: u32, image_h: u32, max_w: usize, max_h: usize) -> (usize, usize) {
    let scale = (max_w as f64 / image_w.max(1) as f64).min(max_h as f64 / image_h.max(1) as f64);
    let w = ((image_w as f64 * scale).round() as usize).max(1);
    let h = ((image_h as f64 * scale).round() as usize).max(1);
    (w, h)
}

/// Maps between canvas pixels and image coordinates for one set of limits.
#[derive(Debug, Clone, Copy)]
struct ViewMapping {
    limits: Viewport,
    width: usize,
    height: usize,
}

impl ViewMapping {
    /// Canvas pixel (cx, cy) to image coordinates (pixel centres sample at +0.5).
    fn image_point(&self, cx: f64, cy: f64) -> Point {
        let sx = self.limits.x_range() / self.width as f64;
        let sy = self.limits.y_range() / self.height as f64;
        Point::new(self.limits.x.0 + (cx + 0.5) * sx, self.limits.y.0 + (cy + 0.5) * sy)
    }

    fn canvas_point(&self, p: Point) -> (i32, i32) {
        let cx = (p.x - self.limits.x.0) / self.limits.x_range() * self.width as f64 - 0.5;
        let cy = (p.y - self.limits.y.0) / self.limits.y_range() * self.height as f64 - 0.5;
        (cx.round() as i32, cy.round() as i32)
    }
}

/// Nearest-neighbour render of the visible part of `src` into `dst`.
fn blit_view(src: &FrameBuffer, dst: &mut FrameBuffer, mapping: &ViewMapping) {
    for cy in 0..dst.height {
        for cx in 0..dst.width {
            let p = mapping.image_point(cx as f64, cy as f64);
            let (ix, iy) = ((p.x + 0.5).floor(), (p.y + 0.5).floor());
            let inside = ix >= 0.0 && iy >= 0.0 && (ix as usize) < src.width && (iy as usize) < src.height;
            dst.pixels[cy * dst.width + cx] = if inside {
                src.pixels[iy as usize * src.width + ix as usize]
            } else {
                BACKGROUND
            };
        }
    }
}

/// Turns raw wheel deltas into whole ticks. Fractional deltas (touchpads,
/// smooth-scrolling mice) carry over to the next frame instead of being lost.
#[derive(Debug, Clone, Copy, Default)]
struct ScrollAccumulator {
    dx: f32,
    dy: f32,
}

impl ScrollAccumulator {
    fn ticks(&mut self, dx: f32, dy: f32) -> Vec<ScrollDirection> {
        self.dx += dx;
        self.dy += dy;
        let mut out = Vec::new();
        drain_axis(&mut self.dy, ScrollDirection::Up, ScrollDirection::Down, &mut out);
        drain_axis(&mut self.dx, ScrollDirection::Right, ScrollDirection::Left, &mut out);
        out
    }
}

fn drain_axis(sum: &mut f32, positive: ScrollDirection, negative: ScrollDirection, out: &mut Vec<ScrollDirection>) {
    let whole = sum.trunc();
    let direction = if whole > 0.0 { positive } else { negative };
    for _ in 0..whole.abs() as usize {
        out.push(direction);
    }
    *sum -= whole;
}

fn any_key_pressed(window: &Window, keys: &[Key]) -> bool {
    keys.iter().any(|k| window.is_key_pressed(*k, KeyRepeat::No))
}

fn button_at(buttons: &[(ButtonAction, Rect)], (x, y): (usize, usize)) -> Option<ButtonAction> {
    buttons.iter().find(|(_, r)| r.contains(x, y)).map(|(action, _)| *action)
}

/// A button fires when the press and the release both land on it.
fn click_on_release(
    buttons: &[(ButtonAction, Rect)],
    pressed: Option<ButtonAction>,
    mouse: Option<(usize, usize)>,
) -> Option<ButtonAction> {
    let pressed = pressed?;
    (button_at(buttons, mouse?) == Some(pressed)).then_some(pressed)
}

pub struct MaskWindow {
    window: Window, // the on-screen window you see
    screen: FrameBuffer,
    strip_width: usize,
    display: FrameBuffer, // full-resolution composite, packed for minifb
    scene: FrameBuffer,   // display rendered through the current limits
    limits: Viewport,
    dirty: bool,
    buttons: [(ButtonAction, Rect); 2],

    // Input gathered by the last pump.
    mouse: Option<(usize, usize)>,
    left_was_down: bool,
    drag: Option<Vec<Point>>,
    last_drag_pixel: Option<(usize, usize)>,
    selection: Option<Vec<Point>>,
    wheel: ScrollAccumulator,
    scroll: VecDeque<ScrollEvent>,
    pressed_button: Option<ButtonAction>,
    clicked: Option<ButtonAction>,
    view_command: Option<ViewCommand>,
    closed: bool,
}

impl MaskWindow {
    /// Open a window sized for `image` next to the button strip.
    /// Visual: the untouched image appears at full extent.
    pub fn new(title: &str, image: &RgbImage, settings: &Settings) -> Result<Self, Error> {
        let strip_width = settings.button_strip_width;
        let (max_w, max_h) = settings.max_window;
        let (cw, ch) = fit_canvas(image.width(), image.height(), max_w.saturating_sub(strip_width).max(1), max_h);
        let (width, height) = (strip_width + cw, ch.max(3 * BUTTON_HEIGHT));

        let mut window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(60);

        let button_w = strip_width.saturating_sub(16).max(1);
        let save_y = (height as f64 * 0.8) as usize - BUTTON_HEIGHT / 2;
        let reset_y = (height as f64 * 0.5) as usize - BUTTON_HEIGHT / 2;
        let buttons = [
            (ButtonAction::Save, Rect { x: 8, y: save_y, w: button_w, h: BUTTON_HEIGHT }),
            (ButtonAction::Reset, Rect { x: 8, y: reset_y, w: button_w, h: BUTTON_HEIGHT }),
        ];

        let mut this = Self {
            window,
            screen: FrameBuffer::new(width, height, STRIP_COLOR),
            strip_width,
            display: FrameBuffer::new(0, 0, 0),
            scene: FrameBuffer::new(cw, ch, BACKGROUND),
            limits: Viewport::full_extent(image.width(), image.height()),
            dirty: true,
            buttons,
            mouse: None,
            left_was_down: false,
            drag: None,
            last_drag_pixel: None,
            selection: None,
            wheel: ScrollAccumulator::default(),
            scroll: VecDeque::new(),
            pressed_button: None,
            clicked: None,
            view_command: None,
            closed: false,
        };
        this.show(image);
        Ok(this)
    }

    fn mapping(&self) -> ViewMapping {
        ViewMapping { limits: self.limits, width: self.scene.width, height: self.scene.height }
    }

    /// Window pixel to canvas pixel, if the point is over the image area.
    fn canvas_pos(&self, (x, y): (usize, usize)) -> Option<(usize, usize)> {
        if x < self.strip_width {
            return None;
        }
        let cx = x - self.strip_width;
        (cx < self.scene.width && y < self.scene.height).then_some((cx, y))
    }

    fn image_pos(&self, mouse: (usize, usize)) -> Option<Point> {
        let (cx, cy) = self.canvas_pos(mouse)?;
        Some(self.mapping().image_point(cx as f64, cy as f64))
    }

    /// Compose strip, buttons, canvas and overlays into the screen buffer.
    fn render(&mut self) {
        if self.dirty {
            let mapping = self.mapping();
            blit_view(&self.display, &mut self.scene, &mapping);
            self.dirty = false;
        }

        self.screen.pixels.fill(STRIP_COLOR);
        let sw = self.screen.width;
        for y in 0..self.scene.height.min(self.screen.height) {
            let row = &self.scene.pixels[y * self.scene.width..(y + 1) * self.scene.width];
            self.screen.pixels[y * sw + self.strip_width..y * sw + self.strip_width + self.scene.width]
                .copy_from_slice(row);
        }

        for (action, rect) in self.buttons {
            let hovered = self.mouse.is_some_and(|(x, y)| rect.contains(x, y));
            draw_button(&mut self.screen, rect, action.label(), hovered);
        }

        let offset = self.strip_width as i32;
        if let Some(path) = &self.drag {
            let mapping = self.mapping();
            let pts: Vec<(i32, i32)> = path
                .iter()
                .map(|p| {
                    let (x, y) = mapping.canvas_point(*p);
                    (x + offset, y)
                })
                .collect();
            for pair in pts.windows(2) {
                draw_line_blended(&mut self.screen, pair[0], pair[1], BLACK, LASSO_ALPHA);
            }
        }

        if let Some(pos) = self.mouse
            && let Some((cx, cy)) = self.canvas_pos(pos)
        {
            draw_crosshair(&mut self.screen, cx as i32 + offset, cy as i32, 12, CROSSHAIR);
        }
    }

    /// Turn this frame's raw mouse/keyboard state into editor events.
    fn collect_input(&mut self) {
        self.mouse = self
            .window
            .get_mouse_pos(MouseMode::Discard)
            .map(|(x, y)| (x.max(0.0) as usize, y.max(0.0) as usize));

        if self.window.is_key_pressed(Key::Escape, KeyRepeat::No)
            || self.window.is_key_pressed(Key::Q, KeyRepeat::No)
        {
            self.closed = true;
        }
        if any_key_pressed(&self.window, &[Key::H, Key::Home]) {
            self.view_command = Some(ViewCommand::Home);
        } else if any_key_pressed(&self.window, &[Key::Left, Key::Backspace]) {
            self.view_command = Some(ViewCommand::Back);
        } else if any_key_pressed(&self.window, &[Key::Right]) {
            self.view_command = Some(ViewCommand::Forward);
        }

        let left_down = self.window.get_mouse_down(MouseButton::Left);
        let pressed = left_down && !self.left_was_down;
        let released = !left_down && self.left_was_down;
        self.left_was_down = left_down;

        if pressed {
            if let Some(mouse) = self.mouse {
                if let Some(action) = button_at(&self.buttons, mouse) {
                    self.pressed_button = Some(action);
                } else if let Some(p) = self.image_pos(mouse) {
                    self.drag = Some(vec![p]);
                    self.last_drag_pixel = Some(mouse);
                }
            }
        } else if left_down {
            // Extend the path only when the cursor reaches a new screen pixel.
            if let Some(mouse) = self.mouse
                && self.last_drag_pixel != Some(mouse)
                && let Some(p) = self.image_pos(mouse)
                && let Some(path) = self.drag.as_mut()
            {
                path.push(p);
                self.last_drag_pixel = Some(mouse);
            }
        } else if released {
            if let Some(path) = self.drag.take()
                && path.len() >= 3
            {
                self.selection = Some(path);
            }
            self.last_drag_pixel = None;
            if let Some(action) = click_on_release(&self.buttons, self.pressed_button.take(), self.mouse) {
                self.clicked = Some(action);
            }
        }

        if let Some((dx, dy)) = self.window.get_scroll_wheel() {
            let ticks = self.wheel.ticks(dx, dy);
            // No image point under the cursor: nothing to zoom around.
            if let Some(cursor) = self.mouse.and_then(|m| self.image_pos(m)) {
                self.scroll.extend(ticks.into_iter().map(|direction| ScrollEvent { direction, cursor }));
            }
        }
    }
}

impl Canvas for MaskWindow {
    fn limits(&self) -> Viewport {
        self.limits
    }

    fn set_limits(&mut self, limits: Viewport) {
        self.limits = limits;
    }

    /// Pack the RGB image as 0x00RRGGBB for minifb.
    fn show(&mut self, image: &RgbImage) {
        let (w, h) = image.dimensions();
        let mut out = Vec::with_capacity(w as usize * h as usize);
        for pixel in image.pixels() {
            out.push(pack_rgb(pixel[0], pixel[1], pixel[2]));
        }
        self.display = FrameBuffer { width: w as usize, height: h as usize, pixels: out };
    }

    fn request_redraw(&mut self) {
        self.dirty = true;
    }
}

impl SelectionInput for MaskWindow {
    fn take_selection(&mut self) -> Option<Vec<Point>> {
        self.selection.take()
    }
}

impl ScrollInput for MaskWindow {
    fn take_scroll(&mut self) -> Option<ScrollEvent> {
        self.scroll.pop_front()
    }
}

impl Button for MaskWindow {
    fn take_click(&mut self, action: ButtonAction) -> bool {
        if self.clicked == Some(action) {
            self.clicked = None;
            true
        } else {
            false
        }
    }
}

impl Frontend for MaskWindow {
    fn is_open(&self) -> bool {
        !self.closed && self.window.is_open()
    }

    fn pump(&mut self) -> Result<(), Error> {
        self.render();
        self.window
            .update_with_buffer(&self.screen.pixels, self.screen.width, self.screen.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        self.collect_input();
        Ok(())
    }

    fn take_view_command(&mut self) -> Option<ViewCommand> {
        self.view_command.take()
    }
}

/* ---------- Software drawing: pixels, lines, crosshair, buttons, tiny bitmap font ---------- */

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
#[inline]
fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = color;
}

/// Mix `color` over the pixel at (x,y) with opacity `alpha`.
fn blend_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32, alpha: f32) {
    if x < 0 || y < 0 || x as usize >= fb.width || y as usize >= fb.height {
        return;
    }
    let idx = y as usize * fb.width + x as usize;
    let (r0, g0, b0) = unpack_rgb(fb.pixels[idx]);
    let (r1, g1, b1) = unpack_rgb(color);
    let mix = |c: u8, o: u8| (c as f32 * alpha + o as f32 * (1.0 - alpha)).round() as u8;
    fb.pixels[idx] = pack_rgb(mix(r1, r0), mix(g1, g0), mix(b1, b0));
}

/// Bresenham line from `a` to `b`, blended at `alpha`.
fn draw_line_blended(fb: &mut FrameBuffer, a: (i32, i32), b: (i32, i32), color: u32, alpha: f32) {
    let (mut x0, mut y0) = a;
    let (x1, y1) = b;
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        blend_pixel(fb, x0, y0, color, alpha);
        if x0 == x1 && y0 == y1 { break; }
        let e2 = 2 * err;
        if e2 >= dy { err += dy; x0 += sx; }
        if e2 <= dx { err += dx; y0 += sy; }
    }
}

/// Draw a small crosshair centered at (cx,cy).
/// Visual: a "+" shape (with a tiny gap at the center) follows your mouse.
fn draw_crosshair(fb: &mut FrameBuffer, cx: i32, cy: i32, size: i32, color: u32) {
    draw_line_blended(fb, (cx - size, cy), (cx - 2, cy), color, 1.0);
    draw_line_blended(fb, (cx + 2, cy), (cx + size, cy), color, 1.0);
    draw_line_blended(fb, (cx, cy - size), (cx, cy - 2), color, 1.0);
    draw_line_blended(fb, (cx, cy + 2), (cx, cy + size), color, 1.0);
    put_pixel(fb, cx, cy, color);
}

/// Filled button with a 1px border and a centred label; grey while hovered.
fn draw_button(fb: &mut FrameBuffer, rect: Rect, label: &str, hovered: bool) {
    let fill = if hovered { BUTTON_HOVER } else { BUTTON_COLOR };
    for y in rect.y..rect.y + rect.h {
        for x in rect.x..rect.x + rect.w {
            let edge = x == rect.x || y == rect.y || x == rect.x + rect.w - 1 || y == rect.y + rect.h - 1;
            put_pixel(fb, x as i32, y as i32, if edge { BLACK } else { fill });
        }
    }
    let text_w = label.chars().count() as i32 * 6 * TEXT_SCALE - TEXT_SCALE;
    let tx = rect.x as i32 + (rect.w as i32 - text_w) / 2;
    let ty = rect.y as i32 + (rect.h as i32 - 7 * TEXT_SCALE) / 2;
    draw_text_5x7(fb, tx, ty, label, BLACK, TEXT_SCALE);
}

/* ---------- 5x7 bitmap font (just the letters the button labels use) ---------- */

/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch {
        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        _ => None,
    }
}

/// Draw one glyph at (x,y), each font pixel as a `scale`×`scale` block.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, color: u32, scale: i32) {
    let Some(rows) = glyph5x7(ch) else { return };
    for (ry, rowbits) in rows.iter().enumerate() {
        for rx in 0..5 {
            if (rowbits & (1 << (4 - rx))) == 0 {
                continue;
            }
            for oy in 0..scale {
                for ox in 0..scale {
                    put_pixel(fb, x + rx * scale + ox, y + ry as i32 * scale + oy, color);
                }
            }
        }
    }
}

/// Draw a text string using 5x7 glyphs with 1 font pixel of spacing.
fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: u32, scale: i32) {
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color, scale);
        x += 6 * scale;
    }
}
