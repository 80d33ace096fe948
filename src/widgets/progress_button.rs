//! Progress button state (rendering-agnostic)
//!
//! Owns the `ButtonState` machine and the fill animation. The host layout
//! calls [`ProgressButton::measure`], the host event loop calls
//! [`ProgressButton::tick`] every frame, and a frontend paints the list of
//! [`DrawOp`]s returned by [`ProgressButton::render`].

use super::animator::{AnimatorEvent, ValueAnimator};
use super::button_state::ButtonState;
use crate::config::{parse_color, ButtonConfig, Strings};
use ratatui::style::Color;
use ratatui::text::Span;
use std::time::{Duration, Instant};

/// Per-axis layout constraint handed down by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureSpec {
    /// The parent decided the size
    Exactly(u16),
    /// Take what you need, up to this much
    AtMost(u16),
    /// No constraint
    Unspecified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constraints {
    pub width: MeasureSpec,
    pub height: MeasureSpec,
}

impl Constraints {
    pub fn exactly(width: u16, height: u16) -> Self {
        Self {
            width: MeasureSpec::Exactly(width),
            height: MeasureSpec::Exactly(height),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

/// Pick a final size for one axis.
pub fn resolve_size(desired: u16, spec: MeasureSpec) -> u16 {
    match spec {
        MeasureSpec::Exactly(size) => size,
        MeasureSpec::AtMost(max) => desired.min(max),
        MeasureSpec::Unspecified => desired,
    }
}

/// One painting step, in button-local cell coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Fill the full bounds
    Background { color: Color },
    Text {
        text: String,
        x: u16,
        y: u16,
        color: Color,
    },
    /// Filled rectangle covering `x0..x1`, `y0..y1`
    Rect {
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        color: Color,
    },
    /// Pie arc centered on a cell, `sweep` in degrees (0..=360)
    Arc {
        x: u16,
        y: u16,
        sweep: u16,
        color: Color,
    },
}

/// Static look of the button.
#[derive(Debug, Clone)]
pub struct ButtonStyle {
    pub text_color: Color,
    pub background: Color,
    pub loading_color: Color,
    pub arc_color: Color,
    pub show_arc: bool,
    pub idle_caption: String,
    pub loading_caption: String,
    pub horizontal_padding: u16,
    pub vertical_padding: u16,
    pub min_height: u16,
    pub animation_duration: Duration,
}

impl ButtonStyle {
    pub fn from_config(button: &ButtonConfig, strings: &Strings) -> Self {
        Self {
            text_color: parse_color(&button.text_color).unwrap_or(Color::White),
            background: parse_color(&button.background).unwrap_or(Color::Cyan),
            loading_color: parse_color(&button.loading_color).unwrap_or(Color::Blue),
            arc_color: parse_color(&button.arc_color).unwrap_or(Color::Yellow),
            show_arc: button.show_arc,
            idle_caption: strings.button_name.clone(),
            loading_caption: strings.button_loading.clone(),
            horizontal_padding: button.horizontal_padding,
            vertical_padding: button.vertical_padding,
            min_height: button.min_height,
            animation_duration: Duration::from_millis(button.animation_duration_ms),
        }
    }
}

/// Clickable control with a looping fill animation while loading.
pub struct ProgressButton {
    style: ButtonStyle,
    state: ButtonState,
    size: Size,
    fill_width: u16,
    enabled: bool,
    animator: ValueAnimator,
}

impl ProgressButton {
    pub fn new(style: ButtonStyle) -> Self {
        let mut animator = ValueAnimator::new();
        animator.set_values(0, 0);
        animator.set_duration(style.animation_duration);

        Self {
            style,
            state: ButtonState::default(),
            size: Size::default(),
            fill_width: 0,
            enabled: true,
            animator,
        }
    }

    /// Whether clicks are currently accepted
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Set the current state and apply its transition. Never rejected.
    pub fn set_state(&mut self, state: ButtonState) {
        self.set_state_at(state, Instant::now());
    }

    /// [`Self::set_state`] with an explicit clock, for simulated time.
    pub fn set_state_at(&mut self, state: ButtonState, now: Instant) {
        tracing::debug!("Progress button {:?} -> {:?}", self.state, state);
        self.state = state;

        match state {
            ButtonState::Clicked | ButtonState::Completed => {
                if let Some(event) = self.animator.cancel() {
                    self.on_animator_event(event);
                }
            }
            ButtonState::Loading => {
                if let Some(event) = self.animator.cancel() {
                    self.on_animator_event(event);
                }
                self.animator.set_values(0, self.size.width);
                self.animator.set_duration(self.style.animation_duration);
                let event = self.animator.start(now);
                self.fill_width = self.animator.value();
                self.on_animator_event(event);
            }
        }
    }

    fn on_animator_event(&mut self, event: AnimatorEvent) {
        match event {
            AnimatorEvent::Started => self.enabled = false,
            AnimatorEvent::Ended => self.enabled = true,
        }
    }

    /// Advance the fill animation. Returns true when a redraw is needed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.animator.tick(now) {
            Some(value) => {
                self.fill_width = value;
                true
            }
            None => false,
        }
    }

    fn caption(&self) -> &str {
        match self.state {
            ButtonState::Loading => &self.style.loading_caption,
            ButtonState::Clicked | ButtonState::Completed => &self.style.idle_caption,
        }
    }

    fn caption_width(text: &str) -> u16 {
        Span::raw(text).width().min(u16::MAX as usize) as u16
    }

    /// Compute and store the final size for the given constraints.
    pub fn measure(&mut self, constraints: Constraints) -> Size {
        let content_width = Self::caption_width(&self.style.idle_caption)
            .max(Self::caption_width(&self.style.loading_caption));
        let min_width = content_width.saturating_add(self.style.horizontal_padding.saturating_mul(2));
        let min_height = self
            .style
            .vertical_padding
            .saturating_mul(2)
            .saturating_add(1)
            .max(self.style.min_height);

        self.size = Size {
            width: resolve_size(min_width, constraints.width),
            height: resolve_size(min_height, constraints.height),
        };
        self.animator.set_end(self.size.width);
        self.size
    }

    /// Paint operations for the current state, in order.
    pub fn render(&self) -> Vec<DrawOp> {
        let Size { width, height } = self.size;
        let mut ops = vec![DrawOp::Background {
            color: self.style.background,
        }];

        let caption = self.caption();
        let text_width = Self::caption_width(caption);
        let text_x = width.saturating_sub(text_width) / 2;
        let text_y = height.saturating_sub(1) / 2;
        ops.push(DrawOp::Text {
            text: caption.to_string(),
            x: text_x,
            y: text_y,
            color: self.style.text_color,
        });

        if self.state == ButtonState::Loading {
            ops.push(DrawOp::Rect {
                x0: 0,
                y0: 0,
                x1: self.fill_width.min(width),
                y1: height,
                color: self.style.loading_color,
            });

            let arc_x = text_x.saturating_add(text_width).saturating_add(2);
            if self.style.show_arc && arc_x < width {
                let sweep = if width == 0 {
                    0
                } else {
                    (u32::from(self.fill_width.min(width)) * 360 / u32::from(width)) as u16
                };
                ops.push(DrawOp::Arc {
                    x: arc_x,
                    y: text_y,
                    sweep,
                    color: self.style.arc_color,
                });
            }
        }

        ops
    }
}

#[cfg(test)]
impl ProgressButton {
    pub fn state(&self) -> ButtonState {
        self.state
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn fill_width(&self) -> u16 {
        self.fill_width
    }

    pub fn style(&self) -> &ButtonStyle {
        &self.style
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn button() -> ProgressButton {
        let config = Config::embedded().unwrap();
        ProgressButton::new(ButtonStyle::from_config(&config.button, &config.strings))
    }

    fn measured(width: u16) -> ProgressButton {
        let mut button = button();
        button.measure(Constraints::exactly(width, 3));
        button
    }

    #[test]
    fn test_initial_state() {
        let mut button = button();
        assert_eq!(button.state(), ButtonState::Completed);
        assert!(button.is_enabled());
        assert!(!button.tick(Instant::now()));
    }

    #[test]
    fn test_enabled_iff_last_transition_was_loading() {
        let mut button = measured(40);
        let sequence = [
            ButtonState::Clicked,
            ButtonState::Loading,
            ButtonState::Loading,
            ButtonState::Completed,
            ButtonState::Loading,
            ButtonState::Clicked,
            ButtonState::Completed,
            ButtonState::Completed,
            ButtonState::Loading,
        ];
        for state in sequence {
            button.set_state(state);
            assert_eq!(button.is_enabled(), state != ButtonState::Loading, "{:?}", state);
        }
    }

    #[test]
    fn test_fill_width_is_sawtooth() {
        let mut button = measured(40);
        let t0 = Instant::now();
        button.set_state_at(ButtonState::Loading, t0);
        assert_eq!(button.fill_width(), 0);

        let mut samples = Vec::new();
        for step in 1..=30u64 {
            assert!(button.tick(t0 + Duration::from_millis(step * 50)));
            samples.push(button.fill_width());
        }

        assert!(samples.iter().all(|w| *w <= 40));
        // 1000ms is the 20th sample
        assert_eq!(samples[19], 40);
        assert!(samples[20] < samples[19]);
        assert_eq!(samples[9], 20);
        assert_eq!(samples[29], 20);
    }

    #[test]
    fn test_cancel_stops_updates() {
        for terminal in [ButtonState::Clicked, ButtonState::Completed] {
            let mut button = measured(20);
            let t0 = Instant::now();
            button.set_state_at(ButtonState::Loading, t0);
            assert!(button.tick(t0 + Duration::from_millis(300)));
            let frozen = button.fill_width();

            button.set_state_at(terminal, t0 + Duration::from_millis(310));
            assert!(!button.tick(t0 + Duration::from_millis(600)));
            assert_eq!(button.fill_width(), frozen);
            assert!(button.is_enabled());
        }
    }

    #[test]
    fn test_measure_respects_content_and_padding() {
        let mut button = button();
        let style = button.style().clone();
        let content = style.loading_caption.len().max(style.idle_caption.len()) as u16;

        let size = button.measure(Constraints {
            width: MeasureSpec::Unspecified,
            height: MeasureSpec::Unspecified,
        });
        assert_eq!(size.width, content + style.horizontal_padding * 2);
        assert_eq!(size.height, 3);

        let size = button.measure(Constraints {
            width: MeasureSpec::AtMost(10),
            height: MeasureSpec::AtMost(100),
        });
        assert_eq!(size, Size { width: 10, height: 3 });

        let size = button.measure(Constraints::exactly(80, 5));
        assert_eq!(size, Size { width: 80, height: 5 });
        assert_eq!(button.size(), size);
    }

    #[test]
    fn test_render_idle() {
        let button = measured(40);
        let ops = button.render();
        assert_eq!(ops.len(), 2);
        assert!(matches!(ops[0], DrawOp::Background { .. }));
        match &ops[1] {
            DrawOp::Text { text, x, y, .. } => {
                assert_eq!(text, "Download");
                assert_eq!(*x, (40 - 8) / 2);
                assert_eq!(*y, 1);
            }
            other => panic!("unexpected op {:?}", other),
        }
    }

    #[test]
    fn test_render_loading_draws_fill_after_label() {
        let mut button = measured(40);
        let t0 = Instant::now();
        button.set_state_at(ButtonState::Loading, t0);
        button.tick(t0 + Duration::from_millis(500));

        let ops = button.render();
        match &ops[1] {
            DrawOp::Text { text, .. } => assert_eq!(text, "We are loading"),
            other => panic!("unexpected op {:?}", other),
        }
        match &ops[2] {
            DrawOp::Rect { x0, y0, x1, y1, .. } => {
                assert_eq!((*x0, *y0, *x1, *y1), (0, 0, 20, 3));
            }
            other => panic!("unexpected op {:?}", other),
        }
        match &ops[3] {
            DrawOp::Arc { sweep, color, .. } => {
                assert_eq!(*sweep, 180);
                assert_eq!(*color, button.style().arc_color);
            }
            other => panic!("unexpected op {:?}", other),
        }
    }

    #[test]
    fn test_arc_optional() {
        let config = Config::embedded().unwrap();
        let mut style = ButtonStyle::from_config(&config.button, &config.strings);
        style.show_arc = false;
        let mut button = ProgressButton::new(style);
        button.measure(Constraints::exactly(40, 3));
        button.set_state(ButtonState::Loading);
        assert!(!button.render().iter().any(|op| matches!(op, DrawOp::Arc { .. })));
    }

    #[test]
    fn test_resize_while_loading_follows_new_width() {
        let mut button = measured(40);
        let t0 = Instant::now();
        button.set_state_at(ButtonState::Loading, t0);
        button.measure(Constraints::exactly(80, 3));
        button.tick(t0 + Duration::from_millis(500));
        assert_eq!(button.fill_width(), 40);
    }
}
