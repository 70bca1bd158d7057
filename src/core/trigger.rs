//! Scroll triggers: map document scroll position onto timeline playback.

use crate::core::error::TriggerError;

/// A length along an element or the viewport: a fraction of its size or pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Offset {
    Fraction(f32),
    Pixels(f32),
}

impl Offset {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "top" => Some(Self::Fraction(0.0)),
            "center" => Some(Self::Fraction(0.5)),
            "bottom" => Some(Self::Fraction(1.0)),
            t if t.ends_with('%') => t[..t.len() - 1].parse().ok().map(|p: f32| Self::Fraction(p / 100.0)),
            t => t.strip_suffix("px").unwrap_or(t).parse().ok().map(Self::Pixels),
        }
    }

    #[inline]
    fn resolve(&self, size: f32) -> f32 {
        match *self {
            Self::Fraction(f) => f * size,
            Self::Pixels(p) => p,
        }
    }
}

/// "`<element edge> <viewport edge>`": the trigger point is reached when the
/// element edge meets the viewport edge, e.g. `"top 96%"` fires when the
/// element's top reaches 96% of the viewport height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerPosition {
    pub element: Offset,
    pub viewport: Offset,
}

impl TriggerPosition {
    pub fn parse(s: &str) -> Result<Self, TriggerError> {
        let mut parts = s.split_whitespace();
        let (Some(e), Some(v), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(TriggerError::Parse(s.to_string()));
        };
        match (Offset::parse(e), Offset::parse(v)) {
            (Some(element), Some(viewport)) => Ok(Self { element, viewport }),
            _ => Err(TriggerError::Parse(s.to_string())),
        }
    }

    /// Document scroll offset at which this position is reached.
    pub fn scroll_offset(&self, section: &SectionRect, viewport_height: f32) -> f32 {
        section.top + self.element.resolve(section.height) - self.viewport.resolve(viewport_height)
    }
}

/// Section bounds in document coordinates (CSS pixels).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionRect {
    pub top: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TriggerMode {
    /// Play once on reaching `start`; optionally reverse when scrolling back above it.
    OneShot { reverse_on_leave_back: bool },
    /// Timeline time is bound to scroll progress between `start` and `end`.
    /// `smoothing` is the fraction of the remaining gap closed per frame.
    Scrub { smoothing: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerAction {
    Enter,
    LeaveBack,
}

#[derive(Debug, Clone)]
pub struct ScrollTrigger {
    pub section: &'static str,
    start: TriggerPosition,
    end: TriggerPosition,
    pub mode: TriggerMode,
    start_y: f32,
    end_y: f32,
    entered: Option<bool>,
}

impl ScrollTrigger {
    pub fn new(
        section: &'static str,
        start: &str,
        end: Option<&str>,
        mode: TriggerMode,
    ) -> Result<Self, TriggerError> {
        let start = TriggerPosition::parse(start)?;
        let end = match end {
            Some(e) => TriggerPosition::parse(e)?,
            None => TriggerPosition::parse("bottom top")?,
        };
        Ok(Self {
            section,
            start,
            end,
            mode,
            start_y: 0.0,
            end_y: 0.0,
            entered: None,
        })
    }

    /// Recompute scroll thresholds from the section's current layout.
    pub fn refresh(&mut self, section: &SectionRect, viewport_height: f32) {
        self.start_y = self.start.scroll_offset(section, viewport_height);
        self.end_y = self.end.scroll_offset(section, viewport_height);
    }

    pub fn start_y(&self) -> f32 {
        self.start_y
    }

    pub fn end_y(&self) -> f32 {
        self.end_y
    }

    /// `clamp((y - start) / (end - start), 0, 1)`; a degenerate range is a step at `start`.
    pub fn progress(&self, scroll_y: f32) -> f32 {
        let span = self.end_y - self.start_y;
        if span <= f32::EPSILON {
            return if scroll_y >= self.start_y { 1.0 } else { 0.0 };
        }
        ((scroll_y - self.start_y) / span).clamp(0.0, 1.0)
    }

    /// Report crossings of `start`. The first call treats the page as coming from above.
    pub fn update(&mut self, scroll_y: f32) -> Option<TriggerAction> {
        let inside = scroll_y >= self.start_y;
        let was = self.entered.replace(inside).unwrap_or(false);
        match (was, inside) {
            (false, true) => Some(TriggerAction::Enter),
            (true, false) => Some(TriggerAction::LeaveBack),
            _ => None,
        }
    }
}
