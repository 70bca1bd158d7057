use std::f32::consts::PI;

/// Named easing curve mapping linear progress in `[0, 1]` onto eased progress.
///
/// Names follow the `family.direction` convention (`"circ.out"`,
/// `"power3.inOut"`). Every curve returns exactly `0.0` at `t <= 0` and exactly
/// `1.0` at `t >= 1`, so a keyframe rendered at either end lands on its
/// endpoint values without rounding drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ease {
    Linear,
    Power1In,
    #[default]
    Power1Out,
    Power1InOut,
    Power2In,
    Power2Out,
    Power2InOut,
    Power3In,
    Power3Out,
    Power3InOut,
    Power4In,
    Power4Out,
    Power4InOut,
    SineIn,
    SineOut,
    SineInOut,
    ExpoIn,
    ExpoOut,
    ExpoInOut,
    CircIn,
    CircOut,
    CircInOut,
}

impl Ease {
    pub fn apply(&self, t: f32) -> f32 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        match self {
            Self::Linear => t,
            Self::Power1In => power_in(t, 2),
            Self::Power1Out => power_out(t, 2),
            Self::Power1InOut => power_in_out(t, 2),
            Self::Power2In => power_in(t, 3),
            Self::Power2Out => power_out(t, 3),
            Self::Power2InOut => power_in_out(t, 3),
            Self::Power3In => power_in(t, 4),
            Self::Power3Out => power_out(t, 4),
            Self::Power3InOut => power_in_out(t, 4),
            Self::Power4In => power_in(t, 5),
            Self::Power4Out => power_out(t, 5),
            Self::Power4InOut => power_in_out(t, 5),
            Self::SineIn => 1.0 - (t * PI / 2.0).cos(),
            Self::SineOut => (t * PI / 2.0).sin(),
            Self::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
            Self::ExpoIn => 2f32.powf(10.0 * t - 10.0),
            Self::ExpoOut => 1.0 - 2f32.powf(-10.0 * t),
            Self::ExpoInOut => {
                if t < 0.5 {
                    2f32.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2f32.powf(-20.0 * t + 10.0)) / 2.0
                }
            }
            Self::CircIn => 1.0 - (1.0 - t * t).sqrt(),
            Self::CircOut => (1.0 - (t - 1.0) * (t - 1.0)).sqrt(),
            Self::CircInOut => {
                if t < 0.5 {
                    (1.0 - (1.0 - (2.0 * t) * (2.0 * t)).sqrt()) / 2.0
                } else {
                    ((1.0 - (-2.0 * t + 2.0) * (-2.0 * t + 2.0)).sqrt() + 1.0) / 2.0
                }
            }
        }
    }

    /// Parse a curve name. Unknown names fall back to the default curve.
    pub fn from_name(s: &str) -> Self {
        let lower = s.trim().to_ascii_lowercase();
        let (family, dir) = lower.split_once('.').unwrap_or((lower.as_str(), "out"));
        let dir = match dir {
            "in" => 0,
            "out" => 1,
            "inout" => 2,
            _ => return Self::default(),
        };
        let table: [Self; 3] = match family {
            "none" | "linear" => return Self::Linear,
            "power1" | "quad" => [Self::Power1In, Self::Power1Out, Self::Power1InOut],
            "power2" | "cubic" => [Self::Power2In, Self::Power2Out, Self::Power2InOut],
            "power3" | "quart" => [Self::Power3In, Self::Power3Out, Self::Power3InOut],
            "power4" | "quint" | "strong" => [Self::Power4In, Self::Power4Out, Self::Power4InOut],
            "sine" => [Self::SineIn, Self::SineOut, Self::SineInOut],
            "expo" => [Self::ExpoIn, Self::ExpoOut, Self::ExpoInOut],
            "circ" => [Self::CircIn, Self::CircOut, Self::CircInOut],
            _ => return Self::default(),
        };
        table[dir]
    }
}

#[inline]
fn power_in(t: f32, n: i32) -> f32 {
    t.powi(n)
}

#[inline]
fn power_out(t: f32, n: i32) -> f32 {
    1.0 - (1.0 - t).powi(n)
}

#[inline]
fn power_in_out(t: f32, n: i32) -> f32 {
    if t < 0.5 {
        2f32.powi(n - 1) * t.powi(n)
    } else {
        1.0 - (-2.0 * t + 2.0).powi(n) / 2.0
    }
}
