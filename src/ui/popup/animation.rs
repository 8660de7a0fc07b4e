//! Chip animation for the cycle popup.
//!
//! Each chip carries three [`Transition`]s: its transform progress (0 is
//! tucked under the cursor, 1 is fanned out), its opacity, and its lift (1 when
//! it is the highlighted chip). A transition that gets a new target mid-flight
//! starts from wherever it currently is, with the full duration and easing.
//! All durations and delays come from [`PopupTiming`](super::PopupTiming).

use std::time::Duration;

use bevy::prelude::*;

// Chip geometry //////////////////////////////////////////////////////////////

pub const CHIP_SIZE: f32 = 34.0;
pub const CHIP_GAP: f32 = 6.0;
pub const CHIP_ICON_SIZE: f32 = 16.0;
/// How far above the cursor the row's bottom edge sits
pub const ANCHOR_LIFT: f32 = 14.0;

/// Collapsed pose: dropped below its slot and shrunk
pub const COLLAPSED_DROP: f32 = 18.0;
pub const COLLAPSED_SCALE: f32 = 0.45;

/// The highlighted chip rises by about a third of its height
pub const ACTIVE_RISE: f32 = -12.0;
pub const ACTIVE_SCALE: f32 = 1.5;

/// Total width of a row of `chip_count` chips
pub fn track_width(chip_count: usize) -> f32 {
    if chip_count == 0 {
        return CHIP_SIZE;
    }
    let n = chip_count as f32;
    n * CHIP_SIZE + (n - 1.0) * CHIP_GAP
}

/// Horizontal slot of chip `index` in the fanned-out row
pub fn slot_x(index: usize) -> f32 {
    index as f32 * (CHIP_SIZE + CHIP_GAP)
}

// Easing /////////////////////////////////////////////////////////////////////

/// A CSS-style `cubic-bezier(x1, y1, x2, y2)` timing curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
}

impl CubicBezier {
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Springy curve used for chip transforms; overshoots past 1 before settling
    pub const FLOATY: Self = Self::new(0.18, 1.35, 0.26, 1.0);

    /// The CSS `ease` keyword, used for opacity
    pub const EASE: Self = Self::new(0.25, 0.1, 0.25, 1.0);

    fn sample(a: f32, b: f32, t: f32) -> f32 {
        // Bernstein form with P0 = 0 and P3 = 1
        let u = 1.0 - t;
        3.0 * u * u * t * a + 3.0 * u * t * t * b + t * t * t
    }

    fn slope(a: f32, b: f32, t: f32) -> f32 {
        let u = 1.0 - t;
        3.0 * u * u * a + 6.0 * u * t * (b - a) + 3.0 * t * t * (1.0 - b)
    }

    /// Solve for the curve parameter whose x equals `x`
    fn solve_t(&self, x: f32) -> f32 {
        let mut t = x;
        for _ in 0..8 {
            let err = Self::sample(self.x1, self.x2, t) - x;
            if err.abs() < 1e-5 {
                return t;
            }
            let d = Self::slope(self.x1, self.x2, t);
            if d.abs() < 1e-6 {
                break;
            }
            t -= err / d;
        }

        // Newton stalled; bisect instead
        let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
        t = x;
        for _ in 0..32 {
            let sx = Self::sample(self.x1, self.x2, t);
            if (sx - x).abs() < 1e-5 {
                break;
            }
            if sx < x {
                lo = t;
            } else {
                hi = t;
            }
            t = (lo + hi) * 0.5;
        }
        t
    }

    /// Eased value for linear progress `x` in [0, 1]
    pub fn ease(&self, x: f32) -> f32 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }
        Self::sample(self.y1, self.y2, self.solve_t(x))
    }
}

// Transitions ////////////////////////////////////////////////////////////////

/// A scalar moving from `from` to `to`, starting at `start`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub from: f32,
    pub to: f32,
    pub start: Duration,
}

impl Transition {
    /// A transition that has already arrived
    pub fn settled(value: f32) -> Self {
        Self {
            from: value,
            to: value,
            start: Duration::ZERO,
        }
    }

    pub fn value(&self, now: Duration, duration: Duration, curve: &CubicBezier) -> f32 {
        if now <= self.start {
            return self.from;
        }
        if duration.is_zero() {
            return self.to;
        }
        let linear = (now - self.start).as_secs_f32() / duration.as_secs_f32();
        self.from + (self.to - self.from) * curve.ease(linear.min(1.0))
    }

    /// Head for `to` from the current value, starting at `start`
    pub fn retarget(
        &mut self,
        to: f32,
        now: Duration,
        start: Duration,
        duration: Duration,
        curve: &CubicBezier,
    ) {
        let current = self.value(now, duration, curve);
        *self = Self {
            from: current,
            to,
            start,
        };
    }

    /// Jump straight to `value`
    pub fn snap(&mut self, value: f32) {
        *self = Self::settled(value);
    }
}

/// Where a chip is drawn, relative to its row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChipPose {
    /// Top-left corner of the chip inside the row
    pub offset: Vec2,
    pub size: f32,
    pub opacity: f32,
}

/// Resolve a chip's pose from its animation values
pub fn chip_pose(index: usize, spread: f32, opacity: f32, lift: f32, active: bool) -> ChipPose {
    let rise = ACTIVE_RISE * lift;
    let grow = 1.0 + (ACTIVE_SCALE - 1.0) * lift;

    let x = slot_x(index) * spread;
    let y = COLLAPSED_DROP * (1.0 - spread) + rise * spread;
    let scale = (COLLAPSED_SCALE * (1.0 - spread) + grow * spread).max(0.0);

    let size = CHIP_SIZE * scale;
    let centering = (CHIP_SIZE - size) * 0.5;

    ChipPose {
        offset: Vec2::new(x + centering, y + centering),
        size,
        // The highlighted chip stays opaque even while tucked away
        opacity: if active { 1.0 } else { opacity.clamp(0.0, 1.0) },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn easing_hits_endpoints() {
        for curve in [CubicBezier::FLOATY, CubicBezier::EASE] {
            assert_eq!(curve.ease(0.0), 0.0);
            assert_eq!(curve.ease(1.0), 1.0);
        }
    }

    #[test]
    fn floaty_curve_overshoots() {
        let peak = (1..100)
            .map(|i| CubicBezier::FLOATY.ease(i as f32 / 100.0))
            .fold(0.0_f32, f32::max);
        assert!(peak > 1.0, "expected overshoot, peak was {peak}");
    }

    #[test]
    fn ease_is_monotonic() {
        let mut prev = 0.0;
        for i in 0..=100 {
            let v = CubicBezier::EASE.ease(i as f32 / 100.0);
            assert!(v >= prev - 1e-4, "ease dipped at {i}");
            prev = v;
        }
    }

    #[test]
    fn transition_waits_for_its_start() {
        let t = Transition {
            from: 0.0,
            to: 1.0,
            start: ms(100),
        };
        assert_eq!(t.value(ms(50), ms(620), &CubicBezier::EASE), 0.0);
        assert_eq!(t.value(ms(720), ms(620), &CubicBezier::EASE), 1.0);
    }

    #[test]
    fn retarget_starts_from_current_value() {
        let curve = CubicBezier::EASE;
        let mut t = Transition {
            from: 0.0,
            to: 1.0,
            start: ms(0),
        };
        let midway = t.value(ms(310), ms(620), &curve);
        t.retarget(0.0, ms(310), ms(310), ms(620), &curve);
        assert_eq!(t.from, midway);
        assert_eq!(t.to, 0.0);
        assert_eq!(t.value(ms(310), ms(620), &curve), midway);
    }

    #[test]
    fn zero_duration_jumps_to_target() {
        let t = Transition {
            from: 0.0,
            to: 1.0,
            start: ms(0),
        };
        assert_eq!(t.value(ms(1), Duration::ZERO, &CubicBezier::EASE), 1.0);
    }

    #[test]
    fn fanned_out_chips_sit_in_their_slots() {
        let pose = chip_pose(3, 1.0, 1.0, 0.0, false);
        assert_eq!(pose.offset, Vec2::new(120.0, 0.0));
        assert_eq!(pose.size, CHIP_SIZE);
        assert_eq!(pose.opacity, 1.0);
    }

    #[test]
    fn collapsed_chips_hide_under_the_anchor() {
        let pose = chip_pose(3, 0.0, 0.0, 0.0, false);
        let size = CHIP_SIZE * COLLAPSED_SCALE;
        assert_eq!(pose.size, size);
        assert_eq!(pose.offset.x, (CHIP_SIZE - size) * 0.5);
        assert_eq!(pose.opacity, 0.0);
    }

    #[test]
    fn active_chip_is_lifted_and_opaque() {
        let pose = chip_pose(0, 1.0, 1.0, 1.0, true);
        assert_eq!(pose.size, CHIP_SIZE * ACTIVE_SCALE);
        assert!(pose.offset.y < 0.0);

        let tucked = chip_pose(0, 0.0, 0.0, 1.0, true);
        assert_eq!(tucked.opacity, 1.0);
    }

    #[test]
    fn track_width_counts_gaps() {
        assert_eq!(track_width(0), CHIP_SIZE);
        assert_eq!(track_width(1), CHIP_SIZE);
        assert_eq!(track_width(5), 5.0 * CHIP_SIZE + 4.0 * CHIP_GAP);
    }
}
