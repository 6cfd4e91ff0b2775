use crate::seed::SeededRng;

pub const MIN_INTENSITY: i32 = 0;
pub const MAX_INTENSITY: i32 = 255;

pub const MIN_COLOR_DISTANCE: i32 = 10;
pub const INIT_MIN_DISTANCE: i32 = 64;

pub fn clamp_intensity(value: i32) -> u8 {
    value.clamp(MIN_INTENSITY, MAX_INTENSITY) as u8
}

pub fn parse_intensity(raw: &str, fallback: u8) -> u8 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => clamp_intensity(value.round() as i32),
        _ => fallback,
    }
}

/// Nudges the just-edited `value` away from `other` until they are at least
/// `min_distance` apart. The nudge keeps the side `value` was on; when the
/// clamp to 0..=255 would collapse the gap it lands on the opposite side.
pub fn separate(value: i32, other: i32, min_distance: i32) -> u8 {
    let value = value.clamp(MIN_INTENSITY, MAX_INTENSITY);
    let other = other.clamp(MIN_INTENSITY, MAX_INTENSITY);
    if (value - other).abs() >= min_distance {
        return value as u8;
    }
    let preferred = if value > other {
        other + min_distance
    } else {
        other - min_distance
    };
    let clamped = preferred.clamp(MIN_INTENSITY, MAX_INTENSITY);
    if (clamped - other).abs() >= min_distance {
        return clamped as u8;
    }
    let opposite = if value > other {
        other - min_distance
    } else {
        other + min_distance
    };
    clamp_intensity(opposite)
}

pub fn seeded_colors(rng: &mut SeededRng) -> (u8, u8) {
    let span = (MAX_INTENSITY - MIN_INTENSITY + 1) as f64;
    let background = (rng.next_f64() * span).floor() as i32 + MIN_INTENSITY;
    let mut brush = (rng.next_f64() * span).floor() as i32 + MIN_INTENSITY;
    if (background - brush).abs() < INIT_MIN_DISTANCE {
        brush = (background + INIT_MIN_DISTANCE) % (MAX_INTENSITY + 1);
    }
    (clamp_intensity(background), clamp_intensity(brush))
}

pub fn gray_css(value: u8) -> String {
    format!("rgb({value},{value},{value})")
}
