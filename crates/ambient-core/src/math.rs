//! Small scalar helpers shared by the per-frame loops.

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Frame-rate independent exponential approach of `current` toward `target`.
///
/// `lambda` is the damping rate in 1/s and `dt` the elapsed frame time in
/// seconds. Two steps of `dt/2` land on the same value as one step of `dt`.
#[inline]
pub fn damp(current: f32, target: f32, lambda: f32, dt: f32) -> f32 {
    lerp(current, target, 1.0 - (-lambda * dt).exp())
}

/// Physics wrap: leaving past `size + margin` re-enters at `-margin` and
/// vice versa.
#[inline]
pub fn wrap_for_space(value: f32, size: f32, margin: f32) -> f32 {
    if value < -margin {
        size + margin
    } else if value > size + margin {
        -margin
    } else {
        value
    }
}

/// Render wrap into `[0, size)`; independent of the physics wrap.
#[inline]
pub fn wrap_for_render(value: f32, size: f32) -> f32 {
    if size <= 0.0 {
        return value;
    }
    let wrapped = value % size;
    if wrapped < 0.0 {
        wrapped + size
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_wrap_handles_negative_values() {
        assert_eq!(wrap_for_render(-10.0, 100.0), 90.0);
        assert_eq!(wrap_for_render(250.0, 100.0), 50.0);
        assert_eq!(wrap_for_render(5.0, 0.0), 5.0);
    }

    #[test]
    fn space_wrap_swaps_edges() {
        assert_eq!(wrap_for_space(119.0, 100.0, 18.0), -18.0);
        assert_eq!(wrap_for_space(-19.0, 100.0, 18.0), 118.0);
        assert_eq!(wrap_for_space(50.0, 100.0, 18.0), 50.0);
    }
}
