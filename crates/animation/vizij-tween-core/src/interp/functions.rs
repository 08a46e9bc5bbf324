//! Interpolation helpers:
//! - lerp for scalars and fixed-size vectors
//! - quaternion NLERP with shortest-arc normalization
//! - step semantics for bool/text
//! - cubic-bezier timing inversion used by the easing curves

use crate::value::Value;

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn lerp_array<const N: usize>(a: [f32; N], b: [f32; N], t: f32) -> [f32; N] {
    let mut out = a;
    for (o, (x, y)) in out.iter_mut().zip(a.iter().zip(b.iter())) {
        *o = lerp_f32(*x, *y, t);
    }
    out
}

#[inline]
fn dot4(a: [f32; 4], b: [f32; 4]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3]
}

#[inline]
fn normalize4(mut q: [f32; 4]) -> [f32; 4] {
    let len2 = dot4(q, q);
    if len2 > 0.0 {
        let inv_len = len2.sqrt().recip();
        for c in q.iter_mut() {
            *c *= inv_len;
        }
    }
    q
}

/// Quaternion NLERP with shortest-arc correction.
/// If dot < 0, negate the second quaternion to ensure the shortest path.
/// Returns a normalized quaternion (x,y,z,w).
#[inline]
pub fn nlerp_quat(a: [f32; 4], mut b: [f32; 4], t: f32) -> [f32; 4] {
    if dot4(a, b) < 0.0 {
        for c in b.iter_mut() {
            *c = -*c;
        }
    }
    normalize4(lerp_array(a, b, t))
}

/// Step interpolation: the left value until the segment completes.
#[inline]
pub fn step_value(a: &Value, b: &Value, t: f32) -> Value {
    if t >= 1.0 {
        b.clone()
    } else {
        a.clone()
    }
}

/// Interpolate across Value kinds.
pub fn linear_value(a: &Value, b: &Value, t: f32) -> Value {
    match (a, b) {
        (Value::Scalar(va), Value::Scalar(vb)) => Value::Scalar(lerp_f32(*va, *vb, t)),
        (Value::Vec2(va), Value::Vec2(vb)) => Value::Vec2(lerp_array(*va, *vb, t)),
        (Value::Vec3(va), Value::Vec3(vb)) => Value::Vec3(lerp_array(*va, *vb, t)),
        (Value::Vec4(va), Value::Vec4(vb)) => Value::Vec4(lerp_array(*va, *vb, t)),
        (Value::Quat(qa), Value::Quat(qb)) => Value::Quat(nlerp_quat(*qa, *qb, t)),
        (Value::Color(ca), Value::Color(cb)) => Value::Color(lerp_array(*ca, *cb, t)),
        (Value::Bool(_), Value::Bool(_)) | (Value::Text(_), Value::Text(_)) => step_value(a, b, t),
        // Mismatched kinds keep the left value.
        _ => {
            log::trace!("no blend between {:?} and {:?}", a.kind(), b.kind());
            a.clone()
        }
    }
}

/// Cubic Bezier basis function
#[inline]
fn cubic_bezier(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

/// Given control points (x1, y1, x2, y2) and an input t in [0,1],
/// compute the eased y by inverting the x bezier via binary search.
pub fn bezier_ease_t(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    // Bezier(0,0,1,1) is exactly linear
    if x1 == 0.0 && y1 == 0.0 && x2 == 1.0 && y2 == 1.0 {
        return t;
    }
    // Monotonic X in [0,1] assumed for x1/x2 ∈ [0,1]
    let mut lo = 0.0f32;
    let mut hi = 1.0f32;
    let mut mid = t;
    for _ in 0..24 {
        let x = cubic_bezier(0.0, x1, x2, 1.0, mid);
        if (x - t).abs() < 1e-6 {
            break;
        }
        if x < t {
            lo = mid;
        } else {
            hi = mid;
        }
        mid = 0.5 * (lo + hi);
    }
    cubic_bezier(0.0, y1, y2, 1.0, mid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_bezier_is_identity() {
        for t in [0.0, 0.25, 0.5, 1.0] {
            assert_eq!(bezier_ease_t(t, 0.0, 0.0, 1.0, 1.0), t);
        }
    }

    #[test]
    fn quat_nlerp_takes_short_arc() {
        let a = [0.0, 0.0, 0.0, 1.0];
        let b = [0.0, 0.0, 0.0, -1.0];
        let q = nlerp_quat(a, b, 0.5);
        assert!((q[3] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn mismatched_kinds_keep_left() {
        let a = Value::Scalar(1.0);
        let b = Value::Text("x".into());
        assert_eq!(linear_value(&a, &b, 0.5), a);
    }

    #[test]
    fn text_steps_at_segment_end() {
        let a = Value::Text("a".into());
        let b = Value::Text("b".into());
        assert_eq!(linear_value(&a, &b, 0.99), a);
        assert_eq!(linear_value(&a, &b, 1.0), b);
    }
}
