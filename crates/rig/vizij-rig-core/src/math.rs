//! Quaternion and vector helpers used by constraints and streams.
//!
//! Quaternions are `[f32; 4]` in (x, y, z, w) order, vectors are `[f32; 3]`.
//! - clamp01 for slider factors
//! - quaternion slerp and NLERP, both shortest-arc
//! - composition/inverse for parent-space conversion

use serde::{Deserialize, Serialize};

pub const QUAT_IDENTITY: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// Clamp into [0, 1]. NaN maps to 0 so a corrupt slider reads as "fully A".
#[inline]
pub fn clamp01(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

#[inline]
fn lerp_f(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn dot4(a: [f32; 4], b: [f32; 4]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3]
}

#[inline]
fn neg4(q: [f32; 4]) -> [f32; 4] {
    [-q[0], -q[1], -q[2], -q[3]]
}

/// Normalize a quaternion; a zero quaternion becomes identity.
#[inline]
pub fn normalize_quat(q: [f32; 4]) -> [f32; 4] {
    let mag = dot4(q, q).sqrt();
    if mag == 0.0 || !mag.is_finite() {
        QUAT_IDENTITY
    } else {
        [q[0] / mag, q[1] / mag, q[2] / mag, q[3] / mag]
    }
}

/// Hamilton product `a * b` (apply `b` first, then `a`).
#[inline]
pub fn quat_mul(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
    let [ax, ay, az, aw] = a;
    let [bx, by, bz, bw] = b;
    [
        aw * bx + ax * bw + ay * bz - az * by,
        aw * by - ax * bz + ay * bw + az * bx,
        aw * bz + ax * by - ay * bx + az * bw,
        aw * bw - ax * bx - ay * by - az * bz,
    ]
}

/// Inverse of a unit quaternion.
#[inline]
pub fn quat_conjugate(q: [f32; 4]) -> [f32; 4] {
    [-q[0], -q[1], -q[2], q[3]]
}

/// Rotation of `radians` about `axis` (axis need not be normalized).
pub fn quat_from_axis_angle(axis: [f32; 3], radians: f32) -> [f32; 4] {
    let len = (axis[0] * axis[0] + axis[1] * axis[1] + axis[2] * axis[2]).sqrt();
    if len == 0.0 {
        return QUAT_IDENTITY;
    }
    let (s, c) = (radians * 0.5).sin_cos();
    let k = s / len;
    [axis[0] * k, axis[1] * k, axis[2] * k, c]
}

/// Smallest angle (radians, in [0, PI]) between two orientations.
pub fn angle_between(a: [f32; 4], b: [f32; 4]) -> f32 {
    // atan2 of the relative rotation stays accurate near zero, unlike acos(dot).
    let d = quat_mul(quat_conjugate(normalize_quat(a)), normalize_quat(b));
    let v = (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt();
    2.0 * v.atan2(d[3].abs())
}

/// Slerp between two unit quaternions along the shortest arc.
/// `t <= 0` returns `q1` and `t >= 1` returns `q2` unchanged.
pub fn slerp_quat(q1: [f32; 4], q2: [f32; 4], t: f32) -> [f32; 4] {
    if t <= 0.0 {
        return q1;
    }
    if t >= 1.0 {
        return q2;
    }

    let qa = normalize_quat(q1);
    let mut qb = normalize_quat(q2);

    let mut dot = dot4(qa, qb);
    if dot < 0.0 {
        qb = neg4(qb);
        dot = -dot;
    }

    // Nearly parallel: sin(theta) is too small to divide by.
    const DOT_THRESHOLD: f32 = 0.9995;
    if dot > DOT_THRESHOLD {
        return nlerp_raw(qa, qb, t);
    }

    let theta_0 = dot.clamp(-1.0, 1.0).acos();
    let theta = theta_0 * t;
    let sin_theta_0 = theta_0.sin();

    let s0 = (theta_0 - theta).sin() / sin_theta_0;
    let s1 = theta.sin() / sin_theta_0;

    normalize_quat([
        s0 * qa[0] + s1 * qb[0],
        s0 * qa[1] + s1 * qb[1],
        s0 * qa[2] + s1 * qb[2],
        s0 * qa[3] + s1 * qb[3],
    ])
}

#[inline]
fn nlerp_raw(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
    normalize_quat([
        lerp_f(a[0], b[0], t),
        lerp_f(a[1], b[1], t),
        lerp_f(a[2], b[2], t),
        lerp_f(a[3], b[3], t),
    ])
}

/// Quaternion NLERP with shortest-arc correction.
/// `t <= 0` returns `a` and `t >= 1` returns `b` unchanged.
pub fn nlerp_quat(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
    if t <= 0.0 {
        return a;
    }
    if t >= 1.0 {
        return b;
    }
    let b = if dot4(a, b) < 0.0 { neg4(b) } else { b };
    nlerp_raw(a, b, t)
}

/// Rotation interpolation used by constraints.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationInterp {
    /// Constant angular velocity.
    #[default]
    Slerp,
    /// Normalized linear blend; cheaper, not constant speed.
    Nlerp,
}

impl RotationInterp {
    #[inline]
    pub fn interpolate(self, a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
        match self {
            RotationInterp::Slerp => slerp_quat(a, b, t),
            RotationInterp::Nlerp => nlerp_quat(a, b, t),
        }
    }
}
