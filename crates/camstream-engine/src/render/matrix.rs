//! Transform matrices shared between the render thread and controller threads.

use std::sync::Arc;

use arc_swap::{ArcSwap, Guard};

use crate::error::{Error, Result};

/// Column-major 4x4 matrix, laid out the way `glUniformMatrix4fv` expects.
pub type Mat4 = [f32; 16];

pub const IDENTITY: Mat4 = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0, //
];

/// Returns `a * b`.
pub fn multiply(a: &Mat4, b: &Mat4) -> Mat4 {
    let mut out = [0.0; 16];
    for col in 0..4 {
        for row in 0..4 {
            out[col * 4 + row] = (0..4).map(|k| a[k * 4 + row] * b[col * 4 + k]).sum();
        }
    }
    out
}

/// Returns `m` rotated by `degrees` around the Z axis (post-multiplied).
pub fn rotate_z(m: &Mat4, degrees: f32) -> Mat4 {
    let (s, c) = degrees.to_radians().sin_cos();
    let rotation = [
        c, s, 0.0, 0.0, //
        -s, c, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0, //
    ];
    multiply(m, &rotation)
}

/// Returns `m` scaled by `(x, y, z)` (post-multiplied).
pub fn scale(m: &Mat4, x: f32, y: f32, z: f32) -> Mat4 {
    let mut out = *m;
    for (axis, factor) in [x, y, z].into_iter().enumerate() {
        for row in 0..4 {
            out[axis * 4 + row] *= factor;
        }
    }
    out
}

/// Immutable matrix snapshot behind an atomic pointer.
///
/// Readers always observe one complete matrix. Writers install a whole new
/// snapshot with a compare-and-swap; nothing ever blocks.
#[derive(Debug)]
pub struct MatrixSlot {
    current: ArcSwap<Mat4>,
}

impl MatrixSlot {
    pub fn new(initial: Mat4) -> Self {
        Self {
            current: ArcSwap::from_pointee(initial),
        }
    }

    /// Returns the currently installed matrix.
    pub fn snapshot(&self) -> Mat4 {
        **self.current.load()
    }

    /// Replaces the matrix with `update(current)`.
    ///
    /// `update` must be pure: if another writer lands in between it is called
    /// again with the newer snapshot. Returning `None`, or a matrix whose
    /// length is not 16, rejects the update and leaves the slot untouched.
    pub fn update<F, M>(&self, mut update: F) -> Result<()>
    where
        F: FnMut(Mat4) -> Option<M>,
        M: AsRef<[f32]>,
    {
        let mut current = self.current.load_full();
        loop {
            let next = Arc::new(validate(update(*current))?);
            let previous = self.current.compare_and_swap(&current, next);
            if Arc::ptr_eq(&*previous, &current) {
                return Ok(());
            }
            current = Guard::into_inner(previous);
        }
    }
}

impl Default for MatrixSlot {
    fn default() -> Self {
        Self::new(IDENTITY)
    }
}

fn validate<M: AsRef<[f32]>>(candidate: Option<M>) -> Result<Mat4> {
    let Some(candidate) = candidate else {
        return Err(Error::InvalidUpdate {
            reason: "updater returned no matrix".to_owned(),
        });
    };

    let values = candidate.as_ref();
    Mat4::try_from(values).map_err(|_| Error::InvalidUpdate {
        reason: format!("updater must return a 4x4 matrix, got {} elements", values.len()),
    })
}
