//! Row-major views onto `glam`'s column-major `Mat4`.
//!
//! Projection formulas in this workspace are written as `m[row][col]` with the
//! homogeneous `w` in row/column 3. `glam` stores columns, so these helpers
//! translate at the boundary.

use glam::{Mat4, Vec4};

/// Build a matrix from four rows.
pub fn from_rows(rows: [[f32; 4]; 4]) -> Mat4 {
    Mat4::from_cols(
        Vec4::new(rows[0][0], rows[1][0], rows[2][0], rows[3][0]),
        Vec4::new(rows[0][1], rows[1][1], rows[2][1], rows[3][1]),
        Vec4::new(rows[0][2], rows[1][2], rows[2][2], rows[3][2]),
        Vec4::new(rows[0][3], rows[1][3], rows[2][3], rows[3][3]),
    )
}

/// Return the matrix as `[row][col]`.
pub fn to_rows_array(m: &Mat4) -> [[f32; 4]; 4] {
    m.transpose().to_cols_array_2d()
}
