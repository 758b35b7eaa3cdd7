use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum TableError {
    #[error("dimension {dimension} has no breakpoints")]
    Empty { dimension: usize },
    #[error("breakpoints of dimension {dimension} are not strictly increasing")]
    NonIncreasingBreakpoints { dimension: usize },
    #[error("table holds {actual} values, but its breakpoints require {expected}")]
    SizeMismatch { expected: usize, actual: usize },
}

/// Linearly interpolates `ys` over the strictly increasing breakpoints `xs`. Queries outside the
/// breakpoints are clamped to the first or last value.
pub fn interpolation(xs: &[f64], ys: &[f64], intermediate_x: f64) -> f64 {
    if xs.is_empty() || xs.len() != ys.len() {
        return 0.;
    }

    let (lower, upper, fraction) = segment(xs, intermediate_x);
    lerp(ys[lower], ys[upper], fraction)
}

/// Finds the breakpoints enclosing `x`. A query exactly on a breakpoint always resolves to that
/// breakpoint with a zero fraction, so that the table value is returned unaltered. NaN resolves
/// to the first breakpoint.
fn segment(breakpoints: &[f64], x: f64) -> (usize, usize, f64) {
    let last = breakpoints.len() - 1;

    if last == 0 || !(x > breakpoints[0]) {
        (0, 0, 0.)
    } else if x >= breakpoints[last] {
        (last, last, 0.)
    } else {
        let upper = breakpoints.partition_point(|&breakpoint| breakpoint <= x);
        let lower = upper - 1;

        (
            lower,
            upper,
            (x - breakpoints[lower]) / (breakpoints[upper] - breakpoints[lower]),
        )
    }
}

fn lerp(lower: f64, upper: f64, fraction: f64) -> f64 {
    lower + fraction * (upper - lower)
}

fn validate_breakpoints(breakpoints: &[f64], dimension: usize) -> Result<(), TableError> {
    if breakpoints.is_empty() {
        return Err(TableError::Empty { dimension });
    }

    if breakpoints.windows(2).all(|pair| pair[0] < pair[1]) {
        Ok(())
    } else {
        Err(TableError::NonIncreasingBreakpoints { dimension })
    }
}

fn validate_size(expected: usize, actual: usize) -> Result<(), TableError> {
    if expected == actual {
        Ok(())
    } else {
        Err(TableError::SizeMismatch { expected, actual })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BreakpointTable1D {
    breakpoints: Vec<f64>,
    values: Vec<f64>,
}

impl BreakpointTable1D {
    pub fn new(breakpoints: Vec<f64>, values: Vec<f64>) -> Result<Self, TableError> {
        validate_breakpoints(&breakpoints, 1)?;
        validate_size(breakpoints.len(), values.len())?;

        Ok(Self {
            breakpoints,
            values,
        })
    }

    pub fn interpolate(&self, x: f64) -> f64 {
        interpolation(&self.breakpoints, &self.values, x)
    }
}

/// A two dimensional table. The data is laid out with the first dimension varying fastest, i.e.
/// the value at `(i, j)` is stored at `i + j * n1`.
#[derive(Clone, Debug, PartialEq)]
pub struct BreakpointTable2D {
    breakpoints_1: Vec<f64>,
    breakpoints_2: Vec<f64>,
    data: Vec<f64>,
}

impl BreakpointTable2D {
    pub fn new(
        breakpoints_1: Vec<f64>,
        breakpoints_2: Vec<f64>,
        data: Vec<f64>,
    ) -> Result<Self, TableError> {
        validate_breakpoints(&breakpoints_1, 1)?;
        validate_breakpoints(&breakpoints_2, 2)?;
        validate_size(breakpoints_1.len() * breakpoints_2.len(), data.len())?;

        Ok(Self {
            breakpoints_1,
            breakpoints_2,
            data,
        })
    }

    pub fn interpolate(&self, x1: f64, x2: f64) -> f64 {
        let n1 = self.breakpoints_1.len();
        let (i0, i1, f1) = segment(&self.breakpoints_1, x1);
        let (j0, j1, f2) = segment(&self.breakpoints_2, x2);

        let at = |i: usize, j: usize| self.data[i + j * n1];

        lerp(
            lerp(at(i0, j0), at(i1, j0), f1),
            lerp(at(i0, j1), at(i1, j1), f1),
            f2,
        )
    }
}

/// A three dimensional table. The data is laid out with the first dimension varying fastest, i.e.
/// the value at `(i, j, k)` is stored at `i + n1 * (j + n2 * k)`.
#[derive(Clone, Debug, PartialEq)]
pub struct BreakpointTable3D {
    breakpoints_1: Vec<f64>,
    breakpoints_2: Vec<f64>,
    breakpoints_3: Vec<f64>,
    data: Vec<f64>,
}

impl BreakpointTable3D {
    pub fn new(
        breakpoints_1: Vec<f64>,
        breakpoints_2: Vec<f64>,
        breakpoints_3: Vec<f64>,
        data: Vec<f64>,
    ) -> Result<Self, TableError> {
        validate_breakpoints(&breakpoints_1, 1)?;
        validate_breakpoints(&breakpoints_2, 2)?;
        validate_breakpoints(&breakpoints_3, 3)?;
        validate_size(
            breakpoints_1.len() * breakpoints_2.len() * breakpoints_3.len(),
            data.len(),
        )?;

        Ok(Self {
            breakpoints_1,
            breakpoints_2,
            breakpoints_3,
            data,
        })
    }

    pub fn interpolate(&self, x1: f64, x2: f64, x3: f64) -> f64 {
        let n1 = self.breakpoints_1.len();
        let n2 = self.breakpoints_2.len();
        let (i0, i1, f1) = segment(&self.breakpoints_1, x1);
        let (j0, j1, f2) = segment(&self.breakpoints_2, x2);
        let (k0, k1, f3) = segment(&self.breakpoints_3, x3);

        let at = |i: usize, j: usize, k: usize| self.data[i + n1 * (j + n2 * k)];
        let plane = |k: usize| {
            lerp(
                lerp(at(i0, j0, k), at(i1, j0, k), f1),
                lerp(at(i0, j1, k), at(i1, j1, k), f1),
                f2,
            )
        };

        lerp(plane(k0), plane(k1), f3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const XS: [f64; 4] = [0., 1., 3., 10.];
    const YS: [f64; 4] = [0.1, 0.3, -0.7, 2.9];

    #[rstest]
    #[case(0.)]
    #[case(1.)]
    #[case(3.)]
    #[case(10.)]
    fn returns_exact_value_at_breakpoint(#[case] x: f64) {
        let index = XS.iter().position(|&bp| bp == x).unwrap();

        assert_eq!(interpolation(&XS, &YS, x), YS[index]);
    }

    #[rstest]
    #[case(-1000., 0.1)]
    #[case(-0.001, 0.1)]
    #[case(10.001, 2.9)]
    #[case(f64::INFINITY, 2.9)]
    #[case(f64::NEG_INFINITY, 0.1)]
    fn clamps_outside_breakpoints(#[case] x: f64, #[case] expected: f64) {
        assert_eq!(interpolation(&XS, &YS, x), expected);
    }

    #[test]
    fn interpolates_linearly_between_non_uniform_breakpoints() {
        assert!((interpolation(&XS, &YS, 2.) - -0.2).abs() < 1e-12);
        assert!((interpolation(&XS, &YS, 6.5) - 1.1).abs() < 1e-12);
    }

    #[test]
    fn nan_resolves_to_first_value() {
        assert_eq!(interpolation(&XS, &YS, f64::NAN), 0.1);
    }

    #[test]
    fn single_breakpoint_is_constant() {
        assert_eq!(interpolation(&[5.], &[7.], -3.), 7.);
        assert_eq!(interpolation(&[5.], &[7.], 30.), 7.);
    }

    #[test]
    fn rejects_non_increasing_breakpoints() {
        assert_eq!(
            BreakpointTable1D::new(vec![0., 1., 1.], vec![0., 0., 0.]),
            Err(TableError::NonIncreasingBreakpoints { dimension: 1 })
        );
        assert_eq!(
            BreakpointTable2D::new(vec![0., 1.], vec![2., 1.], vec![0.; 4]),
            Err(TableError::NonIncreasingBreakpoints { dimension: 2 })
        );
    }

    #[test]
    fn rejects_size_mismatch() {
        assert_eq!(
            BreakpointTable3D::new(vec![0., 1.], vec![0., 1.], vec![0., 1., 2.], vec![0.; 11]),
            Err(TableError::SizeMismatch {
                expected: 12,
                actual: 11
            })
        );
    }

    #[test]
    fn rejects_empty_dimension() {
        assert_eq!(
            BreakpointTable2D::new(vec![0.], vec![], vec![]),
            Err(TableError::Empty { dimension: 2 })
        );
    }

    fn table_2d() -> BreakpointTable2D {
        // f(x1, x2) = x1 + 10 * x2 at the breakpoints
        BreakpointTable2D::new(
            vec![0., 1., 4.],
            vec![0., 2.],
            vec![0., 1., 4., 20., 21., 24.],
        )
        .unwrap()
    }

    #[test]
    fn bilinear_exact_at_grid_points() {
        let table = table_2d();

        assert_eq!(table.interpolate(1., 0.), 1.);
        assert_eq!(table.interpolate(4., 2.), 24.);
        assert_eq!(table.interpolate(0., 2.), 20.);
    }

    #[test]
    fn bilinear_interpolates_inside_cell() {
        let table = table_2d();

        assert!((table.interpolate(2.5, 1.) - 12.5).abs() < 1e-12);
    }

    #[test]
    fn bilinear_clamps_each_dimension() {
        let table = table_2d();

        assert_eq!(table.interpolate(100., -5.), 4.);
        assert!((table.interpolate(0.5, 50.) - 20.5).abs() < 1e-12);
    }

    #[test]
    fn trilinear_matches_linear_function() {
        // f(x1, x2, x3) = x1 + 10 * x2 + 100 * x3
        let bp1 = vec![0., 1.];
        let bp2 = vec![0., 1., 2.];
        let bp3 = vec![0., 1.];
        let mut data = Vec::new();
        for k in &bp3 {
            for j in &bp2 {
                for i in &bp1 {
                    data.push(i + 10. * j + 100. * k);
                }
            }
        }
        let table = BreakpointTable3D::new(bp1, bp2, bp3, data).unwrap();

        assert_eq!(table.interpolate(1., 2., 1.), 121.);
        assert!((table.interpolate(0.5, 1.5, 0.25) - 40.5).abs() < 1e-12);
        assert_eq!(table.interpolate(-1., -1., 5.), 100.);
    }
}
