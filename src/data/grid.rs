//! Two-dimensional detector images.

use ndarray::{Array1, Array2, Axis};
use rayon::prelude::*;

use crate::model::{FormFactor, Model, ModelError};

/// A rectangular detector grid in reciprocal space.
///
/// Images are indexed `[row, column]` with rows following `qy` and columns
/// following `qx`.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectorGrid {
    qx: Array1<f64>,
    qy: Array1<f64>,
}

impl DetectorGrid {
    pub fn new(qx: impl Into<Array1<f64>>, qy: impl Into<Array1<f64>>) -> Self {
        Self {
            qx: qx.into(),
            qy: qy.into(),
        }
    }

    /// Square grid of `pixels × pixels` points spanning `[-q_max, q_max]` on
    /// both axes.
    pub fn square(q_max: f64, pixels: usize) -> Self {
        let axis = Array1::linspace(-q_max, q_max, pixels);
        Self {
            qx: axis.clone(),
            qy: axis,
        }
    }

    pub fn qx(&self) -> &Array1<f64> {
        &self.qx
    }

    pub fn qy(&self) -> &Array1<f64> {
        &self.qy
    }

    /// `(rows, columns)` of the images produced by this grid.
    pub fn shape(&self) -> (usize, usize) {
        (self.qy.len(), self.qx.len())
    }

    /// `|q|` at every pixel.
    pub fn q_magnitude(&self) -> Array2<f64> {
        Array2::from_shape_fn(self.shape(), |(row, col)| self.qx[col].hypot(self.qy[row]))
    }

    /// Intensity image of `model`, one rayon task per row.
    pub fn evaluate(&self, model: &Model) -> Result<Array2<f64>, ModelError> {
        model.validate()?;
        let mut image = Array2::zeros(self.shape());
        image
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .try_for_each(|(row, mut pixels)| -> Result<(), ModelError> {
                let qy = self.qy[row];
                for (pixel, &qx) in pixels.iter_mut().zip(self.qx.iter()) {
                    *pixel = model.intensity_xy(qx, qy)?;
                }
                Ok(())
            })?;
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cylinder, LamellarHeadGroup};
    use approx::assert_relative_eq;

    #[test]
    fn test_image_is_radially_symmetric() {
        let model: Model = Cylinder {
            scale: 1.0,
            radius: 20.0,
            length: 400.0,
            contrast: 3e-6,
            background: 0.0,
        }
        .into();
        let grid = DetectorGrid::square(0.1, 9);
        let image = grid.evaluate(&model).unwrap();
        assert_eq!(image.dim(), (9, 9));

        let q = grid.q_magnitude();
        assert_relative_eq!(q[[4, 4]], 0.0);
        assert_relative_eq!(image[[4, 4]], model.intensity(0.0).unwrap(), max_relative = 1e-12);
        assert_relative_eq!(image[[0, 2]], image[[2, 0]], max_relative = 1e-12);
        assert_relative_eq!(image[[0, 2]], image[[8, 6]], max_relative = 1e-12);
        assert_relative_eq!(image[[1, 3]], model.intensity(q[[1, 3]]).unwrap(), max_relative = 1e-12);
    }

    #[test]
    fn test_rectangular_grid_shape() {
        let grid = DetectorGrid::new(vec![0.01, 0.02, 0.03], vec![0.05, 0.06]);
        assert_eq!(grid.shape(), (2, 3));
        let model: Model = LamellarHeadGroup {
            scale: 1.0,
            tail_thickness: 15.0,
            head_thickness: 10.0,
            tail_sld: 4e-7,
            head_sld: 3e-6,
            solvent_sld: 6e-6,
            background: 0.0,
        }
        .into();
        let image = grid.evaluate(&model).unwrap();
        assert_eq!(image.dim(), (2, 3));
        assert_relative_eq!(
            image[[1, 2]],
            model.intensity(0.03_f64.hypot(0.06)).unwrap(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_singular_pixel_fails() {
        let model: Model = LamellarHeadGroup {
            scale: 1.0,
            tail_thickness: 15.0,
            head_thickness: 10.0,
            tail_sld: 4e-7,
            head_sld: 3e-6,
            solvent_sld: 6e-6,
            background: 0.0,
        }
        .into();
        let grid = DetectorGrid::square(0.1, 5);
        assert!(matches!(
            grid.evaluate(&model),
            Err(ModelError::Singular { .. })
        ));
    }
}
