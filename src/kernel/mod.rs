//! Per-shape scattering kernels and their orientational averages.
//!
//! Kernels are pure functions of `q`, the particle dimensions and the
//! integration dummy variables. Normalization, contrast and unit conversion
//! are applied by the models in [`crate::model`].

pub mod cylinder;
pub mod ellipsoid;
pub mod lamellar;
pub mod parallelepiped;
pub mod wormlike;

pub use cylinder::{
    cyl_kernel, cylinder_average, ellip_cyl_kernel, elliptical_cross_section,
    elliptical_cylinder_average, hollow_cyl_kernel, CoreShellCylinderShape, StackedDiscShape,
};
pub use ellipsoid::{
    core_shell_spheroid_kernel, ellipsoid_average, ellipsoid_kernel, triaxial_average,
    triaxial_kernel, CoreShellSpheroid, SpheroidShape,
};
pub use lamellar::{gaussian_bilayer, head_tail_bilayer, CailleStack, CAILLE_RESOLUTION};
pub use parallelepiped::{parallelepiped_average, pp_kernel};
pub use wormlike::{sk_wr, ChainRegime, WormlikeChain};
