//! Scattering models.
//!
//! Every model is a plain parameter struct implementing [`FormFactor`] and
//! [`ParameterVector`]. [`Model`] wraps any of them for dynamic dispatch and
//! named (JSON) input, [`ModelKind`] identifies them.

pub mod cylinder;
pub mod ellipsoid;
pub mod error;
pub mod flexible;
pub mod lamellar;
pub mod parallelepiped;
pub mod registry;
pub mod traits;

pub use cylinder::{
    CoreShellCylinder, Cylinder, CylinderPolyLength, CylinderPolyRadius, EllipticalCylinder20,
    EllipticalCylinder76, HollowCylinder, PolyCoreShellCylinder, StackedDiscs,
};
pub use ellipsoid::{Ellipsoid, OblateCoreShell, ProlateCoreShell, TriaxialEllipsoid};
pub use error::{ModelError, Result};
pub use flexible::{
    FlexibleCylinder, FlexibleCylinderPolyLength, FlexibleCylinderPolyRadius,
    FlexibleEllipticalCylinder,
};
pub use lamellar::{Lamellar, LamellarHeadGroup, LamellarStack, LamellarStackHeadGroup};
pub use parallelepiped::Parallelepiped;
pub use registry::{Model, ModelKind};
pub use traits::{check_q, FormFactor, ParameterVector, CM_PER_ANGSTROM};
