//! Catalog of every model: the `ModelKind` identifier and the tagged
//! `Model` value used for dynamic dispatch and named input.

use serde::{Deserialize, Serialize};

use super::cylinder::{
    CoreShellCylinder, Cylinder, CylinderPolyLength, CylinderPolyRadius, EllipticalCylinder20,
    EllipticalCylinder76, HollowCylinder, PolyCoreShellCylinder, StackedDiscs,
};
use super::ellipsoid::{Ellipsoid, OblateCoreShell, ProlateCoreShell, TriaxialEllipsoid};
use super::error::{ModelError, Result};
use super::flexible::{
    FlexibleCylinder, FlexibleCylinderPolyLength, FlexibleCylinderPolyRadius,
    FlexibleEllipticalCylinder,
};
use super::lamellar::{Lamellar, LamellarHeadGroup, LamellarStack, LamellarStackHeadGroup};
use super::parallelepiped::Parallelepiped;
use super::traits::{FormFactor, ParameterVector};

macro_rules! model_catalog {
    ($($kind:ident = $id:literal => $name:literal,)+) => {
        /// Identifier of a model.
        ///
        /// The discriminants are stable and are the model ids used at the C
        /// boundary.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(C)]
        pub enum ModelKind {
            $($kind = $id,)+
        }

        impl ModelKind {
            /// Every model, in id order.
            pub const ALL: &'static [ModelKind] = &[$(ModelKind::$kind),+];

            /// The name used for named (JSON) input.
            pub fn name(&self) -> &'static str {
                match self {
                    $(ModelKind::$kind => $name,)+
                }
            }

            pub fn from_name(name: &str) -> Result<Self> {
                match name {
                    $($name => Ok(ModelKind::$kind),)+
                    _ => Err(ModelError::UnknownModel(name.to_string())),
                }
            }

            pub fn from_id(id: u32) -> Result<Self> {
                match id {
                    $($id => Ok(ModelKind::$kind),)+
                    _ => Err(ModelError::UnknownModel(format!("#{id}"))),
                }
            }

            pub fn id(&self) -> u32 {
                *self as u32
            }

            /// Positional parameter names of this model.
            pub fn parameter_names(&self) -> &'static [&'static str] {
                match self {
                    $(ModelKind::$kind => <$kind as ParameterVector>::NAMES,)+
                }
            }

            pub fn parameter_count(&self) -> usize {
                self.parameter_names().len()
            }
        }

        /// Any model with its parameters.
        ///
        /// Serialized as `{"model": "<name>", <named parameters>}`.
        #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
        #[serde(tag = "model")]
        pub enum Model {
            $(
                #[serde(rename = $name)]
                $kind($kind),
            )+
        }

        impl Model {
            /// Build a model from its positional parameter vector.
            pub fn from_parameters(kind: ModelKind, values: &[f64]) -> Result<Self> {
                match kind {
                    $(ModelKind::$kind => Ok(Model::$kind($kind::from_slice(values)?)),)+
                }
            }

            /// Positional parameter vector.
            pub fn parameters(&self) -> Vec<f64> {
                match self {
                    $(Model::$kind(model) => model.to_vec(),)+
                }
            }

            fn inner(&self) -> &dyn FormFactor {
                match self {
                    $(Model::$kind(model) => model,)+
                }
            }
        }

        $(
            impl From<$kind> for Model {
                fn from(model: $kind) -> Self {
                    Model::$kind(model)
                }
            }
        )+
    };
}

model_catalog! {
    Cylinder = 0 => "cylinder",
    EllipticalCylinder76 = 1 => "elliptical_cylinder_76",
    EllipticalCylinder20 = 2 => "elliptical_cylinder_20",
    TriaxialEllipsoid = 3 => "triaxial_ellipsoid",
    Parallelepiped = 4 => "parallelepiped",
    HollowCylinder = 5 => "hollow_cylinder",
    Ellipsoid = 6 => "ellipsoid",
    CylinderPolyRadius = 7 => "cylinder_poly_radius",
    CylinderPolyLength = 8 => "cylinder_poly_length",
    CoreShellCylinder = 9 => "core_shell_cylinder",
    PolyCoreShellCylinder = 10 => "poly_core_shell_cylinder",
    OblateCoreShell = 11 => "oblate_core_shell",
    ProlateCoreShell = 12 => "prolate_core_shell",
    StackedDiscs = 13 => "stacked_discs",
    Lamellar = 14 => "lamellar",
    LamellarStack = 15 => "lamellar_stack",
    LamellarStackHeadGroup = 16 => "lamellar_stack_head_group",
    LamellarHeadGroup = 17 => "lamellar_head_group",
    FlexibleCylinder = 18 => "flexible_cylinder",
    FlexibleEllipticalCylinder = 19 => "flexible_elliptical_cylinder",
    FlexibleCylinderPolyLength = 20 => "flexible_cylinder_poly_length",
    FlexibleCylinderPolyRadius = 21 => "flexible_cylinder_poly_radius",
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Model {
    /// Parse a named description such as
    /// `{"model": "cylinder", "scale": 1.0, "radius": 20.0, ...}`.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        if let Some(name) = value.get("model").and_then(|tag| tag.as_str()) {
            ModelKind::from_name(name)?;
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl FormFactor for Model {
    fn kind(&self) -> ModelKind {
        self.inner().kind()
    }

    fn scale(&self) -> f64 {
        self.inner().scale()
    }

    fn background(&self) -> f64 {
        self.inner().background()
    }

    fn validate(&self) -> Result<()> {
        self.inner().validate()
    }

    fn compute(&self, q: f64) -> Result<f64> {
        self.inner().compute(q)
    }
}
