//! GLSL type model.
//!
//! Only as much of the type system as float-context inference needs: types
//! have a name, structs have named fields, and vectors resolve swizzles.
//! Two types are the same type when their names are equal.

use alloc::{boxed::Box, format, string::String, vec::Vec};

use crate::error::{GlslError, GlslResult};

/// Component letters. The position of a letter within its set is the
/// component it selects.
const SWIZZLE_SETS: [[char; 4]; 3] = [
    ['x', 'y', 'z', 'w'],
    ['r', 'g', 'b', 'a'],
    ['s', 't', 'p', 'q'],
];

/// GLSL type representation.
#[derive(Debug, Clone)]
pub enum GlslType {
    /// Scalars, matrices, samplers and `void`
    Primitive(String),
    Struct(StructType),
    Vector(VectorType),
}

impl GlslType {
    pub fn primitive(name: impl Into<String>) -> Self {
        GlslType::Primitive(name.into())
    }

    pub fn name(&self) -> &str {
        match self {
            GlslType::Primitive(name) => name,
            GlslType::Struct(ty) => &ty.name,
            GlslType::Vector(ty) => &ty.name,
        }
    }

    pub fn is_float(&self) -> bool {
        self.name() == "float"
    }

    /// `float` or one of the float vectors.
    pub fn is_float_scalar_or_vector(&self) -> bool {
        matches!(self.name(), "float" | "vec2" | "vec3" | "vec4")
    }

    /// Type of `self.field`: a struct member or a swizzle.
    pub fn field_type(&self, field: &str) -> GlslResult<GlslType> {
        match self {
            GlslType::Struct(ty) => ty.field(field).cloned().ok_or_else(|| {
                GlslError::type_error(format!("struct '{}' has no field '{}'", ty.name, field))
            }),
            GlslType::Vector(ty) => ty.swizzle(field),
            GlslType::Primitive(name) => Err(GlslError::type_error(format!(
                "type '{}' has no fields, cannot select '{}'",
                name, field
            ))),
        }
    }

    /// Type of `self[i]` for vectors and matrices.
    pub fn element_type(&self) -> Option<GlslType> {
        match self {
            GlslType::Vector(ty) => Some((*ty.base).clone()),
            GlslType::Primitive(name) => {
                let columns = match name.as_str() {
                    "mat2" => 2,
                    "mat3" => 3,
                    "mat4" => 4,
                    _ => return None,
                };
                VectorType::new(GlslType::primitive("float"), columns)
                    .ok()
                    .map(GlslType::Vector)
            }
            GlslType::Struct(_) => None,
        }
    }
}

impl PartialEq for GlslType {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for GlslType {}

impl core::fmt::Display for GlslType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// User declared aggregate with ordered fields.
#[derive(Debug, Clone)]
pub struct StructType {
    name: String,
    fields: Vec<(String, GlslType)>,
}

impl StructType {
    pub fn new(name: impl Into<String>) -> Self {
        StructType {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a field. A repeated name replaces the earlier field's type.
    pub fn add_field(&mut self, name: impl Into<String>, ty: GlslType) {
        let name = name.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, existing)) => *existing = ty,
            None => self.fields.push((name, ty)),
        }
    }

    pub fn field(&self, name: &str) -> Option<&GlslType> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, ty)| ty)
    }

    /// Field types in declaration order
    pub fn field_types(&self) -> impl Iterator<Item = &GlslType> {
        self.fields.iter().map(|(_, ty)| ty)
    }
}

/// `vecN`, `bvecN` or `ivecN`.
///
/// Vectors have no stored fields; every field access is a swizzle.
#[derive(Debug, Clone)]
pub struct VectorType {
    name: String,
    base: Box<GlslType>,
    arity: u8,
}

impl VectorType {
    pub fn new(base: GlslType, arity: u8) -> GlslResult<Self> {
        let prefix = match base.name() {
            "float" => "vec",
            "bool" => "bvec",
            "int" => "ivec",
            other => {
                return Err(GlslError::type_error(format!(
                    "no vector type with component type '{}'",
                    other
                )))
            }
        };
        if !(2..=4).contains(&arity) {
            return Err(GlslError::type_error(format!(
                "vector arity must be between 2 and 4, got {}",
                arity
            )));
        }
        Ok(VectorType {
            name: format!("{}{}", prefix, arity),
            base: Box::new(base),
            arity,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base(&self) -> &GlslType {
        &self.base
    }

    pub fn arity(&self) -> u8 {
        self.arity
    }

    /// Resolve a swizzle such as `xy` or `rgba`.
    ///
    /// One component yields the base type, more yield a vector of that
    /// length.
    pub fn swizzle(&self, swizzle: &str) -> GlslResult<GlslType> {
        if swizzle.is_empty() {
            return Err(GlslError::swizzle("empty swizzle"));
        }
        for c in swizzle.chars() {
            let component = SWIZZLE_SETS
                .iter()
                .find_map(|set| set.iter().position(|letter| *letter == c))
                .ok_or_else(|| {
                    GlslError::swizzle(format!("invalid swizzle character '{}'", c))
                })?;
            if component >= self.arity as usize {
                return Err(GlslError::swizzle(format!(
                    "component '{}' out of range for {}",
                    c, self.name
                )));
            }
        }

        let length = swizzle.chars().count();
        if length == 1 {
            return Ok((*self.base).clone());
        }
        if length > 4 {
            return Err(GlslError::swizzle(format!(
                "swizzle '{}' selects more than 4 components",
                swizzle
            )));
        }
        VectorType::new((*self.base).clone(), length as u8).map(GlslType::Vector)
    }
}

impl core::fmt::Display for VectorType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<VectorType> for GlslType {
    fn from(ty: VectorType) -> Self {
        GlslType::Vector(ty)
    }
}

impl From<StructType> for GlslType {
    fn from(ty: StructType) -> Self {
        GlslType::Struct(ty)
    }
}
