//! Builtin type and function catalog.
//!
//! The catalog is built from a plain-text signature list, one
//! `returnType name(params)` signature per line. Generic placeholders expand
//! into one concrete overload per family member: `genType` over the float
//! scalar and vectors, `matType` over the square matrices.
//!
//! The bundled list covers the GLSL ES 1.00 builtin functions plus the
//! scalar, vector and matrix constructors. It is parsed once per process.

mod signature;

use alloc::{
    boxed::Box,
    collections::BTreeMap,
    format,
    string::{String, ToString},
    vec,
    vec::Vec,
};

use log::debug;
use once_cell::race::OnceBox;

use self::signature::{parse_signature, RawSignature};
use crate::{
    error::{GlslError, GlslResult},
    symbols::FunctionSignature,
    types::{GlslType, VectorType},
};

const BUILTIN_SIGNATURES: &str = include_str!("signatures.glsl");

static BUILTIN_CATALOG: OnceBox<Catalog> = OnceBox::new();

const PRIMITIVE_TYPES: &[&str] = &[
    "void",
    "bool",
    "int",
    "uint",
    "float",
    "mat2",
    "mat3",
    "mat4",
    "sampler2D",
    "sampler3D",
    "samplerCube",
    "sampler2DShadow",
];

/// Placeholder types and the concrete types they stand for.
const GENERIC_FAMILIES: &[(&str, &[&str])] = &[
    ("genType", &["float", "vec2", "vec3", "vec4"]),
    ("matType", &["mat2", "mat3", "mat4"]),
];

/// Builtin types and function overloads.
#[derive(Debug, Clone)]
pub struct Catalog {
    types: BTreeMap<String, GlslType>,
    functions: BTreeMap<String, Vec<FunctionSignature>>,
}

impl Catalog {
    /// The bundled GLSL ES catalog, built on first use.
    pub fn builtin() -> GlslResult<&'static Catalog> {
        BUILTIN_CATALOG.get_or_try_init(|| Catalog::from_signatures(BUILTIN_SIGNATURES).map(Box::new))
    }

    /// Build a catalog from a signature list.
    ///
    /// Lines that are not signatures are skipped. A signature naming an
    /// unknown type, or a list without any signature, is an error.
    pub fn from_signatures(list: &str) -> GlslResult<Self> {
        let mut catalog = Catalog {
            types: builtin_types()?,
            functions: BTreeMap::new(),
        };

        for (number, line) in list.lines().enumerate() {
            let Some(raw) = parse_signature(line) else {
                continue;
            };
            let overloads = catalog.expand(&raw).map_err(|err| {
                GlslError::catalog(format!("line {}: {}", number + 1, err))
            })?;
            for overload in overloads {
                catalog
                    .functions
                    .entry(overload.name.clone())
                    .or_default()
                    .push(overload);
            }
        }

        if catalog.functions.is_empty() {
            return Err(GlslError::catalog("signature list contains no signatures"));
        }
        debug!(
            "builtin catalog: {} functions, {} overloads",
            catalog.functions.len(),
            catalog.overload_count()
        );
        Ok(catalog)
    }

    pub fn lookup_type(&self, name: &str) -> Option<&GlslType> {
        self.types.get(name)
    }

    /// Overloads of `name` in list order; empty when unknown.
    pub fn overloads(&self, name: &str) -> &[FunctionSignature] {
        self.functions.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Total number of concrete overloads
    pub fn overload_count(&self) -> usize {
        self.functions.values().map(Vec::len).sum()
    }

    /// Concrete overloads for one written signature.
    fn expand(&self, raw: &RawSignature<'_>) -> GlslResult<Vec<FunctionSignature>> {
        let family = GENERIC_FAMILIES.iter().find(|(placeholder, _)| {
            raw.return_type == *placeholder || raw.params.contains(placeholder)
        });
        match family {
            Some((placeholder, members)) => members
                .iter()
                .map(|member| self.instantiate(raw, Some((*placeholder, *member))))
                .collect(),
            None => Ok(vec![self.instantiate(raw, None)?]),
        }
    }

    fn instantiate(
        &self,
        raw: &RawSignature<'_>,
        substitution: Option<(&str, &str)>,
    ) -> GlslResult<FunctionSignature> {
        let resolve = |name: &str| -> GlslResult<GlslType> {
            let name = match substitution {
                Some((placeholder, concrete)) if name == placeholder => concrete,
                _ => name,
            };
            self.lookup_type(name).cloned().ok_or_else(|| {
                GlslError::catalog(format!(
                    "unknown type '{}' in signature of '{}'",
                    name, raw.name
                ))
            })
        };

        let return_type = resolve(raw.return_type)?;
        let params = raw
            .params
            .iter()
            .map(|param| resolve(*param))
            .collect::<GlslResult<Vec<_>>>()?;
        Ok(FunctionSignature::new(raw.name, return_type, params))
    }
}

fn builtin_types() -> GlslResult<BTreeMap<String, GlslType>> {
    let mut types = BTreeMap::new();
    for name in PRIMITIVE_TYPES {
        types.insert(name.to_string(), GlslType::primitive(*name));
    }
    for base in ["float", "bool", "int"] {
        for arity in 2..=4 {
            let vector = VectorType::new(GlslType::primitive(base), arity)?;
            types.insert(vector.name().to_string(), vector.into());
        }
    }
    Ok(types)
}
