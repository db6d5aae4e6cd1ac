//! Tagged parameter values and their document formatting
//!
//! Every parameter override stored on a node or block is a [`ParamValue`]: a
//! value of exactly one [`ParamKind`]. Extraction is kind-checked, cloning is
//! deep for scalars and vectors and by-handle for texture references, and the
//! document representation (the `Type`/`Value` attribute pair) round-trips
//! losslessly for the numeric kinds.

use std::fmt;

use thiserror::Error;

use crate::asset::{AssetError, AssetResolver, TextureRef};

/// Errors from kind-checked extraction and document payload parsing
#[derive(Debug, Error)]
pub enum ValueError {
    /// Extraction requested a different kind than the one stored
    #[error("type mismatch: expected {expected}, found {actual}")]
    TypeMismatch {
        expected: ParamKind,
        actual: ParamKind,
    },

    /// A document payload that does not parse as its declared kind
    #[error("malformed {kind} value '{raw}'")]
    Malformed { kind: ParamKind, raw: String },

    /// Asset resolution failed for a texture payload
    #[error(transparent)]
    Asset(#[from] AssetError),
}

impl ValueError {
    fn malformed(kind: ParamKind, raw: &str) -> Self {
        Self::Malformed {
            kind,
            raw: raw.to_string(),
        }
    }
}

/// The fixed set of parameter kinds.
///
/// The display form of each kind is also its `Type` attribute tag in the
/// library document, so the two never drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Float,
    Int,
    Uint,
    Float2,
    Float3,
    Float4,
    Texture2D,
    Texture3D,
}

impl ParamKind {
    /// The `Type` attribute tag for this kind
    pub fn as_str(self) -> &'static str {
        match self {
            ParamKind::Float => "kTypeFloat",
            ParamKind::Int => "kTypeInt",
            ParamKind::Uint => "kTypeUint",
            ParamKind::Float2 => "kTypeFloat2",
            ParamKind::Float3 => "kTypeFloat3",
            ParamKind::Float4 => "kTypeFloat4",
            ParamKind::Texture2D => "kTypeTexture2D",
            ParamKind::Texture3D => "kTypeTexture3D",
        }
    }

    /// Parse a `Type` attribute tag; `None` for unrecognized tags
    pub fn parse(tag: &str) -> Option<ParamKind> {
        match tag {
            "kTypeFloat" => Some(ParamKind::Float),
            "kTypeInt" => Some(ParamKind::Int),
            "kTypeUint" => Some(ParamKind::Uint),
            "kTypeFloat2" => Some(ParamKind::Float2),
            "kTypeFloat3" => Some(ParamKind::Float3),
            "kTypeFloat4" => Some(ParamKind::Float4),
            "kTypeTexture2D" => Some(ParamKind::Texture2D),
            "kTypeTexture3D" => Some(ParamKind::Texture3D),
            _ => None,
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Two-component vector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Three-component vector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Four-component vector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vector4 {
    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }
}

/// A parameter value of exactly one kind.
///
/// `Clone` produces an independent value: scalars and vectors copy by value,
/// texture variants copy the handle rather than the underlying asset.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Float(f32),
    Int(i32),
    Uint(u32),
    Float2(Vector2),
    Float3(Vector3),
    Float4(Vector4),
    Texture2D(TextureRef),
    Texture3D(TextureRef),
}

impl ParamValue {
    /// The kind tag of this value
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamValue::Float(_) => ParamKind::Float,
            ParamValue::Int(_) => ParamKind::Int,
            ParamValue::Uint(_) => ParamKind::Uint,
            ParamValue::Float2(_) => ParamKind::Float2,
            ParamValue::Float3(_) => ParamKind::Float3,
            ParamValue::Float4(_) => ParamKind::Float4,
            ParamValue::Texture2D(_) => ParamKind::Texture2D,
            ParamValue::Texture3D(_) => ParamKind::Texture3D,
        }
    }

    /// Extract the float payload
    pub fn as_float(&self) -> Result<f32, ValueError> {
        match self {
            ParamValue::Float(v) => Ok(*v),
            other => Err(mismatch(ParamKind::Float, other)),
        }
    }

    /// Extract the signed integer payload
    pub fn as_int(&self) -> Result<i32, ValueError> {
        match self {
            ParamValue::Int(v) => Ok(*v),
            other => Err(mismatch(ParamKind::Int, other)),
        }
    }

    /// Extract the unsigned integer payload
    pub fn as_uint(&self) -> Result<u32, ValueError> {
        match self {
            ParamValue::Uint(v) => Ok(*v),
            other => Err(mismatch(ParamKind::Uint, other)),
        }
    }

    /// Extract the two-component vector payload
    pub fn as_float2(&self) -> Result<Vector2, ValueError> {
        match self {
            ParamValue::Float2(v) => Ok(*v),
            other => Err(mismatch(ParamKind::Float2, other)),
        }
    }

    /// Extract the three-component vector payload
    pub fn as_float3(&self) -> Result<Vector3, ValueError> {
        match self {
            ParamValue::Float3(v) => Ok(*v),
            other => Err(mismatch(ParamKind::Float3, other)),
        }
    }

    /// Extract the four-component vector payload
    pub fn as_float4(&self) -> Result<Vector4, ValueError> {
        match self {
            ParamValue::Float4(v) => Ok(*v),
            other => Err(mismatch(ParamKind::Float4, other)),
        }
    }

    /// Extract the 2D texture handle
    pub fn as_texture2d(&self) -> Result<TextureRef, ValueError> {
        match self {
            ParamValue::Texture2D(t) => Ok(*t),
            other => Err(mismatch(ParamKind::Texture2D, other)),
        }
    }

    /// Extract the 3D texture handle
    pub fn as_texture3d(&self) -> Result<TextureRef, ValueError> {
        match self {
            ParamValue::Texture3D(t) => Ok(*t),
            other => Err(mismatch(ParamKind::Texture3D, other)),
        }
    }

    /// Format the payload for the document `Value` attribute.
    ///
    /// Scalars use the shortest text that parses back to the same number,
    /// vectors comma-join their components in x,y,z,w order with no brackets,
    /// textures resolve to their asset path.
    pub fn format(&self, assets: &dyn AssetResolver) -> Result<String, AssetError> {
        Ok(match self {
            ParamValue::Float(v) => v.to_string(),
            ParamValue::Int(v) => v.to_string(),
            ParamValue::Uint(v) => v.to_string(),
            ParamValue::Float2(v) => format!("{},{}", v.x, v.y),
            ParamValue::Float3(v) => format!("{},{},{}", v.x, v.y, v.z),
            ParamValue::Float4(v) => format!("{},{},{},{}", v.x, v.y, v.z, v.w),
            ParamValue::Texture2D(t) | ParamValue::Texture3D(t) => assets.path_of(*t)?,
        })
    }

    /// Parse a document `Value` attribute as the given kind.
    ///
    /// Texture paths resolve through the asset capability; resolution failures
    /// surface as [`ValueError::Asset`] so the caller can decide whether to
    /// skip the parameter or abort.
    pub fn parse(
        kind: ParamKind,
        raw: &str,
        assets: &dyn AssetResolver,
    ) -> Result<ParamValue, ValueError> {
        match kind {
            ParamKind::Float => Ok(ParamValue::Float(parse_scalar(kind, raw)?)),
            ParamKind::Int => Ok(ParamValue::Int(parse_scalar(kind, raw)?)),
            ParamKind::Uint => Ok(ParamValue::Uint(parse_scalar(kind, raw)?)),
            ParamKind::Float2 => {
                let c = parse_components(kind, raw, 2)?;
                Ok(ParamValue::Float2(Vector2::new(c[0], c[1])))
            }
            ParamKind::Float3 => {
                let c = parse_components(kind, raw, 3)?;
                Ok(ParamValue::Float3(Vector3::new(c[0], c[1], c[2])))
            }
            ParamKind::Float4 => {
                let c = parse_components(kind, raw, 4)?;
                Ok(ParamValue::Float4(Vector4::new(c[0], c[1], c[2], c[3])))
            }
            ParamKind::Texture2D => Ok(ParamValue::Texture2D(assets.load(raw)?)),
            ParamKind::Texture3D => Ok(ParamValue::Texture3D(assets.load(raw)?)),
        }
    }
}

fn mismatch(expected: ParamKind, found: &ParamValue) -> ValueError {
    ValueError::TypeMismatch {
        expected,
        actual: found.kind(),
    }
}

fn parse_scalar<T: std::str::FromStr>(kind: ParamKind, raw: &str) -> Result<T, ValueError> {
    raw.trim()
        .parse()
        .map_err(|_| ValueError::malformed(kind, raw))
}

fn parse_components(kind: ParamKind, raw: &str, count: usize) -> Result<Vec<f32>, ValueError> {
    let parts: Vec<&str> = raw.split(',').collect();
    if parts.len() != count {
        return Err(ValueError::malformed(kind, raw));
    }
    parts
        .iter()
        .map(|p| {
            p.trim()
                .parse::<f32>()
                .map_err(|_| ValueError::malformed(kind, raw))
        })
        .collect()
}
