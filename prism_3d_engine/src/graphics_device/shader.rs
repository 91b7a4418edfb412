/// Shader descriptor and the engine's uniform vocabulary

use glam::{Mat4, Vec3, Vec4};

/// Descriptor for creating a shader program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderDesc {
    /// Library name (e.g. "Phong Shader")
    pub name: String,
    /// Vertex stage source
    pub vertex_source: String,
    /// Fragment stage source
    pub fragment_source: String,
}

/// Uniforms the engine uploads.
///
/// Each maps to a fixed GLSL name that shaders must declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Uniform {
    // Frame (bound once per flush)
    Perspective,
    View,

    // Per request
    ObjectToWorld,
    NormalMatrix,
    IgnoreNormals,

    // Material
    Tint,
    Diffuse,
    Specular,
    SpecularExponent,

    // Lighting (per frame, lit shader only)
    EyePosition,
    AmbientColor,
    LightCount,
    LightPositions,
    LightColors,
}

impl Uniform {
    /// GLSL identifier
    pub fn name(self) -> &'static str {
        match self {
            Uniform::Perspective => "perspMat",
            Uniform::View => "worldToCam",
            Uniform::ObjectToWorld => "objToWorld",
            Uniform::NormalMatrix => "normMat",
            Uniform::IgnoreNormals => "ignoreNorm",
            Uniform::Tint => "tint",
            Uniform::Diffuse => "diffuseCoeff",
            Uniform::Specular => "specularCoeff",
            Uniform::SpecularExponent => "specularExp",
            Uniform::EyePosition => "eyePos",
            Uniform::AmbientColor => "ambientColor",
            Uniform::LightCount => "lightCount",
            Uniform::LightPositions => "lightPos",
            Uniform::LightColors => "lightColor",
        }
    }
}

/// Value of a uniform upload
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4),
    Vec3Array(Vec<Vec3>),
    Vec4Array(Vec<Vec4>),
}
