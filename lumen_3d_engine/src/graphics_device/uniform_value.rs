/// Uniform upload shapes and typed values
///
/// Every uniform declares its exact upload shape up front. The device picks
/// the upload call from the shape; values are checked against it before any
/// upload happens.

use glam::{IVec2, IVec3, IVec4, Mat3, Mat4, Vec2, Vec3, Vec4};

/// Upload shape of a uniform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformType {
    Mat4,
    Mat3,

    Vec4,
    IVec4,
    Vec4Array,
    IVec4Array,

    Vec3,
    IVec3,
    Vec3Array,
    IVec3Array,

    Vec2,
    IVec2,
    Vec2Array,
    IVec2Array,

    Float,
    Int,
    FloatArray,
    IntArray,
}

impl UniformType {
    /// Whether this shape is an array upload
    pub fn is_array(&self) -> bool {
        matches!(
            self,
            UniformType::Vec4Array
                | UniformType::IVec4Array
                | UniformType::Vec3Array
                | UniformType::IVec3Array
                | UniformType::Vec2Array
                | UniformType::IVec2Array
                | UniformType::FloatArray
                | UniformType::IntArray
        )
    }

    /// Shape of one element (identity for non-array shapes)
    pub fn element_type(&self) -> UniformType {
        match self {
            UniformType::Vec4Array => UniformType::Vec4,
            UniformType::IVec4Array => UniformType::IVec4,
            UniformType::Vec3Array => UniformType::Vec3,
            UniformType::IVec3Array => UniformType::IVec3,
            UniformType::Vec2Array => UniformType::Vec2,
            UniformType::IVec2Array => UniformType::IVec2,
            UniformType::FloatArray => UniformType::Float,
            UniformType::IntArray => UniformType::Int,
            other => *other,
        }
    }

    /// Array shape holding elements of this shape
    ///
    /// Matrices have no array shape.
    pub fn array_of(&self) -> Option<UniformType> {
        match self {
            UniformType::Vec4 => Some(UniformType::Vec4Array),
            UniformType::IVec4 => Some(UniformType::IVec4Array),
            UniformType::Vec3 => Some(UniformType::Vec3Array),
            UniformType::IVec3 => Some(UniformType::IVec3Array),
            UniformType::Vec2 => Some(UniformType::Vec2Array),
            UniformType::IVec2 => Some(UniformType::IVec2Array),
            UniformType::Float => Some(UniformType::FloatArray),
            UniformType::Int => Some(UniformType::IntArray),
            other if other.is_array() => Some(*other),
            _ => None,
        }
    }

    /// GLSL type keyword for a single element
    pub fn glsl_name(&self) -> &'static str {
        match self.element_type() {
            UniformType::Mat4 => "mat4",
            UniformType::Mat3 => "mat3",
            UniformType::Vec4 => "vec4",
            UniformType::IVec4 => "ivec4",
            UniformType::Vec3 => "vec3",
            UniformType::IVec3 => "ivec3",
            UniformType::Vec2 => "vec2",
            UniformType::IVec2 => "ivec2",
            UniformType::Float => "float",
            UniformType::Int => "int",
            // element_type never returns an array shape
            _ => "unknown",
        }
    }

    /// Parse a GLSL type keyword
    pub fn from_glsl(keyword: &str) -> Option<UniformType> {
        Some(match keyword {
            "mat4" => UniformType::Mat4,
            "mat3" => UniformType::Mat3,
            "vec4" => UniformType::Vec4,
            "ivec4" => UniformType::IVec4,
            "vec3" => UniformType::Vec3,
            "ivec3" => UniformType::IVec3,
            "vec2" => UniformType::Vec2,
            "ivec2" => UniformType::IVec2,
            "float" => UniformType::Float,
            "int" | "bool" => UniformType::Int,
            _ => return None,
        })
    }
}

/// A typed CPU-side uniform value
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    Mat4(Mat4),
    Mat3(Mat3),

    Vec4(Vec4),
    IVec4(IVec4),
    Vec4Array(Vec<Vec4>),
    IVec4Array(Vec<IVec4>),

    Vec3(Vec3),
    IVec3(IVec3),
    Vec3Array(Vec<Vec3>),
    IVec3Array(Vec<IVec3>),

    Vec2(Vec2),
    IVec2(IVec2),
    Vec2Array(Vec<Vec2>),
    IVec2Array(Vec<IVec2>),

    Float(f32),
    Int(i32),
    FloatArray(Vec<f32>),
    IntArray(Vec<i32>),
}

impl UniformValue {
    /// Upload shape of this value
    pub fn uniform_type(&self) -> UniformType {
        match self {
            UniformValue::Mat4(_) => UniformType::Mat4,
            UniformValue::Mat3(_) => UniformType::Mat3,
            UniformValue::Vec4(_) => UniformType::Vec4,
            UniformValue::IVec4(_) => UniformType::IVec4,
            UniformValue::Vec4Array(_) => UniformType::Vec4Array,
            UniformValue::IVec4Array(_) => UniformType::IVec4Array,
            UniformValue::Vec3(_) => UniformType::Vec3,
            UniformValue::IVec3(_) => UniformType::IVec3,
            UniformValue::Vec3Array(_) => UniformType::Vec3Array,
            UniformValue::IVec3Array(_) => UniformType::IVec3Array,
            UniformValue::Vec2(_) => UniformType::Vec2,
            UniformValue::IVec2(_) => UniformType::IVec2,
            UniformValue::Vec2Array(_) => UniformType::Vec2Array,
            UniformValue::IVec2Array(_) => UniformType::IVec2Array,
            UniformValue::Float(_) => UniformType::Float,
            UniformValue::Int(_) => UniformType::Int,
            UniformValue::FloatArray(_) => UniformType::FloatArray,
            UniformValue::IntArray(_) => UniformType::IntArray,
        }
    }

    /// Number of elements uploaded (1 for non-array values)
    pub fn element_count(&self) -> usize {
        match self {
            UniformValue::Vec4Array(v) => v.len(),
            UniformValue::IVec4Array(v) => v.len(),
            UniformValue::Vec3Array(v) => v.len(),
            UniformValue::IVec3Array(v) => v.len(),
            UniformValue::Vec2Array(v) => v.len(),
            UniformValue::IVec2Array(v) => v.len(),
            UniformValue::FloatArray(v) => v.len(),
            UniformValue::IntArray(v) => v.len(),
            _ => 1,
        }
    }

    /// Raw little-endian bytes in upload layout (column-major matrices,
    /// tightly packed arrays)
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            UniformValue::Mat4(m) => bytemuck::bytes_of(m).to_vec(),
            UniformValue::Mat3(m) => bytemuck::cast_slice(&m.to_cols_array()).to_vec(),
            UniformValue::Vec4(v) => bytemuck::bytes_of(v).to_vec(),
            UniformValue::IVec4(v) => bytemuck::bytes_of(v).to_vec(),
            UniformValue::Vec4Array(v) => bytemuck::cast_slice(v).to_vec(),
            UniformValue::IVec4Array(v) => bytemuck::cast_slice(v).to_vec(),
            UniformValue::Vec3(v) => bytemuck::bytes_of(v).to_vec(),
            UniformValue::IVec3(v) => bytemuck::bytes_of(v).to_vec(),
            UniformValue::Vec3Array(v) => bytemuck::cast_slice(v).to_vec(),
            UniformValue::IVec3Array(v) => bytemuck::cast_slice(v).to_vec(),
            UniformValue::Vec2(v) => bytemuck::bytes_of(v).to_vec(),
            UniformValue::IVec2(v) => bytemuck::bytes_of(v).to_vec(),
            UniformValue::Vec2Array(v) => bytemuck::cast_slice(v).to_vec(),
            UniformValue::IVec2Array(v) => bytemuck::cast_slice(v).to_vec(),
            UniformValue::Float(v) => v.to_le_bytes().to_vec(),
            UniformValue::Int(v) => v.to_le_bytes().to_vec(),
            UniformValue::FloatArray(v) => bytemuck::cast_slice(v).to_vec(),
            UniformValue::IntArray(v) => bytemuck::cast_slice(v).to_vec(),
        }
    }
}

impl From<f32> for UniformValue {
    fn from(value: f32) -> Self {
        UniformValue::Float(value)
    }
}

impl From<i32> for UniformValue {
    fn from(value: i32) -> Self {
        UniformValue::Int(value)
    }
}

impl From<Vec2> for UniformValue {
    fn from(value: Vec2) -> Self {
        UniformValue::Vec2(value)
    }
}

impl From<Vec3> for UniformValue {
    fn from(value: Vec3) -> Self {
        UniformValue::Vec3(value)
    }
}

impl From<Vec4> for UniformValue {
    fn from(value: Vec4) -> Self {
        UniformValue::Vec4(value)
    }
}

impl From<Mat3> for UniformValue {
    fn from(value: Mat3) -> Self {
        UniformValue::Mat3(value)
    }
}

impl From<Mat4> for UniformValue {
    fn from(value: Mat4) -> Self {
        UniformValue::Mat4(value)
    }
}

#[cfg(test)]
#[path = "uniform_value_tests.rs"]
mod tests;
