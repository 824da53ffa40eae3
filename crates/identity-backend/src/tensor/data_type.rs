use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Element types as spelled in a model configuration (`TYPE_FP32`, ...).
///
/// [`DataType::SUPPORTED`] is the catalogue the serving host can exchange with
/// a model; `Bf16` and `Invalid` are accepted when parsing configurations but
/// never declared by the identity model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// Placeholder for a tensor whose type is not declared yet.
    #[default]
    #[serde(rename = "TYPE_INVALID")]
    Invalid,
    #[serde(rename = "TYPE_BOOL")]
    Bool,
    #[serde(rename = "TYPE_UINT8")]
    Uint8,
    #[serde(rename = "TYPE_UINT16")]
    Uint16,
    #[serde(rename = "TYPE_UINT32")]
    Uint32,
    #[serde(rename = "TYPE_UINT64")]
    Uint64,
    #[serde(rename = "TYPE_INT8")]
    Int8,
    #[serde(rename = "TYPE_INT16")]
    Int16,
    #[serde(rename = "TYPE_INT32")]
    Int32,
    #[serde(rename = "TYPE_INT64")]
    Int64,
    #[serde(rename = "TYPE_FP16")]
    Fp16,
    #[serde(rename = "TYPE_FP32")]
    Fp32,
    #[serde(rename = "TYPE_FP64")]
    Fp64,
    #[serde(rename = "TYPE_BF16")]
    Bf16,
    /// Variable-length byte strings, length-prefixed per element.
    #[serde(rename = "TYPE_STRING")]
    Bytes,
}

impl DataType {
    /// Element types the serving host can hand to a model, in declaration order.
    pub const SUPPORTED: [DataType; 13] = [
        DataType::Bool,
        DataType::Uint8,
        DataType::Uint16,
        DataType::Uint32,
        DataType::Uint64,
        DataType::Int8,
        DataType::Int16,
        DataType::Int32,
        DataType::Int64,
        DataType::Fp16,
        DataType::Fp32,
        DataType::Fp64,
        DataType::Bytes,
    ];

    /// The configuration spelling, e.g. `TYPE_FP32`.
    pub const fn config_name(self) -> &'static str {
        match self {
            Self::Invalid => "TYPE_INVALID",
            Self::Bool => "TYPE_BOOL",
            Self::Uint8 => "TYPE_UINT8",
            Self::Uint16 => "TYPE_UINT16",
            Self::Uint32 => "TYPE_UINT32",
            Self::Uint64 => "TYPE_UINT64",
            Self::Int8 => "TYPE_INT8",
            Self::Int16 => "TYPE_INT16",
            Self::Int32 => "TYPE_INT32",
            Self::Int64 => "TYPE_INT64",
            Self::Fp16 => "TYPE_FP16",
            Self::Fp32 => "TYPE_FP32",
            Self::Fp64 => "TYPE_FP64",
            Self::Bf16 => "TYPE_BF16",
            Self::Bytes => "TYPE_STRING",
        }
    }

    /// Parses a configuration spelling. Returns `None` for unknown names.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "TYPE_INVALID" => Some(Self::Invalid),
            "TYPE_BOOL" => Some(Self::Bool),
            "TYPE_UINT8" => Some(Self::Uint8),
            "TYPE_UINT16" => Some(Self::Uint16),
            "TYPE_UINT32" => Some(Self::Uint32),
            "TYPE_UINT64" => Some(Self::Uint64),
            "TYPE_INT8" => Some(Self::Int8),
            "TYPE_INT16" => Some(Self::Int16),
            "TYPE_INT32" => Some(Self::Int32),
            "TYPE_INT64" => Some(Self::Int64),
            "TYPE_FP16" => Some(Self::Fp16),
            "TYPE_FP32" => Some(Self::Fp32),
            "TYPE_FP64" => Some(Self::Fp64),
            "TYPE_BF16" => Some(Self::Bf16),
            "TYPE_STRING" => Some(Self::Bytes),
            _ => None,
        }
    }

    /// Lowercase short name used as a tensor-name prefix, e.g. `fp32` or `string`.
    pub fn type_name(self) -> String {
        let name = self.config_name();
        name.strip_prefix("TYPE_").unwrap_or(name).to_ascii_lowercase()
    }

    /// Width of one element in bytes, or `None` for variable-length and
    /// undeclared types.
    pub const fn element_size(self) -> Option<usize> {
        match self {
            Self::Bool | Self::Uint8 | Self::Int8 => Some(1),
            Self::Uint16 | Self::Int16 | Self::Fp16 | Self::Bf16 => Some(2),
            Self::Uint32 | Self::Int32 | Self::Fp32 => Some(4),
            Self::Uint64 | Self::Int64 | Self::Fp64 => Some(8),
            Self::Bytes | Self::Invalid => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_name())
    }
}

/// Error returned when parsing an unknown data type spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDataTypeError(String);

impl fmt::Display for ParseDataTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown data type: {}", self.0)
    }
}

impl std::error::Error for ParseDataTypeError {}

impl FromStr for DataType {
    type Err = ParseDataTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataType::parse(s).ok_or_else(|| ParseDataTypeError(s.to_owned()))
    }
}
