//! Column type tags that show up in error messages.

use std::fmt;

/// Storage type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SType {
    Void,
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Str32,
    Str64,
    Arr32,
    Arr64,
    Date32,
    Time64,
    Obj,
}

impl SType {
    pub fn name(self) -> &'static str {
        match self {
            SType::Void => "void",
            SType::Bool => "bool8",
            SType::Int8 => "int8",
            SType::Int16 => "int16",
            SType::Int32 => "int32",
            SType::Int64 => "int64",
            SType::Float32 => "float32",
            SType::Float64 => "float64",
            SType::Str32 => "str32",
            SType::Str64 => "str64",
            SType::Arr32 => "arr32",
            SType::Arr64 => "arr64",
            SType::Date32 => "date32",
            SType::Time64 => "time64",
            SType::Obj => "obj64",
        }
    }

    pub fn ltype(self) -> LType {
        match self {
            SType::Void => LType::Mu,
            SType::Bool => LType::Bool,
            SType::Int8 | SType::Int16 | SType::Int32 | SType::Int64 => LType::Int,
            SType::Float32 | SType::Float64 => LType::Real,
            SType::Str32 | SType::Str64 => LType::String,
            SType::Arr32 | SType::Arr64 => LType::Array,
            SType::Date32 | SType::Time64 => LType::Datetime,
            SType::Obj => LType::Object,
        }
    }
}

impl fmt::Display for SType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Logical type: the family a storage type belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LType {
    Mu,
    Bool,
    Int,
    Real,
    String,
    Array,
    Datetime,
    Object,
    Invalid,
}

impl LType {
    pub fn name(self) -> &'static str {
        match self {
            LType::Mu => "void",
            LType::Bool => "boolean",
            LType::Int => "integer",
            LType::Real => "float",
            LType::String => "string",
            LType::Array => "array",
            LType::Datetime => "datetime",
            LType::Object => "object",
            LType::Invalid => "invalid",
        }
    }
}

impl fmt::Display for LType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stype_families() {
        assert_eq!(SType::Int16.ltype(), LType::Int);
        assert_eq!(SType::Float64.ltype(), LType::Real);
        assert_eq!(SType::Str64.ltype(), LType::String);
        assert_eq!(SType::Void.ltype().name(), "void");
    }

    #[test]
    fn test_display_uses_canonical_name() {
        assert_eq!(SType::Int32.to_string(), "int32");
        assert_eq!(LType::Datetime.to_string(), "datetime");
    }
}
