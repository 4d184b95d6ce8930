use super::FieldType;
use crate::result::DeclaredType;

/// Infers the field type of a column.
///
/// The column named `time_column` is always `Time`. Otherwise the declared
/// type decides; anything unrecognised or missing degrades to `String`.
pub fn resolve_field_type(
    column_name: &str,
    declared: Option<DeclaredType>,
    time_column: Option<&str>,
) -> FieldType {
    if time_column == Some(column_name) {
        return FieldType::Time;
    }
    match declared {
        Some(DeclaredType::Bool) => FieldType::Boolean,
        Some(DeclaredType::Int | DeclaredType::Double) => FieldType::Number,
        _ => FieldType::String,
    }
}
