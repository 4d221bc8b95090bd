pub type EntityName = String;
pub type FieldName = String;
pub type EnumName = String;
