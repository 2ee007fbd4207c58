//! Column layout of the import worksheets (1-based)

/// Row holding column headers; never data
pub const HEADER_ROW: u32 = 1;
pub const FIRST_DATA_ROW: u32 = 2;

// Objects: ClassName, ItemName, X, Y, Z, Length, Width, Height, Prop1..PropN
pub const OBJECT_CLASS: u32 = 1;
pub const OBJECT_NAME: u32 = 2;
pub const OBJECT_X: u32 = 3;
pub const OBJECT_LENGTH: u32 = 6;
pub const OBJECT_PROPERTY_START: u32 = 9;

// Links: ClassName, LinkName, FromNode, ToNode, NetworkName, Prop1..PropN
pub const LINK_CLASS: u32 = 1;
pub const LINK_NAME: u32 = 2;
pub const LINK_FROM: u32 = 3;
pub const LINK_TO: u32 = 4;
pub const LINK_NETWORK: u32 = 5;
pub const LINK_PROPERTY_START: u32 = 6;

// Vertices: LinkName, X, Y, Z
pub const VERTEX_LINK: u32 = 1;
pub const VERTEX_X: u32 = 2;
