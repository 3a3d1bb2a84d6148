/// Graph layout
///
/// Node and edge derivation lives in `state::tree`; this module only
/// turns a derived graph into screen positions.

pub mod layout;
