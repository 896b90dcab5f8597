pub mod exports_info;
pub mod module_type;
pub mod package_json;
pub mod raw_idx;
pub mod runtime_id;
pub mod source;
