pub mod jsonp_chunk;
pub mod runtime_template;
