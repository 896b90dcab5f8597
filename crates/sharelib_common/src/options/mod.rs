pub mod output_options;
pub mod plugin_options;
