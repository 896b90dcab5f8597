mod plugin;
mod plugin_driver;

pub use crate::{
  plugin::{HookKind, Plugin},
  plugin_driver::PluginDriver,
};
