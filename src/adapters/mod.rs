//! Concrete adapter implementations of the port traits.

pub mod file_config_adapter;
pub mod csv_adapter;
pub mod console_plot_adapter;
pub mod csv_plot_adapter;
