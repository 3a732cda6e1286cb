pub mod metrics_log;
pub mod metrics_panel;
