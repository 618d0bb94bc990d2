//! Event Log helpers. Each message goes to the in-app console and to `log`.

use egui_lens::ReactiveEventLogger;

pub fn info(logger: &ReactiveEventLogger, message: &str) {
    log::info!("{}", message);
    logger.log_info(message);
}

pub fn warning(logger: &ReactiveEventLogger, message: &str) {
    log::warn!("{}", message);
    logger.log_warning(message);
}

pub fn error(logger: &ReactiveEventLogger, message: &str) {
    log::error!("{}", message);
    logger.log_error(message);
}

/// Message under one of the `LOG_TYPE_*` categories
pub fn custom(logger: &ReactiveEventLogger, kind: &str, message: &str) {
    log::info!("[{}] {}", kind, message);
    logger.log_custom(kind, message);
}
