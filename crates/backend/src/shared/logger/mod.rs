pub mod repository;

use repository::log_event_internal;

/// Логирование события на сервере в system_log
///
/// ```rust,ignore
/// logger::log("u502", "Batch analysis finished: 10 ok, 2 errors");
/// ```
pub fn log(category: &str, message: &str) {
    log_event_internal("server", category, message);
}
