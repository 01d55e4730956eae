// Client-side usage/expiry monitor: derives advisory alerts from order
// state on each pass. Alerts carry no persisted state of their own.

mod monitor;

pub use monitor::{scan, UsageMonitor, EXPIRY_ALERT_DAYS, USAGE_CRITICAL, USAGE_WARN};
