//! User-facing notifications raised by the workflow services.
//!
//! Services report outcomes through a [`Notifier`]; routes collect them in an
//! [`AlertLog`] and turn them into flash messages or inline page alerts.

use std::sync::Mutex;

use serde::Serialize;

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl AlertLevel {
    /// Severity marker prefixed to the message text.
    pub fn marker(self) -> Option<&'static str> {
        match self {
            AlertLevel::Success => Some("✅"),
            AlertLevel::Warning => Some("⚠️"),
            AlertLevel::Error => Some("❌"),
            AlertLevel::Info => None,
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
}

impl Alert {
    pub fn new(level: AlertLevel, text: impl AsRef<str>) -> Self {
        let message = match level.marker() {
            Some(marker) => format!("{marker} {}", text.as_ref()),
            None => text.as_ref().to_string(),
        };
        Self { level, message }
    }

    pub fn success(text: impl AsRef<str>) -> Self {
        Self::new(AlertLevel::Success, text)
    }

    pub fn info(text: impl AsRef<str>) -> Self {
        Self::new(AlertLevel::Info, text)
    }

    pub fn warning(text: impl AsRef<str>) -> Self {
        Self::new(AlertLevel::Warning, text)
    }

    pub fn error(text: impl AsRef<str>) -> Self {
        Self::new(AlertLevel::Error, text)
    }
}

pub trait Notifier {
    fn notify(&self, alert: Alert);
}

/// Notifier that keeps every alert in order.
#[derive(Debug, Default)]
pub struct AlertLog {
    alerts: Mutex<Vec<Alert>>,
}

impl AlertLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns the collected alerts.
    pub fn take(&self) -> Vec<Alert> {
        match self.alerts.lock() {
            Ok(mut alerts) => std::mem::take(&mut *alerts),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    /// True when any collected alert contains `text`.
    pub fn contains(&self, text: &str) -> bool {
        match self.alerts.lock() {
            Ok(alerts) => alerts.iter().any(|alert| alert.message.contains(text)),
            Err(poisoned) => poisoned
                .into_inner()
                .iter()
                .any(|alert| alert.message.contains(text)),
        }
    }
}

impl Notifier for AlertLog {
    fn notify(&self, alert: Alert) {
        match self.alerts.lock() {
            Ok(mut alerts) => alerts.push(alert),
            Err(poisoned) => poisoned.into_inner().push(alert),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alerts_carry_severity_marker() {
        assert_eq!(Alert::success("Listo").message, "✅ Listo");
        assert_eq!(Alert::warning("Ojo").message, "⚠️ Ojo");
        assert_eq!(Alert::error("Falló").message, "❌ Falló");
        assert_eq!(Alert::info("Nota").message, "Nota");
    }

    #[test]
    fn alert_log_collects_in_order() {
        let log = AlertLog::new();
        log.notify(Alert::info("uno"));
        log.notify(Alert::error("dos"));

        assert!(log.contains("dos"));
        let alerts = log.take();
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].level, AlertLevel::Info);
        assert!(log.take().is_empty());
    }
}
