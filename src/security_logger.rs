//! Security-focused logging module to track authentication events

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Types of security events to track
#[derive(Debug, Clone)]
pub enum SecurityEvent {
    /// A login attempt was rejected; the reason stays server-side
    AuthenticationFailed { username: Option<String>, reason: String },
    /// A login attempt succeeded and a token was issued
    AuthenticationSuccess { username: String },
    /// A presented bearer token failed validation
    TokenValidationFailed { reason: String },
    /// The credential store returned a failure or timed out
    StorageFailure { operation: String, error: String },
}

/// Security logger for tracking and alerting on auth events
///
/// Constructed once at startup and shared by `Arc`; there is no process-wide
/// singleton.
pub struct SecurityLogger {
    events: RwLock<Vec<SecurityEvent>>,
    event_counts: RwLock<HashMap<String, usize>>,
    max_events: usize,
    alert_thresholds: HashMap<String, usize>,
}

impl SecurityLogger {
    /// Create a new security logger with default alert thresholds
    pub fn new() -> Self {
        let mut alert_thresholds = HashMap::new();
        alert_thresholds.insert("auth_failed".to_string(), 5);
        alert_thresholds.insert("token_validation_failed".to_string(), 10);
        alert_thresholds.insert("storage_failure".to_string(), 3);

        Self {
            events: RwLock::new(Vec::new()),
            event_counts: RwLock::new(HashMap::new()),
            max_events: 10000,
            alert_thresholds,
        }
    }

    /// Create a shared logger
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Log a security event
    pub async fn log_event(&self, event: SecurityEvent) {
        let event_key = Self::event_key(&event);

        match &event {
            SecurityEvent::AuthenticationFailed { username, reason } => {
                log::warn!(
                    "Authentication failed for {}: {}",
                    username.as_deref().unwrap_or("<unknown>"),
                    reason
                );
            }
            SecurityEvent::AuthenticationSuccess { username } => {
                log::info!("Authentication successful for {}", username);
            }
            SecurityEvent::TokenValidationFailed { reason } => {
                log::warn!("Token validation failed: {}", reason);
            }
            SecurityEvent::StorageFailure { operation, error } => {
                log::error!("Credential store failure during {}: {}", operation, error);
            }
        }

        {
            let mut events = self.events.write().await;
            events.push(event);
            // Bounded buffer: drop oldest entries past the cap
            if events.len() > self.max_events {
                let excess = events.len() - self.max_events;
                events.drain(0..excess);
            }
        }

        let count = {
            let mut counts = self.event_counts.write().await;
            let count = counts.entry(event_key.clone()).or_insert(0);
            *count += 1;
            *count
        };

        if let Some(&threshold) = self.alert_thresholds.get(&event_key) {
            if count % threshold == 0 {
                log::error!(
                    "SECURITY ALERT: {} occurrences of '{}' events",
                    count,
                    event_key
                );
            }
        }
    }

    /// Most recent events, oldest first
    pub async fn recent_events(&self, limit: usize) -> Vec<SecurityEvent> {
        let events = self.events.read().await;
        let skip = events.len().saturating_sub(limit);
        events[skip..].to_vec()
    }

    /// Number of occurrences seen for an event category
    pub async fn event_count(&self, event_key: &str) -> usize {
        self.event_counts
            .read()
            .await
            .get(event_key)
            .copied()
            .unwrap_or(0)
    }

    fn event_key(event: &SecurityEvent) -> String {
        match event {
            SecurityEvent::AuthenticationFailed { .. } => "auth_failed",
            SecurityEvent::AuthenticationSuccess { .. } => "auth_success",
            SecurityEvent::TokenValidationFailed { .. } => "token_validation_failed",
            SecurityEvent::StorageFailure { .. } => "storage_failure",
        }
        .to_string()
    }
}

impl Default for SecurityLogger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_event_counting() {
        let logger = SecurityLogger::new();

        logger
            .log_event(SecurityEvent::AuthenticationFailed {
                username: Some("mallory".to_string()),
                reason: "bad credentials".to_string(),
            })
            .await;
        logger
            .log_event(SecurityEvent::AuthenticationFailed {
                username: None,
                reason: "bad credentials".to_string(),
            })
            .await;
        logger
            .log_event(SecurityEvent::AuthenticationSuccess {
                username: "alice".to_string(),
            })
            .await;

        assert_eq!(logger.event_count("auth_failed").await, 2);
        assert_eq!(logger.event_count("auth_success").await, 1);
        assert_eq!(logger.event_count("token_validation_failed").await, 0);

        let recent = logger.recent_events(2).await;
        assert_eq!(recent.len(), 2);
        assert!(matches!(
            recent[1],
            SecurityEvent::AuthenticationSuccess { .. }
        ));
    }
}
