//! Operator-facing notifications
//!
//! Controllers call [`Notifier::notify`] synchronously, before the failing
//! operation returns, so a front end can show a blocking alert.

use crate::Error;
use crossbeam_channel::{unbounded, Receiver, Sender};

/// Something the operator has to be told about
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// The request never produced a usable answer (network, HTTP status,
    /// malformed body)
    TransportFailure { operation: String, message: String },
    /// The optimizer answered with an explicit error
    OptimizationFailed { message: String },
    /// Input was rejected before anything was sent
    InvalidInput { message: String },
    /// The client itself failed (drawing, configuration, local I/O)
    LocalFailure { operation: String, message: String },
}

impl Notification {
    /// Classifies an error raised while performing `operation`
    pub fn from_error(operation: &str, error: &Error) -> Self {
        match error {
            Error::Optimization(message) => Notification::OptimizationFailed {
                message: message.clone(),
            },
            Error::InvalidWaypoint(_) | Error::InvalidRequest(_) => Notification::InvalidInput {
                message: error.to_string(),
            },
            Error::Layer(_) | Error::Config(_) | Error::Io(_) => Notification::LocalFailure {
                operation: operation.to_string(),
                message: error.to_string(),
            },
            Error::Network(_) | Error::Status { .. } | Error::Serialization(_) | Error::Protocol(_) => {
                Notification::TransportFailure {
                    operation: operation.to_string(),
                    message: error.to_string(),
                }
            }
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Notification::TransportFailure { message, .. }
            | Notification::LocalFailure { message, .. }
            | Notification::OptimizationFailed { message }
            | Notification::InvalidInput { message } => message,
        }
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notification::TransportFailure { operation, message }
            | Notification::LocalFailure { operation, message } => {
                write!(f, "{} failed: {}", operation, message)
            }
            Notification::OptimizationFailed { message } => write!(f, "{}", message),
            Notification::InvalidInput { message } => write!(f, "{}", message),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}

impl<F> Notifier for F
where
    F: Fn(&Notification) + Send + Sync,
{
    fn notify(&self, notification: &Notification) {
        self(notification)
    }
}

/// Writes notifications to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) {
        match notification {
            Notification::InvalidInput { .. } => log::warn!("{}", notification),
            _ => log::error!("{}", notification),
        }
    }
}

/// Queues notifications for a front end to drain
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: Sender<Notification>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, Receiver<Notification>) {
        let (sender, receiver) = unbounded();
        (Self { sender }, receiver)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: &Notification) {
        if self.sender.send(notification.clone()).is_err() {
            // Nobody is listening any more; keep the message somewhere
            log::error!("{}", notification);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optimizer_error_text_is_kept_verbatim() {
        let notification =
            Notification::from_error("optimize", &Error::Optimization("infeasible".to_string()));
        assert_eq!(notification.to_string(), "infeasible");
        assert_eq!(notification.message(), "infeasible");
    }

    #[test]
    fn test_transport_and_application_failures_differ() {
        let transport = Notification::from_error(
            "refresh",
            &Error::Status {
                endpoint: "/get_waypoints".to_string(),
                status: 503,
            },
        );
        assert!(matches!(transport, Notification::TransportFailure { .. }));
        assert!(transport.to_string().starts_with("refresh failed"));

        let invalid = Notification::from_error(
            "add waypoint",
            &Error::InvalidWaypoint("demand must be >= 0".to_string()),
        );
        assert!(matches!(invalid, Notification::InvalidInput { .. }));
    }

    #[test]
    fn test_local_failures_are_not_transport_failures() {
        let layer = Notification::from_error(
            "draw routes",
            &Error::Layer("layer 'route-1-0' already exists".to_string()),
        );
        assert!(matches!(layer, Notification::LocalFailure { .. }));
        assert_eq!(
            layer.to_string(),
            "draw routes failed: Layer error: layer 'route-1-0' already exists"
        );

        let config = Notification::from_error("startup", &Error::Config("bad palette".to_string()));
        assert!(matches!(config, Notification::LocalFailure { .. }));
    }

    #[test]
    fn test_channel_notifier_delivers_in_order() {
        let (notifier, receiver) = ChannelNotifier::new();
        notifier.notify(&Notification::OptimizationFailed {
            message: "first".to_string(),
        });
        notifier.notify(&Notification::OptimizationFailed {
            message: "second".to_string(),
        });

        let messages: Vec<String> = receiver.try_iter().map(|n| n.to_string()).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }

    #[test]
    fn test_closure_notifier() {
        let seen = std::sync::Mutex::new(Vec::new());
        let notifier = |n: &Notification| seen.lock().unwrap().push(n.message().to_string());
        notifier.notify(&Notification::InvalidInput {
            message: "bad".to_string(),
        });
        assert_eq!(*seen.lock().unwrap(), vec!["bad"]);
    }
}
