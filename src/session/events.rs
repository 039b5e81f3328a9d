//! Session events and user-facing notifications

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{AchievementId, GoalId, LevelUp, Money, TransactionId, TransactionKind};

/// Something the user should be told about
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    TransactionAdded {
        id: TransactionId,
        kind: TransactionKind,
        amount: Money,
    },
    GoalCreated {
        id: GoalId,
        name: String,
    },
    GoalContributed {
        id: GoalId,
        name: String,
        amount: Money,
        progress: f64,
    },
    LevelUp(LevelUp),
    AchievementUnlocked {
        id: AchievementId,
    },
}

impl SessionEvent {
    pub fn notification_type(&self) -> NotificationType {
        match self {
            Self::LevelUp(_) | Self::AchievementUnlocked { .. } => NotificationType::Celebration,
            _ => NotificationType::Success,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::TransactionAdded { .. } => "Transação adicionada com sucesso!".to_string(),
            Self::GoalCreated { .. } => "Meta criada com sucesso!".to_string(),
            Self::GoalContributed { .. } => "Valor adicionado à meta!".to_string(),
            Self::LevelUp(event) => format!("🎉 {}", event),
            Self::AchievementUnlocked { id } => format!("🏆 Conquista desbloqueada: {}!", id.name()),
        }
    }

    pub fn to_notification(&self) -> Notification {
        Notification::new(self.message(), self.notification_type())
    }
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Info,
    Success,
    /// Level-ups and achievements
    Celebration,
    Warning,
    Error,
}

impl NotificationType {
    /// Prefix shown before the message
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Info => "i",
            Self::Success => "+",
            Self::Celebration => "*",
            Self::Warning => "!",
            Self::Error => "x",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Success => "Success",
            Self::Celebration => "Celebration",
            Self::Warning => "Warning",
            Self::Error => "Error",
        }
    }
}

/// A message queued for the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub notification_type: NotificationType,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(message: impl Into<String>, notification_type: NotificationType) -> Self {
        Self {
            message: message.into(),
            notification_type,
            created_at: Utc::now(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, NotificationType::Info)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, NotificationType::Success)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, NotificationType::Warning)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, NotificationType::Error)
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.notification_type.icon(), self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_messages() {
        let event = SessionEvent::LevelUp(LevelUp { from: 1, to: 2 });
        assert_eq!(event.message(), "🎉 Parabéns! Você subiu para o nível 2!");
        assert_eq!(event.notification_type(), NotificationType::Celebration);

        let event = SessionEvent::AchievementUnlocked {
            id: AchievementId::FirstStep,
        };
        assert_eq!(
            event.message(),
            "🏆 Conquista desbloqueada: Primeiro Passo!"
        );
    }

    #[test]
    fn test_notification_display() {
        let note = Notification::warning("Saldo negativo");
        assert_eq!(note.to_string(), "[!] Saldo negativo");
        assert_eq!(note.notification_type.title(), "Warning");
    }

    #[test]
    fn test_event_serializes_with_tag() {
        let event = SessionEvent::AchievementUnlocked {
            id: AchievementId::Saver,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"event":"achievement_unlocked","id":"saver"}"#);
    }
}
