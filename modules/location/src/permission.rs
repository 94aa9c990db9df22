// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use std::sync::RwLock;
use tokio::{io::AsyncWriteExt, sync::oneshot};
use tracing::{debug, error};

/// The answer of the user or the system to the location permission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// Checks and requests the permission to access the location.
#[async_trait::async_trait]
pub trait PermissionCollaborator: Send + Sync {
    /// Returns the current status without asking anybody.
    fn check(&self) -> PermissionStatus;

    /// Asks for the permission and returns the answer.
    async fn request(&self) -> PermissionStatus;
}

/// A permission with a fixed answer, e.g. from the configuration.
pub struct StaticPermission {
    current: RwLock<PermissionStatus>,
    answer: PermissionStatus,
}

impl StaticPermission {
    /// Creates a permission that reports `current` until it is requested, then `answer`.
    pub fn new(current: PermissionStatus, answer: PermissionStatus) -> Self {
        StaticPermission {
            current: RwLock::new(current),
            answer,
        }
    }

    /// Permission that is already granted.
    pub fn granted() -> Self {
        Self::new(PermissionStatus::Granted, PermissionStatus::Granted)
    }

    /// Permission that is denied and stays denied when requested.
    pub fn denied() -> Self {
        Self::new(PermissionStatus::Denied, PermissionStatus::Denied)
    }

    /// Withdraws the permission, e.g. when the user revokes it during the session.
    pub fn revoke(&self) {
        *self
            .current
            .write()
            .unwrap_or_else(|status| status.into_inner()) = PermissionStatus::Denied;
    }
}

#[async_trait::async_trait]
impl PermissionCollaborator for StaticPermission {
    fn check(&self) -> PermissionStatus {
        *self
            .current
            .read()
            .unwrap_or_else(|status| status.into_inner())
    }

    async fn request(&self) -> PermissionStatus {
        let mut current = self
            .current
            .write()
            .unwrap_or_else(|status| status.into_inner());
        *current = self.answer;
        *current
    }
}

/// Asks the user on the terminal and remembers the answer for the session.
pub struct PromptPermission {
    status: RwLock<PermissionStatus>,
}

impl PromptPermission {
    const QUESTION: &'static str = "Allow access to this device's location? [y/N] ";

    pub fn new() -> Self {
        PromptPermission {
            status: RwLock::new(PermissionStatus::Denied),
        }
    }
}

impl Default for PromptPermission {
    fn default() -> Self {
        Self::new()
    }
}

/// Interprets the answer of the user. Everything except yes is a denial.
pub fn parse_answer(answer: &str) -> PermissionStatus {
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => PermissionStatus::Granted,
        _ => PermissionStatus::Denied,
    }
}

#[async_trait::async_trait]
impl PermissionCollaborator for PromptPermission {
    fn check(&self) -> PermissionStatus {
        *self.status.read().unwrap_or_else(|status| status.into_inner())
    }

    async fn request(&self) -> PermissionStatus {
        let mut stdout = tokio::io::stdout();
        if let Err(e) = stdout.write_all(Self::QUESTION.as_bytes()).await {
            error!("Failed to ask for the location permission. Error: {e}");
        }
        if let Err(e) = stdout.flush().await {
            error!("Failed to flush the location permission question. Error: {e}");
        }

        // A blocked stdin read must not keep the runtime alive after a quit.
        let (answer_tx, answer_rx) = oneshot::channel();
        std::thread::spawn(move || {
            let mut line = String::new();
            let _ = answer_tx.send(std::io::stdin().read_line(&mut line).map(|_| line));
        });
        let answer = match answer_rx.await {
            Ok(Ok(line)) => parse_answer(&line),
            Ok(Err(e)) => {
                error!("Failed to read the permission answer. Error: {e}");
                PermissionStatus::Denied
            }
            Err(e) => {
                error!("Permission prompt ended without an answer. Error: {e}");
                PermissionStatus::Denied
            }
        };
        debug!("Location permission answered with {:?}", answer);
        *self.status.write().unwrap_or_else(|status| status.into_inner()) = answer;
        answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_permission_answers_request() {
        let permission = StaticPermission::new(PermissionStatus::Denied, PermissionStatus::Granted);
        assert_eq!(permission.check(), PermissionStatus::Denied);
        assert_eq!(permission.request().await, PermissionStatus::Granted);
        assert_eq!(permission.check(), PermissionStatus::Granted);
    }

    #[test]
    fn revoked_permission_is_denied() {
        let permission = StaticPermission::granted();
        permission.revoke();
        assert_eq!(permission.check(), PermissionStatus::Denied);
    }

    #[test]
    fn only_yes_grants_the_permission() {
        assert_eq!(parse_answer("y\n"), PermissionStatus::Granted);
        assert_eq!(parse_answer(" YES "), PermissionStatus::Granted);
        assert_eq!(parse_answer("\n"), PermissionStatus::Denied);
        assert_eq!(parse_answer("no"), PermissionStatus::Denied);
    }
}
