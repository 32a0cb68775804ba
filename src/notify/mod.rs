//! Notification dispatch - Fire-and-forget messages about assignments and leaves.
//!
//! Core operations build a [`Notification`] after their database work has committed and
//! hand it to a [`NotificationDispatcher`]. Dispatch never fails from the caller's point
//! of view. The production dispatcher, [`QueueDispatcher`], pushes onto a bounded tokio
//! queue drained by [`run_worker`], which delivers through a [`NotificationSink`] and
//! logs any delivery failure instead of propagating it.

use crate::{
    core::dates::DATE_FORMAT,
    entities::{employee, engagement, leave::LeaveType},
    errors::Result,
};
use chrono::NaiveDate;
use poise::serenity_prelude as serenity;
use std::{future::Future, sync::Arc};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Capacity of the notification queue
pub const QUEUE_CAPACITY: usize = 256;

/// Someone a notification is addressed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    /// Display name
    pub name: String,
    /// Contact address
    pub email: String,
    /// Linked Discord account, if any
    pub discord_user_id: Option<String>,
}

impl Recipient {
    /// Discord mention when the account is linked, otherwise the bold name.
    #[must_use]
    pub fn mention(&self) -> String {
        self.discord_user_id
            .as_ref()
            .map_or_else(|| format!("**{}**", self.name), |id| format!("<@{id}>"))
    }
}

impl From<&employee::Model> for Recipient {
    fn from(value: &employee::Model) -> Self {
        Self {
            name: value.full_name.clone(),
            email: value.email.clone(),
            discord_user_id: value.discord_user_id.clone(),
        }
    }
}

/// Engagement details carried by notifications
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngagementInfo {
    /// Engagement name
    pub name: String,
    /// First day
    pub start_date: NaiveDate,
    /// Last day
    pub end_date: NaiveDate,
}

impl From<&engagement::Model> for EngagementInfo {
    fn from(value: &engagement::Model) -> Self {
        Self {
            name: value.name.clone(),
            start_date: value.start_date,
            end_date: value.end_date,
        }
    }
}

/// A message to deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// An employee was added to an engagement
    EmployeeAssigned {
        /// The assignee
        employee: Recipient,
        /// The engagement
        engagement: EngagementInfo,
    },
    /// An employee was taken off an engagement
    EmployeeRemoved {
        /// The former assignee
        employee: Recipient,
        /// The engagement
        engagement: EngagementInfo,
    },
    /// A new engagement was scheduled
    EngagementCreated {
        /// Managers to inform
        managers: Vec<Recipient>,
        /// Client name
        client: String,
        /// The engagement
        engagement: EngagementInfo,
    },
    /// An employee booked a leave
    LeaveCreated {
        /// Managers to inform
        managers: Vec<Recipient>,
        /// Employee taking the leave
        employee: Recipient,
        /// Kind of leave
        leave_type: LeaveType,
        /// First day
        start_date: NaiveDate,
        /// Last day
        end_date: NaiveDate,
        /// Leave note
        note: String,
    },
}

impl Notification {
    /// Short subject line
    #[must_use]
    pub fn subject(&self) -> String {
        match self {
            Self::EmployeeAssigned { engagement, .. } => {
                format!("Assigned to engagement: {}", engagement.name)
            }
            Self::EmployeeRemoved { engagement, .. } => {
                format!("Removed from engagement: {}", engagement.name)
            }
            Self::EngagementCreated {
                client, engagement, ..
            } => format!("New engagement for {client}: {}", engagement.name),
            Self::LeaveCreated {
                employee,
                leave_type,
                ..
            } => format!("{} request from {}", leave_type.label(), employee.name),
        }
    }

    /// Message body, addressed to the recipients
    #[must_use]
    pub fn body(&self) -> String {
        match self {
            Self::EmployeeAssigned {
                employee,
                engagement,
            } => format!(
                "{} has been assigned to **{}** ({})",
                employee.mention(),
                engagement.name,
                period(engagement.start_date, engagement.end_date)
            ),
            Self::EmployeeRemoved {
                employee,
                engagement,
            } => format!(
                "{} has been removed from **{}** ({})",
                employee.mention(),
                engagement.name,
                period(engagement.start_date, engagement.end_date)
            ),
            Self::EngagementCreated {
                managers,
                client,
                engagement,
            } => format!(
                "{}\nNew engagement **{}** for {client} scheduled {}",
                mentions(managers),
                engagement.name,
                period(engagement.start_date, engagement.end_date)
            ),
            Self::LeaveCreated {
                managers,
                employee,
                leave_type,
                start_date,
                end_date,
                note,
            } => {
                let mut body = format!(
                    "{}\n{} booked {} for {}",
                    mentions(managers),
                    employee.name,
                    leave_type.label(),
                    period(*start_date, *end_date)
                );
                if !note.trim().is_empty() {
                    body.push_str(&format!("\nNote: {note}"));
                }
                body
            }
        }
    }

    /// Subject and body as one chat message
    #[must_use]
    pub fn render(&self) -> String {
        format!("📣 **{}**\n{}", self.subject(), self.body())
    }
}

fn period(start: NaiveDate, end: NaiveDate) -> String {
    format!("{} → {}", start.format(DATE_FORMAT), end.format(DATE_FORMAT))
}

fn mentions(recipients: &[Recipient]) -> String {
    if recipients.is_empty() {
        return "(no managers on record)".to_string();
    }
    recipients
        .iter()
        .map(Recipient::mention)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Accepts notifications without making the caller wait for delivery.
pub trait NotificationDispatcher: Send + Sync {
    /// Queues a notification. Problems are logged, never returned.
    fn dispatch(&self, notification: Notification);
}

/// Dispatcher backed by a bounded tokio queue.
#[derive(Debug, Clone)]
pub struct QueueDispatcher {
    sender: mpsc::Sender<Notification>,
}

impl QueueDispatcher {
    /// Creates the dispatcher and the receiving end to hand to [`run_worker`].
    #[must_use]
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<Notification>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }
}

impl NotificationDispatcher for QueueDispatcher {
    fn dispatch(&self, notification: Notification) {
        if let Err(e) = self.sender.try_send(notification) {
            warn!("Dropping notification: {e}");
        }
    }
}

/// Dispatcher that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDispatcher;

impl NotificationDispatcher for NoopDispatcher {
    fn dispatch(&self, notification: Notification) {
        debug!("Discarding notification: {}", notification.subject());
    }
}

/// Delivers one notification to its destination.
pub trait NotificationSink: Send + Sync + 'static {
    /// Sends the notification.
    ///
    /// # Errors
    /// Returns an error if the destination rejects the message.
    fn deliver(&self, notification: &Notification) -> impl Future<Output = Result<()>> + Send;
}

/// Sink that only writes to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
    async fn deliver(&self, notification: &Notification) -> Result<()> {
        info!(subject = %notification.subject(), "{}", notification.body());
        Ok(())
    }
}

/// Sink posting into one Discord channel.
#[derive(Debug, Clone)]
pub struct DiscordChannelSink {
    http: Arc<serenity::Http>,
    channel_id: serenity::ChannelId,
}

impl DiscordChannelSink {
    /// Creates a sink for the given channel.
    #[must_use]
    pub fn new(http: Arc<serenity::Http>, channel_id: u64) -> Self {
        Self {
            http,
            channel_id: serenity::ChannelId::new(channel_id),
        }
    }
}

impl NotificationSink for DiscordChannelSink {
    async fn deliver(&self, notification: &Notification) -> Result<()> {
        self.channel_id
            .say(self.http.as_ref(), notification.render())
            .await?;
        Ok(())
    }
}

/// Drains the queue until every sender is dropped.
///
/// A failed delivery is logged and the notification dropped; the worker keeps going.
pub async fn run_worker<S: NotificationSink>(
    sink: S,
    mut receiver: mpsc::Receiver<Notification>,
) {
    info!("Notification worker started");
    while let Some(notification) = receiver.recv().await {
        if let Err(e) = sink.deliver(&notification).await {
            error!(
                "Failed to deliver notification '{}': {e}",
                notification.subject()
            );
        }
    }
    info!("Notification worker stopped");
}
