use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::jobs::JobId;

/// A profile that may receive digest emails. Owned by the store; this
/// workspace only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscriber {
    pub id: Uuid,
    pub email: String,
    pub unsubscribe_token: String,
    #[serde(default = "default_subscribed")]
    pub is_subscribed: bool,
}

fn default_subscribed() -> bool {
    true
}

/// Delivery receipt: one row per job emailed to a subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailLog {
    pub user_id: Uuid,
    pub job_id: JobId,
}
