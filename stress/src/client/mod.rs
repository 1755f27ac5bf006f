//! Share Service Client
//!
//! HTTP implementation of [`crate::traits::SharesApi`] and the polling
//! waiters built on top of it.

pub mod rest;
pub mod wait;

pub use rest::RestSharesClient;
pub use wait::{
    WaitPolicy, wait_for_access_rule_deletion, wait_for_access_rule_status,
    wait_for_share_deletion, wait_for_share_status, wait_for_snapshot_deletion,
    wait_for_snapshot_status, wait_for_volume_type_deletion,
};
