//! Shared domain types.

pub mod id;
pub mod message;
pub mod profile;
pub mod reports;
pub mod response;

pub use id::SessionId;
pub use message::{ChannelHistory, MessageEvent};
pub use profile::{CreateProfileRequest, EditProfileRequest, PublicProfile, StoredProfile};
pub use reports::{
    ChannelActivity, DistributionEntry, GroupBy, UserActivityReport, UserActivityReportOptions,
};
