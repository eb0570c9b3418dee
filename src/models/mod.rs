//! Data models for TVPSS

pub mod crew;
pub mod enums;
pub mod equipment;
pub mod follow_up;
pub mod school;
pub mod school_version;
pub mod scope;
pub mod stats;
pub mod student;
pub mod user;

// Re-export commonly used types
pub use crew::{Crew, CrewApplication};
pub use enums::{ApprovalStatus, EquipmentStatus, EquipmentType, Role};
pub use equipment::Equipment;
pub use follow_up::FollowUp;
pub use school::School;
pub use school_version::SchoolVersion;
pub use scope::SchoolScope;
pub use student::Student;
pub use user::{User, UserClaims};
