//! Shared domain enums

use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, Postgres};
use utoipa::ToSchema;

/// Implements text-column storage for an enum with `as_str`/`FromStr`
macro_rules! text_column {
    ($ty:ty) => {
        impl sqlx::Type<Postgres> for $ty {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <String as sqlx::Type<Postgres>>::type_info()
            }

            fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
                <String as sqlx::Type<Postgres>>::compatible(ty)
            }
        }

        impl<'r> Decode<'r, Postgres> for $ty {
            fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
                let s: &str = Decode::<Postgres>::decode(value)?;
                s.parse().map_err(|e: String| e.into())
            }
        }

        impl Encode<'_, Postgres> for $ty {
            fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
                <&str as Encode<Postgres>>::encode(self.as_str(), buf)
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

// ---------------------------------------------------------------------------
// ApprovalStatus
// ---------------------------------------------------------------------------

/// Review state of a TVPSS version submission or a crew application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "Pending",
            ApprovalStatus::Approved => "Approved",
            ApprovalStatus::Rejected => "Rejected",
        }
    }
}

impl std::str::FromStr for ApprovalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ApprovalStatus::Pending),
            "approved" => Ok(ApprovalStatus::Approved),
            "rejected" => Ok(ApprovalStatus::Rejected),
            _ => Err(format!("Invalid approval status: {}", s)),
        }
    }
}

text_column!(ApprovalStatus);

// ---------------------------------------------------------------------------
// EquipmentStatus
// ---------------------------------------------------------------------------

/// Condition of a piece of equipment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum EquipmentStatus {
    #[serde(rename = "Berfungsi")]
    Berfungsi,
    #[serde(rename = "Tidak Berfungsi")]
    TidakBerfungsi,
    #[serde(rename = "Penyelenggaraan")]
    Penyelenggaraan,
    #[serde(rename = "Lupus")]
    Lupus,
}

impl EquipmentStatus {
    pub const ALL: [EquipmentStatus; 4] = [
        EquipmentStatus::Berfungsi,
        EquipmentStatus::TidakBerfungsi,
        EquipmentStatus::Penyelenggaraan,
        EquipmentStatus::Lupus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentStatus::Berfungsi => "Berfungsi",
            EquipmentStatus::TidakBerfungsi => "Tidak Berfungsi",
            EquipmentStatus::Penyelenggaraan => "Penyelenggaraan",
            EquipmentStatus::Lupus => "Lupus",
        }
    }

    /// Follow-ups are only recorded against broken or in-repair equipment
    pub fn accepts_follow_up(&self) -> bool {
        matches!(
            self,
            EquipmentStatus::TidakBerfungsi | EquipmentStatus::Penyelenggaraan
        )
    }
}

impl std::str::FromStr for EquipmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EquipmentStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Invalid equipment status: {}", s))
    }
}

text_column!(EquipmentStatus);

// ---------------------------------------------------------------------------
// EquipmentType
// ---------------------------------------------------------------------------

/// Equipment category; `Other` carries its label in `other_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum EquipmentType {
    Phone,
    Tablet,
    Laptop,
    #[serde(rename = "PC")]
    Pc,
    Microphone,
    #[serde(rename = "Barang Sukan")]
    BarangSukan,
    Perabot,
    Kenderaan,
    #[serde(rename = "other")]
    Other,
}

impl EquipmentType {
    pub const ALL: [EquipmentType; 9] = [
        EquipmentType::Phone,
        EquipmentType::Tablet,
        EquipmentType::Laptop,
        EquipmentType::Pc,
        EquipmentType::Microphone,
        EquipmentType::BarangSukan,
        EquipmentType::Perabot,
        EquipmentType::Kenderaan,
        EquipmentType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentType::Phone => "Phone",
            EquipmentType::Tablet => "Tablet",
            EquipmentType::Laptop => "Laptop",
            EquipmentType::Pc => "PC",
            EquipmentType::Microphone => "Microphone",
            EquipmentType::BarangSukan => "Barang Sukan",
            EquipmentType::Perabot => "Perabot",
            EquipmentType::Kenderaan => "Kenderaan",
            EquipmentType::Other => "other",
        }
    }
}

impl std::str::FromStr for EquipmentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EquipmentType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Invalid equipment type: {}", s))
    }
}

text_column!(EquipmentType);

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Account role; the numeric values are what the users table stores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[repr(i16)]
pub enum Role {
    SuperAdmin = 1,
    StateAdmin = 2,
    PpdAdmin = 3,
    SchoolAdmin = 4,
    Student = 5,
}

impl TryFrom<i16> for Role {
    type Error = String;

    fn try_from(v: i16) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(Role::SuperAdmin),
            2 => Ok(Role::StateAdmin),
            3 => Ok(Role::PpdAdmin),
            4 => Ok(Role::SchoolAdmin),
            5 => Ok(Role::Student),
            _ => Err(format!("Invalid role: {}", v)),
        }
    }
}

impl From<Role> for i16 {
    fn from(r: Role) -> Self {
        r as i16
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Role::SuperAdmin => "Super Admin",
            Role::StateAdmin => "State Admin",
            Role::PpdAdmin => "PPD Admin",
            Role::SchoolAdmin => "School Admin",
            Role::Student => "Student",
        };
        write!(f, "{}", label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follow_up_allow_list() {
        assert!(EquipmentStatus::TidakBerfungsi.accepts_follow_up());
        assert!(EquipmentStatus::Penyelenggaraan.accepts_follow_up());
        assert!(!EquipmentStatus::Berfungsi.accepts_follow_up());
        assert!(!EquipmentStatus::Lupus.accepts_follow_up());
    }

    #[test]
    fn test_equipment_status_parse() {
        assert_eq!(
            "Tidak Berfungsi".parse::<EquipmentStatus>(),
            Ok(EquipmentStatus::TidakBerfungsi)
        );
        assert!("Rosak".parse::<EquipmentStatus>().is_err());
        // labels are matched exactly
        assert!("tidak berfungsi".parse::<EquipmentStatus>().is_err());
    }

    #[test]
    fn test_equipment_status_serde_matches_column_text() {
        for status in EquipmentStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn test_equipment_type_serde_matches_column_text() {
        for t in EquipmentType::ALL {
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.as_str()));
        }
    }

    #[test]
    fn test_approval_status_parse_is_case_insensitive() {
        assert_eq!("approved".parse::<ApprovalStatus>(), Ok(ApprovalStatus::Approved));
        assert_eq!("Pending".parse::<ApprovalStatus>(), Ok(ApprovalStatus::Pending));
        assert!("Null".parse::<ApprovalStatus>().is_err());
    }

    #[test]
    fn test_role_roundtrip() {
        assert_eq!(Role::try_from(3), Ok(Role::PpdAdmin));
        assert_eq!(i16::from(Role::SchoolAdmin), 4);
        assert!(Role::try_from(9).is_err());
    }
}
