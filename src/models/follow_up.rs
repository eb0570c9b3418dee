//! Equipment follow-up notes and their image attachments

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::{types::Json, FromRow};
use utoipa::ToSchema;
use validator::{ValidationError, ValidationErrors};

use super::enums::Role;

/// Longest follow-up text accepted
pub const MAX_CONTENT_CHARS: usize = 500;

/// Accepted image extensions and their MIME types
const ALLOWED_IMAGES: [(&str, &str); 3] = [
    ("jpeg", "image/jpeg"),
    ("jpg", "image/jpeg"),
    ("png", "image/png"),
];

/// Row of the follow-up thread joined with its author
#[derive(Debug, Clone, FromRow)]
pub struct FollowUpRow {
    pub id: i32,
    pub equipment_id: i32,
    pub user_id: i32,
    pub content: Option<String>,
    pub images: Option<Json<Vec<String>>>,
    pub follow_up_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub author_name: String,
    pub author_role: i16,
}

/// Author embedded in a follow-up
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FollowUpAuthor {
    pub id: i32,
    pub name: String,
    pub role: Option<Role>,
}

/// Follow-up note as shown in the equipment thread
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FollowUp {
    pub id: i32,
    pub equipment_id: i32,
    pub content: Option<String>,
    /// Paths relative to the public storage root
    pub images: Vec<String>,
    pub follow_up_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub author: FollowUpAuthor,
}

impl From<FollowUpRow> for FollowUp {
    fn from(row: FollowUpRow) -> Self {
        FollowUp {
            id: row.id,
            equipment_id: row.equipment_id,
            content: row.content,
            images: row.images.map(|Json(paths)| paths).unwrap_or_default(),
            follow_up_date: row.follow_up_date,
            created_at: row.created_at,
            author: FollowUpAuthor {
                id: row.user_id,
                name: row.author_name,
                role: Role::try_from(row.author_role).ok(),
            },
        }
    }
}

/// An image received in a multipart follow-up submission
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Parsed multipart follow-up submission
#[derive(Debug, Clone, Default)]
pub struct NewFollowUp {
    pub content: Option<String>,
    pub images: Vec<UploadedImage>,
}

fn field_error(errors: &mut ValidationErrors, field: &'static str, code: &'static str, message: String) {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    errors.add(field, err);
}

impl NewFollowUp {
    /// Content length, image count, extension, MIME type and size checks
    pub fn validate(&self, max_images: usize, max_image_bytes: usize) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(content) = &self.content {
            if content.chars().count() > MAX_CONTENT_CHARS {
                field_error(
                    &mut errors,
                    "content",
                    "max",
                    format!("The content may not be greater than {} characters.", MAX_CONTENT_CHARS),
                );
            }
        }

        if self.images.len() > max_images {
            field_error(
                &mut errors,
                "images",
                "max",
                format!("No more than {} images may be uploaded.", max_images),
            );
        }

        for image in &self.images {
            if !is_allowed_image(&image.file_name, image.content_type.as_deref()) {
                field_error(
                    &mut errors,
                    "images",
                    "mimes",
                    format!("{} must be a file of type: jpeg, png, jpg.", image.file_name),
                );
            }
            if image.bytes.len() > max_image_bytes {
                field_error(
                    &mut errors,
                    "images",
                    "max",
                    format!(
                        "{} may not be greater than {} kilobytes.",
                        image.file_name,
                        max_image_bytes / 1024
                    ),
                );
            }
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Extension must be an accepted image type and agree with the declared MIME type
pub fn is_allowed_image(file_name: &str, content_type: Option<&str>) -> bool {
    let Some((_, ext)) = file_name.rsplit_once('.') else {
        return false;
    };
    let ext = ext.to_ascii_lowercase();
    ALLOWED_IMAGES.iter().any(|(allowed_ext, mime)| {
        *allowed_ext == ext && content_type.map_or(true, |ct| ct.eq_ignore_ascii_case(mime))
    })
}

/// Base name of a client supplied file name, without any directory part
pub fn client_file_name(raw: &str) -> String {
    raw.rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Folder of one school's follow-up images, relative to the storage root
pub fn school_folder(school_id: i32) -> String {
    format!("followUpEq/school_{}", school_id)
}

/// Stored path of an upload: `followUpEq/school_{id}/{unix seconds}_{name}`
pub fn stored_path(school_id: i32, uploaded_at: DateTime<Utc>, file_name: &str) -> String {
    format!(
        "{}/{}_{}",
        school_folder(school_id),
        uploaded_at.timestamp(),
        client_file_name(file_name)
    )
}

/// Response after saving a follow-up
#[derive(Debug, Serialize, ToSchema)]
pub struct FollowUpResponse {
    pub message: String,
    pub follow_up: FollowUp,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn image(name: &str, content_type: &str, size: usize) -> UploadedImage {
        UploadedImage {
            file_name: name.to_string(),
            content_type: Some(content_type.to_string()),
            bytes: vec![0; size],
        }
    }

    #[test]
    fn test_stored_path_is_per_school_and_timestamped() {
        let at = Utc.with_ymd_and_hms(2024, 5, 2, 8, 30, 0).unwrap();
        assert_eq!(
            stored_path(12, at, "rosak.jpg"),
            format!("followUpEq/school_12/{}_rosak.jpg", at.timestamp())
        );
    }

    #[test]
    fn test_client_file_name_strips_directories() {
        assert_eq!(client_file_name("../../etc/passwd"), "passwd");
        assert_eq!(client_file_name("C:\\Users\\cikgu\\gambar.png"), "gambar.png");
        assert_eq!(client_file_name("kamera.jpeg"), "kamera.jpeg");
    }

    #[test]
    fn test_allowed_images() {
        assert!(is_allowed_image("a.JPG", Some("image/jpeg")));
        assert!(is_allowed_image("a.png", None));
        assert!(!is_allowed_image("a.gif", Some("image/gif")));
        assert!(!is_allowed_image("a.png", Some("application/pdf")));
        assert!(!is_allowed_image("noext", Some("image/png")));
    }

    #[test]
    fn test_validate_limits() {
        let ok = NewFollowUp {
            content: Some("Skrin retak".to_string()),
            images: vec![image("a.jpg", "image/jpeg", 10), image("b.png", "image/png", 10)],
        };
        assert!(ok.validate(2, 2048 * 1024).is_ok());

        let too_many = NewFollowUp {
            content: None,
            images: vec![
                image("a.jpg", "image/jpeg", 10),
                image("b.jpg", "image/jpeg", 10),
                image("c.jpg", "image/jpeg", 10),
            ],
        };
        assert!(too_many.validate(2, 2048 * 1024).is_err());

        let too_big = NewFollowUp {
            content: None,
            images: vec![image("a.jpg", "image/jpeg", 2048 * 1024 + 1)],
        };
        let errors = too_big.validate(2, 2048 * 1024).unwrap_err();
        assert!(errors.field_errors().contains_key("images"));

        let too_long = NewFollowUp {
            content: Some("x".repeat(MAX_CONTENT_CHARS + 1)),
            images: vec![],
        };
        let errors = too_long.validate(2, 2048 * 1024).unwrap_err();
        assert!(errors.field_errors().contains_key("content"));
    }

    #[test]
    fn test_row_without_images() {
        let row = FollowUpRow {
            id: 1,
            equipment_id: 4,
            user_id: 9,
            content: Some("Dihantar untuk dibaiki".to_string()),
            images: None,
            follow_up_date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            created_at: Utc::now(),
            author_name: "Pegawai PPD".to_string(),
            author_role: 3,
        };
        let follow_up = FollowUp::from(row);
        assert!(follow_up.images.is_empty());
        assert_eq!(follow_up.author.role, Some(Role::PpdAdmin));
    }
}
