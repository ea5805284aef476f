//! Form validation - turns raw request fields into records ready to persist.
//!
//! Validators never touch storage. Checks that need stored state (existing
//! groups, taken usernames) receive that state from the caller.

use std::collections::BTreeMap;

use file_format::FileFormat;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Group;

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_CHOICE: &str =
    "Select a valid choice. That choice is not one of the available choices.";
pub const INVALID_IMAGE: &str = "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";
pub const PASSWORD_MISMATCH: &str = "The two password fields didn't match.";
pub const PASSWORD_TOO_SHORT: &str =
    "This password is too short. It must contain at least 8 characters.";
pub const USERNAME_TAKEN: &str = "A user with that username already exists.";
pub const INVALID_LOGIN: &str = "Please enter a correct username and password.";

/// Errors attached to fields that are not a single input.
pub const NON_FIELD_ERRORS: &str = "__all__";

pub const MIN_PASSWORD_LEN: usize = 8;

/// Field name to messages, keyed in name order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn into_map(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }

    fn finish<T>(self, value: T) -> Result<T, FormErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

/// A file as received from a multipart body.
#[derive(Debug, Clone, Default)]
pub struct UploadedFile {
    pub file_name: String,
    pub content: Vec<u8>,
}

impl UploadedFile {
    /// Browsers send an empty part when no file was chosen.
    pub fn is_empty(&self) -> bool {
        self.file_name.is_empty() && self.content.is_empty()
    }
}

/// An upload that passed image validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub extension: &'static str,
    pub content: Vec<u8>,
}

impl ImageUpload {
    /// Sniff the content; only raster formats a browser can display pass.
    pub fn detect(content: Vec<u8>) -> Option<Self> {
        let extension = match FileFormat::from_bytes(&content) {
            FileFormat::GraphicsInterchangeFormat => "gif",
            FileFormat::PortableNetworkGraphics => "png",
            FileFormat::JointPhotographicExpertsGroup => "jpg",
            FileFormat::Webp => "webp",
            FileFormat::WindowsBitmap => "bmp",
            _ => return None,
        };
        Some(Self { extension, content })
    }

    /// A fresh storage name under `posts/`.
    pub fn storage_name(&self) -> String {
        format!("posts/{}.{}", Uuid::new_v4().simple(), self.extension)
    }
}

/// What happens to a post's image on save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageChange {
    Keep,
    Clear,
    Replace(ImageUpload),
}

/// Raw post form input.
#[derive(Debug, Clone, Default)]
pub struct PostForm {
    pub text: String,
    /// Group id as submitted; empty means no group.
    pub group: Option<String>,
    pub image: Option<UploadedFile>,
    /// The "clear image" checkbox on the edit form.
    pub clear_image: bool,
}

/// A validated post form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanPost {
    pub text: String,
    pub group_id: Option<i64>,
    pub image: ImageChange,
}

impl PostForm {
    pub fn validate(self, groups: &[Group]) -> Result<CleanPost, FormErrors> {
        let mut errors = FormErrors::new();

        let text = self.text.trim().to_string();
        if text.is_empty() {
            errors.add("text", REQUIRED);
        }

        let group_id = match self.group.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match raw.parse::<i64>() {
                Ok(id) if groups.iter().any(|g| g.id == id) => Some(id),
                _ => {
                    errors.add("group", INVALID_CHOICE);
                    None
                }
            },
        };

        let image = match self.image.filter(|file| !file.is_empty()) {
            Some(file) => match ImageUpload::detect(file.content) {
                Some(upload) => ImageChange::Replace(upload),
                None => {
                    errors.add("image", INVALID_IMAGE);
                    ImageChange::Keep
                }
            },
            None if self.clear_image => ImageChange::Clear,
            None => ImageChange::Keep,
        };

        errors.finish(CleanPost {
            text,
            group_id,
            image,
        })
    }
}

/// Raw comment form input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentForm {
    #[serde(default)]
    pub text: String,
}

impl CommentForm {
    /// Returns the trimmed comment text.
    pub fn validate(&self) -> Result<String, FormErrors> {
        let mut errors = FormErrors::new();
        let text = self.text.trim();
        if text.is_empty() {
            errors.add("text", REQUIRED);
        }
        errors.finish(text.to_string())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password1: String,
    #[serde(skip_serializing)]
    pub password2: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanSignup {
    pub username: String,
    pub email: Option<String>,
    pub password: String,
}

impl SignupForm {
    /// `username_taken` is supplied by the caller after a lookup.
    pub fn validate(&self, username_taken: bool) -> Result<CleanSignup, FormErrors> {
        let mut errors = FormErrors::new();

        let username = self.username.trim();
        if username.is_empty() {
            errors.add("username", REQUIRED);
        } else if username_taken {
            errors.add("username", USERNAME_TAKEN);
        }

        if self.password1.is_empty() {
            errors.add("password1", REQUIRED);
        }
        if self.password2.is_empty() {
            errors.add("password2", REQUIRED);
        } else if self.password1 != self.password2 {
            errors.add("password2", PASSWORD_MISMATCH);
        } else if self.password1.chars().count() < MIN_PASSWORD_LEN {
            errors.add("password2", PASSWORD_TOO_SHORT);
        }

        let email = self.email.trim();
        errors.finish(CleanSignup {
            username: username.to_string(),
            email: (!email.is_empty()).then(|| email.to_string()),
            password: self.password1.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub next: Option<String>,
}

impl LoginForm {
    /// Presence checks only; credentials are verified by the caller.
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        if self.username.trim().is_empty() {
            errors.add("username", REQUIRED);
        }
        if self.password.is_empty() {
            errors.add("password", REQUIRED);
        }
        errors.finish(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_GIF: &[u8] = &[
        0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x02, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00,
        0x00, 0xFF, 0xFF, 0xFF, 0x21, 0xF9, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x2C, 0x00, 0x00,
        0x00, 0x00, 0x02, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x0C, 0x0A, 0x00, 0x3B,
    ];

    fn groups() -> Vec<Group> {
        vec![Group {
            id: 7,
            title: "Matrix".to_string(),
            slug: "Matrix".to_string(),
            description: "Red pill".to_string(),
        }]
    }

    #[test]
    fn test_post_form_requires_text() {
        let form = PostForm {
            text: "   ".to_string(),
            ..Default::default()
        };
        let errors = form.validate(&groups()).unwrap_err();
        assert_eq!(errors.get("text"), Some(&[REQUIRED.to_string()][..]));
    }

    #[test]
    fn test_post_form_minimal() {
        let form = PostForm {
            text: " Wake up, Neo ".to_string(),
            group: Some(String::new()),
            ..Default::default()
        };
        let clean = form.validate(&groups()).unwrap();
        assert_eq!(clean.text, "Wake up, Neo");
        assert_eq!(clean.group_id, None);
        assert_eq!(clean.image, ImageChange::Keep);
    }

    #[test]
    fn test_post_form_group_choice() {
        let valid = PostForm {
            text: "x".to_string(),
            group: Some("7".to_string()),
            ..Default::default()
        };
        assert_eq!(valid.validate(&groups()).unwrap().group_id, Some(7));

        for raw in ["8", "matrix"] {
            let invalid = PostForm {
                text: "x".to_string(),
                group: Some(raw.to_string()),
                ..Default::default()
            };
            let errors = invalid.validate(&groups()).unwrap_err();
            assert_eq!(errors.get("group"), Some(&[INVALID_CHOICE.to_string()][..]));
        }
    }

    #[test]
    fn test_post_form_accepts_gif() {
        let form = PostForm {
            text: "x".to_string(),
            image: Some(UploadedFile {
                file_name: "small.gif".to_string(),
                content: SMALL_GIF.to_vec(),
            }),
            ..Default::default()
        };
        match form.validate(&[]).unwrap().image {
            ImageChange::Replace(upload) => {
                assert_eq!(upload.extension, "gif");
                assert!(upload.storage_name().starts_with("posts/"));
                assert!(upload.storage_name().ends_with(".gif"));
            }
            other => panic!("unexpected image change: {other:?}"),
        }
    }

    #[test]
    fn test_post_form_rejects_non_image() {
        let form = PostForm {
            text: "x".to_string(),
            image: Some(UploadedFile {
                file_name: "notes.txt".to_string(),
                content: b"just some text".to_vec(),
            }),
            ..Default::default()
        };
        let errors = form.validate(&[]).unwrap_err();
        assert_eq!(errors.get("image"), Some(&[INVALID_IMAGE.to_string()][..]));
    }

    #[test]
    fn test_post_form_empty_upload_and_clear() {
        let form = PostForm {
            text: "x".to_string(),
            image: Some(UploadedFile::default()),
            clear_image: true,
            ..Default::default()
        };
        assert_eq!(form.validate(&[]).unwrap().image, ImageChange::Clear);
    }

    #[test]
    fn test_comment_form() {
        let blank = CommentForm {
            text: "\n".to_string(),
        };
        assert!(blank.validate().unwrap_err().get("text").is_some());

        let ok = CommentForm {
            text: "There is no spoon".to_string(),
        };
        assert_eq!(ok.validate().unwrap(), "There is no spoon");
    }

    #[test]
    fn test_signup_form() {
        let form = SignupForm {
            username: "neo".to_string(),
            email: String::new(),
            password1: "followthewhiterabbit".to_string(),
            password2: "followthewhiterabbit".to_string(),
        };
        let clean = form.validate(false).unwrap();
        assert_eq!(clean.username, "neo");
        assert_eq!(clean.email, None);

        let taken = form.validate(true).unwrap_err();
        assert_eq!(taken.get("username"), Some(&[USERNAME_TAKEN.to_string()][..]));

        let short = SignupForm {
            password1: "short".to_string(),
            password2: "short".to_string(),
            ..form.clone()
        };
        assert!(short.validate(false).unwrap_err().get("password2").is_some());

        let mismatch = SignupForm {
            password2: "different-password".to_string(),
            ..form
        };
        assert_eq!(
            mismatch.validate(false).unwrap_err().get("password2"),
            Some(&[PASSWORD_MISMATCH.to_string()][..])
        );
    }

    #[test]
    fn test_login_form_presence() {
        let errors = LoginForm::default().validate().unwrap_err();
        let fields: Vec<&str> = errors.fields().collect();
        assert_eq!(fields, vec!["password", "username"]);
    }
}
