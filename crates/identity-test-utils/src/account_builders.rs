//! Builders for registration payloads

use crate::test_ids::{
    TEST_EMAIL_ALICE, TEST_EMAIL_BOB, TEST_NAME_ALICE, TEST_NAME_BOB, TEST_PASSWORD,
    TEST_USER_TYPE,
};
use serde_json::{json, Value};

/// Builder for `POST /api/v1/user/register` bodies
///
/// # Example
/// ```rust,ignore
/// let body = TestAccountBuilder::new()
///     .with_email("Mixed@Example.COM")
///     .with_password("short")
///     .build();
/// ```
pub struct TestAccountBuilder {
    name: String,
    email: String,
    password: Option<String>,
    user_type: String,
}

impl TestAccountBuilder {
    pub fn new() -> Self {
        Self {
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            password: Some(TEST_PASSWORD.to_string()),
            user_type: TEST_USER_TYPE.to_string(),
        }
    }

    pub fn alice() -> Self {
        Self::new().with_name(TEST_NAME_ALICE).with_email(TEST_EMAIL_ALICE)
    }

    pub fn bob() -> Self {
        Self::new().with_name(TEST_NAME_BOB).with_email(TEST_EMAIL_BOB)
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_email(mut self, email: &str) -> Self {
        self.email = email.to_string();
        self
    }

    pub fn with_password(mut self, password: &str) -> Self {
        self.password = Some(password.to_string());
        self
    }

    /// Omit the password field entirely.
    pub fn without_password(mut self) -> Self {
        self.password = None;
        self
    }

    pub fn build(self) -> Value {
        let mut body = json!({
            "name": self.name,
            "email": self.email,
            "user_type": self.user_type,
        });
        if let (Some(password), Some(map)) = (self.password, body.as_object_mut()) {
            map.insert("password".to_string(), Value::String(password));
        }
        body
    }
}

impl Default for TestAccountBuilder {
    fn default() -> Self {
        Self::new()
    }
}
