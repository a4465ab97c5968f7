use serde::Deserialize;

use crate::Error;

/// The email and password sent to the register and log in endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct CredentialsForm {
    email: Option<String>,
    password: Option<String>,
}

impl CredentialsForm {
    /// Decode a form-encoded request body and check both fields are present.
    ///
    /// # Errors
    /// Returns an:
    /// - [Error::InvalidField] if `body` is not valid form data,
    /// - or [Error::MissingField] if the email or password is absent.
    pub fn parse(body: &[u8]) -> Result<(String, String), Error> {
        let form: Self = serde_urlencoded::from_bytes(body).map_err(|error| Error::InvalidField {
            field: "body",
            reason: error.to_string(),
        })?;

        let email = form.email.ok_or(Error::MissingField("email"))?;
        let password = form.password.ok_or(Error::MissingField("password"))?;

        Ok((email, password))
    }
}
