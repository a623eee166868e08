use headers::ContentType;

use super::RequestError;
use super::oauth2::TokenRequestForm;

const FILE_PART: &str = "file";

/// Body of an HTTP request sent by the sink, with its content type.
#[derive(Clone, derive_more::Debug)]
pub struct RequestBody {
    content_type: ContentType,
    #[debug(ignore)]
    data: Vec<u8>,
}

impl RequestBody {
    /// Creates an `application/x-www-form-urlencoded` body from a token request form.
    pub fn form(form: &TokenRequestForm) -> Self {
        Self {
            content_type: ContentType::form_url_encoded(),
            data: form.to_body_string().into_bytes(),
        }
    }

    /// Creates a `multipart/form-data` body uploading `content` as a text file.
    ///
    /// The body has a single part named `file`, so receivers expecting a file
    /// attachment get the record value as the uploaded file's content.
    ///
    /// ```rust
    /// use httpsink_core::RequestBody;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let body = RequestBody::file_upload("message.txt", "this is the message")?;
    /// assert_eq!(body.content_type().to_string().split(';').next(), Some("multipart/form-data"));
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::InvalidFileName`] if the file name contains a double quote
    /// or a line break, which cannot be carried in a `Content-Disposition` header.
    pub fn file_upload(file_name: &str, content: &str) -> Result<Self, RequestError> {
        if file_name.contains(['"', '\r', '\n']) {
            return Err(RequestError::InvalidFileName {
                file_name: file_name.to_string(),
            });
        }

        let boundary = format!("----httpsink-{}", uuid::Uuid::new_v4().simple());
        let mime = format!("multipart/form-data; boundary={boundary}").parse::<mime::Mime>()?;

        let mut data = Vec::with_capacity(content.len() + 256);
        data.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        data.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{FILE_PART}\"; filename=\"{file_name}\"\r\n"
            )
            .as_bytes(),
        );
        data.extend_from_slice(b"Content-Type: text/plain; charset=utf-8\r\n\r\n");
        data.extend_from_slice(content.as_bytes());
        data.extend_from_slice(b"\r\n");
        data.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

        Ok(Self {
            content_type: ContentType::from(mime),
            data,
        })
    }

    /// The content type of the body.
    pub fn content_type(&self) -> &ContentType {
        &self.content_type
    }

    /// The raw body bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Splits the body into its content type and bytes.
    pub fn into_parts(self) -> (ContentType, Vec<u8>) {
        (self.content_type, self.data)
    }
}
