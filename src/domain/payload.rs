//! Submission payload domain model
//!
//! A [`SubmissionPayload`] is built once per submit attempt from a validated
//! form and its encoded attachments. It never changes afterwards; transports
//! only read it.

use super::ids::TrackingCode;
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};

/// Truncates a string to at most `max_chars` characters
///
/// Counts characters, not bytes, so multi-byte names are never split.
pub fn truncate_chars(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((idx, _)) => value[..idx].to_string(),
        None => value.to_string(),
    }
}

/// An attached file in its transportable form
///
/// `data` is the base64 text of the original bytes and `size` is the length
/// of those original bytes.
///
/// # Examples
///
/// ```
/// use courier::domain::payload::EncodedFile;
///
/// let file = EncodedFile::from_bytes("receipt.pdf", "application/pdf", b"%PDF-1.7", 100);
/// assert_eq!(file.size, 8);
/// assert_eq!(file.decode().unwrap(), b"%PDF-1.7");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedFile {
    /// File name, truncated for transport
    pub name: String,

    /// Media type, e.g. `image/jpeg`
    pub mime_type: String,

    /// Base64 encoded content
    pub data: String,

    /// Size of the original content in bytes
    pub size: u64,
}

impl EncodedFile {
    /// Encodes raw bytes, truncating the name to `name_limit` characters
    pub fn from_bytes(
        name: &str,
        mime_type: impl Into<String>,
        bytes: &[u8],
        name_limit: usize,
    ) -> Self {
        Self {
            name: truncate_chars(name, name_limit),
            mime_type: mime_type.into(),
            data: general_purpose::STANDARD.encode(bytes),
            size: bytes.len() as u64,
        }
    }

    /// Decodes the content back into the original bytes
    pub fn decode(&self) -> Result<Vec<u8>, String> {
        general_purpose::STANDARD
            .decode(self.data.as_bytes())
            .map_err(|e| format!("Invalid base64 content in '{}': {e}", self.name))
    }
}

/// A validated declaration ready for delivery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    /// Parcel tracking code
    pub tracking_number: TrackingCode,

    /// Contact phone, digits only
    pub phone: String,

    /// Number of items
    pub quantity: u32,

    /// Declared price
    pub price: f64,

    /// Free-text item description
    pub description: String,

    /// Where the parcel will be collected
    pub collection_point: String,

    /// Item category
    #[serde(rename = "itemCategory")]
    pub category: String,

    /// Encoded attachments, in form order
    pub files: Vec<EncodedFile>,
}

impl SubmissionPayload {
    /// Creates a new builder for constructing a SubmissionPayload
    pub fn builder() -> SubmissionPayloadBuilder {
        SubmissionPayloadBuilder::default()
    }

    /// Combined size of the original attachments in bytes
    pub fn total_file_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}

/// Builder for constructing SubmissionPayload instances
///
/// # Examples
///
/// ```
/// use courier::domain::payload::SubmissionPayload;
/// use courier::domain::ids::TrackingCode;
///
/// let payload = SubmissionPayload::builder()
///     .tracking_number(TrackingCode::parse("ABC-123").unwrap())
///     .phone("0123456789")
///     .quantity(2)
///     .price(19.99)
///     .category("Clothing")
///     .build()
///     .unwrap();
/// assert!(payload.files.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct SubmissionPayloadBuilder {
    tracking_number: Option<TrackingCode>,
    phone: Option<String>,
    quantity: Option<u32>,
    price: Option<f64>,
    description: String,
    collection_point: String,
    category: Option<String>,
    files: Vec<EncodedFile>,
}

impl SubmissionPayloadBuilder {
    /// Sets the tracking code
    pub fn tracking_number(mut self, tracking_number: TrackingCode) -> Self {
        self.tracking_number = Some(tracking_number);
        self
    }

    /// Sets the phone number
    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Sets the quantity
    pub fn quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Sets the price
    pub fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// Sets the description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the collection point
    pub fn collection_point(mut self, collection_point: impl Into<String>) -> Self {
        self.collection_point = collection_point.into();
        self
    }

    /// Sets the item category
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the encoded attachments
    pub fn files(mut self, files: Vec<EncodedFile>) -> Self {
        self.files = files;
        self
    }

    /// Builds the SubmissionPayload
    ///
    /// # Errors
    ///
    /// Returns an error if any required field is missing
    pub fn build(self) -> Result<SubmissionPayload, String> {
        Ok(SubmissionPayload {
            tracking_number: self.tracking_number.ok_or("tracking_number is required")?,
            phone: self.phone.ok_or("phone is required")?,
            quantity: self.quantity.ok_or("quantity is required")?,
            price: self.price.ok_or("price is required")?,
            description: self.description,
            collection_point: self.collection_point,
            category: self.category.ok_or("category is required")?,
            files: self.files,
        })
    }
}
