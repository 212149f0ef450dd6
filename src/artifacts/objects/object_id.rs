//! Git object identifier (SHA-1 hash)
//!
//! Object IDs are 40-character lowercase hexadecimal strings representing
//! SHA-1 digests. They uniquely identify all objects (blobs, trees, commits,
//! tags).
//!
//! ## Storage
//!
//! Objects live at `.git/objects/<first-2-chars>/<remaining-38-chars>`

use crate::artifacts::objects::OBJECT_ID_LENGTH;
use std::io;
use std::path::PathBuf;

/// A validated 40-character lowercase hex SHA-1.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and validate an object ID from a string.
    ///
    /// Uppercase hex digits are accepted and folded to lowercase so the
    /// canonical external form is always lower-hex.
    pub fn try_parse(id: String) -> anyhow::Result<Self> {
        if id.len() != OBJECT_ID_LENGTH {
            return Err(anyhow::anyhow!("Invalid object ID length: {}", id.len()));
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(anyhow::anyhow!("Invalid object ID characters: {}", id));
        }
        Ok(Self(id.to_ascii_lowercase()))
    }

    /// Write the object ID in binary form (20 raw bytes).
    ///
    /// Used when serializing tree entries.
    pub fn write_raw_to<W: io::Write>(&self, writer: &mut W) -> anyhow::Result<()> {
        for i in (0..OBJECT_ID_LENGTH).step_by(2) {
            let byte = u8::from_str_radix(&self.0[i..i + 2], 16)
                .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "Invalid hex digit"))?;
            writer.write_all(&[byte])?;
        }

        Ok(())
    }

    /// Read an object ID from its binary form (20 raw bytes).
    ///
    /// Used when deserializing tree entries.
    pub fn from_raw(raw: &[u8]) -> anyhow::Result<Self> {
        if raw.len() != OBJECT_ID_LENGTH / 2 {
            return Err(anyhow::anyhow!(
                "Invalid raw object ID length: {}",
                raw.len()
            ));
        }

        let mut hex40 = String::with_capacity(OBJECT_ID_LENGTH);
        for byte in raw {
            hex40.push_str(&format!("{:02x}", byte));
        }

        Self::try_parse(hex40)
    }

    /// Convert to the on-disk object path, `XX/YYYY...`.
    pub fn to_path(&self) -> PathBuf {
        let (dir, file) = self.0.split_at(2);
        PathBuf::from(dir).join(file)
    }

    /// First 7 characters, the standard abbreviation for display.
    pub fn to_short_oid(&self) -> String {
        self.0.split_at(7).0.to_string()
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
