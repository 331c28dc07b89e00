//! Fixed-width row codec.
//!
//! On-disk layout of one row (`ROW_SIZE` bytes):
//!
//! ```text
//! +---------+----------------------+--------------------------+
//! | id (LE) | username, NUL padded | email, NUL padded        |
//! | 4 bytes | 32 bytes             | 255 bytes                |
//! +---------+----------------------+--------------------------+
//! ```

use std::fmt;

use crate::error::RowError;
use crate::{EMAIL_OFFSET, EMAIL_SIZE, ID_OFFSET, ID_SIZE, ROW_SIZE, USERNAME_OFFSET, USERNAME_SIZE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    id: u32,
    username: String,
    email: String,
}

impl Row {
    /// Builds a row, rejecting values that would not survive a round trip
    /// through their column: too long, or containing a NUL byte (NUL marks
    /// the end of a string on decode).
    pub fn new(
        id: u32,
        username: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self, RowError> {
        let username = username.into();
        let email = email.into();
        validate_field("username", &username, USERNAME_SIZE)?;
        validate_field("email", &email, EMAIL_SIZE)?;
        Ok(Self {
            id,
            username,
            email,
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Writes this row into `destination[..ROW_SIZE]`.
    ///
    /// Strings are clamped to their field width even though `Row::new`
    /// already rejects longer ones.
    ///
    /// # Panics
    ///
    /// Panics if `destination` is shorter than `ROW_SIZE`.
    pub fn serialize(&self, destination: &mut [u8]) {
        let destination = &mut destination[..ROW_SIZE];
        destination[ID_OFFSET..ID_OFFSET + ID_SIZE].copy_from_slice(&self.id.to_le_bytes());
        write_padded(
            &mut destination[USERNAME_OFFSET..USERNAME_OFFSET + USERNAME_SIZE],
            self.username.as_bytes(),
        );
        write_padded(
            &mut destination[EMAIL_OFFSET..EMAIL_OFFSET + EMAIL_SIZE],
            self.email.as_bytes(),
        );
    }

    /// Reads a row back from `source[..ROW_SIZE]`.
    ///
    /// # Panics
    ///
    /// Panics if `source` is shorter than `ROW_SIZE`.
    pub fn deserialize(source: &[u8]) -> Self {
        let source = &source[..ROW_SIZE];
        let mut id_bytes = [0u8; ID_SIZE];
        id_bytes.copy_from_slice(&source[ID_OFFSET..ID_OFFSET + ID_SIZE]);

        Self {
            id: u32::from_le_bytes(id_bytes),
            username: read_padded(&source[USERNAME_OFFSET..USERNAME_OFFSET + USERNAME_SIZE]),
            email: read_padded(&source[EMAIL_OFFSET..EMAIL_OFFSET + EMAIL_SIZE]),
        }
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.id, self.username, self.email)
    }
}

fn validate_field(field: &'static str, value: &str, max: usize) -> Result<(), RowError> {
    if value.len() > max {
        return Err(RowError::StringTooLong { field, max });
    }
    if value.as_bytes().contains(&0) {
        return Err(RowError::NulByte { field });
    }
    Ok(())
}

fn write_padded(field: &mut [u8], value: &[u8]) {
    let len = value.len().min(field.len());
    field[..len].copy_from_slice(&value[..len]);
    field[len..].fill(0);
}

// A field with no NUL is taken whole: the value filled its column exactly.
fn read_padded(field: &[u8]) -> String {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    String::from_utf8_lossy(&field[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_column_widths() {
        let row = Row::new(0x0403_0201, "ab", "c@d").unwrap();
        let mut buf = [0xffu8; ROW_SIZE];
        row.serialize(&mut buf);

        assert_eq!(&buf[0..4], &[1, 2, 3, 4]);
        assert_eq!(&buf[4..6], b"ab");
        assert!(buf[6..36].iter().all(|&b| b == 0));
        assert_eq!(&buf[36..39], b"c@d");
        assert!(buf[39..ROW_SIZE].iter().all(|&b| b == 0));
    }

    #[test]
    fn round_trips_strings_at_max_length() {
        let row = Row::new(
            u32::MAX,
            "u".repeat(USERNAME_SIZE),
            "e".repeat(EMAIL_SIZE),
        )
        .unwrap();
        let mut buf = [0u8; ROW_SIZE];
        row.serialize(&mut buf);
        assert_eq!(Row::deserialize(&buf), row);
    }

    #[test]
    fn round_trips_empty_strings() {
        let row = Row::new(7, "", "").unwrap();
        let mut buf = [0x41u8; ROW_SIZE];
        row.serialize(&mut buf);
        assert_eq!(Row::deserialize(&buf), row);
    }

    #[test]
    fn overwriting_a_longer_row_leaves_no_residue() {
        let mut buf = [0u8; ROW_SIZE];
        Row::new(1, "longusername", "long@example.com")
            .unwrap()
            .serialize(&mut buf);
        Row::new(2, "x", "y").unwrap().serialize(&mut buf);

        let row = Row::deserialize(&buf);
        assert_eq!(row.username(), "x");
        assert_eq!(row.email(), "y");
    }

    #[test]
    fn rejects_too_long_strings() {
        assert_eq!(
            Row::new(1, "a".repeat(USERNAME_SIZE + 1), "e"),
            Err(RowError::StringTooLong {
                field: "username",
                max: USERNAME_SIZE
            })
        );
        assert_eq!(
            Row::new(1, "u", "a".repeat(EMAIL_SIZE + 1)),
            Err(RowError::StringTooLong {
                field: "email",
                max: EMAIL_SIZE
            })
        );
    }

    #[test]
    fn rejects_embedded_nul() {
        assert_eq!(
            Row::new(1, "a\0b", "e"),
            Err(RowError::NulByte { field: "username" })
        );
    }

    #[test]
    fn clamps_oversized_field_on_encode() {
        let row = Row {
            id: 1,
            username: "a".repeat(USERNAME_SIZE + 10),
            email: "b".to_string(),
        };
        let mut buf = [0u8; ROW_SIZE];
        row.serialize(&mut buf);

        let decoded = Row::deserialize(&buf);
        assert_eq!(decoded.username(), "a".repeat(USERNAME_SIZE));
        assert_eq!(decoded.email(), "b");
    }

    #[test]
    #[should_panic]
    fn serialize_into_short_buffer_panics() {
        let mut buf = [0u8; ROW_SIZE - 1];
        Row::new(1, "a", "b").unwrap().serialize(&mut buf);
    }

    #[test]
    #[should_panic]
    fn deserialize_from_short_buffer_panics() {
        let _ = Row::deserialize(&[0u8; ROW_SIZE - 1]);
    }

    #[test]
    fn displays_as_tuple() {
        let row = Row::new(1, "user1", "person1@example.com").unwrap();
        assert_eq!(row.to_string(), "(1, user1, person1@example.com)");
    }
}
