use std::{borrow::Borrow, fmt};

use crate::table::error::TableError;

/// Size of a name buffer, counting the trailing terminator.
pub const MAX_NAME_LENGTH: usize = 250;

/// Longest key accepted, in bytes.
pub const MAX_KEY_LEN: usize = MAX_NAME_LENGTH - 1;

/// An owned name that is known to fit in a table slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(String);

impl Key {
    pub fn new(name: &str) -> Result<Key, TableError> {
        check_len(name)?;
        Ok(Key(String::from(name)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl TryFrom<&str> for Key {
    type Error = TableError;

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        Key::new(name)
    }
}

impl TryFrom<String> for Key {
    type Error = TableError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        check_len(&name)?;
        Ok(Key(name))
    }
}

fn check_len(name: &str) -> Result<(), TableError> {
    if name.len() > MAX_KEY_LEN {
        return Err(TableError::KeyTooLong {
            len: name.len(),
            max: MAX_KEY_LEN,
        });
    }
    Ok(())
}

impl Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Key {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use crate::table::*;

    #[test]
    fn accepts_names_up_to_the_bound() {
        let name = "a".repeat(MAX_KEY_LEN);
        let key = Key::new(&name).expect("name at the bound should fit");
        assert_eq!(key.as_str().len(), MAX_KEY_LEN);
        assert_eq!(Key::new("").map(|k| k.to_string()), Ok(String::new()));
    }

    #[test]
    fn rejects_names_past_the_bound() {
        let name = "a".repeat(MAX_NAME_LENGTH);
        assert_eq!(
            Key::new(&name),
            Err(TableError::KeyTooLong {
                len: MAX_NAME_LENGTH,
                max: MAX_KEY_LEN
            })
        );
        assert!(Key::try_from(name).is_err());
    }

    #[test]
    fn owned_and_borrowed_constructors_agree() {
        for len in [0, MAX_KEY_LEN, MAX_KEY_LEN + 1] {
            let name = "k".repeat(len);
            assert_eq!(Key::try_from(name.clone()), Key::new(&name));
            assert_eq!(Key::try_from(name.as_str()), Key::new(&name));
        }
    }

    #[test]
    fn bound_counts_bytes_not_chars() {
        // 125 two-byte chars is 250 bytes
        let name = "é".repeat(125);
        assert_eq!(name.chars().count(), 125);
        assert!(matches!(
            Key::new(&name),
            Err(TableError::KeyTooLong { len: 250, .. })
        ));
    }
}
