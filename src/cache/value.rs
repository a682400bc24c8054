//! Value Capability Module
//!
//! Defines the size-reporting contract every cached value must satisfy.

use std::rc::Rc;
use std::sync::Arc;

// == Value Trait ==
/// A value that can be stored in a [`Cache`](crate::cache::Cache).
///
/// The cache charges `key.len() + value.byte_len()` bytes against its budget.
/// The reading is taken once, when the value is added, and is not re-queried
/// afterwards, so implementations should report a size that stays stable for
/// the lifetime of the instance.
pub trait Value {
    /// Returns the footprint of this value in bytes.
    fn byte_len(&self) -> usize;
}

impl Value for str {
    fn byte_len(&self) -> usize {
        self.len()
    }
}

impl Value for [u8] {
    fn byte_len(&self) -> usize {
        self.len()
    }
}

impl Value for String {
    fn byte_len(&self) -> usize {
        self.len()
    }
}

impl Value for Vec<u8> {
    fn byte_len(&self) -> usize {
        self.len()
    }
}

impl<T: Value + ?Sized> Value for &T {
    fn byte_len(&self) -> usize {
        (**self).byte_len()
    }
}

impl<T: Value + ?Sized> Value for Box<T> {
    fn byte_len(&self) -> usize {
        (**self).byte_len()
    }
}

impl<T: Value + ?Sized> Value for Arc<T> {
    fn byte_len(&self) -> usize {
        (**self).byte_len()
    }
}

impl<T: Value + ?Sized> Value for Rc<T> {
    fn byte_len(&self) -> usize {
        (**self).byte_len()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_and_bytes_report_length() {
        assert_eq!("hello".to_string().byte_len(), 5);
        assert_eq!(vec![0u8; 12].byte_len(), 12);
        assert_eq!(String::new().byte_len(), 0);
    }

    #[test]
    fn test_multibyte_string_counts_bytes() {
        // 'é' is two bytes in UTF-8
        assert_eq!("é".to_string().byte_len(), 2);
    }

    #[test]
    fn test_smart_pointers_forward() {
        let boxed: Box<str> = "abcd".into();
        let shared: Arc<[u8]> = Arc::from(vec![1u8, 2, 3]);
        let local = Rc::new("xy".to_string());
        let borrowed: &str = "z";

        assert_eq!(boxed.byte_len(), 4);
        assert_eq!(shared.byte_len(), 3);
        assert_eq!(local.byte_len(), 2);
        assert_eq!(borrowed.byte_len(), 1);
    }
}
