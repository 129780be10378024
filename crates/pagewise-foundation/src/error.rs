use std::error::Error;
use std::fmt;
use std::rc::Rc;

/// Misuse of the paging API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PagingError {
    /// The controller was disposed by its owning view.
    Disposed,
    /// The runtime backing an async fetcher is gone.
    RuntimeDropped,
}

impl fmt::Display for PagingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PagingError::Disposed => write!(f, "paging controller used after dispose"),
            PagingError::RuntimeDropped => write!(f, "runtime dropped before fetcher was bound"),
        }
    }
}

impl Error for PagingError {}

/// Opaque failure reported by whoever fetches pages.
///
/// Paging only cares whether an error is present. The payload is kept for
/// error indicators, which may display or downcast it.
#[derive(Clone)]
pub struct PageError {
    inner: Rc<dyn Error + 'static>,
}

impl PageError {
    pub fn new(error: impl Error + 'static) -> Self {
        Self {
            inner: Rc::new(error),
        }
    }

    pub fn msg(message: impl Into<String>) -> Self {
        Self::new(MessageError(message.into()))
    }

    pub fn get_ref(&self) -> &(dyn Error + 'static) {
        &*self.inner
    }

    pub fn downcast_ref<E: Error + 'static>(&self) -> Option<&E> {
        self.inner.downcast_ref::<E>()
    }

    /// Identity comparison: two handles are equal when they share a payload.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for PageError {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.inner, f)
    }
}

impl fmt::Debug for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PageError").field(&self.inner).finish()
    }
}

impl From<&str> for PageError {
    fn from(message: &str) -> Self {
        Self::msg(message)
    }
}

impl From<String> for PageError {
    fn from(message: String) -> Self {
        Self::msg(message)
    }
}

#[derive(Debug)]
struct MessageError(String);

impl fmt::Display for MessageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Error for MessageError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Timeout;

    impl fmt::Display for Timeout {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "timed out")
        }
    }

    impl Error for Timeout {}

    #[test]
    fn page_error_keeps_payload() {
        let error = PageError::new(Timeout);
        assert_eq!(error.to_string(), "timed out");
        assert!(error.downcast_ref::<Timeout>().is_some());
    }

    #[test]
    fn page_error_equality_is_identity() {
        let error = PageError::msg("offline");
        let same = error.clone();
        let other = PageError::msg("offline");
        assert_eq!(error, same);
        assert_ne!(error, other);
    }
}
