use std::fmt;

/// Identifies a protocol thread.
///
/// Both ends of a session use the same id for matching threads, which is how ideal
/// functionalities pair up the two parties' calls.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ThreadId(u32);

impl ThreadId {
    /// Creates a thread id.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the id as an integer.
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "thread-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_id_display() {
        assert_eq!(ThreadId::new(3).to_string(), "thread-3");
        assert_eq!(ThreadId::default().get(), 0);
    }
}
