//! Shared constants for end-to-end tests
//!
//! When test data changes (password, seeded ids, etc.), update only this file.

// ============================================================================
// Credentials
// ============================================================================

/// Password accepted by the fake store
pub const TEST_PASSWORD: &str = "open-sesame";

/// A password the fake store rejects
pub const WRONG_PASSWORD: &str = "not-the-password";

// ============================================================================
// Seeded Books
// ============================================================================

pub const BOOK_1_ID: &str = "book-1";
pub const BOOK_1_TITLE: &str = "Dune";
pub const BOOK_1_AUTHOR: &str = "Frank Herbert";
pub const BOOK_1_IMAGE: &str = "https://img.example.com/dune.jpg";

pub const BOOK_2_ID: &str = "book-2";
pub const BOOK_2_TITLE: &str = "Neuromancer";
pub const BOOK_2_AUTHOR: &str = "William Gibson";
pub const BOOK_2_IMAGE: &str = "https://img.example.com/neuromancer.jpg";

pub const BOOK_3_ID: &str = "book-3";
pub const BOOK_3_TITLE: &str = "Hyperion";
pub const BOOK_3_AUTHOR: &str = "Dan Simmons";
pub const BOOK_3_IMAGE: &str = "https://img.example.com/hyperion.jpg";

/// Number of books present when a server is spawned
pub const SEEDED_BOOK_COUNT: usize = 3;

/// Id with characters that must be percent-encoded in a path segment
pub const AWKWARD_ID: &str = "shelf/a b";

/// Path prefix under which the fake store serves malformed responses
pub const MALFORMED_PREFIX: &str = "/malformed";

// ============================================================================
// Timeouts
// ============================================================================

/// Server startup timeout in milliseconds
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Poll interval when waiting for server to be ready
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 10;

/// Request timeout used by clients under test
pub const CLIENT_TIMEOUT_SEC: u64 = 5;
