//! Seed data for the fake book store

use super::constants::*;
use booklist::Book;

fn book(id: &str, title: &str, author: &str, image_url: &str) -> Book {
    Book {
        id: id.to_string(),
        title: title.to_string(),
        author: author.to_string(),
        image_url: image_url.to_string(),
    }
}

/// The books every spawned server starts with, in store order.
pub fn seed_books() -> Vec<Book> {
    vec![
        book(BOOK_1_ID, BOOK_1_TITLE, BOOK_1_AUTHOR, BOOK_1_IMAGE),
        book(BOOK_2_ID, BOOK_2_TITLE, BOOK_2_AUTHOR, BOOK_2_IMAGE),
        book(BOOK_3_ID, BOOK_3_TITLE, BOOK_3_AUTHOR, BOOK_3_IMAGE),
    ]
}
