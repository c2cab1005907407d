//! Book loan record and partial-update types

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::request::BookRequest;

/// Book loan record as held by the store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Book {
    /// Record key, generated on creation
    pub book_id: String,
    pub title: String,
    pub borrower: String,
    /// Caller-supplied date text
    pub borrowed_date: String,
    /// Empty until the book is returned
    #[serde(default)]
    pub returned_date: String,
}

/// Attribute name of the record key
pub const BOOK_ID: &str = "book_id";

/// Record attributes a patch may touch; `book_id` is never patched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookField {
    Title,
    Borrower,
    BorrowedDate,
    ReturnedDate,
}

impl BookField {
    /// Allow-list of mutable fields, in patch order
    pub const MUTABLE: [BookField; 4] = [
        BookField::Title,
        BookField::Borrower,
        BookField::BorrowedDate,
        BookField::ReturnedDate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BookField::Title => "title",
            BookField::Borrower => "borrower",
            BookField::BorrowedDate => "borrowed_date",
            BookField::ReturnedDate => "returned_date",
        }
    }
}

impl Book {
    /// Build a record from its stored attributes. Missing attributes read back
    /// as empty text, which happens for records created by a patch.
    pub fn from_attributes(book_id: &str, mut attributes: HashMap<String, String>) -> Self {
        let mut take = |field: BookField| attributes.remove(field.as_str()).unwrap_or_default();

        Self {
            book_id: book_id.to_string(),
            title: take(BookField::Title),
            borrower: take(BookField::Borrower),
            borrowed_date: take(BookField::BorrowedDate),
            returned_date: take(BookField::ReturnedDate),
        }
    }

    /// Full attribute list, key first
    pub fn attributes(&self) -> Vec<(&'static str, &str)> {
        let mut attributes = vec![(BOOK_ID, self.book_id.as_str())];
        attributes.extend(
            BookField::MUTABLE
                .iter()
                .map(|&field| (field.as_str(), self.field(field))),
        );
        attributes
    }

    pub fn field(&self, field: BookField) -> &str {
        match field {
            BookField::Title => &self.title,
            BookField::Borrower => &self.borrower,
            BookField::BorrowedDate => &self.borrowed_date,
            BookField::ReturnedDate => &self.returned_date,
        }
    }

    fn field_mut(&mut self, field: BookField) -> &mut String {
        match field {
            BookField::Title => &mut self.title,
            BookField::Borrower => &mut self.borrower,
            BookField::BorrowedDate => &mut self.borrowed_date,
            BookField::ReturnedDate => &mut self.returned_date,
        }
    }

    /// Apply a patch in place; untouched fields keep their value
    pub fn apply(&mut self, changes: &BookChanges) {
        for (field, value) in changes.iter() {
            *self.field_mut(field) = value.to_string();
        }
    }
}

/// Structured partial update: field -> new value, in allow-list order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookChanges(IndexMap<BookField, String>);

impl BookChanges {
    /// Collect every allow-listed field present in the request, whatever its value
    pub fn from_request(request: &BookRequest) -> Self {
        BookField::MUTABLE
            .iter()
            .filter_map(|&field| request.present(field.as_str()).map(|value| (field, value)))
            .collect()
    }

    #[cfg(test)]
    pub fn set(&mut self, field: BookField, value: impl Into<String>) {
        self.0.insert(field, value.into());
    }

    #[cfg(test)]
    pub fn get(&self, field: BookField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BookField, &str)> {
        self.0.iter().map(|(field, value)| (*field, value.as_str()))
    }

    /// Attribute pairs as handed to the store
    pub fn attributes(&self) -> Vec<(&'static str, &str)> {
        self.iter().map(|(field, value)| (field.as_str(), value)).collect()
    }
}

impl FromIterator<(BookField, String)> for BookChanges {
    fn from_iter<I: IntoIterator<Item = (BookField, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
