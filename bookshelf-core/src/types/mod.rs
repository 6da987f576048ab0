//! Entity model: books, genres and quotes

mod book;
mod dates;
mod genre;
mod ids;
mod quote;
mod samples;
mod status;

pub use book::{validate_rating, Book};
pub use dates::{is_set, not_set, ReadingDates};
pub use genre::{genre_color, Color, Genre};
pub use ids::{BookId, GenreId, QuoteId};
pub use quote::{sort_for_display, Quote};
pub use samples::{sample_books, sample_genres};
pub use status::{status_icon, Status};
