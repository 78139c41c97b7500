mod comment;
mod map;
mod photo;
mod place;
mod placemark;
mod rating;

pub use comment::Comment;
pub use map::{Map, DEFAULT_CENTER};
pub use photo::Photo;
pub use place::Place;
pub use placemark::Placemark;
pub use rating::Rating;
