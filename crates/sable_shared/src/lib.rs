pub mod char_stream;
pub mod errors;
pub mod location;
