// Place-name canonicalization and free-text cleaning. Pure, no I/O.

pub mod places;
pub mod text;

pub use places::{
    lookup_key, normalize_place, normalize_place_value, CanonicalPlaceMap, BUILTIN_PLACES,
};
pub use text::{clean_text, clean_text_value};
