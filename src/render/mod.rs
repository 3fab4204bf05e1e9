//! Gallery page rendering.
//!
//! The template is loaded once at startup into an immutable
//! [`GalleryTemplate`] and handed to the server as a [`PageRenderer`].

mod page;
mod template;

pub use page::{GalleryPage, DEFAULT_PAGE_TITLE};
pub use template::{GalleryTemplate, PageRenderer, BUILTIN_TEMPLATE};
