//! Search-engine metadata: `<head>` tags and schema.org JSON-LD.

mod head;
pub mod schema;

pub use head::{OgType, PageHead};
pub use schema::Crumb;
