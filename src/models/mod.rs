mod category;
mod product;
mod state;

pub use category::{Category, CategoryId, CategoryView};
pub use product::{Product, ProductId, TaggedEntity};
pub use state::AppState;
