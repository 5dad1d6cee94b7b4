mod pages;
mod revalidator;

pub use pages::PageCache;
pub use revalidator::Revalidator;
