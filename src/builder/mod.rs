mod assets;
mod output;
mod site;

pub use site::{build_site, load_toc};
