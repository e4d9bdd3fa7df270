use std::path::Path;

use crate::builder;
use crate::config;
use crate::encoding::EncodingResolver;
use crate::source::SourceTree;
use crate::utils::error::BoxResult;

/// Handle the toc command
pub fn handle_toc_command(input: &Path, json: bool, config_file: Option<&Path>) -> BoxResult<()> {
    let mut config = config::load_config(config_file)?;
    config.source = input.to_path_buf();

    let resolver = EncodingResolver::from_labels(config.encodings.as_slice())?;
    let source = SourceTree::open(&config)?;
    let toc = builder::load_toc(&source, &resolver)?;

    if json {
        println!("{}", toc.to_tree_data()?);
        return Ok(());
    }

    let counts = toc.count_items();
    println!("Title:   {}", config.title.unwrap_or_else(|| toc.title()));
    println!("Folders: {}", counts.folders);
    println!("Files:   {}", counts.files);
    println!("Depth:   {}", toc.depth());
    Ok(())
}
