use crate::utils::path::directory_depth;

/// Relative prefix from a document back to the content root.
///
/// `c1/intro.htm` gives `../`, a document at the root gives `./`.
pub fn asset_prefix(rel_path: &str) -> String {
    let rel_path = rel_path.replace('\\', "/");
    match directory_depth(&rel_path) {
        0 => "./".to_string(),
        depth => "../".repeat(depth),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_prefix() {
        assert_eq!(asset_prefix("index.htm"), "./");
        assert_eq!(asset_prefix("c1/intro.htm"), "../");
        assert_eq!(asset_prefix("a\\b\\c.htm"), "../../");
        assert_eq!(asset_prefix("a/b/c/d.htm"), "../../../");
    }
}
