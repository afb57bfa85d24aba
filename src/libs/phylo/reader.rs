use super::error::TreeError;
use super::parser::ParserConfig;
use super::tree::Tree;
use anyhow::Context;
use std::io::Read;

/// Split text into tree descriptions, each ending with its `;`.
///
/// Semicolons inside single-quoted labels do not end a description.
/// Trailing text without a `;` is kept so the parser can report it.
///
/// ```
/// use simtree::libs::phylo::reader::read_descriptions;
///
/// let descs = read_descriptions("(A,B);\n('x;y',C);\n");
/// assert_eq!(descs, vec!["(A,B);", "('x;y',C);"]);
/// ```
pub fn read_descriptions(text: &str) -> Vec<String> {
    let mut descs = vec![];
    let mut cur = String::new();
    let mut in_quote = false;

    for c in text.chars() {
        if cur.is_empty() && c.is_whitespace() {
            continue;
        }
        cur.push(c);
        match c {
            // '' inside a quoted label toggles twice
            '\'' => in_quote = !in_quote,
            ';' if !in_quote => {
                descs.push(std::mem::take(&mut cur));
            }
            _ => {}
        }
    }

    if !cur.trim().is_empty() {
        descs.push(cur.trim_end().to_string());
    }

    descs
}

/// Parse every description in `text`.
pub fn from_str_with(text: &str, config: &ParserConfig) -> Result<Vec<Tree>, TreeError> {
    let mut trees = vec![];
    for desc in read_descriptions(text) {
        let tree = Tree::from_newick_with(&desc, config)?;
        trees.push(tree);
    }
    Ok(trees)
}

/// Read trees from a file.
///
/// # Arguments
/// * `infile` - Path to the input file (or "stdin" for stdin).
pub fn from_file(infile: &str) -> anyhow::Result<Vec<Tree>> {
    from_file_with(infile, &ParserConfig::default())
}

pub fn from_file_with(infile: &str, config: &ParserConfig) -> anyhow::Result<Vec<Tree>> {
    let mut reader = intspan::reader(infile);
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| anyhow::anyhow!("Read error: {}", e))?;

    let mut trees = vec![];
    for (i, desc) in read_descriptions(&text).iter().enumerate() {
        let tree = Tree::from_newick_with(desc, config)
            .map_err(TreeError::from)
            .with_context(|| format!("Tree {} of {}", i + 1, infile))?;
        trees.push(tree);
    }
    log::debug!("Read {} trees from {}", trees.len(), infile);

    Ok(trees)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_descriptions() {
        let text = "  (A,B);\n\n((C,D),E);  \n";
        assert_eq!(read_descriptions(text), vec!["(A,B);", "((C,D),E);"]);

        // escaped quotes keep the quoting state
        let text = "('it''s;here',B);(C,D);";
        assert_eq!(
            read_descriptions(text),
            vec!["('it''s;here',B);", "(C,D);"]
        );

        assert_eq!(read_descriptions("(A,B)\n"), vec!["(A,B)"]);
        assert!(read_descriptions(" \n\t").is_empty());
    }

    #[test]
    fn test_from_str() {
        let trees = from_str_with("(A,B);(C,(D,E));", &ParserConfig::default()).unwrap();
        assert_eq!(trees.len(), 2);
        assert_eq!(trees[1].num_leaves(), 3);

        let err = from_str_with("(A,B);(C,D", &ParserConfig::default()).unwrap_err();
        assert!(matches!(err, TreeError::Parse(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"(A:1,B:2);\n(C,D);\n").unwrap();

        let trees = from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(trees.len(), 2);
        assert_eq!(trees[0].to_newick(), "(A:1,B:2);");

        let mut bad = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut bad, b"(A,B);\n(A B);\n").unwrap();
        let err = from_file(bad.path().to_str().unwrap()).unwrap_err();
        assert!(format!("{:#}", err).contains("Syntax error"));
    }
}
