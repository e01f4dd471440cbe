use crate::tree::error::{TreeError, TreeResult};
use crate::tree::{NodeId, Tree};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PATH_SEPARATOR: Regex = Regex::new(r"\\{1,2}|/").unwrap();
}

fn tokenize(path: &str) -> Vec<&str> {
    let mut tokens: Vec<&str> = PATH_SEPARATOR.split(path.trim()).collect();
    if tokens.last().is_some_and(|t| t.is_empty()) {
        tokens.pop();
    }
    tokens
}

impl Tree {
    /// Resolves a `/` or `\` separated path of safe names, starting at the root.
    ///
    /// The resolved node's children are realized when it is a directory.
    pub fn parse_path(&mut self, path: &str) -> TreeResult<NodeId> {
        let tokens = tokenize(path);

        let mut current = self.root();
        for (i, token) in tokens.iter().enumerate() {
            let wanted = self.sanitize(token);
            let found = if self.is_traversable(current) {
                self.children(current)?
                    .into_iter()
                    .find(|child| self.sanitize(self.safe_name(*child)) == wanted)
            } else {
                None
            };

            current = match found {
                Some(child) => child,
                None => {
                    let resolved = if current == self.root() {
                        "image".to_string()
                    } else {
                        format!("{}/", tokens[..i].join("/"))
                    };
                    return Err(TreeError::InvalidPath {
                        token: token.to_string(),
                        resolved,
                    });
                }
            };
        }

        if self.is_traversable(current) {
            self.children(current)?;
        }
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::tests::two_level_tree;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn tokens_split_on_both_separators() {
        assert_eq!(tokenize("A:/PIANO"), vec!["A:", "PIANO"]);
        assert_eq!(tokenize("A:\\\\PIANO\\X/"), vec!["A:", "PIANO", "X"]);
        assert_eq!(tokenize("  "), Vec::<&str>::new());
    }

    #[test]
    fn empty_path_is_the_root() {
        let mut tree = two_level_tree(Rc::new(Cell::new(0)));
        assert_eq!(tree.parse_path("").unwrap(), tree.root());
    }

    #[test]
    fn resolves_nested_nodes() {
        let mut tree = two_level_tree(Rc::new(Cell::new(0)));
        let node = tree.parse_path("A:/PIANO (2)").unwrap();
        assert_eq!(tree.name(node), "PIANO");
        assert_eq!(tree.path(node), vec!["A:", "PIANO (2)"]);
    }

    #[test]
    fn missing_entities_report_the_resolved_prefix() {
        let mut tree = two_level_tree(Rc::new(Cell::new(0)));
        let err = tree.parse_path("C:").unwrap_err();
        assert_eq!(err.to_string(), "The entity \"C:\" was not found in \"image\".");

        let err = tree.parse_path("A:/ORGAN").unwrap_err();
        assert_eq!(err.to_string(), "The entity \"ORGAN\" was not found in \"A:/\".");

        let err = tree.parse_path("A:/PIANO/X").unwrap_err();
        assert_eq!(err.to_string(), "The entity \"X\" was not found in \"A:/PIANO/\".");
    }
}
