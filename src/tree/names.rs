use crate::tree::error::{TreeError, TreeResult};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::collections::HashMap;

lazy_static! {
    static ref REMOVE_CHARS: Regex = Regex::new(r#"['"`]+"#).unwrap();
    static ref UNSAFE_RUN: Regex = Regex::new(r"[^\w\-=:.@#&+ ]+|:+").unwrap();
    static ref INVALID_FILE_CHARS: Regex = Regex::new(r"[^\w\-.# ]+").unwrap();
    static ref SAFE_ENDING: Regex = Regex::new(r"^(.+?)\s*\.?\s*$").unwrap();
    static ref STARTS_WITH_WORD: Regex = Regex::new(r"^\w").unwrap();
    /// `<name><separator><L|R>`, used for stereo pairing and collision numbering.
    pub static ref STEREO_FILENAME: Regex = Regex::new(r"^(.*?)([\s-]+)(L|R)\s*$").unwrap();
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Display name safe to print and to type back as a path token.
pub fn make_safe_name(name: &str) -> String {
    let removed = REMOVE_CHARS.replace_all(name, "");
    let replaced = UNSAFE_RUN.replace_all(&removed, |caps: &Captures| {
        let found = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
        let start = caps.get(0).map(|m| m.start()).unwrap_or_default();
        if !found.starts_with(':') {
            return " ".to_string();
        }
        // Only the first colon directly after a word character survives.
        let preceded_by_word = removed[..start].chars().next_back().is_some_and(is_word_char);
        match (preceded_by_word, found.len()) {
            (true, 1) => ":".to_string(),
            (true, _) => ": ".to_string(),
            (false, _) => " ".to_string(),
        }
    });
    replaced.trim().to_string()
}

/// Name usable as a file or directory name on every common file system.
pub fn make_export_name(name: &str, is_file: bool) -> String {
    let mut export_name = INVALID_FILE_CHARS.replace_all(name, " ").trim().to_string();
    if let Some(caps) = SAFE_ENDING.captures(&export_name) {
        export_name = caps[1].to_string();
    }
    if export_name.is_empty() {
        export_name = "0".to_string();
    }
    if !STARTS_WITH_WORD.is_match(&export_name) {
        export_name = format!("0{}", export_name);
    }
    if !is_file && (export_name.ends_with('.') || export_name.ends_with('-')) {
        export_name.push('0');
    }
    export_name
}

/// Inserts a collision counter, keeping a trailing stereo marker last.
fn add_count_to_name(name: &str, count: usize) -> String {
    let count = format!("({})", count);
    match STEREO_FILENAME.captures(name) {
        Some(caps) => format!("{} {} {}", &caps[1], count, &caps[3]),
        None => format!("{} {}", name, count),
    }
}

/// Resolves collisions among candidate names, keeping the input order.
///
/// The first element with a candidate keeps it; later ones are numbered from 2,
/// skipping numbers whose result is itself a candidate.
pub fn resolve_collisions(candidates: &[String]) -> TreeResult<Vec<String>> {
    let mut groups: Vec<(&str, Vec<usize>)> = Vec::new();
    let mut group_of: HashMap<&str, usize> = HashMap::new();
    for (index, candidate) in candidates.iter().enumerate() {
        match group_of.get(candidate.as_str()) {
            Some(&group) => groups[group].1.push(index),
            None => {
                group_of.insert(candidate.as_str(), groups.len());
                groups.push((candidate.as_str(), vec![index]));
            }
        }
    }

    let mut result = vec![String::new(); candidates.len()];
    for (name, members) in &groups {
        let mut count = 0;
        for &index in members {
            count += 1;
            if count == 1 {
                result[index] = name.to_string();
                continue;
            }

            let mut next_name = add_count_to_name(name, count);
            let mut attempts = 0;
            while group_of.contains_key(next_name.as_str()) {
                count += 1;
                attempts += 1;
                next_name = add_count_to_name(name, count);
                if attempts > group_of.len() {
                    return Err(TreeError::CouldNotDetermineName(candidates[index].clone()));
                }
            }
            result[index] = next_name;
        }
    }

    Ok(result)
}

/// Safe names for a freshly realized child list.
pub fn make_safe_names(names: &[&str]) -> TreeResult<Vec<String>> {
    let candidates: Vec<String> = names.iter().map(|n| make_safe_name(n)).collect();
    resolve_collisions(&candidates)
}

/// Export names for a freshly realized child list, `(raw name, is_file)` per child.
pub fn make_export_names(names: &[(&str, bool)]) -> TreeResult<Vec<String>> {
    let candidates: Vec<String> = names
        .iter()
        .map(|(name, is_file)| make_export_name(name, *is_file))
        .collect();
    resolve_collisions(&candidates)
}
