//! Script builders for the administrative shell.
//!
//! Every builder interpolates its inputs as-is. Quotes inside a name or a
//! spec end up in the script unchanged; callers own that trust boundary.

use crate::index::IndexDefinition;

/// `db.<collection>.createSearchIndex('<name>', <spec>)` for text indexes,
/// `db.<collection>.createSearchIndex('<name>', 'vectorSearch', <spec>)` for vector.
pub fn create_index_script(def: &IndexDefinition) -> String {
    match def.kind.search_type() {
        None => format!(
            "db.{}.createSearchIndex('{}', {})",
            def.collection, def.name, def.spec
        ),
        Some(search_type) => format!(
            "db.{}.createSearchIndex('{}', '{}', {})",
            def.collection, def.name, search_type, def.spec
        ),
    }
}

/// Prints the metadata entries for `name` as a JSON array.
pub fn list_indexes_script(collection: &str, name: &str) -> String {
    format!("JSON.stringify(db.{collection}.getSearchIndexes('{name}'))")
}

/// Copy of `argv` safe to log: the value after `--password` is masked.
pub fn redact(argv: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(argv.len());
    let mut mask_next = false;
    for arg in argv {
        if mask_next {
            out.push("****".to_string());
            mask_next = false;
        } else {
            mask_next = arg == "--password";
            out.push(arg.clone());
        }
    }
    out
}
