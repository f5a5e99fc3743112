//! The `deps` goal: print the facts dependent builds need.
//!
//! External dependency tooling consumes the resolved toolchain programs and
//! derived output directories in the same `NAME = value` shape as
//! `print-vars`.

use anyhow::Result;

use crate::ops::print_vars::value_of;
use crate::ops::Session;

const DEP_FACTS: &[&str] = &["CC", "CXX", "AS", "AR", "LD", "O_BUILD_DIR", "O_DIST_DIR"];

pub fn render(session: &Session) -> Vec<String> {
    DEP_FACTS
        .iter()
        .filter_map(|name| value_of(session, name).map(|value| format!("{name} = {value}")))
        .collect()
}

pub fn execute(session: &Session) -> Result<()> {
    for line in render(session) {
        println!("{line}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vars::{gather, resolve as resolve_vars};
    use crate::core::{layout, toolchain};
    use std::collections::BTreeMap;
    use std::path::Path;

    #[test]
    fn test_render_lists_toolchain_and_dirs() {
        let file_vars: BTreeMap<_, _> = [
            ("PROJ_NAME".to_string(), "hello".to_string()),
            ("PROJ_TYPE".to_string(), "app".to_string()),
            ("O".to_string(), "output".to_string()),
        ]
        .into();
        let config = resolve_vars(&gather(file_vars, BTreeMap::new(), &[])).unwrap();
        let layout = layout::resolve(&config, Path::new("/proj")).unwrap();
        let toolchain = toolchain::resolve("");
        let session = Session {
            root: layout.root.clone(),
            config,
            layout,
            toolchain,
        };

        let lines = render(&session);
        assert!(lines.contains(&"CC = gcc".to_string()));
        assert!(lines.contains(&"O_BUILD_DIR = output/build".to_string()));
        assert!(lines.contains(&"O_DIST_DIR = output/dist".to_string()));
    }
}
