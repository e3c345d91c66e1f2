// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

const WORKSPACE_CRATES: &[&str] = &["qubo-embed", "qubo-embed-driver"];

fn check_spdx_identifier(file_path: &Path) -> bool {
    let file = fs::File::open(file_path).unwrap();
    let reader = io::BufReader::new(file);
    if let Some(Ok(first_line)) = reader.lines().next() {
        return first_line.starts_with("// SPDX-License-Identifier: Apache-2.0");
    }
    false
}

#[test]
fn check_all_rust_files_for_spdx() {
    let workspace_dir = Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("crate lives inside the workspace");
    let mut missing_spdx_files = Vec::new();
    let mut dir_worklist: Vec<PathBuf> = WORKSPACE_CRATES
        .iter()
        .map(|name| workspace_dir.join(name))
        .filter(|path| path.is_dir())
        .collect();

    while let Some(dir) = dir_worklist.pop() {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();

            if path.is_dir() {
                if path.file_name().map_or(false, |name| name == "target") {
                    continue;
                }
                dir_worklist.push(path);
                continue;
            }

            if path.extension().map_or(false, |ext| ext == "rs") && !check_spdx_identifier(&path)
            {
                missing_spdx_files.push(path);
            }
        }
    }

    if !missing_spdx_files.is_empty() {
        panic!(
            "The following files are missing SPDX identifiers: {:?}",
            missing_spdx_files
        );
    }
}
