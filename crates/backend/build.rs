use std::env;
use std::fs;
use std::path::{Path, PathBuf};

// Рядом с бинарником должны лежать config.toml и migrations/:
// config::load_config и migration_runner ищут их в каталоге exe.
fn main() {
    println!("cargo:rerun-if-changed=../../config.toml");
    println!("cargo:rerun-if-changed=../../migrations");

    let workspace = workspace_root();
    let target = profile_dir();

    let config = workspace.join("config.toml");
    if config.exists() {
        copy(&config, &target.join("config.toml"));
    } else {
        println!("cargo:warning=config.toml not found at {:?}, defaults will be used", config);
    }

    let migrations = workspace.join("migrations");
    if migrations.is_dir() {
        let dest = target.join("migrations");
        fs::create_dir_all(&dest).unwrap_or_else(|e| panic!("create {:?}: {}", dest, e));
        for path in sql_files(&migrations) {
            if let Some(name) = path.file_name() {
                copy(&path, &dest.join(name));
            }
        }
    }
}

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .map(Path::to_path_buf)
        .expect("backend crate must live in <workspace>/crates/backend")
}

/// target/debug или target/release (OUT_DIR лежит глубже, в build/<pkg>/out)
fn profile_dir() -> PathBuf {
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    let profile = env::var("PROFILE").expect("PROFILE is set by cargo");
    out_dir
        .ancestors()
        .find(|p| p.ends_with(&profile))
        .map(Path::to_path_buf)
        .expect("target profile directory not found above OUT_DIR")
}

fn sql_files(dir: &Path) -> Vec<PathBuf> {
    let entries = fs::read_dir(dir).unwrap_or_else(|e| panic!("read {:?}: {}", dir, e));
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().map(|ext| ext == "sql").unwrap_or(false))
        .collect();
    files.sort();
    files
}

fn copy(from: &Path, to: &Path) {
    fs::copy(from, to).unwrap_or_else(|e| panic!("copy {:?} -> {:?}: {}", from, to, e));
}
