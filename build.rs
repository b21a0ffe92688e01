use std::{env, path::PathBuf};

fn main() {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let env_path = PathBuf::from(&manifest_dir).join(".env");

    println!("cargo:rerun-if-changed={}", env_path.display());

    let Ok(entries) = dotenvy::from_path_iter(&env_path) else {
        println!("cargo:warning=no .env file; GEMINI_API_KEY must come from the process environment");
        return;
    };
    for (key, value) in entries.flatten() {
        println!("cargo:rustc-env={}={}", key, value);
    }
}
