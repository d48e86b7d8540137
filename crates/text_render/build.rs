// build.rs
// Compiles the text pipeline's GLSL sources to SPIR-V when the Vulkan SDK is available

use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

const SHADER_SOURCE_DIR: &str = "../../resources/shaders";
const SHADER_OUTPUT_DIR: &str = "../../target/shaders";

fn main() {
    println!("cargo:rerun-if-changed={}", SHADER_SOURCE_DIR);
    println!("cargo:rerun-if-env-changed=VULKAN_SDK");
    println!("cargo:rerun-if-env-changed=SKIP_SHADERS");

    if env::var("SKIP_SHADERS").is_ok() {
        eprintln!("info: Skipping shader compilation (SKIP_SHADERS set)");
        return;
    }

    let Some(glslc) = find_glslc() else {
        eprintln!("warning: glslc not available, text shaders not compiled");
        eprintln!("hint: Install the Vulkan SDK and set VULKAN_SDK");
        return;
    };

    let output_dir = PathBuf::from(SHADER_OUTPUT_DIR);
    if let Err(e) = std::fs::create_dir_all(&output_dir) {
        eprintln!("warning: Failed to create {:?}: {}", output_dir, e);
        return;
    }

    let sources = match std::fs::read_dir(SHADER_SOURCE_DIR) {
        Ok(entries) => entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| matches!(path.extension().and_then(|e| e.to_str()), Some("vert" | "frag")))
            .collect::<Vec<_>>(),
        Err(_) => {
            eprintln!("info: No shader directory found at: {}", SHADER_SOURCE_DIR);
            return;
        }
    };

    for source in sources {
        let Some(stem) = source.file_stem() else { continue };
        let output = output_dir.join(stem).with_extension("spv");

        if !is_stale(&source, &output) {
            continue;
        }

        let status = Command::new(&glslc).arg(&source).arg("-o").arg(&output).status();
        match status {
            Ok(s) if s.success() => eprintln!("info: Compiled {:?} -> {:?}", source, output),
            Ok(s) => panic!("glslc failed for {:?} with exit code {}", source, s.code().unwrap_or(-1)),
            Err(e) => panic!("Failed to run glslc for {:?}: {}", source, e),
        }
    }
}

fn find_glslc() -> Option<PathBuf> {
    let sdk = env::var("VULKAN_SDK").ok()?;
    let glslc = if cfg!(target_os = "windows") {
        Path::new(&sdk).join("Bin").join("glslc.exe")
    } else {
        Path::new(&sdk).join("bin").join("glslc")
    };
    glslc.exists().then_some(glslc)
}

fn is_stale(source: &Path, output: &Path) -> bool {
    let modified = |path: &Path| std::fs::metadata(path).and_then(|m| m.modified()).ok();
    match (modified(source), modified(output)) {
        (Some(src), Some(dst)) => src > dst,
        _ => true,
    }
}
